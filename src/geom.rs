// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Pure geometric functions on planar (x, y) coordinates.
//
// The sweep order used throughout the crate is lexical: x first, then y.
// The scalar predicates take unpacked coordinates like the sweep code
// expects; the point helpers below them work on half-edge positions.

pub type Real = f64;

/// A half-edge position. `z` is carried through but never used for planar work.
pub type Point = [Real; 3];

/// Largest accepted input coordinate magnitude.
pub const MAX_VALID_COORD: Real = (1u64 << 52) as Real;
pub const MIN_VALID_COORD: Real = -MAX_VALID_COORD;

/// Returns true if u is lexicographically <= v (x first, then y).
#[inline]
pub fn vert_leq(u_x: Real, u_y: Real, v_x: Real, v_y: Real) -> bool {
    u_x < v_x || (u_x == v_x && u_y <= v_y)
}

/// Strict form of `vert_leq`.
#[inline]
pub fn vert_lt(u_x: Real, u_y: Real, v_x: Real, v_y: Real) -> bool {
    u_x < v_x || (u_x == v_x && u_y < v_y)
}

/// Returns true if u == v (exact equality).
#[inline]
pub fn vert_eq(u_x: Real, u_y: Real, v_x: Real, v_y: Real) -> bool {
    u_x == v_x && u_y == v_y
}

/// Given three vertices u,v,w such that vert_leq(u,v) && vert_leq(v,w),
/// evaluates the y-coord of edge uw at the x-coord of v.
/// Returns v.y - (uw)(v.x), the signed distance from uw to v.
/// If uw is vertical (passes through v), returns zero.
pub fn edge_eval(u_x: Real, u_y: Real, v_x: Real, v_y: Real, w_x: Real, w_y: Real) -> Real {
    let gap_l = v_x - u_x;
    let gap_r = w_x - v_x;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v_y - u_y) + (u_y - w_y) * (gap_l / (gap_l + gap_r))
        } else {
            (v_y - w_y) + (w_y - u_y) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// Twice the signed area of triangle (u, v, w); positive when CCW.
#[inline]
pub fn orient(u_x: Real, u_y: Real, v_x: Real, v_y: Real, w_x: Real, w_y: Real) -> Real {
    (v_x - u_x) * (w_y - u_y) - (v_y - u_y) * (w_x - u_x)
}

/// Division that returns `default` instead of dividing by zero.
#[inline]
pub fn safe_divide(numerator: Real, denominator: Real, default: Real) -> Real {
    if denominator == 0.0 {
        default
    } else {
        numerator / denominator
    }
}

/// Finite and inside the accepted range.
#[inline]
pub fn is_valid_coord(c: Real) -> bool {
    c.is_finite() && (MIN_VALID_COORD..=MAX_VALID_COORD).contains(&c)
}

// ───────────────────────────── Point helpers ──────────────────────────────────

/// Planar vector from `a` to `b`.
#[inline]
pub fn delta(a: &Point, b: &Point) -> [Real; 2] {
    [b[0] - a[0], b[1] - a[1]]
}

#[inline]
pub fn cross(u: [Real; 2], v: [Real; 2]) -> Real {
    u[0] * v[1] - u[1] * v[0]
}

#[inline]
pub fn dot(u: [Real; 2], v: [Real; 2]) -> Real {
    u[0] * v[0] + u[1] * v[1]
}

/// Squared planar distance.
#[inline]
pub fn dist2(a: &Point, b: &Point) -> Real {
    let d = delta(a, b);
    dot(d, d)
}

#[inline]
pub fn midpoint(a: &Point, b: &Point) -> Point {
    [
        0.5 * (a[0] + b[0]),
        0.5 * (a[1] + b[1]),
        0.5 * (a[2] + b[2]),
    ]
}

/// Point at fraction `s` along a→b.
#[inline]
pub fn lerp(a: &Point, b: &Point, s: Real) -> Point {
    [
        a[0] + s * (b[0] - a[0]),
        a[1] + s * (b[1] - a[1]),
        a[2] + s * (b[2] - a[2]),
    ]
}

/// Average of a non-empty point list.
pub fn centroid(points: &[Point]) -> Point {
    let mut sum = [0.0; 3];
    for p in points {
        sum[0] += p[0];
        sum[1] += p[1];
        sum[2] += p[2];
    }
    let n = points.len().max(1) as Real;
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

/// Unsigned angle between two vectors, in [0, π].
#[inline]
pub fn angle_between(u: [Real; 2], v: [Real; 2]) -> Real {
    cross(u, v).abs().atan2(dot(u, v))
}

/// Angle between the lines carrying two vectors, in [0, π/2].
#[inline]
pub fn line_angle(u: [Real; 2], v: [Real; 2]) -> Real {
    cross(u, v).abs().atan2(dot(u, v).abs())
}

/// Parameter of the perpendicular foot from `a` onto the line b→c
/// (0 at b, 1 at c). A zero-length segment yields -1.
#[inline]
pub fn foot_fraction(a: &Point, b: &Point, c: &Point) -> Real {
    let bc = delta(b, c);
    safe_divide(dot(delta(b, a), bc), dot(bc, bc), -1.0)
}
