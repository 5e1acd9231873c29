// Copyright 2025 Lars Brubaker
// Shared test utilities for pslg-spine tests.

#![allow(dead_code)]

use pslg_spine::geom::{Point, Real};
use pslg_spine::{EdgeIdx, EdgeMask, PlanarGraph, SpineContext};

/// Parse the `.dat` format: one vertex per line as `x y` or `x, y`.
/// Blank lines separate contours. Returns a Vec of contours, each a flat f64 array.
pub fn parse_contours(data: &str) -> Vec<Vec<Real>> {
    let mut contours: Vec<Vec<Real>> = Vec::new();
    let mut current: Vec<Real> = Vec::new();

    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                contours.push(std::mem::take(&mut current));
            }
            continue;
        }
        let floats: Vec<Real> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<Real>().ok())
            .collect();
        current.extend(floats);
    }
    if !current.is_empty() {
        contours.push(current);
    }
    contours
}

/// Insert every contour as a closed polyline and triangulate.
pub fn triangulated(contours: &[Vec<Real>], mark_parity: bool, min_split: Real) -> SpineContext {
    let mut ctx = SpineContext::new();
    for contour in contours {
        ctx.insert_edges(2, contour, true).expect("insert contour");
    }
    ctx.triangulate_for_spine(mark_parity, min_split)
        .expect("triangulate");
    ctx
}

/// Absolute shoelace area of a closed point loop.
pub fn polygon_area(points: &[Point]) -> Real {
    let n = points.len();
    let twice: Real = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a[0] * b[1] - b[0] * a[1]
        })
        .sum();
    (twice * 0.5).abs()
}

pub fn total_face_area(ctx: &SpineContext) -> Real {
    ctx.faces().iter().map(|f| polygon_area(f)).sum()
}

/// Interior face seeds of a graph, one half-edge per face.
pub fn interior_faces(graph: &PlanarGraph) -> Vec<EdgeIdx> {
    graph
        .face_seeds()
        .into_iter()
        .filter(|&f| !graph.is_exterior(f))
        .collect()
}

/// Walk fsucc from every live half-edge and require a return within `len` steps.
pub fn verify_faces_close(graph: &PlanarGraph) {
    for e in 0..graph.len() as EdgeIdx {
        if graph.is_deleted(e) {
            continue;
        }
        let mut cur = graph.fsucc(e);
        let mut steps = 1;
        while cur != e {
            assert!(steps <= graph.len(), "face at {} does not close", e);
            assert!(!graph.is_deleted(cur), "face at {} reaches deleted {}", e, cur);
            cur = graph.fsucc(cur);
            steps += 1;
        }
    }
}

/// Per-half-edge masks that must agree between mates.
pub fn verify_mates_agree(graph: &PlanarGraph, mask: EdgeMask) {
    for e in (0..graph.len() as EdgeIdx).step_by(2) {
        assert_eq!(
            graph.has_mask(e, mask),
            graph.has_mask(e ^ 1, mask),
            "{:?} differs across edge {}",
            mask,
            e
        );
    }
}
