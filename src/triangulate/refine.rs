// Copyright 2025 Lars Brubaker
// Boundary refinement: perpendicular splits under wide corners.

use crate::geom::{angle_between, delta, foot_fraction, lerp, Point, Real};
use crate::graph::{EdgeIdx, PlanarGraph};

/// One refinement pass over the interior triangles.
///
/// For a triangle (A, B, C) whose edge B→C came from the input, if the corner
/// at A is wider than `min_candidate_radians`, the perpendicular from A is
/// dropped onto B–C. When the foot falls strictly inside the edge and both
/// halves of the corner at A stay at least `min_split_radians`, B–C is split
/// at the foot and A is joined to the new vertex. At most one split is made
/// per triangle. An interior triangle on the far side of B–C is split at
/// the same vertex. Returns the number of splits.
pub fn add_perpendiculars_to_boundaries(
    graph: &mut PlanarGraph,
    min_split_radians: Real,
    min_candidate_radians: Real,
) -> usize {
    let triangles: Vec<EdgeIdx> = graph
        .face_seeds()
        .into_iter()
        .filter(|&f| graph.is_interior_face_of_degree(f, 3))
        .collect();

    let mut splits = 0;
    for seed in triangles {
        if !graph.is_interior_face_of_degree(seed, 3) {
            continue;
        }
        for n in graph.face_loop(seed) {
            let Some(foot) = perpendicular_foot(graph, n, min_split_radians, min_candidate_radians)
            else {
                continue;
            };
            let apex = graph.fpred(n);
            let (u, m) = graph.split_edge(n);
            graph.set_vertex_position(u, foot);
            graph.join(apex, u);
            // A filled face across the edge was a triangle too; keep it one.
            if graph.is_interior_face_of_degree(m, 4) {
                let far_apex = graph.fsucc(graph.fsucc(m));
                graph.join(m, far_apex);
            }
            log::trace!("split boundary edge {} at ({}, {})", n, foot[0], foot[1]);
            splits += 1;
            break;
        }
    }
    splits
}

/// Foot of the perpendicular from the apex opposite boundary half-edge `n`,
/// if the corner qualifies for a split.
fn perpendicular_foot(
    graph: &PlanarGraph,
    n: EdgeIdx,
    min_split_radians: Real,
    min_candidate_radians: Real,
) -> Option<Point> {
    if !graph.is_boundary(n) {
        return None;
    }
    let b = graph.position(n);
    let c = graph.position(n ^ 1);
    let a = graph.position(graph.fpred(n));
    let ab = delta(&a, &b);
    let ac = delta(&a, &c);
    if angle_between(ab, ac) <= min_candidate_radians {
        return None;
    }
    let s = foot_fraction(&a, &b, &c);
    if !(s > 0.0 && s < 1.0) {
        return None;
    }
    let foot = lerp(&b, &c, s);
    let af = delta(&a, &foot);
    if angle_between(ab, af) < min_split_radians || angle_between(af, ac) < min_split_radians {
        return None;
    }
    Some(foot)
}
