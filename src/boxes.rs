// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Greedy merging of triangle pairs into quadrilateral boxes.
//
// Every interior diagonal between two triangles is scored by how close the
// quad it splits is to a square. Candidates are taken best first; a
// diagonal is accepted only while neither of its triangles has been claimed
// by an earlier one. The result depends on visiting order and is not a
// maximum matching.

use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_2;

use crate::geom::{delta, line_angle, midpoint, Point, Real};
use crate::graph::flip::is_strictly_convex;
use crate::graph::{EdgeIdx, EdgeMask, PlanarGraph};

/// Score of a diagonal that can never be selected.
pub const INELIGIBLE_SCORE: Real = -1.0;

/// Squareness of the quad formed by the two triangles around `e`.
///
/// Each pair of opposite side midpoints is joined by a bisector; the score is
/// the smallest angle any bisector makes with the two sides it connects, so a
/// square scores π/2 and slivers approach 0. Boundary edges, edges not
/// between two interior triangles, and non-convex quads are ineligible.
pub fn diagonal_score(graph: &PlanarGraph, e: EdgeIdx) -> Real {
    if !graph.is_flippable(e) {
        return INELIGIBLE_SCORE;
    }
    let quad = graph.quad_around(e);
    if !is_strictly_convex(&quad) {
        return INELIGIBLE_SCORE;
    }
    let mids: [Point; 4] = std::array::from_fn(|i| midpoint(&quad[i], &quad[(i + 1) % 4]));

    let mut score = FRAC_PI_2;
    for k in 0..2 {
        let bisector = delta(&mids[k], &mids[k + 2]);
        if bisector == [0.0, 0.0] {
            return INELIGIBLE_SCORE;
        }
        for side in [k, k + 2] {
            let along = delta(&quad[side], &quad[(side + 1) % 4]);
            score = score.min(line_angle(bisector, along));
        }
    }
    score
}

/// Select diagonals greedily and flag them.
///
/// `DIAGONAL` and `BOX` are cleared first, so they only describe the latest
/// run. Candidates scoring above `min_angle_radians` are sorted ascending
/// (stable, so equal scores keep index order) and popped from the top. An
/// accepted diagonal gets `DIAGONAL` on both mates and `BOX` around both of
/// its triangles. With `delete_diagonals` the accepted edges are removed,
/// turning each pair into one quad face. Returns the number accepted.
pub fn mark_boxes(graph: &mut PlanarGraph, delete_diagonals: bool, min_angle_radians: Real) -> usize {
    graph.clear_mask_everywhere(EdgeMask::DIAGONAL | EdgeMask::BOX);

    let mut candidates: Vec<(Real, EdgeIdx)> = (0..graph.len() as EdgeIdx)
        .step_by(2)
        .filter(|&e| !graph.is_deleted(e))
        .map(|e| (diagonal_score(graph, e), e))
        .filter(|&(score, _)| score > min_angle_radians)
        .collect();
    candidates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    let considered = candidates.len();

    let mut selected = 0;
    while let Some((score, e)) = candidates.pop() {
        if graph.has_mask(e, EdgeMask::BOX) || graph.has_mask(e ^ 1, EdgeMask::BOX) {
            continue;
        }
        graph.set_mask_on_edge(e, EdgeMask::DIAGONAL);
        graph.set_mask_around_face(e, EdgeMask::BOX);
        graph.set_mask_around_face(e ^ 1, EdgeMask::BOX);
        log::trace!("box diagonal {} score {:.4}", e, score);
        selected += 1;
    }

    if delete_diagonals {
        for e in (0..graph.len() as EdgeIdx).step_by(2) {
            if !graph.is_deleted(e) && graph.has_mask(e, EdgeMask::DIAGONAL) {
                graph.delete_edge(e);
            }
        }
    }
    log::debug!(
        "mark_boxes: {} candidates, {} diagonals selected (deleted: {})",
        considered,
        selected,
        delete_diagonals
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::loop_graph;
    use approx::assert_relative_eq;

    fn split_quad(pts: &[[Real; 2]; 4]) -> (PlanarGraph, EdgeIdx) {
        let mut graph = PlanarGraph::new();
        let edges = loop_graph(&mut graph, pts);
        graph.set_mask_around_face(edges[0] ^ 1, EdgeMask::EXTERIOR_EDGE);
        let d = graph.join(edges[0], edges[2]);
        (graph, d)
    }

    #[test]
    fn square_scores_right_angle() {
        let (graph, d) = split_quad(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        assert_relative_eq!(diagonal_score(&graph, d), FRAC_PI_2);
    }

    #[test]
    fn skewed_quad_scores_lower() {
        let (graph, d) = split_quad(&[[0.0, 0.0], [2.0, 0.0], [3.0, 1.0], [1.0, 1.0]]);
        let score = diagonal_score(&graph, d);
        assert!(score > 0.0 && score < FRAC_PI_2, "score {}", score);
    }

    #[test]
    fn boundary_and_nonconvex_are_ineligible() {
        let (mut graph, d) = split_quad(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        graph.set_mask_on_edge(d, EdgeMask::BOUNDARY_EDGE);
        assert_eq!(diagonal_score(&graph, d), INELIGIBLE_SCORE);

        let (graph, d) = split_quad(&[[0.0, 0.0], [4.0, 1.0], [5.0, 5.0], [3.5, 1.5]]);
        assert_eq!(diagonal_score(&graph, d), INELIGIBLE_SCORE);
    }

    #[test]
    fn mark_and_delete() {
        let (mut graph, d) = split_quad(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        assert_eq!(mark_boxes(&mut graph, false, 1.0), 1);
        assert!(graph.has_mask(d, EdgeMask::DIAGONAL) && graph.has_mask(d ^ 1, EdgeMask::DIAGONAL));
        assert!(graph.has_mask(0, EdgeMask::BOX));

        // A second run starts from clean masks and selects the same diagonal.
        assert_eq!(mark_boxes(&mut graph, true, 1.0), 1);
        assert!(graph.is_deleted(d));
        assert_eq!(graph.face_degree(0), 4);
        assert!(graph.check_invariants().is_ok());
    }

    #[test]
    fn threshold_filters_candidates() {
        let (mut graph, _) = split_quad(&[[0.0, 0.0], [2.0, 0.0], [3.0, 1.0], [1.0, 1.0]]);
        assert_eq!(mark_boxes(&mut graph, false, 1.5), 0);
    }
}
