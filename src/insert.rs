// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Polyline insertion: turns input point sequences into connected half-edge
// chains in the graph.

use crate::error::SpineError;
use crate::geom::{is_valid_coord, vert_eq, Point, Real};
use crate::graph::{EdgeIdx, EdgeMask, PlanarGraph, INVALID};

impl PlanarGraph {
    /// Add one polyline. `size` = 2 or 3 (coords per vertex). `vertices` is flat.
    ///
    /// Each consecutive point pair becomes an edge marked `BOUNDARY_EDGE` on
    /// both sides, stitched to the previous edge at their shared point. When
    /// `closed`, the last edge is stitched back to the first. Repeated points
    /// are skipped, and a closed polyline that already ends on its first
    /// point is not closed a second time.
    ///
    /// Returns the number of edges added. Nothing is inserted if any
    /// coordinate is rejected.
    pub fn insert_edges(
        &mut self,
        size: usize,
        vertices: &[Real],
        closed: bool,
    ) -> Result<usize, SpineError> {
        if size != 2 && size != 3 {
            return Err(SpineError::InvalidStride(size));
        }
        let count = vertices.len() / size;

        let mut points: Vec<Point> = Vec::with_capacity(count);
        for i in 0..count {
            let coords = &vertices[i * size..(i + 1) * size];
            if let Some(&bad) = coords.iter().find(|&&c| !is_valid_coord(c)) {
                return Err(SpineError::InvalidCoordinate { index: i, value: bad });
            }
            let p = [coords[0], coords[1], if size > 2 { coords[2] } else { 0.0 }];
            if let Some(q) = points.last() {
                if vert_eq(q[0], q[1], p[0], p[1]) {
                    continue;
                }
            }
            points.push(p);
        }
        if closed && points.len() > 2 {
            let (f, l) = (points[0], points[points.len() - 1]);
            if vert_eq(f[0], f[1], l[0], l[1]) {
                points.pop();
            }
        }
        if points.len() < 2 {
            return Ok(0);
        }

        let edge_count = if closed { points.len() } else { points.len() - 1 };
        let mut first: EdgeIdx = INVALID;
        let mut prev: EdgeIdx = INVALID;
        for i in 0..edge_count {
            let e = self.new_pair();
            self.set_position(e, points[i]);
            self.set_position(e ^ 1, points[(i + 1) % points.len()]);
            self.set_mask_on_edge(e, EdgeMask::BOUNDARY_EDGE);
            if prev == INVALID {
                first = e;
            } else {
                self.vertex_twist(prev ^ 1, e);
            }
            prev = e;
        }
        if closed {
            self.vertex_twist(prev ^ 1, first);
        }

        log::trace!(
            "inserted {} edges from {} points (closed: {})",
            edge_count,
            points.len(),
            closed
        );
        Ok(edge_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn closed_triangle() {
        let mut graph = PlanarGraph::new();
        let added = graph
            .insert_edges(2, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0], true)
            .unwrap();
        assert_eq!(added, 3);
        assert!(graph.check_invariants().is_ok());
        assert_eq!(graph.face_seeds().len(), 2);
        assert_eq!(graph.vertex_seeds().len(), 3);
        assert_relative_eq!(graph.signed_area(0), 0.5);
        assert!((0..6).all(|e| graph.is_boundary(e)));
    }

    #[test]
    fn open_polyline_is_one_face() {
        let mut graph = PlanarGraph::new();
        graph
            .insert_edges(3, &[0.0, 0.0, 1.0, 1.0, 0.0, 2.0, 2.0, 1.0, 3.0], false)
            .unwrap();
        assert!(graph.check_invariants().is_ok());
        let faces = graph.face_seeds();
        assert_eq!(faces.len(), 1);
        assert_eq!(graph.face_degree(faces[0]), 4);
        assert_eq!(graph.position(0)[2], 1.0);
    }

    #[test]
    fn repeated_points_are_skipped() {
        let mut graph = PlanarGraph::new();
        let added = graph
            .insert_edges(
                2,
                &[0.0, 0.0, 0.0, 0.0, 4.0, 0.0, 4.0, 3.0, 4.0, 3.0, 0.0, 0.0],
                true,
            )
            .unwrap();
        assert_eq!(added, 3);
    }

    #[test]
    fn rejects_bad_input_without_inserting() {
        let mut graph = PlanarGraph::new();
        let err = graph
            .insert_edges(2, &[0.0, 0.0, Real::NAN, 1.0, 2.0, 2.0], true)
            .unwrap_err();
        assert!(matches!(err, SpineError::InvalidCoordinate { index: 1, .. }));
        assert!(graph.is_empty());
        assert_eq!(
            graph.insert_edges(4, &[0.0; 8], true),
            Err(SpineError::InvalidStride(4))
        );
    }

    #[test]
    fn single_point_adds_nothing() {
        let mut graph = PlanarGraph::new();
        assert_eq!(graph.insert_edges(2, &[1.0, 1.0], true), Ok(0));
        assert!(graph.is_empty());
    }
}
