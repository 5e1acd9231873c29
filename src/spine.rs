// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Spine synthesis over the final triangle/quad mesh.
//
// Each interior face contributes segments according to how many of its sides
// are boundary edges and where they sit. "Interior" segments continue the
// spine through the region; "final" segments end it at a dead end or an
// isolated face.

use crate::geom::{centroid, delta, line_angle, midpoint, Point, Real};
use crate::graph::{EdgeIdx, PlanarGraph};

/// Which families of spine segments to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpineEdgeOptions {
    /// Segments that connect neighbouring faces through interior edges.
    pub include_interior: bool,
    /// Dead-end spurs and the spokes of isolated faces.
    pub include_final: bool,
    /// Spokes toward the boundary sides of an outer-corner quad.
    pub include_corner_spokes: bool,
}

impl Default for SpineEdgeOptions {
    fn default() -> Self {
        Self {
            include_interior: true,
            include_final: true,
            include_corner_spokes: true,
        }
    }
}

/// One output segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpineSegment {
    pub start: Point,
    pub end: Point,
}

struct SegmentSink<'a> {
    out: &'a mut Vec<SpineSegment>,
    options: SpineEdgeOptions,
}

impl SegmentSink<'_> {
    fn push_if(&mut self, enabled: bool, start: Point, end: Point) {
        if enabled {
            self.out.push(SpineSegment { start, end });
        }
    }

    fn interior(&mut self, start: Point, end: Point) {
        self.push_if(self.options.include_interior, start, end);
    }

    fn terminal(&mut self, start: Point, end: Point) {
        self.push_if(self.options.include_final, start, end);
    }

    fn corner(&mut self, start: Point, end: Point) {
        self.push_if(self.options.include_corner_spokes, start, end);
    }
}

/// Walk every interior triangle and quad and collect its spine segments.
/// Faces of other degrees contribute nothing.
pub fn spine_edges(graph: &PlanarGraph, options: SpineEdgeOptions) -> Vec<SpineSegment> {
    let mut out = Vec::new();
    let mut sink = SegmentSink {
        out: &mut out,
        options,
    };
    for face in graph.face_seeds() {
        if graph.is_exterior(face) {
            continue;
        }
        let nodes = graph.face_loop(face);
        match nodes.len() {
            3 => triangle_spine(graph, &nodes, &mut sink),
            4 => quad_spine(graph, &nodes, &mut sink),
            _ => {}
        }
    }
    log::debug!("spine: {} segments", out.len());
    out
}

fn corners_and_flags<const N: usize>(graph: &PlanarGraph, nodes: &[EdgeIdx]) -> ([Point; N], [bool; N]) {
    let corners = std::array::from_fn(|i| graph.position(nodes[i]));
    let boundary = std::array::from_fn(|i| graph.is_boundary(nodes[i]));
    (corners, boundary)
}

fn quad_spine(graph: &PlanarGraph, nodes: &[EdgeIdx], sink: &mut SegmentSink) {
    let (p, b) = corners_and_flags::<4>(graph, nodes);
    let mid: [Point; 4] = std::array::from_fn(|i| midpoint(&p[i], &p[(i + 1) % 4]));
    let center = centroid(&p);
    let open: Vec<usize> = (0..4).filter(|&i| !b[i]).collect();

    match open.len() {
        // Junction of four corridors.
        4 => (0..4).for_each(|i| sink.interior(mid[i], center)),
        // Isolated block.
        0 => (0..4).for_each(|i| sink.terminal(center, mid[i])),
        // Three ways in, one wall.
        3 => open.iter().for_each(|&i| sink.interior(mid[i], center)),
        // Dead end.
        1 => {
            let i = open[0];
            sink.interior(mid[i], center);
            sink.terminal(center, mid[(i + 2) % 4]);
        }
        // Straight corridor between two opposite walls.
        2 if open[1] - open[0] == 2 => sink.interior(mid[open[0]], mid[open[1]]),
        // Outer corner.
        _ => (0..4).for_each(|i| {
            if b[i] {
                sink.corner(mid[i], center)
            } else {
                sink.interior(mid[i], center)
            }
        }),
    }
}

fn triangle_spine(graph: &PlanarGraph, nodes: &[EdgeIdx], sink: &mut SegmentSink) {
    let (p, b) = corners_and_flags::<3>(graph, nodes);
    let mid: [Point; 3] = std::array::from_fn(|i| midpoint(&p[i], &p[(i + 1) % 3]));
    let walls = b.iter().filter(|&&x| x).count();

    match walls {
        0 => {
            let branch = branch_point(&p, &mid);
            (0..3).for_each(|i| sink.interior(mid[i], branch));
        }
        1 => {
            let j = (0..3).find(|&i| b[i]).unwrap_or(0);
            sink.interior(mid[(j + 1) % 3], mid[(j + 2) % 3]);
        }
        2 => {
            let i = (0..3).find(|&i| !b[i]).unwrap_or(0);
            sink.terminal(mid[i], p[(i + 2) % 3]);
        }
        _ => {
            let branch = branch_point(&p, &mid);
            (0..3).for_each(|i| sink.terminal(mid[i], branch));
        }
    }
}

/// Junction point for a three-way triangle.
///
/// Candidates are the centroid and the average of each pair of side
/// midpoints. The winner maximizes, over the three sides, the smallest angle
/// between the side and the line from its midpoint to the candidate; the
/// centroid wins ties.
pub fn branch_point(p: &[Point; 3], mid: &[Point; 3]) -> Point {
    let candidates = [
        centroid(p),
        midpoint(&mid[0], &mid[1]),
        midpoint(&mid[1], &mid[2]),
        midpoint(&mid[2], &mid[0]),
    ];
    let score = |c: &Point| -> Real {
        (0..3)
            .map(|i| line_angle(delta(&p[i], &p[(i + 1) % 3]), delta(&mid[i], c)))
            .fold(Real::INFINITY, Real::min)
    };

    let mut best = candidates[0];
    let mut best_score = score(&best);
    for c in &candidates[1..] {
        let s = score(c);
        if s > best_score {
            best = *c;
            best_score = s;
        }
    }
    best
}
