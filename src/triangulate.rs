// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Triangulation for spine extraction.
//
// The pipeline runs on the graph built from the input polylines:
//   1. merge coincident vertices and duplicate edges,
//   2. regularize into x-monotone faces,
//   3. classify faces as interior or exterior,
//   4. triangulate every interior face,
//   5. flip diagonals that shorten,
//   6. alternate boundary refinement with flips until refinement stops.

pub mod monotone;
pub mod refine;

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::context::SpineConfig;
use crate::error::SpineError;
use crate::geom::{vert_eq, Real};
use crate::graph::{EdgeIdx, EdgeMask, PlanarGraph};
use crate::sweep::{lexical_order, regularize};

pub use refine::add_perpendiculars_to_boundaries;

/// Run the whole triangulation pipeline.
pub fn triangulate_for_spine(
    graph: &mut PlanarGraph,
    mark_parity: bool,
    min_split_radians: Real,
    config: &SpineConfig,
) -> Result<(), SpineError> {
    let merged = merge_duplicates(graph);
    let diagonals = regularize(graph);
    let interior = mark_exterior_faces(graph, mark_parity);
    let triangulated = triangulate_interior(graph)?;
    let flips = graph.improve_by_flips();
    log::debug!(
        "triangulate: {} duplicates merged, {} diagonals, {} interior faces, {} triangulated, {} flips",
        merged,
        diagonals,
        interior,
        triangulated,
        flips
    );

    for pass in 0..config.refine_iteration_cap {
        let splits =
            add_perpendiculars_to_boundaries(graph, min_split_radians, config.min_candidate_radians);
        if splits == 0 {
            break;
        }
        let flips = graph.improve_by_flips();
        log::debug!("refine pass {}: {} splits, {} flips", pass, splits, flips);
    }
    Ok(())
}

// ─────────────────────────── Duplicate merging ────────────────────────────────

/// Fuse vertices at identical (x, y), drop zero-length edges, and keep one
/// copy of edges joining the same two points. The surviving copy is a
/// boundary edge iff an odd number of the copies were. Returns the number of
/// edges removed.
pub fn merge_duplicates(graph: &mut PlanarGraph) -> usize {
    let mut seeds = graph.vertex_seeds();
    seeds.sort_by(|&a, &b| lexical_order(graph, a, b));
    let mut i = 0;
    while i < seeds.len() {
        let mut j = i + 1;
        while j < seeds.len() && same_point(graph, seeds[i], seeds[j]) {
            j += 1;
        }
        if j - i > 1 {
            merge_vertex_rings(graph, &seeds[i..j]);
        }
        i = j;
    }

    let mut removed = 0;
    for e in (0..graph.len() as EdgeIdx).step_by(2) {
        if !graph.is_deleted(e) && same_point(graph, e, e ^ 1) {
            graph.delete_edge(e);
            removed += 1;
        }
    }

    for e in 0..graph.len() as EdgeIdx {
        loop {
            if graph.is_deleted(e) {
                break;
            }
            let twin = graph.vsucc(e);
            if twin == e || !same_point(graph, e ^ 1, twin ^ 1) {
                break;
            }
            if graph.is_boundary(twin) {
                graph.toggle_mask_on_edge(e, EdgeMask::BOUNDARY_EDGE);
            }
            graph.delete_edge(twin);
            removed += 1;
        }
    }
    removed
}

fn same_point(graph: &PlanarGraph, a: EdgeIdx, b: EdgeIdx) -> bool {
    let p = graph.position(a);
    let q = graph.position(b);
    vert_eq(p[0], p[1], q[0], q[1])
}

/// Rebuild one ring out of several rings sitting on the same point, ordered
/// CCW by direction.
fn merge_vertex_rings(graph: &mut PlanarGraph, seeds: &[EdgeIdx]) {
    let mut members: Vec<EdgeIdx> = seeds.iter().flat_map(|&s| graph.vertex_ring(s)).collect();
    for &n in &members {
        if graph.vsucc(n) != n {
            let before = graph.vpred(n);
            graph.vertex_twist(before, n);
        }
    }
    let angle = |n: EdgeIdx| {
        let d = graph.direction(n);
        d[1].atan2(d[0])
    };
    members.sort_by(|&a, &b| angle(a).partial_cmp(&angle(b)).unwrap_or(Ordering::Equal));
    for pair in members.windows(2) {
        graph.vertex_twist(pair[0], pair[1]);
    }
}

// ─────────────────────────── Face classification ──────────────────────────────

/// Flag every half-edge of an exterior face with `EXTERIOR_EDGE`. Returns the
/// number of interior faces.
///
/// Faces with non-positive signed area (the unbounded face of each component)
/// seed the search. With `mark_parity`, crossing a boundary edge toggles
/// inside/outside, which is even-odd fill. Without it, exterior status only
/// spreads across edges that did not come from the input.
pub fn mark_exterior_faces(graph: &mut PlanarGraph, mark_parity: bool) -> usize {
    graph.clear_mask_everywhere(EdgeMask::EXTERIOR_EDGE);
    let faces = graph.face_seeds();
    let mut face_of = vec![usize::MAX; graph.len()];
    for (i, &f) in faces.iter().enumerate() {
        for n in graph.face_loop(f) {
            face_of[n as usize] = i;
        }
    }

    let mut exterior: Vec<Option<bool>> = vec![None; faces.len()];
    let mut queue = VecDeque::new();
    for (i, &f) in faces.iter().enumerate() {
        if graph.signed_area(f) <= 0.0 {
            exterior[i] = Some(true);
            queue.push_back(i);
        }
    }

    while let Some(i) = queue.pop_front() {
        let outside = exterior[i] == Some(true);
        for n in graph.face_loop(faces[i]) {
            let j = face_of[(n ^ 1) as usize];
            if exterior[j].is_some() {
                continue;
            }
            let crosses = graph.is_boundary(n);
            if mark_parity {
                exterior[j] = Some(outside != crosses);
            } else if !crosses {
                exterior[j] = Some(outside);
            } else {
                continue;
            }
            queue.push_back(j);
        }
    }

    let mut interior = 0;
    for (i, &f) in faces.iter().enumerate() {
        if exterior[i].unwrap_or(false) {
            graph.set_mask_around_face(f, EdgeMask::EXTERIOR_EDGE);
        } else {
            interior += 1;
        }
    }
    interior
}

/// Triangulate every interior face with more than three edges, then flip
/// away any zero-area triangle left by collinear vertices. Returns the
/// number of faces split.
pub fn triangulate_interior(graph: &mut PlanarGraph) -> Result<usize, SpineError> {
    let mut count = 0;
    for face in graph.face_seeds() {
        if graph.is_exterior(face) || graph.face_degree(face) == 3 {
            continue;
        }
        graph.tessellate_mono_region(face)?;
        count += 1;
    }
    let repaired = graph.repair_slivers();
    if repaired > 0 {
        log::debug!("triangulate: {} slivers repaired", repaired);
    }
    Ok(count)
}
