// Copyright 2025 Lars Brubaker
// Full pipeline tests: insert → triangulate → boxes → spine.

mod helpers;

use approx::assert_relative_eq;
use pslg_spine::{SpineConfig, SpineContext, SpineEdgeOptions, SpineError, Stage};

fn t_shape() -> Vec<Vec<f64>> {
    helpers::parse_contours(include_str!("data/t_shape.dat"))
}

#[test]
fn t_shape_yields_ten_segments() {
    let mut ctx = helpers::triangulated(&t_shape(), true, 0.3);
    ctx.mark_boxes(true, 1.0).unwrap();
    let segments = ctx.spine_edges();
    assert_eq!(segments.len(), 10, "segments: {:?}", segments);
}

#[test]
fn t_shape_area_survives_every_stage() {
    let mut ctx = helpers::triangulated(&t_shape(), true, 0.3);
    assert_relative_eq!(helpers::total_face_area(&ctx), 43.0, epsilon = 1e-9);
    ctx.mark_boxes(true, 1.0).unwrap();
    assert_relative_eq!(helpers::total_face_area(&ctx), 43.0, epsilon = 1e-9);
}

#[test]
fn spine_queries_are_idempotent() {
    let mut ctx = helpers::triangulated(&t_shape(), true, 0.3);
    ctx.mark_boxes(true, 1.0).unwrap();
    let first = ctx.spine_edges();
    let second = ctx.spine_edges();
    assert_eq!(first, second);
    assert_eq!(ctx.graph().check_invariants(), Ok(()));
}

#[test]
fn spine_points_stay_inside_the_shape() {
    let mut ctx = helpers::triangulated(&t_shape(), true, 0.3);
    ctx.mark_boxes(true, 1.0).unwrap();
    let inside = |p: [f64; 3]| {
        let in_bar = (0.0..=20.0).contains(&p[0]) && (0.0..=2.0).contains(&p[1]);
        let in_stem = (4.0..=5.0).contains(&p[0]) && (2.0..=5.0).contains(&p[1]);
        in_bar || in_stem
    };
    for s in ctx.spine_edges() {
        assert!(inside(s.start) && inside(s.end), "segment leaves the shape: {:?}", s);
    }
}

#[test]
fn option_families_partition_the_output() {
    let mut ctx = helpers::triangulated(&t_shape(), true, 0.3);
    ctx.mark_boxes(true, 1.0).unwrap();
    let all = ctx.spine_edges().len();
    let only = |interior, last, corner| {
        ctx.spine_edges_with(SpineEdgeOptions {
            include_interior: interior,
            include_final: last,
            include_corner_spokes: corner,
        })
        .len()
    };
    assert_eq!(only(true, false, false) + only(false, true, false) + only(false, false, true), all);
    assert_eq!(only(false, false, false), 0);
}

#[test]
fn degenerate_loop_has_no_faces_or_segments() {
    let mut ctx = SpineContext::new();
    ctx.insert_edges(2, &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0], true).unwrap();
    ctx.triangulate_for_spine(true, 0.3).unwrap();
    assert_eq!(ctx.face_count(), 0);
    ctx.mark_boxes(true, 1.0).unwrap();
    assert!(ctx.spine_edges().is_empty());
}

#[test]
fn empty_context_triangulates_to_nothing() {
    let mut ctx = SpineContext::new();
    ctx.triangulate_for_spine(true, 0.3).unwrap();
    assert_eq!(ctx.face_count(), 0);
    assert!(ctx.spine_edges().is_empty());
}

#[test]
fn isolated_rectangle_is_one_block() {
    let mut ctx = helpers::triangulated(&[vec![0.0, 0.0, 4.0, 0.0, 4.0, 1.0, 0.0, 1.0]], true, 0.3);
    assert_eq!(ctx.face_count(), 2);
    assert_eq!(ctx.mark_boxes(true, 1.0), Ok(1));
    assert_eq!(ctx.face_count(), 1);

    let segments = ctx.spine_edges();
    assert_eq!(segments.len(), 4);
    for s in &segments {
        assert_relative_eq!(s.start[0], 2.0);
        assert_relative_eq!(s.start[1], 0.5);
    }
    let no_final = SpineEdgeOptions {
        include_final: false,
        ..SpineEdgeOptions::default()
    };
    assert!(ctx.spine_edges_with(no_final).is_empty());
}

#[test]
fn lone_triangle_spokes_meet_at_one_point() {
    let mut ctx = helpers::triangulated(&[vec![0.0, 0.0, 4.0, 0.0, 0.0, 3.0]], true, 0.3);
    ctx.mark_boxes(true, 1.0).unwrap();
    let segments = ctx.spine_edges();
    assert_eq!(segments.len(), 3);
    assert!(segments.iter().all(|s| s.end == segments[0].end));
}

#[test]
fn framed_square_leaves_the_hole_empty() {
    let contours = helpers::parse_contours(include_str!("data/framed_square.dat"));
    let mut ctx = helpers::triangulated(&contours, true, 0.3);
    assert_relative_eq!(helpers::total_face_area(&ctx), 84.0, epsilon = 1e-9);
    ctx.mark_boxes(true, 1.0).unwrap();
    assert_relative_eq!(helpers::total_face_area(&ctx), 84.0, epsilon = 1e-9);

    let segments = ctx.spine_edges();
    assert!(!segments.is_empty());
    let in_hole = |p: [f64; 3]| p[0] > 3.0 && p[0] < 7.0 && p[1] > 3.0 && p[1] < 7.0;
    for s in &segments {
        assert!(!in_hole(s.start) && !in_hole(s.end), "segment in hole: {:?}", s);
    }
}

#[test]
fn without_parity_the_hole_is_filled() {
    let contours = helpers::parse_contours(include_str!("data/framed_square.dat"));
    let ctx = helpers::triangulated(&contours, false, 0.3);
    assert_relative_eq!(helpers::total_face_area(&ctx), 100.0, epsilon = 1e-9);
}

#[test]
fn invalid_input_keeps_collecting() {
    let mut ctx = SpineContext::new();
    assert_eq!(
        ctx.insert_edges(4, &[0.0; 8], true),
        Err(SpineError::InvalidStride(4))
    );
    assert!(matches!(
        ctx.insert_edges(2, &[0.0, 0.0, f64::NAN, 1.0], false),
        Err(SpineError::InvalidCoordinate { index: 1, .. })
    ));
    assert_eq!(ctx.stage(), Stage::Collecting);
    assert!(ctx.graph().is_empty());
}

#[test]
fn three_dimensional_input_keeps_z() {
    let mut ctx = SpineContext::new();
    let added = ctx
        .insert_edges(3, &[0.0, 0.0, 1.0, 2.0, 0.0, 1.0, 0.0, 2.0, 1.0], true)
        .unwrap();
    assert_eq!(added, 3);
    ctx.triangulate_for_spine(true, 0.3).unwrap();
    let faces = ctx.faces();
    assert_eq!(faces.len(), 1);
    assert!(faces[0].iter().all(|p| p[2] == 1.0));
}

fn flat_triangle_faces(config: SpineConfig) -> usize {
    let mut ctx = SpineContext::with_config(config);
    ctx.insert_edges(2, &[0.0, 0.0, 10.0, 0.0, 5.0, 1.0], true).unwrap();
    ctx.triangulate_for_spine(true, 0.3).unwrap();
    ctx.face_count()
}

#[test]
fn refine_cap_bounds_boundary_splits() {
    // The corner at (5,1) is about 2.75 rad wide; one split drops a spoke to (5,0).
    assert_eq!(flat_triangle_faces(SpineConfig::default()), 2);
    let no_refine = SpineConfig {
        refine_iteration_cap: 0,
        ..SpineConfig::default()
    };
    assert_eq!(flat_triangle_faces(no_refine), 1);
}

#[test]
fn candidate_threshold_gates_refinement() {
    let strict = SpineConfig {
        min_candidate_radians: 3.0,
        ..SpineConfig::default()
    };
    assert_eq!(flat_triangle_faces(strict.clone()), 1);
    let ctx = SpineContext::with_config(strict);
    assert_eq!(ctx.config().min_candidate_radians, 3.0);
    assert_eq!(ctx.config().refine_iteration_cap, 20);
}

#[test]
fn collinear_side_triangulates_without_slivers() {
    let ctx = helpers::triangulated(
        &[vec![0.0, 0.0, 4.0, 0.0, 4.0, 1.0, 4.0, 2.0, 4.0, 3.0, 0.0, 3.0]],
        true,
        0.3,
    );
    let graph = ctx.graph();
    for f in helpers::interior_faces(graph) {
        assert!(graph.signed_area(f) > 0.0, "zero-area face at {}", f);
    }
    assert_relative_eq!(helpers::total_face_area(&ctx), 12.0, epsilon = 1e-9);
}
