// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// The public handle: one context owns one graph and drives it through
// insert → triangulate → mark boxes → spine queries.

use crate::boxes;
use crate::error::SpineError;
use crate::geom::{Point, Real};
use crate::graph::PlanarGraph;
use crate::spine::{self, SpineEdgeOptions, SpineSegment};
use crate::triangulate;

/// Tunable constants of the triangulation stage.
#[derive(Clone, Debug, PartialEq)]
pub struct SpineConfig {
    /// Maximum number of (refine, reflip) rounds after the first flip pass.
    pub refine_iteration_cap: usize,
    /// A triangle corner must be wider than this before a perpendicular is
    /// dropped from it onto the opposite boundary edge.
    pub min_candidate_radians: Real,
}

impl Default for SpineConfig {
    fn default() -> Self {
        Self {
            refine_iteration_cap: 20,
            min_candidate_radians: 2.0,
        }
    }
}

/// Where a context is in its one-way lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Accepting polylines.
    Collecting,
    /// Triangulated; boxes not marked yet.
    Triangulated,
    /// Boxes marked; only queries remain.
    Boxed,
    /// Triangulation hit invalid topology.
    Failed,
}

impl Stage {
    fn name(self) -> &'static str {
        match self {
            Stage::Collecting => "collecting",
            Stage::Triangulated => "triangulated",
            Stage::Boxed => "boxed",
            Stage::Failed => "failed",
        }
    }
}

pub struct SpineContext {
    graph: PlanarGraph,
    config: SpineConfig,
    stage: Stage,
}

impl SpineContext {
    pub fn new() -> Self {
        Self::with_config(SpineConfig::default())
    }

    pub fn with_config(config: SpineConfig) -> Self {
        SpineContext {
            graph: PlanarGraph::new(),
            config,
            stage: Stage::Collecting,
        }
    }

    pub fn config(&self) -> &SpineConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn graph(&self) -> &PlanarGraph {
        &self.graph
    }

    fn require(&self, stage: Stage, operation: &'static str) -> Result<(), SpineError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(SpineError::OutOfOrder {
                operation,
                stage: self.stage.name(),
            })
        }
    }

    /// Add one polyline. `size` = 2 or 3 (coords per vertex). `vertices` is flat.
    /// Returns the number of edges added.
    pub fn insert_edges(
        &mut self,
        size: usize,
        vertices: &[Real],
        closed: bool,
    ) -> Result<usize, SpineError> {
        self.require(Stage::Collecting, "insert_edges")?;
        self.graph.insert_edges(size, vertices, closed)
    }

    /// Triangulate the region bounded by the inserted polylines. With
    /// `mark_parity`, regions are filled by the even-odd rule. Boundary
    /// refinement never splits a corner into angles below `min_split_radians`.
    pub fn triangulate_for_spine(
        &mut self,
        mark_parity: bool,
        min_split_radians: Real,
    ) -> Result<(), SpineError> {
        self.require(Stage::Collecting, "triangulate_for_spine")?;
        match triangulate::triangulate_for_spine(
            &mut self.graph,
            mark_parity,
            min_split_radians,
            &self.config,
        ) {
            Ok(()) => {
                self.stage = Stage::Triangulated;
                Ok(())
            }
            Err(err) => {
                log::debug!("triangulation failed: {}", err);
                self.stage = Stage::Failed;
                Err(err)
            }
        }
    }

    /// Pair triangles into boxes; see [`boxes::mark_boxes`]. Returns the
    /// number of diagonals selected.
    pub fn mark_boxes(
        &mut self,
        delete_diagonals: bool,
        min_angle_radians: Real,
    ) -> Result<usize, SpineError> {
        self.require(Stage::Triangulated, "mark_boxes")?;
        let selected = boxes::mark_boxes(&mut self.graph, delete_diagonals, min_angle_radians);
        self.stage = Stage::Boxed;
        Ok(selected)
    }

    /// Spine segments with every family enabled.
    pub fn spine_edges(&self) -> Vec<SpineSegment> {
        self.spine_edges_with(SpineEdgeOptions::default())
    }

    /// Spine segments of the current mesh. Empty until triangulated.
    pub fn spine_edges_with(&self, options: SpineEdgeOptions) -> Vec<SpineSegment> {
        if !self.has_mesh() {
            return Vec::new();
        }
        spine::spine_edges(&self.graph, options)
    }

    /// Interior faces as closed point loops (CCW). Empty until triangulated.
    pub fn faces(&self) -> Vec<Vec<Point>> {
        if !self.has_mesh() {
            return Vec::new();
        }
        self.graph
            .face_seeds()
            .into_iter()
            .filter(|&f| !self.graph.is_exterior(f))
            .map(|f| self.graph.face_loop(f).into_iter().map(|n| self.graph.position(n)).collect())
            .collect()
    }

    /// The `index`-th interior face, in the order of [`faces`](Self::faces).
    pub fn face(&self, index: usize) -> Option<Vec<Point>> {
        self.faces().into_iter().nth(index)
    }

    pub fn face_count(&self) -> usize {
        self.faces().len()
    }

    fn has_mesh(&self) -> bool {
        matches!(self.stage, Stage::Triangulated | Stage::Boxed)
    }
}

impl Default for SpineContext {
    fn default() -> Self {
        Self::new()
    }
}
