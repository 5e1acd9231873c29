// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

//! Error types for spine extraction.

use thiserror::Error;

use crate::geom::Real;
use crate::graph::EdgeIdx;

/// Errors reported by [`SpineContext`](crate::SpineContext) and the graph checks.
///
/// Geometric predicates never fail; they fall back to sentinels and defaults.
/// These variants cover bad input and misuse of the call order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpineError {
    /// Coordinates per vertex must be 2 or 3.
    #[error("unsupported coordinate stride {0}; expected 2 or 3")]
    InvalidStride(usize),

    /// A coordinate is NaN, infinite, or outside the accepted range.
    #[error("invalid coordinate {value} at vertex {index}")]
    InvalidCoordinate {
        /// Vertex index within the rejected polyline.
        index: usize,
        /// The offending value.
        value: Real,
    },

    /// An operation was called outside construct → insert → triangulate →
    /// mark boxes order.
    #[error("{operation} is not allowed once the context is {stage}")]
    OutOfOrder {
        operation: &'static str,
        stage: &'static str,
    },

    /// A face could not be split into triangles; the input topology is not
    /// a valid planar graph.
    #[error("face at half-edge {0} is not monotone and cannot be triangulated")]
    NonMonotoneFace(EdgeIdx),

    /// `PlanarGraph::check_invariants` found a broken link or mask.
    #[error("graph invariant broken at half-edge {edge}: {reason}")]
    BrokenInvariant { edge: EdgeIdx, reason: &'static str },
}
