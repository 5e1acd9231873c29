// pslg-spine: triangulation of planar straight-line graphs and spine extraction
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

pub mod boxes;
pub mod context;
pub mod error;
pub mod geom;
pub mod graph;
pub mod insert;
pub mod spine;
pub mod sweep;
pub mod triangulate;

pub use context::{SpineConfig, SpineContext, Stage};
pub use error::SpineError;
pub use graph::{EdgeIdx, EdgeMask, PlanarGraph};
pub use spine::{SpineEdgeOptions, SpineSegment};
