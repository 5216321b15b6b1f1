//! Flat re-export surface for drivers (CLI, benches, examples).
//!
//! Not a stability promise; module paths remain the source of truth.

// Geometry primitives
pub use crate::geom::{
    distance_to_nearest_edge, distance_to_segment, orientation, segments_intersect, Point, Rect,
    Segment,
};
// Skeleton + spanning tree
pub use crate::skeleton::{
    sample_skeleton, sample_skeleton_seeded, GenerationError, SkeletonCfg, SpreadMode,
};
pub use crate::tree::{SpanningTree, TreeEdge, TreeError};
// Boundary extraction
pub use crate::boundary::{
    extract_walls, resolve_cell, Boundary, BoundaryCfg, BoundaryError, Gate, RingField, WallIndex,
    WallKind, WallSegment, WallSet,
};
// Lap solver
pub use crate::solver::{solve, Course, SearchCfg, Solution, SolveError, VelocityState};
// Pipeline
pub use crate::track::{
    auto_gate, retry_seeds, Attempt, GatePlacement, Track, TrackCfg, TrackError, TrackLayout,
};
