//! Procedural race tracks and minimum-move laps under inertial movement.
//!
//! Pipeline
//! - `skeleton`: dispersed random points (the track's vertices).
//! - `tree`: Euclidean minimum spanning tree over them (the centerline).
//! - `boundary`: lattice classification around the centerline and per-cell
//!   wall resolution, plus the start/finish gate.
//! - `solver`: breadth-first search over (position, velocity) states.
//! - `track`: configuration and the end-to-end run.
//!
//! All stages share one lattice spacing and one notion of blocking geometry
//! (`geom::segments_intersect`). Drawing the result is left to callers; they
//! get everything they need from `track::TrackLayout` and `solver::Solution`.

pub mod api;
pub mod boundary;
pub mod geom;
pub mod skeleton;
pub mod solver;
pub mod track;
pub mod tree;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom::{Point, Rect, Segment};
pub use track::{Track, TrackCfg, TrackError, TrackLayout};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::boundary::{BoundaryCfg, Gate, WallKind, WallSegment, WallSet};
    pub use crate::geom::{distance_to_segment, segments_intersect, Point, Rect, Segment};
    pub use crate::skeleton::{SkeletonCfg, SpreadMode};
    pub use crate::solver::{SearchCfg, Solution, SolveError, VelocityState};
    pub use crate::track::{retry_seeds, GatePlacement, Track, TrackCfg, TrackError, TrackLayout};
}
