//! Skeleton generator: dispersed random points forming the track's vertices.
//!
//! Purpose
//! - Spread points across the canvas so that every pair is more than `2R` apart
//!   and each new point lands far from everything accepted so far.
//!
//! Model
//! - Seed with one uniform point, then repeatedly draw a batch of uniform
//!   candidates in the canvas inset by `R`, drop candidates within `2R` of an
//!   accepted point, and keep the best survivor under `SpreadMode`.
//! - Stops on the first batch with no survivors; the point count is an outcome
//!   of the seed, not a parameter.
//!
//! References
//! - Code cross-refs: `tree::SpanningTree` (consumer), `geom::Rect`

mod sample;

pub use sample::{sample_skeleton, sample_skeleton_seeded, GenerationError, SkeletonCfg, SpreadMode};
