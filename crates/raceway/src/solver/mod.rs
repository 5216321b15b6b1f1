//! Path solver: fewest acceleration moves to complete one lap.
//!
//! Model
//! - A state is `(position, velocity)` on the lattice. Each move picks one of
//!   eight non-zero accelerations `a ∈ {-1,0,1}²·g`; then `v' = v + a` and
//!   `p' = p + v'`.
//! - A move is rejected if the segment `p → p'` touches a wall, or touches the
//!   gate with `v'.x <= 0`. Touching the gate with `v'.x > 0` wins.
//! - Unweighted BFS in synchronized rounds, so the first win found has the
//!   minimum move count. States are keyed by a packed lattice encoding
//!   relative to the start; each discovered state stores one backpointer into
//!   an arena for path reconstruction.
//!
//! Code cross-refs: `boundary::{WallSet, WallIndex, Gate}`, `geom::segments_intersect`.

mod bfs;
mod types;

pub use bfs::{solve, Course, ACCELERATIONS};
pub use types::{SearchCfg, Solution, SolveError, StateKey, VelocityState};
