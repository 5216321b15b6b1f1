//! Search-space types: velocity states, packed keys, configuration, results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};

/// Position and velocity of the car; the unit of search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VelocityState {
    pub position: Point,
    pub velocity: Point,
}

impl VelocityState {
    pub fn new(position: Point, velocity: Point) -> Self {
        Self { position, velocity }
    }
}

/// State relative to the start, in lattice steps: position offset and velocity,
/// packed as four `i16`s into one `u64` for hashing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(pub u64);

impl StateKey {
    /// `None` if any component leaves the `i16` range.
    pub fn pack(px: i32, py: i32, vx: i32, vy: i32) -> Option<Self> {
        let mut out = 0u64;
        for v in [px, py, vx, vy] {
            let v = i16::try_from(v).ok()?;
            out = (out << 16) | u64::from(v as u16);
        }
        Some(Self(out))
    }

    /// Inverse of [`StateKey::pack`].
    pub fn unpack(self) -> (i32, i32, i32, i32) {
        let part = |shift: u32| i32::from((self.0 >> shift) as u16 as i16);
        (part(48), part(32), part(16), part(0))
    }
}

/// Search limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCfg {
    /// Discard moves ending outside this rectangle. `None` disables pruning;
    /// leaving the packed-key range is then reported as `OutOfRange`.
    pub bounds: Option<Rect>,
    /// Give up once this many states have been discovered.
    pub max_states: usize,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            bounds: None,
            max_states: 4_000_000,
        }
    }
}

impl SearchCfg {
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }
}

/// Failure outcomes of a solve.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// Unusable course geometry (lattice spacing).
    InvalidCourse { reason: String },
    InvalidStart { reason: String },
    /// Frontier emptied without a winning move.
    NoPathFound { explored: usize, rounds: usize },
    /// `SearchCfg::max_states` reached first.
    BudgetExhausted { explored: usize, rounds: usize },
    /// A reachable state fell outside the packed key range (more than
    /// `i16::MAX` lattice steps from the start); the search stopped there.
    OutOfRange { explored: usize, rounds: usize },
}

impl SolveError {
    pub(crate) fn invalid_course(reason: impl Into<String>) -> Self {
        Self::InvalidCourse {
            reason: reason.into(),
        }
    }
    pub(crate) fn invalid_start(reason: impl Into<String>) -> Self {
        Self::InvalidStart {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCourse { reason } => write!(f, "invalid course: {reason}"),
            Self::InvalidStart { reason } => write!(f, "invalid start state: {reason}"),
            Self::NoPathFound { explored, rounds } => write!(
                f,
                "no path found: frontier exhausted after {rounds} rounds ({explored} states)"
            ),
            Self::BudgetExhausted { explored, rounds } => write!(
                f,
                "search budget exhausted after {rounds} rounds ({explored} states)"
            ),
            Self::OutOfRange { explored, rounds } => write!(
                f,
                "state range exceeded after {rounds} rounds ({explored} states); bound the search"
            ),
        }
    }
}

impl std::error::Error for SolveError {}

/// Minimum-move lap: states from the start to the state after the winning move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub path: Vec<VelocityState>,
    /// States discovered during the search.
    pub explored: usize,
}

impl Solution {
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_roundtrips_signed_extremes() {
        for parts in [
            (0, 0, 0, 0),
            (-1, 2, -3, 4),
            (i32::from(i16::MIN), i32::from(i16::MAX), -7, 7),
        ] {
            let key = StateKey::pack(parts.0, parts.1, parts.2, parts.3).unwrap();
            assert_eq!(key.unpack(), parts);
        }
        assert!(StateKey::pack(40_000, 0, 0, 0).is_none());
    }

    #[test]
    fn distinct_states_get_distinct_keys() {
        let a = StateKey::pack(1, 0, 0, 0).unwrap();
        let b = StateKey::pack(0, 1, 0, 0).unwrap();
        let c = StateKey::pack(0, 0, -1, 0).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }
}
