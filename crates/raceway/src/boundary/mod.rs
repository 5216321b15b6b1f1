//! Boundary extraction: ring lattice → wall segments (+ start/finish gate).
//!
//! Purpose
//! - Classify lattice points by distance to the centerline (`field`), then
//!   resolve each lattice cell independently into at most two wall pieces
//!   (`cells`). Adjacent cells compute shared edge crossings identically, so
//!   the pieces chain into closed walls without a global merge step.
//! - `index` buckets the blocking walls for the solver's per-move queries.
//!
//! The gate is appended as a tagged segment; only the solver gives it
//! directional meaning.

mod cells;
mod field;
mod index;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect, Segment};

pub use cells::{edge_crossing, resolve_cell, CellPattern};
pub use field::RingField;
pub use index::WallIndex;

/// Boundary extraction failures.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryError {
    InvalidParams { reason: String },
    /// No sealable lane found for an automatically placed gate.
    NoGateSite,
}

impl BoundaryError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid boundary params: {reason}"),
            Self::NoGateSite => write!(f, "no lane below the skeleton to place the gate in"),
        }
    }
}

impl std::error::Error for BoundaryError {}

/// Ring band and lattice parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryCfg {
    /// Inner band edge as a fraction of the skeleton radius.
    pub inner_ratio: f64,
    /// Outer band edge as a fraction of the skeleton radius.
    pub outer_ratio: f64,
    /// Lattice spacing `g`.
    pub spacing: f64,
    /// Corner trim `d / g`; a wall crosses a cell edge at this fraction of the
    /// way from its inside corner.
    pub trim_ratio: f64,
}

impl Default for BoundaryCfg {
    fn default() -> Self {
        Self {
            inner_ratio: 0.15,
            outer_ratio: 0.9,
            spacing: 4.0,
            trim_ratio: 0.7,
        }
    }
}

impl BoundaryCfg {
    pub fn validate(&self) -> Result<(), BoundaryError> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(BoundaryError::invalid("spacing must be finite and > 0"));
        }
        if !(0.0..self.outer_ratio).contains(&self.inner_ratio) {
            return Err(BoundaryError::invalid("need 0 <= inner_ratio < outer_ratio"));
        }
        if !(self.trim_ratio > 0.0 && self.trim_ratio < 1.0) {
            return Err(BoundaryError::invalid("trim_ratio must lie in (0, 1)"));
        }
        Ok(())
    }

    /// Absolute `(inner, outer)` distances for skeleton radius `radius`.
    pub fn band(&self, radius: f64) -> (f64, f64) {
        (self.inner_ratio * radius, self.outer_ratio * radius)
    }
}

/// Vertical start/finish line at `x`, spanning `[y_min, y_max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub x: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Gate {
    pub fn segment(&self) -> Segment {
        Segment::new(Point::new(self.x, self.y_min), Point::new(self.x, self.y_max))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallKind {
    Wall,
    Gate,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub segment: Segment,
    pub kind: WallKind,
}

/// Walls bounding the ring, plus the gate (tagged).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WallSet {
    pub segments: Vec<WallSegment>,
}

impl WallSet {
    /// Ordinary blocking walls (gate excluded).
    pub fn walls(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.segments
            .iter()
            .filter(|w| w.kind == WallKind::Wall)
            .map(|w| &w.segment)
    }
    pub fn gates(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.segments
            .iter()
            .filter(|w| w.kind == WallKind::Gate)
            .map(|w| &w.segment)
    }
    pub fn len(&self) -> usize {
        self.segments.len()
    }
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Classified lattice plus the walls derived from it.
#[derive(Clone, Debug)]
pub struct Boundary {
    pub field: RingField,
    pub walls: WallSet,
}

impl Boundary {
    /// Classify the lattice around `centerline` and emit walls plus `gate`.
    pub fn extract(
        canvas: Rect,
        centerline: &[Segment],
        radius: f64,
        cfg: &BoundaryCfg,
        gate: &Gate,
    ) -> Result<Self, BoundaryError> {
        cfg.validate()?;
        let field = RingField::classify(canvas, centerline, cfg.band(radius), cfg.spacing);
        Ok(Self::from_field(field, cfg.trim_ratio, gate))
    }

    /// Emit walls for an already classified lattice.
    pub fn from_field(field: RingField, trim_ratio: f64, gate: &Gate) -> Self {
        let walls = extract_walls(&field, trim_ratio, gate);
        tracing::debug!(
            lattice = field.len(),
            inside = field.inside_count(),
            walls = walls.len(),
            "boundary extracted"
        );
        Self { field, walls }
    }
}

/// Resolve every lattice cell of `field` and append the gate.
pub fn extract_walls(field: &RingField, trim_ratio: f64, gate: &Gate) -> WallSet {
    let (nx, ny) = field.dims();
    let mut segments = Vec::new();
    for j in 0..ny.saturating_sub(1) {
        for i in 0..nx.saturating_sub(1) {
            // CCW from the lower-left corner.
            let idx = [(i, j), (i + 1, j), (i + 1, j + 1), (i, j + 1)];
            let corners = idx.map(|(a, b)| field.lattice_point(a, b));
            let inside = idx.map(|(a, b)| field.inside(a, b));
            segments.extend(
                resolve_cell(corners, inside, trim_ratio)
                    .into_iter()
                    .map(|segment| WallSegment {
                        segment,
                        kind: WallKind::Wall,
                    }),
            );
        }
    }
    segments.push(WallSegment {
        segment: gate.segment(),
        kind: WallKind::Gate,
    });
    WallSet { segments }
}
