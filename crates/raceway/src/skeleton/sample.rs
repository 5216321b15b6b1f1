use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};

/// Error type for skeleton sampling.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    InvalidParams { reason: String },
    /// The sampler could not place enough points (degenerate canvas/radius ratio),
    /// or ran into the defensive batch cap.
    Exhausted { placed: usize, batches: usize },
}

impl GenerationError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid skeleton params: {reason}"),
            Self::Exhausted { placed, batches } => write!(
                f,
                "skeleton generation exhausted: placed {placed} points in {batches} batches"
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Score used to pick the next point among surviving candidates (higher wins).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadMode {
    /// Sum of squared distances to all accepted points.
    #[default]
    SumSquared,
    /// Sum of plain distances to all accepted points.
    SumLinear,
    /// Squared distance to the nearest accepted point (farthest-point sampling).
    MaxMinSquared,
    /// Negated squared distance to the nearest accepted point: each new point
    /// hugs the existing set just beyond `2R`, giving tight, winding chains.
    NearestFirst,
}

impl SpreadMode {
    fn score(self, p: Point, accepted: &[Point]) -> f64 {
        match self {
            SpreadMode::SumSquared => accepted.iter().map(|q| (p - q).norm_squared()).sum(),
            SpreadMode::SumLinear => accepted.iter().map(|q| (p - q).norm()).sum(),
            SpreadMode::MaxMinSquared => accepted
                .iter()
                .map(|q| (p - q).norm_squared())
                .fold(f64::INFINITY, f64::min),
            SpreadMode::NearestFirst => -SpreadMode::MaxMinSquared.score(p, accepted),
        }
    }
}

/// Sampler configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkeletonCfg {
    /// Minimum-separation radius `R`; accepted points are more than `2R` apart.
    pub radius: f64,
    /// Uniform candidates drawn per step.
    pub batch_size: usize,
    /// Defensive cap on the number of batches.
    pub max_batches: usize,
    /// Fewer accepted points than this is reported as `Exhausted`.
    pub min_points: usize,
    pub mode: SpreadMode,
}

impl Default for SkeletonCfg {
    fn default() -> Self {
        Self {
            radius: 25.0,
            batch_size: 1000,
            max_batches: 10_000,
            min_points: 3,
            mode: SpreadMode::SumSquared,
        }
    }
}

impl SkeletonCfg {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GenerationError::invalid("radius must be finite and > 0"));
        }
        if self.batch_size == 0 {
            return Err(GenerationError::invalid("batch_size must be > 0"));
        }
        if self.max_batches == 0 {
            return Err(GenerationError::invalid("max_batches must be > 0"));
        }
        Ok(())
    }
}

/// Sample skeleton points inside `canvas` from an explicit RNG.
///
/// Points come back in acceptance order; that order is part of the
/// reproducibility contract.
pub fn sample_skeleton<R: Rng>(
    canvas: Rect,
    cfg: &SkeletonCfg,
    rng: &mut R,
) -> Result<Vec<Point>, GenerationError> {
    cfg.validate()?;
    let region = canvas
        .inset(cfg.radius)
        .ok_or_else(|| GenerationError::invalid("canvas smaller than 2·radius"))?;
    let min_sep2 = 4.0 * cfg.radius * cfg.radius;

    let mut pts = vec![uniform_point(region, rng)];
    let mut candidates: Vec<Point> = Vec::with_capacity(cfg.batch_size);
    let mut batches = 0usize;
    loop {
        if batches == cfg.max_batches {
            tracing::warn!(batches, placed = pts.len(), "skeleton batch cap reached");
            return Err(GenerationError::Exhausted {
                placed: pts.len(),
                batches,
            });
        }
        batches += 1;
        // Draw the whole batch before filtering so the RNG stream does not
        // depend on the accepted set.
        candidates.clear();
        candidates.extend((0..cfg.batch_size).map(|_| uniform_point(region, rng)));
        let mut best: Option<(Point, f64)> = None;
        for &c in &candidates {
            if pts.iter().any(|q| (c - q).norm_squared() <= min_sep2) {
                continue;
            }
            let s = cfg.mode.score(c, &pts);
            if best.map_or(true, |(_, bs)| s > bs) {
                best = Some((c, s));
            }
        }
        match best {
            Some((p, _)) => pts.push(p),
            None => break,
        }
    }
    tracing::debug!(points = pts.len(), batches, mode = ?cfg.mode, "skeleton sampled");
    if pts.len() < cfg.min_points {
        return Err(GenerationError::Exhausted {
            placed: pts.len(),
            batches,
        });
    }
    Ok(pts)
}

/// Seeded convenience wrapper around [`sample_skeleton`].
pub fn sample_skeleton_seeded(
    canvas: Rect,
    cfg: &SkeletonCfg,
    seed: u64,
) -> Result<Vec<Point>, GenerationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    sample_skeleton(canvas, cfg, &mut rng)
}

#[inline]
fn uniform_point<R: Rng>(region: Rect, rng: &mut R) -> Point {
    Point::new(
        region.min.x + rng.gen::<f64>() * region.width(),
        region.min.y + rng.gen::<f64>() * region.height(),
    )
}
