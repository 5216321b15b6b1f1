//! End-to-end pipeline: skeleton → spanning tree → walls → lap solve.
//!
//! Purpose
//! - Hold the run configuration in one serde-friendly struct, resolve where
//!   the start/finish gate goes, and hand the collaborator-facing geometry out
//!   as a single `TrackLayout`.
//!
//! Why this design
//! - Each stage keeps its own error type; `TrackError` wraps them so callers can
//!   match on the failing stage and retry with another seed (`retry_seeds`).

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::boundary::{Boundary, BoundaryCfg, BoundaryError, Gate, RingField, WallSet};
use crate::geom::{Point, Rect, Segment};
use crate::skeleton::{sample_skeleton, GenerationError, SkeletonCfg};
use crate::solver::{solve, Course, SearchCfg, Solution, SolveError, VelocityState};
use crate::tree::{SpanningTree, TreeError};

/// Failure of any pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    Generation(GenerationError),
    Tree(TreeError),
    Boundary(BoundaryError),
    Solve(SolveError),
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation(e) => write!(f, "skeleton: {e}"),
            Self::Tree(e) => write!(f, "spanning tree: {e}"),
            Self::Boundary(e) => write!(f, "boundary: {e}"),
            Self::Solve(e) => write!(f, "solver: {e}"),
        }
    }
}

impl std::error::Error for TrackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Generation(e) => Some(e),
            Self::Tree(e) => Some(e),
            Self::Boundary(e) => Some(e),
            Self::Solve(e) => Some(e),
        }
    }
}

impl From<GenerationError> for TrackError {
    fn from(e: GenerationError) -> Self {
        Self::Generation(e)
    }
}
impl From<TreeError> for TrackError {
    fn from(e: TreeError) -> Self {
        Self::Tree(e)
    }
}
impl From<BoundaryError> for TrackError {
    fn from(e: BoundaryError) -> Self {
        Self::Boundary(e)
    }
}
impl From<SolveError> for TrackError {
    fn from(e: SolveError) -> Self {
        Self::Solve(e)
    }
}

/// Where the start/finish gate and the start state come from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GatePlacement {
    /// Use the given gate and start state verbatim.
    Fixed { gate: Gate, start: VelocityState },
    /// Seal the lane beneath the lowest skeleton point and start one lattice
    /// step past the gate, heading `+x`.
    #[default]
    Auto,
}

/// Everything a run reads; fixed for the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackCfg {
    pub width: f64,
    pub height: f64,
    pub seed: u64,
    pub skeleton: SkeletonCfg,
    pub boundary: BoundaryCfg,
    pub gate: GatePlacement,
}

impl Default for TrackCfg {
    fn default() -> Self {
        Self {
            width: 297.0,
            height: 210.0,
            seed: 0,
            skeleton: SkeletonCfg::default(),
            boundary: BoundaryCfg::default(),
            gate: GatePlacement::Auto,
        }
    }
}

impl TrackCfg {
    pub fn canvas(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }
}

/// Gate and start state in the lane beneath the lowest skeleton point.
///
/// Walking down the lattice column nearest that point: first the tube around
/// the centerline (outside the ring), then the lane (inside), then open space
/// beyond the band. The gate joins the last tube point to the first point past
/// the lane, so it covers both wall crossings on that column and seals the
/// lane. The start is one column to the right, on the lane row nearest its
/// middle, heading `+x`.
pub fn auto_gate(field: &RingField, points: &[Point]) -> Option<(Gate, VelocityState)> {
    let low = points
        .iter()
        .copied()
        .reduce(|best, p| if p.y < best.y { p } else { best })?;
    let (i, mut j) = field.nearest_index(low)?;
    if field.inside(i, j) || i + 1 >= field.dims().0 {
        return None;
    }
    while !field.inside(i, j) {
        j = j.checked_sub(1)?;
    }
    let lane_top = j;
    while field.inside(i, j) {
        j = j.checked_sub(1)?;
    }
    let lane_bottom = j + 1;
    let gate = Gate {
        x: field.lattice_point(i, j).x,
        y_min: field.lattice_point(i, j).y,
        y_max: field.lattice_point(i, lane_top + 1).y,
    };
    let mid = (lane_top + lane_bottom) / 2;
    let row = (lane_bottom..=lane_top)
        .filter(|&r| field.inside(i + 1, r))
        .min_by_key(|&r| r.abs_diff(mid))?;
    let start = VelocityState::new(
        field.lattice_point(i + 1, row),
        Point::new(field.spacing(), 0.0),
    );
    Some((gate, start))
}

/// Generated geometry for one configuration.
#[derive(Clone, Debug)]
pub struct Track {
    pub cfg: TrackCfg,
    pub points: Vec<Point>,
    pub tree: SpanningTree,
    pub boundary: Boundary,
    pub gate: Gate,
    pub start: VelocityState,
}

/// Geometry handed to the drawing side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackLayout {
    pub width: f64,
    pub height: f64,
    pub skeleton_points: Vec<Point>,
    pub skeleton_edges: Vec<Segment>,
    pub walls: WallSet,
    pub ring_points: Vec<Point>,
    pub gate: Gate,
    pub start: VelocityState,
}

impl Track {
    pub fn generate(cfg: &TrackCfg) -> Result<Self, TrackError> {
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let canvas = cfg.canvas();
        let points = sample_skeleton(canvas, &cfg.skeleton, &mut rng)?;
        let tree = SpanningTree::build(&points)?;
        cfg.boundary.validate()?;
        let centerline = tree.segments(&points);
        let band = cfg.boundary.band(cfg.skeleton.radius);
        let field = RingField::classify(canvas, &centerline, band, cfg.boundary.spacing);
        let (gate, start) = match &cfg.gate {
            GatePlacement::Fixed { gate, start } => (*gate, *start),
            GatePlacement::Auto => auto_gate(&field, &points).ok_or(BoundaryError::NoGateSite)?,
        };
        let boundary = Boundary::from_field(field, cfg.boundary.trim_ratio, &gate);
        tracing::debug!(
            seed = cfg.seed,
            points = points.len(),
            walls = boundary.walls.len(),
            gate_x = gate.x,
            "track generated"
        );
        Ok(Self {
            cfg: cfg.clone(),
            points,
            tree,
            boundary,
            gate,
            start,
        })
    }

    pub fn course(&self) -> Result<Course, SolveError> {
        Course::new(&self.boundary.walls, &self.gate, self.cfg.boundary.spacing)
    }

    /// Search bounded by the canvas, with `max_states` from `search`.
    pub fn solve(&self, search: &SearchCfg) -> Result<Solution, SolveError> {
        let cfg = SearchCfg {
            bounds: search.bounds.or(Some(self.cfg.canvas())),
            max_states: search.max_states,
        };
        solve(&self.course()?, self.start, &cfg)
    }

    pub fn layout(&self) -> TrackLayout {
        TrackLayout {
            width: self.cfg.width,
            height: self.cfg.height,
            skeleton_points: self.points.clone(),
            skeleton_edges: self.tree.segments(&self.points),
            walls: self.boundary.walls.clone(),
            ring_points: self.boundary.field.inside_points(),
            gate: self.gate,
            start: self.start,
        }
    }
}

/// Outcome of [`retry_seeds`].
#[derive(Clone, Debug)]
pub struct Attempt {
    pub seed: u64,
    pub track: Track,
    pub solution: Solution,
}

/// Try `seeds` in order until one generates a track with a lap solution.
///
/// Returns the last error if every seed fails; `None` for an empty seed list.
pub fn retry_seeds(
    cfg: &TrackCfg,
    seeds: impl IntoIterator<Item = u64>,
    search: &SearchCfg,
) -> Option<Result<Attempt, TrackError>> {
    let mut last = None;
    for seed in seeds {
        let run = Track::generate(&cfg.with_seed(seed)).and_then(|track| {
            let solution = track.solve(search)?;
            Ok(Attempt {
                seed,
                track,
                solution,
            })
        });
        match run {
            Ok(a) => return Some(Ok(a)),
            Err(e) => {
                tracing::warn!(seed, error = %e, "seed failed");
                last = Some(Err(e));
            }
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn auto_gate_seals_lane_under_lowest_point() {
        // Horizontal centerline y = 40 from x = 60 to 150; lattice spacing 4.
        let pts = vec![vector![61.0, 40.0], vector![150.0, 40.0]];
        let line = [Segment::new(pts[0], pts[1])];
        let cfg = BoundaryCfg::default();
        let field = RingField::classify(
            Rect::from_size(200.0, 100.0),
            &line,
            cfg.band(25.0),
            cfg.spacing,
        );
        let (gate, start) = auto_gate(&field, &pts).unwrap();
        // Ties keep the first lowest point; its column is x = 60.
        assert_eq!(gate.x, 60.0);
        // Tube point at y = 40 (distance 1), lane y = 20..36, beyond at y = 16.
        assert_eq!(gate.y_max, 40.0);
        assert_eq!(gate.y_min, 16.0);
        assert_eq!(start.position, vector![64.0, 28.0]);
        assert_eq!(start.velocity, vector![4.0, 0.0]);
        assert!(auto_gate(&field, &[]).is_none());

        // Both walls on the gate column are touched by the gate.
        let walls = Boundary::from_field(field, cfg.trim_ratio, &gate).walls;
        let touching = walls
            .walls()
            .filter(|w| w.intersects(&gate.segment()))
            .count();
        assert!(touching >= 2);
    }

    #[test]
    fn generate_is_reproducible() {
        let cfg = TrackCfg::default().with_seed(3);
        let a = Track::generate(&cfg).unwrap();
        let b = Track::generate(&cfg).unwrap();
        assert_eq!(a.points, b.points);
        assert_eq!(a.layout(), b.layout());
        assert_eq!(a.tree.edges.len(), a.points.len() - 1);
    }

    #[test]
    fn layout_tags_exactly_one_gate() {
        let track = Track::generate(&TrackCfg::default()).unwrap();
        let layout = track.layout();
        assert_eq!(layout.walls.gates().count(), 1);
        assert_eq!(layout.skeleton_edges.len(), layout.skeleton_points.len() - 1);
        assert!(!layout.ring_points.is_empty());
        let json = serde_json::to_string(&layout).unwrap();
        let back: TrackLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back.walls.len(), layout.walls.len());
    }

    #[test]
    fn default_pipeline_completes_a_lap() {
        let attempt = retry_seeds(&TrackCfg::default(), 0..8, &SearchCfg::default())
            .unwrap()
            .unwrap();
        let course = attempt.track.course().unwrap();
        let path = &attempt.solution.path;
        assert_eq!(path[0], attempt.track.start);
        assert!(attempt.solution.moves() > 1);
        let n = path.len();
        for w in path.windows(2) {
            assert!(course.is_good_step(&w[0], &w[1]));
        }
        assert!(course.is_winning_step(&path[n - 2], &path[n - 1]));
    }

    #[test]
    fn fixed_gate_enclosed_reports_no_path() {
        // A gate far outside the ring: the start (inside the ring) cannot reach it.
        let base = Track::generate(&TrackCfg::default()).unwrap();
        let cfg = TrackCfg {
            gate: GatePlacement::Fixed {
                gate: Gate {
                    x: 2.0,
                    y_min: 1.0,
                    y_max: 3.0,
                },
                start: base.start,
            },
            ..TrackCfg::default()
        };
        let track = Track::generate(&cfg).unwrap();
        assert!(matches!(
            track.solve(&SearchCfg::default()),
            Err(SolveError::NoPathFound { .. })
        ));
    }

    #[test]
    fn config_roundtrips_through_json() {
        let cfg = TrackCfg::default().with_seed(42);
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(serde_json::from_str::<TrackCfg>(&json).unwrap(), cfg);
        // Missing fields fall back to defaults.
        let partial: TrackCfg = serde_json::from_str(r#"{"seed": 9}"#).unwrap();
        assert_eq!(partial, TrackCfg::default().with_seed(9));
    }
}
