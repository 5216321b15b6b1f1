//! Breadth-first search over velocity states in synchronized rounds.

use rustc_hash::FxHashMap;

use crate::boundary::{Gate, WallIndex, WallSet};
use crate::geom::{Point, Segment};

use super::types::{SearchCfg, Solution, SolveError, StateKey, VelocityState};

/// Every acceleration in `{-1, 0, 1}² \ {(0, 0)}`, in lattice steps.
pub const ACCELERATIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Blocking geometry plus the gate, on a lattice of spacing `spacing`.
#[derive(Clone, Debug)]
pub struct Course {
    walls: WallIndex,
    gate: Segment,
    spacing: f64,
}

impl Course {
    /// Index the ordinary walls of `walls`; gate-tagged entries are ignored in
    /// favour of `gate`.
    pub fn new(walls: &WallSet, gate: &Gate, spacing: f64) -> Result<Self, SolveError> {
        Self::from_segments(walls.walls(), gate, spacing)
    }

    /// Fails with `InvalidCourse` unless `spacing` is finite and positive.
    pub fn from_segments<'a>(
        walls: impl IntoIterator<Item = &'a Segment>,
        gate: &Gate,
        spacing: f64,
    ) -> Result<Self, SolveError> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(SolveError::invalid_course(format!(
                "lattice spacing must be finite and > 0, got {spacing}"
            )));
        }
        Ok(Self {
            walls: WallIndex::build(walls, spacing),
            gate: gate.segment(),
            spacing,
        })
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// A move is good if it touches no wall and, when it touches the gate,
    /// travels in `+x`.
    pub fn is_good_step(&self, from: &VelocityState, to: &VelocityState) -> bool {
        let seg = Segment::new(from.position, to.position);
        if self.walls.blocks(&seg) {
            return false;
        }
        !seg.intersects(&self.gate) || to.velocity.x > 0.0
    }

    /// The move crosses (or touches) the gate with strictly positive x-velocity.
    pub fn is_winning_step(&self, from: &VelocityState, to: &VelocityState) -> bool {
        to.velocity.x > 0.0 && Segment::new(from.position, to.position).intersects(&self.gate)
    }
}

/// Minimum-move lap from `start`, or the reason there is none.
pub fn solve(course: &Course, start: VelocityState, cfg: &SearchCfg) -> Result<Solution, SolveError> {
    BfsRunner::new(course, start, cfg)?.run()
}

struct Node {
    key: StateKey,
    /// `None` marks the initial state.
    parent: Option<u32>,
}

/// BFS runner: arena of discovered states and their backpointers.
struct BfsRunner<'a> {
    course: &'a Course,
    cfg: &'a SearchCfg,
    start: VelocityState,
    nodes: Vec<Node>,
    seen: FxHashMap<StateKey, u32>,
}

impl<'a> BfsRunner<'a> {
    fn new(course: &'a Course, start: VelocityState, cfg: &'a SearchCfg) -> Result<Self, SolveError> {
        let g = course.spacing;
        if !(start.position.iter().all(|c| c.is_finite())
            && start.velocity.iter().all(|c| c.is_finite()))
        {
            return Err(SolveError::invalid_start("non-finite start state"));
        }
        let v = start.velocity / g;
        let (vx, vy) = (v.x.round(), v.y.round());
        if (v.x - vx).abs() > 1e-9 || (v.y - vy).abs() > 1e-9 {
            return Err(SolveError::invalid_start(
                "start velocity must be a multiple of the lattice spacing",
            ));
        }
        if let Some(b) = cfg.bounds {
            if !b.contains(start.position) {
                return Err(SolveError::invalid_start("start position outside search bounds"));
            }
        }
        let key = StateKey::pack(0, 0, vx as i32, vy as i32)
            .ok_or_else(|| SolveError::invalid_start("start velocity out of range"))?;
        let mut seen = FxHashMap::default();
        seen.insert(key, 0);
        Ok(Self {
            course,
            cfg,
            start,
            nodes: vec![Node { key, parent: None }],
            seen,
        })
    }

    fn state_of(&self, key: StateKey) -> VelocityState {
        let (px, py, vx, vy) = key.unpack();
        self.lattice_state(px, py, vx, vy)
    }

    fn lattice_state(&self, px: i32, py: i32, vx: i32, vy: i32) -> VelocityState {
        let g = self.course.spacing;
        VelocityState {
            position: self.start.position + Point::new(f64::from(px), f64::from(py)) * g,
            velocity: Point::new(f64::from(vx), f64::from(vy)) * g,
        }
    }

    fn run(mut self) -> Result<Solution, SolveError> {
        let mut frontier: Vec<u32> = vec![0];
        let mut rounds = 0usize;
        while !frontier.is_empty() {
            rounds += 1;
            let mut next: Vec<u32> = Vec::new();
            for &id in &frontier {
                let key = self.nodes[id as usize].key;
                let (px, py, vx, vy) = key.unpack();
                let cur = self.state_of(key);
                for (ax, ay) in ACCELERATIONS {
                    let (nvx, nvy) = (vx + ax, vy + ay);
                    let (npx, npy) = (px + nvx, py + nvy);
                    let nxt = self.lattice_state(npx, npy, nvx, nvy);
                    if !self.course.is_good_step(&cur, &nxt) {
                        continue;
                    }
                    if self.course.is_winning_step(&cur, &nxt) {
                        let solution = self.reconstruct(id, nxt);
                        tracing::info!(
                            moves = solution.moves(),
                            explored = solution.explored,
                            rounds,
                            "lap solved"
                        );
                        return Ok(solution);
                    }
                    if let Some(b) = self.cfg.bounds {
                        if !b.contains(nxt.position) {
                            continue;
                        }
                    }
                    let Some(nkey) = StateKey::pack(npx, npy, nvx, nvy) else {
                        tracing::warn!(explored = self.nodes.len(), rounds, "state range exceeded");
                        return Err(SolveError::OutOfRange {
                            explored: self.nodes.len(),
                            rounds,
                        });
                    };
                    if self.seen.contains_key(&nkey) {
                        continue;
                    }
                    if self.nodes.len() >= self.cfg.max_states {
                        tracing::warn!(explored = self.nodes.len(), rounds, "search budget exhausted");
                        return Err(SolveError::BudgetExhausted {
                            explored: self.nodes.len(),
                            rounds,
                        });
                    }
                    let nid = self.nodes.len() as u32;
                    self.nodes.push(Node {
                        key: nkey,
                        parent: Some(id),
                    });
                    self.seen.insert(nkey, nid);
                    next.push(nid);
                }
            }
            tracing::trace!(round = rounds, frontier = next.len(), "bfs round");
            frontier = next;
        }
        tracing::info!(explored = self.nodes.len(), rounds, "no path found");
        Err(SolveError::NoPathFound {
            explored: self.nodes.len(),
            rounds,
        })
    }

    /// Follow backpointers from `last` to the start; append the winning state.
    fn reconstruct(&self, last: u32, winning: VelocityState) -> Solution {
        let mut path = vec![winning];
        let mut cursor = Some(last);
        while let Some(id) = cursor {
            let node = &self.nodes[id as usize];
            path.push(self.state_of(node.key));
            cursor = node.parent;
        }
        path.reverse();
        Solution {
            path,
            explored: self.nodes.len(),
        }
    }
}
