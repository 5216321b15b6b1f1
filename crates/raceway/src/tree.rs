//! Euclidean minimum spanning tree over the skeleton points.
//!
//! Model
//! - Enumerate every index pair `(i, j)` with `i < j`, stable-sort by squared
//!   distance, and consume greedily: an edge is accepted iff its endpoints are
//!   in different components. Ties keep enumeration order, so the selected
//!   edge set is fully determined by the input order.
//! - Components live in `petgraph`'s union-find (path compression + union by
//!   rank); the build stops as soon as `N − 1` edges are accepted.
//!   Pair enumeration is O(N²) and dominates; fine for the tens of points the
//!   skeleton sampler produces, not intended for large point clouds.

use std::fmt;

use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

use crate::geom::{Point, Segment};

/// The spanning tree did not come out connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    Disconnected { points: usize, edges: usize },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { points, edges } => write!(
                f,
                "disconnected geometry: {edges} tree edges over {points} points"
            ),
        }
    }
}

impl std::error::Error for TreeError {}

/// Centerline edge by point index (`a < b`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeEdge {
    pub a: usize,
    pub b: usize,
}

/// Minimum spanning tree: accepted edges in acceptance order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanningTree {
    pub edges: Vec<TreeEdge>,
}

impl SpanningTree {
    /// Build the tree and check that it spans all points (`N − 1` edges).
    pub fn build(points: &[Point]) -> Result<Self, TreeError> {
        let n = points.len();
        let mut pairs: Vec<(f64, TreeEdge)> = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for a in 0..n {
            for b in (a + 1)..n {
                pairs.push(((points[a] - points[b]).norm_squared(), TreeEdge { a, b }));
            }
        }
        // Stable: equal distances keep enumeration order.
        pairs.sort_by(|x, y| x.0.total_cmp(&y.0));

        let target = n.saturating_sub(1);
        let mut uf = UnionFind::<usize>::new(n);
        let mut edges = Vec::with_capacity(target);
        for (_, e) in pairs {
            if edges.len() == target {
                break;
            }
            if uf.union(e.a, e.b) {
                edges.push(e);
            }
        }
        if n > 0 && edges.len() != n - 1 {
            return Err(TreeError::Disconnected {
                points: n,
                edges: edges.len(),
            });
        }
        tracing::debug!(points = n, edges = edges.len(), "spanning tree built");
        Ok(Self { edges })
    }

    /// Edges as point pairs for geometric consumers.
    pub fn segments(&self, points: &[Point]) -> Vec<Segment> {
        self.edges
            .iter()
            .map(|e| Segment::new(points[e.a], points[e.b]))
            .collect()
    }

    pub fn total_length(&self, points: &[Point]) -> f64 {
        self.segments(points).iter().map(Segment::length).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::collections::HashMap;

    /// Label-map construction with whole-component relabeling on merge.
    /// Kept as the reference the union-find build must reproduce edge for edge.
    fn relabel_reference(points: &[Point]) -> Vec<TreeEdge> {
        let n = points.len();
        let mut all: Vec<TreeEdge> = Vec::new();
        for a in 0..n {
            for b in (a + 1)..n {
                all.push(TreeEdge { a, b });
            }
        }
        all.sort_by(|x, y| {
            let dx = (points[x.a] - points[x.b]).norm_squared();
            let dy = (points[y.a] - points[y.b]).norm_squared();
            dx.total_cmp(&dy)
        });
        let mut labels: HashMap<usize, usize> = HashMap::new();
        let mut next_label = 0;
        let mut out = Vec::new();
        for e in all {
            match (labels.get(&e.a).copied(), labels.get(&e.b).copied()) {
                (None, None) => {
                    labels.insert(e.a, next_label);
                    labels.insert(e.b, next_label);
                    next_label += 1;
                    out.push(e);
                }
                (Some(l), None) => {
                    labels.insert(e.b, l);
                    out.push(e);
                }
                (None, Some(l)) => {
                    labels.insert(e.a, l);
                    out.push(e);
                }
                (Some(la), Some(lb)) if la == lb => {}
                (Some(la), Some(lb)) => {
                    out.push(e);
                    for v in labels.values_mut() {
                        if *v == lb {
                            *v = la;
                        }
                    }
                }
            }
        }
        out
    }

    fn is_spanning_tree(n: usize, edges: &[TreeEdge]) -> bool {
        let mut uf = UnionFind::<usize>::new(n);
        edges.len() == n.saturating_sub(1)
            && edges.iter().all(|e| e.a != e.b && uf.union(e.a, e.b))
            && uf.into_labeling().windows(2).all(|w| w[0] == w[1])
    }

    #[test]
    fn unit_square_picks_three_sides() {
        let pts = vec![
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![1.0, 1.0],
            vector![0.0, 1.0],
        ];
        let t = SpanningTree::build(&pts).unwrap();
        // All sides tie; enumeration order decides: (0,1), (0,3), (1,2).
        assert_eq!(
            t.edges,
            vec![
                TreeEdge { a: 0, b: 1 },
                TreeEdge { a: 0, b: 3 },
                TreeEdge { a: 1, b: 2 }
            ]
        );
        assert!((t.total_length(&pts) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn trivial_inputs() {
        assert!(SpanningTree::build(&[]).unwrap().edges.is_empty());
        assert!(SpanningTree::build(&[vector![1.0, 1.0]])
            .unwrap()
            .edges
            .is_empty());
    }

    #[test]
    fn matches_relabel_reference_on_random_points() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let n = rng.gen_range(2..40);
            let pts: Vec<Point> = (0..n)
                .map(|_| vector![rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)])
                .collect();
            let t = SpanningTree::build(&pts).unwrap();
            assert_eq!(t.edges, relabel_reference(&pts));
        }
    }

    #[test]
    fn matches_relabel_reference_on_tied_grid() {
        let pts: Vec<Point> = (0..5)
            .flat_map(|i| (0..4).map(move |j| vector![f64::from(i), f64::from(j)]))
            .collect();
        let t = SpanningTree::build(&pts).unwrap();
        assert_eq!(t.edges, relabel_reference(&pts));
        assert!(is_spanning_tree(pts.len(), &t.edges));
    }

    proptest! {
        #[test]
        fn always_a_spanning_tree(raw in prop::collection::vec((-50i32..50, -50i32..50), 1..30)) {
            let pts: Vec<Point> = raw
                .iter()
                .map(|&(x, y)| vector![f64::from(x), f64::from(y)])
                .collect();
            let t = SpanningTree::build(&pts).unwrap();
            prop_assert!(is_spanning_tree(pts.len(), &t.edges));
        }
    }
}
