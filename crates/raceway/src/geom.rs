//! Planar geometry primitives shared by every stage.
//!
//! - `distance_to_segment`: clamped point–segment distance with a point fallback
//!   for zero-length segments.
//! - `distance_to_nearest_edge`: minimum over a segment list.
//! - `segments_intersect`: orientation test that counts touching and collinear
//!   overlap as intersecting, so a move grazing a wall is rejected.
//!
//! None of these fail on degenerate input.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Planar point (also used for displacement vectors).
pub type Point = Vector2<f64>;

/// Unordered pair of points; used both for centerline edges and walls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    #[inline]
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }
    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }
    /// Same segment with endpoints swapped.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }
    #[inline]
    pub fn intersects(&self, other: &Segment) -> bool {
        segments_intersect(self.a, self.b, other.a, other.b)
    }
    /// Axis-aligned bounding box as `(min, max)`.
    #[inline]
    pub fn aabb(&self) -> (Point, Point) {
        (
            Point::new(self.a.x.min(self.b.x), self.a.y.min(self.b.y)),
            Point::new(self.a.x.max(self.b.x), self.a.y.max(self.b.y)),
        )
    }
}

/// Closed axis-aligned rectangle `[min.x, max.x] × [min.y, max.y]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Canvas-style rectangle anchored at the origin.
    #[inline]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self {
            min: Point::zeros(),
            max: Point::new(width, height),
        }
    }
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
    /// Shrink by `r` on every side; `None` if nothing (or a negative extent) is left.
    pub fn inset(&self, r: f64) -> Option<Rect> {
        let out = Rect {
            min: self.min.add_scalar(r),
            max: self.max.add_scalar(-r),
        };
        (out.width() >= 0.0 && out.height() >= 0.0).then_some(out)
    }
}

/// Distance from `p` to the segment `a–b`, clamped to the segment.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    let len2 = d.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&d) / len2).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Minimum distance from `p` to any segment in `edges`; `None` when `edges` is empty.
pub fn distance_to_nearest_edge(p: Point, edges: &[Segment]) -> Option<f64> {
    edges
        .iter()
        .map(|e| distance_to_segment(p, e.a, e.b))
        .min_by(f64::total_cmp)
}

/// Twice the signed area of triangle `(a, b, c)`; positive for a CCW turn.
#[inline]
pub fn orientation(a: Point, b: Point, c: Point) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

#[inline]
fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Do the closed segments `a–b` and `c–d` share at least one point?
///
/// Touching endpoints and collinear overlap both count. Collinear segments that
/// lie on the same line but do not overlap do not.
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = sign(orientation(a, b, c));
    let o2 = sign(orientation(a, b, d));
    let o3 = sign(orientation(c, d, a));
    let o4 = sign(orientation(c, d, b));
    if o1 * o2 > 0 || o3 * o4 > 0 {
        return false;
    }
    if o1 == 0 && o2 == 0 {
        // Collinear (or degenerate): fall back to interval overlap on both axes.
        return overlaps(a.x, b.x, c.x, d.x) && overlaps(a.y, b.y, c.y, d.y);
    }
    true
}

#[inline]
fn overlaps(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    a0.min(a1) <= b0.max(b1) && b0.min(b1) <= a0.max(a1)
}
