use crate::geom::{distance_to_nearest_edge, Point, Rect, Segment};

/// Lattice over the canvas with an "inside the ring" flag per point.
///
/// Lattice point `(i, j)` sits at `origin + g·(i, j)`; `x` runs over `[min.x, max.x)`
/// and `y` over `[min.y, max.y)`. Read-only once classified.
#[derive(Clone, Debug, PartialEq)]
pub struct RingField {
    origin: Point,
    spacing: f64,
    nx: usize,
    ny: usize,
    inside: Vec<bool>,
}

impl RingField {
    /// Flag lattice points whose distance to the nearest centerline edge lies
    /// strictly inside `band = (inner, outer)`. Empty `centerline` → all outside.
    pub fn classify(canvas: Rect, centerline: &[Segment], band: (f64, f64), spacing: f64) -> Self {
        let nx = lattice_count(canvas.width(), spacing);
        let ny = lattice_count(canvas.height(), spacing);
        let origin = canvas.min;
        let (inner, outer) = band;
        let mut inside = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let p = origin + Point::new(i as f64, j as f64) * spacing;
                let flag = distance_to_nearest_edge(p, centerline)
                    .is_some_and(|d| d > inner && d < outer);
                inside.push(flag);
            }
        }
        Self {
            origin,
            spacing,
            nx,
            ny,
            inside,
        }
    }

    /// `(nx, ny)` lattice points per axis.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.inside.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inside.is_empty()
    }
    #[inline]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }
    #[inline]
    pub fn inside(&self, i: usize, j: usize) -> bool {
        self.inside[j * self.nx + i]
    }
    #[inline]
    pub fn lattice_point(&self, i: usize, j: usize) -> Point {
        self.origin + Point::new(i as f64, j as f64) * self.spacing
    }
    /// Lattice index nearest to `p`, if it falls on the lattice.
    pub fn nearest_index(&self, p: Point) -> Option<(usize, usize)> {
        let t = (p - self.origin) / self.spacing;
        let (i, j) = (t.x.round(), t.y.round());
        if i < 0.0 || j < 0.0 || i >= self.nx as f64 || j >= self.ny as f64 {
            return None;
        }
        Some((i as usize, j as usize))
    }
    pub fn inside_count(&self) -> usize {
        self.inside.iter().filter(|&&f| f).count()
    }
    /// Coordinates of every inside lattice point, row by row.
    pub fn inside_points(&self) -> Vec<Point> {
        (0..self.ny)
            .flat_map(|j| (0..self.nx).map(move |i| (i, j)))
            .filter(|&(i, j)| self.inside(i, j))
            .map(|(i, j)| self.lattice_point(i, j))
            .collect()
    }
}

/// Number of points `k·g` in `[0, extent)`.
fn lattice_count(extent: f64, spacing: f64) -> usize {
    if extent <= 0.0 {
        return 0;
    }
    (extent / spacing).ceil() as usize
}
