//! Uniform bucket grid over blocking wall segments.
//!
//! Each wall is registered in every cell its bounding box overlaps; a query
//! touches only the cells under the query segment's bounding box. Any shared
//! point of a wall and a query falls into a cell both are registered in, so
//! the result equals a brute-force scan.

use smallvec::SmallVec;

use crate::geom::{Point, Segment};

/// Upper bound on grid cells per axis.
pub const MAX_AXIS_CELLS: usize = 1 << 12;

#[derive(Clone, Debug)]
pub struct WallIndex {
    walls: Vec<Segment>,
    origin: Point,
    cell_size: f64,
    nx: usize,
    ny: usize,
    cells: Vec<SmallVec<[u32; 4]>>,
}

impl WallIndex {
    /// Bucket `walls` into square cells of side `cell_size`.
    ///
    /// The side is raised as needed so no axis gets more than
    /// [`MAX_AXIS_CELLS`] cells; a non-finite or non-positive `cell_size`
    /// falls back to that floor.
    pub fn build<'a>(walls: impl IntoIterator<Item = &'a Segment>, cell_size: f64) -> Self {
        let walls: Vec<Segment> = walls.into_iter().copied().collect();
        let mut lo = Point::repeat(f64::INFINITY);
        let mut hi = Point::repeat(f64::NEG_INFINITY);
        for w in &walls {
            let (a, b) = w.aabb();
            lo = lo.inf(&a);
            hi = hi.sup(&b);
        }
        let extent = (hi - lo).max();
        let floor = (extent / MAX_AXIS_CELLS as f64).max(f64::MIN_POSITIVE);
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size.max(floor)
        } else {
            floor
        };
        let mut index = Self {
            walls: Vec::new(),
            origin: Point::zeros(),
            cell_size,
            nx: 0,
            ny: 0,
            cells: Vec::new(),
        };
        if walls.is_empty() {
            return index;
        }
        index.origin = lo;
        index.nx = ((hi.x - lo.x) / cell_size).floor() as usize + 1;
        index.ny = ((hi.y - lo.y) / cell_size).floor() as usize + 1;
        index.cells = vec![SmallVec::new(); index.nx * index.ny];
        for (k, w) in walls.iter().enumerate() {
            let (a, b) = w.aabb();
            if let Some((i0, i1, j0, j1)) = index.cell_range(a, b) {
                for j in j0..=j1 {
                    for i in i0..=i1 {
                        index.cells[j * index.nx + i].push(k as u32);
                    }
                }
            }
        }
        index.walls = walls;
        index
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }
    /// Effective cell side after clamping.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Does `seg` touch any indexed wall?
    pub fn blocks(&self, seg: &Segment) -> bool {
        let (a, b) = seg.aabb();
        let Some((i0, i1, j0, j1)) = self.cell_range(a, b) else {
            return false;
        };
        for j in j0..=j1 {
            for i in i0..=i1 {
                for &k in &self.cells[j * self.nx + i] {
                    if self.walls[k as usize].intersects(seg) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Cell index range covering the box `[lo, hi]`, clipped to the grid;
    /// `None` if the box misses the grid entirely.
    fn cell_range(&self, lo: Point, hi: Point) -> Option<(usize, usize, usize, usize)> {
        if self.nx == 0 || self.ny == 0 {
            return None;
        }
        let (i0, i1) = axis_range(lo.x, hi.x, self.origin.x, self.cell_size, self.nx)?;
        let (j0, j1) = axis_range(lo.y, hi.y, self.origin.y, self.cell_size, self.ny)?;
        Some((i0, i1, j0, j1))
    }
}

fn axis_range(lo: f64, hi: f64, origin: f64, size: f64, n: usize) -> Option<(usize, usize)> {
    let c0 = ((lo - origin) / size).floor();
    let c1 = ((hi - origin) / size).floor();
    let last = (n - 1) as f64;
    if c1 < 0.0 || c0 > last {
        return None;
    }
    Some((c0.max(0.0) as usize, c1.min(last) as usize))
}
