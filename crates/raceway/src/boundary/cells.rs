//! Per-cell wall resolution (marching-squares style).
//!
//! Corners are indexed CCW from the lower-left: `0 = (x, y)`, `1 = (x+g, y)`,
//! `2 = (x+g, y+g)`, `3 = (x, y+g)`. A wall crosses a mixed cell edge at
//! `d = trim·g` from its inside corner (`g − d` from the outside one).

use smallvec::SmallVec;

use crate::geom::{Point, Segment};

/// Corner pattern of one lattice cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellPattern {
    /// 0 or 4 inside.
    Uniform,
    /// Exactly one inside corner.
    OneInside(usize),
    /// Exactly one outside corner.
    OneOutside(usize),
    /// Two inside corners sharing the edge `k → k+1`.
    Adjacent(usize),
    /// Two opposite inside corners `k` and `k+2`.
    Diagonal(usize),
}

impl CellPattern {
    pub fn classify(inside: [bool; 4]) -> Self {
        let count = inside.iter().filter(|&&f| f).count();
        let first = |want: bool| inside.iter().position(|&f| f == want).unwrap_or(0);
        match count {
            1 => CellPattern::OneInside(first(true)),
            3 => CellPattern::OneOutside(first(false)),
            2 => {
                let k = first(true);
                if inside[(k + 2) % 4] {
                    CellPattern::Diagonal(k)
                } else if inside[(k + 1) % 4] {
                    CellPattern::Adjacent(k)
                } else {
                    // Inside corners are 3 and 0: the shared edge is 3 → 0.
                    CellPattern::Adjacent(3)
                }
            }
            _ => CellPattern::Uniform,
        }
    }
}

/// Point on the cell edge `inside_corner → outside_corner` where the wall crosses.
///
/// Depends only on the edge, so neighbouring cells agree bit for bit.
#[inline]
pub fn edge_crossing(inside_corner: Point, outside_corner: Point, trim_ratio: f64) -> Point {
    inside_corner + (outside_corner - inside_corner) * trim_ratio
}

/// Wall pieces for one cell: none, one, or (diagonal case) two.
pub fn resolve_cell(corners: [Point; 4], inside: [bool; 4], trim_ratio: f64) -> SmallVec<[Segment; 2]> {
    let c = |k: usize| corners[k % 4];
    let cut = |from: usize, to: usize| edge_crossing(c(from), c(to), trim_ratio);
    // Cut off corner k, which is inside.
    let corner_cut = |k: usize| Segment::new(cut(k, k + 3), cut(k, k + 1));
    let mut out = SmallVec::new();
    match CellPattern::classify(inside) {
        CellPattern::Uniform => {}
        CellPattern::OneInside(k) => out.push(corner_cut(k)),
        CellPattern::OneOutside(k) => {
            out.push(Segment::new(cut(k + 3, k), cut(k + 1, k)));
        }
        CellPattern::Adjacent(k) => {
            // Corners k, k+1 inside; walls run parallel to that edge.
            out.push(Segment::new(cut(k, k + 3), cut(k + 1, k + 2)));
        }
        CellPattern::Diagonal(k) => {
            // Two independent corner cuts; no connectivity guess across the cell.
            out.push(corner_cut(k));
            out.push(corner_cut(k + 2));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    const G: f64 = 4.0;
    const TRIM: f64 = 0.7;

    fn unit_cell() -> [Point; 4] {
        [
            vector![0.0, 0.0],
            vector![G, 0.0],
            vector![G, G],
            vector![0.0, G],
        ]
    }

    fn mask(bits: u8) -> [bool; 4] {
        [bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0]
    }

    fn inside_cell(p: Point) -> bool {
        (-1e-12..=G + 1e-12).contains(&p.x) && (-1e-12..=G + 1e-12).contains(&p.y)
    }

    #[test]
    fn uniform_cells_emit_nothing() {
        assert!(resolve_cell(unit_cell(), mask(0), TRIM).is_empty());
        assert!(resolve_cell(unit_cell(), mask(0b1111), TRIM).is_empty());
    }

    #[test]
    fn single_inside_corner_is_trimmed_diagonal() {
        let d = TRIM * G;
        for k in 0..4 {
            let segs = resolve_cell(unit_cell(), mask(1 << k), TRIM);
            assert_eq!(segs.len(), 1);
            let s = segs[0];
            assert!((s.length() - d * std::f64::consts::SQRT_2).abs() < 1e-12);
            // Both endpoints sit at distance d from the inside corner.
            let corner = unit_cell()[k];
            assert!(((s.a - corner).norm() - d).abs() < 1e-12);
            assert!(((s.b - corner).norm() - d).abs() < 1e-12);
        }
    }

    #[test]
    fn single_outside_corner_mirrors_with_complement() {
        let dd = G - TRIM * G;
        for k in 0..4 {
            let segs = resolve_cell(unit_cell(), mask(0b1111 ^ (1 << k)), TRIM);
            assert_eq!(segs.len(), 1);
            let s = segs[0];
            assert!((s.length() - dd * std::f64::consts::SQRT_2).abs() < 1e-12);
            let corner = unit_cell()[k];
            assert!(((s.a - corner).norm() - dd).abs() < 1e-12);
        }
    }

    #[test]
    fn adjacent_pairs_give_offset_parallels() {
        let d = TRIM * G;
        let dd = G - d;
        // bottom pair (0,1): horizontal at y = d
        let s = resolve_cell(unit_cell(), mask(0b0011), TRIM)[0];
        assert!((s.a.y - d).abs() < 1e-12 && (s.b.y - d).abs() < 1e-12);
        // top pair (2,3): horizontal at y = g - d
        let s = resolve_cell(unit_cell(), mask(0b1100), TRIM)[0];
        assert!((s.a.y - dd).abs() < 1e-12 && (s.b.y - dd).abs() < 1e-12);
        // right pair (1,2): vertical at x = g - d
        let s = resolve_cell(unit_cell(), mask(0b0110), TRIM)[0];
        assert!((s.a.x - dd).abs() < 1e-12 && (s.b.x - dd).abs() < 1e-12);
        // left pair (3,0): vertical at x = d
        let segs = resolve_cell(unit_cell(), mask(0b1001), TRIM);
        assert_eq!(segs.len(), 1);
        assert!((segs[0].a.x - d).abs() < 1e-12 && (segs[0].b.x - d).abs() < 1e-12);
        assert!((segs[0].length() - G).abs() < 1e-12);
    }

    #[test]
    fn diagonal_pairs_emit_two_corner_cuts() {
        for bits in [0b0101u8, 0b1010] {
            let segs = resolve_cell(unit_cell(), mask(bits), TRIM);
            assert_eq!(segs.len(), 2);
            assert!(!segs[0].intersects(&segs[1]));
        }
    }

    #[test]
    fn every_piece_stays_in_its_cell() {
        for bits in 0u8..16 {
            for s in resolve_cell(unit_cell(), mask(bits), TRIM) {
                assert!(inside_cell(s.a) && inside_cell(s.b), "mask {bits:04b}");
                assert!(s.length() > 0.0);
            }
        }
    }

    #[test]
    fn pattern_classification() {
        assert_eq!(CellPattern::classify(mask(0b0100)), CellPattern::OneInside(2));
        assert_eq!(CellPattern::classify(mask(0b1011)), CellPattern::OneOutside(2));
        assert_eq!(CellPattern::classify(mask(0b0110)), CellPattern::Adjacent(1));
        assert_eq!(CellPattern::classify(mask(0b1001)), CellPattern::Adjacent(3));
        assert_eq!(CellPattern::classify(mask(0b1010)), CellPattern::Diagonal(1));
    }
}
