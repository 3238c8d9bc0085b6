// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bin-space rectangles and the pan/zoom view window.

use crate::grid::Bin;

/// An inclusive rectangle of bins: `x_min..=x_max` by `y_min..=y_max`.
///
/// Constructors normalize the corners, so a `BinRect` always covers at least one bin
/// per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BinRect {
    /// First visible column.
    pub x_min: i64,
    /// Last visible column.
    pub x_max: i64,
    /// First visible row (row 0 is drawn at the bottom).
    pub y_min: i64,
    /// Last visible row.
    pub y_max: i64,
}

impl BinRect {
    /// Creates a rectangle spanning both corners, in any order.
    pub fn from_corners(a: Bin, b: Bin) -> Self {
        Self {
            x_min: a.x.min(b.x),
            x_max: a.x.max(b.x),
            y_min: a.y.min(b.y),
            y_max: a.y.max(b.y),
        }
    }

    /// The full extent of a `cols` by `rows` grid, or `None` if either is zero.
    pub fn full(cols: usize, rows: usize) -> Option<Self> {
        if cols == 0 || rows == 0 {
            return None;
        }
        Some(Self {
            x_min: 0,
            x_max: to_i64(cols) - 1,
            y_min: 0,
            y_max: to_i64(rows) - 1,
        })
    }

    /// Number of columns covered.
    pub fn x_count(&self) -> i64 {
        self.x_max - self.x_min + 1
    }

    /// Number of rows covered.
    pub fn y_count(&self) -> i64 {
        self.y_max - self.y_min + 1
    }

    /// Total number of bins covered.
    pub fn bin_count(&self) -> u64 {
        self.x_count().unsigned_abs() * self.y_count().unsigned_abs()
    }

    /// Whether `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }

    /// Whether `bin` lies inside the rectangle.
    pub fn contains_bin(&self, bin: Bin) -> bool {
        self.contains(bin.x, bin.y)
    }

    /// The overlap of two rectangles, if any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let out = Self {
            x_min: self.x_min.max(other.x_min),
            x_max: self.x_max.min(other.x_max),
            y_min: self.y_min.max(other.y_min),
            y_max: self.y_max.min(other.y_max),
        };
        (out.x_min <= out.x_max && out.y_min <= out.y_max).then_some(out)
    }
}

/// The currently visible bins plus the full extent they can zoom back out to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewWindow {
    full: BinRect,
    current: BinRect,
}

impl ViewWindow {
    /// A window showing the whole of `full`.
    pub fn new(full: BinRect) -> Self {
        Self {
            full,
            current: full,
        }
    }

    /// The visible rectangle.
    pub fn current(&self) -> BinRect {
        self.current
    }

    /// The full dataset extent.
    pub fn full(&self) -> BinRect {
        self.full
    }

    /// Whether the window currently shows the full extent.
    pub fn is_full(&self) -> bool {
        self.current == self.full
    }

    /// Zooms to the rectangle spanned by two corner bins.
    ///
    /// The rectangle is clipped to the full extent. Returns `false` (and leaves the
    /// window unchanged) if it lies entirely outside the data.
    pub fn zoom_to(&mut self, a: Bin, b: Bin) -> bool {
        match BinRect::from_corners(a, b).intersect(&self.full) {
            Some(rect) => {
                self.current = rect;
                true
            }
            None => false,
        }
    }

    /// Restores the full extent.
    pub fn reset(&mut self) {
        self.current = self.full;
    }
}

pub(crate) fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_normalizes_any_corner_pair() {
        let r = BinRect::from_corners(Bin::new(3, 1), Bin::new(1, 3));
        assert_eq!(
            r,
            BinRect {
                x_min: 1,
                x_max: 3,
                y_min: 1,
                y_max: 3
            }
        );
        assert_eq!(r.x_count(), 3);
        assert_eq!(r.bin_count(), 9);
    }

    #[test]
    fn full_extent_rejects_empty_grids() {
        assert!(BinRect::full(0, 4).is_none());
        assert!(BinRect::full(4, 0).is_none());
        let full = BinRect::full(5, 2).unwrap();
        assert_eq!((full.x_max, full.y_max), (4, 1));
    }

    #[test]
    fn zoom_is_clipped_to_full_extent() {
        let mut w = ViewWindow::new(BinRect::full(4, 4).unwrap());
        assert!(w.zoom_to(Bin::new(-2, 2), Bin::new(9, 3)));
        assert_eq!(
            w.current(),
            BinRect {
                x_min: 0,
                x_max: 3,
                y_min: 2,
                y_max: 3
            }
        );
        assert!(!w.is_full());
        w.reset();
        assert!(w.is_full());
    }

    #[test]
    fn zoom_entirely_outside_is_ignored() {
        let mut w = ViewWindow::new(BinRect::full(4, 4).unwrap());
        assert!(w.zoom_to(Bin::new(1, 1), Bin::new(2, 2)));
        let before = w.current();
        assert!(!w.zoom_to(Bin::new(7, 7), Bin::new(9, 8)));
        assert_eq!(w.current(), before);
    }
}
