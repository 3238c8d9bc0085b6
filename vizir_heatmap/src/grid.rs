// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between canvas pixels and data bins.
//!
//! The plot area is the canvas minus its gutters. The visible [`BinRect`] is spread
//! evenly across it: columns left to right, rows bottom to top (row 0 at the
//! bottom, so Y is inverted relative to canvas pixels).

use core::fmt;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::{Point, Rect, Vec2};

use crate::Error;
use crate::window::BinRect;

/// One cell of the grid, addressed by column (`x`) and row (`y`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bin {
    /// Column index.
    pub x: i64,
    /// Row index.
    pub y: i64,
}

impl Bin {
    /// Creates a bin address.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

/// The pixel geometry of the visible bins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTransform {
    plot: Rect,
    window: BinRect,
    cell: Vec2,
}

impl GridTransform {
    /// Lays `window` out over the `plot` rectangle (canvas pixels).
    ///
    /// Fails if the plot area is not strictly positive.
    pub fn new(plot: Rect, window: BinRect) -> Result<Self, Error> {
        let (w, h) = checked_plot_size(plot)?;
        // `BinRect` counts are >= 1 by construction; the max guards hand-built rects.
        let cols = window.x_count().max(1) as f64;
        let rows = window.y_count().max(1) as f64;
        Ok(Self {
            plot,
            window,
            cell: Vec2::new(w / cols, h / rows),
        })
    }

    /// The plot rectangle in canvas pixels.
    pub fn plot(&self) -> Rect {
        self.plot
    }

    /// The visible bins.
    pub fn window(&self) -> BinRect {
        self.window
    }

    /// Size of one cell in pixels.
    pub fn cell_size(&self) -> Vec2 {
        self.cell
    }

    /// The bin under a pixel.
    ///
    /// `bin = floor((pixel - axis_origin) / cell_extent) + window_offset`, with the Y
    /// axis measured upwards from the bottom of the plot. Pixels outside the plot map
    /// to bins outside the window.
    pub fn pixel_to_bin(&self, p: Point) -> Bin {
        let x = ((p.x - self.plot.x0) / self.cell.x).floor();
        let y = ((self.plot.y1 - p.y) / self.cell.y).floor();
        Bin::new(
            saturating_i64(x).saturating_add(self.window.x_min),
            saturating_i64(y).saturating_add(self.window.y_min),
        )
    }

    /// The pixel at the centre of a bin.
    pub fn bin_to_pixel(&self, bin: Bin) -> Point {
        Point::new(
            self.plot.x0 + ((bin.x - self.window.x_min) as f64 + 0.5) * self.cell.x,
            self.plot.y1 - ((bin.y - self.window.y_min) as f64 + 0.5) * self.cell.y,
        )
    }

    /// Column edge `i` bins from the left of the window.
    pub fn column_edge(&self, i: i64) -> f64 {
        self.plot.x0 + i as f64 * self.cell.x
    }

    /// Row edge `i` bins up from the bottom of the window.
    pub fn row_edge(&self, i: i64) -> f64 {
        self.plot.y1 - i as f64 * self.cell.y
    }

    /// Whether a pixel lies inside the plot rectangle (edges included).
    pub fn contains_pixel(&self, p: Point) -> bool {
        p.x >= self.plot.x0 && p.x <= self.plot.x1 && p.y >= self.plot.y0 && p.y <= self.plot.y1
    }
}

/// Returns the plot width and height, or [`Error::EmptyPlot`] if either is not
/// strictly positive.
pub(crate) fn checked_plot_size(plot: Rect) -> Result<(f64, f64), Error> {
    let (w, h) = (plot.width(), plot.height());
    if w > 0.0 && h > 0.0 {
        Ok((w, h))
    } else {
        Err(Error::EmptyPlot {
            width: w,
            height: h,
        })
    }
}

fn saturating_i64(v: f64) -> i64 {
    if v.is_nan() {
        return 0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "float-to-int `as` saturates; NaN handled above"
    )]
    {
        v as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(window: BinRect) -> GridTransform {
        GridTransform::new(Rect::new(40.0, 10.0, 440.0, 310.0), window).unwrap()
    }

    #[test]
    fn round_trip_is_exact_for_every_visible_bin() {
        let windows = [
            BinRect::full(4, 4).unwrap(),
            BinRect::full(37, 11).unwrap(),
            BinRect::from_corners(Bin::new(5, 2), Bin::new(17, 29)),
        ];
        for window in windows {
            let g = grid(window);
            for y in window.y_min..=window.y_max {
                for x in window.x_min..=window.x_max {
                    let bin = Bin::new(x, y);
                    assert_eq!(g.pixel_to_bin(g.bin_to_pixel(bin)), bin, "{window:?}");
                }
            }
        }
    }

    #[test]
    fn row_zero_is_at_the_bottom() {
        let g = grid(BinRect::full(4, 4).unwrap());
        let bottom = g.bin_to_pixel(Bin::new(0, 0));
        let top = g.bin_to_pixel(Bin::new(0, 3));
        assert!(bottom.y > top.y);
        assert_eq!(g.pixel_to_bin(Point::new(41.0, 309.0)), Bin::new(0, 0));
        assert_eq!(g.pixel_to_bin(Point::new(439.0, 11.0)), Bin::new(3, 3));
    }

    #[test]
    fn window_offset_shifts_bins() {
        let g = grid(BinRect::from_corners(Bin::new(1, 1), Bin::new(3, 3)));
        assert_eq!(g.pixel_to_bin(Point::new(41.0, 309.0)), Bin::new(1, 1));
        assert!((g.cell_size().x - 400.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn pixels_in_the_gutter_map_outside_the_window() {
        let window = BinRect::full(4, 4).unwrap();
        let g = grid(window);
        assert!(!window.contains_bin(g.pixel_to_bin(Point::new(5.0, 100.0))));
        assert!(!window.contains_bin(g.pixel_to_bin(Point::new(100.0, 330.0))));
    }

    #[test]
    fn empty_plot_is_rejected() {
        let window = BinRect::full(4, 4).unwrap();
        assert!(GridTransform::new(Rect::new(10.0, 10.0, 10.0, 50.0), window).is_err());
        assert!(GridTransform::new(Rect::new(10.0, 60.0, 50.0, 50.0), window).is_err());
    }
}
