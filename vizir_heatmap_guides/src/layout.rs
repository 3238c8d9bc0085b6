// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gutter layout.
//!
//! The canvas is split into a plot area and four gutters. Gutters are computed once,
//! from the canvas size and label metrics, and stay fixed while zooming.

use kurbo::{Rect, Size};

use crate::measure::TextMeasurer;
use crate::style::OverlayStyle;

/// The widest colorbar label the right gutter must fit.
pub const COLORBAR_LABEL_SAMPLE: &str = "0.00e+00";

/// Errors reported by layout.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The gutters leave no room for the plot.
    #[error("canvas of {width} x {height} leaves no room for the plot")]
    EmptyPlot {
        /// Canvas width in pixels.
        width: f64,
        /// Canvas height in pixels.
        height: f64,
    },
}

/// Margins around the plot area, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gutters {
    /// Room for y tick labels and the y title.
    pub left: f64,
    /// Top margin.
    pub top: f64,
    /// Room for the colorbar and its labels.
    pub right: f64,
    /// Room for x tick labels and the x title.
    pub bottom: f64,
}

impl Gutters {
    /// Computes gutters for a canvas:
    ///
    /// - `left = max(0.05 * width, title + 4 * tick)`
    /// - `top = 0.04 * height`
    /// - `right = width_of("0.00e+00") + colorbar_reserve`
    /// - `bottom = max(0.05 * height, title + 2 * tick)`
    pub fn compute(canvas: Size, measurer: &impl TextMeasurer, style: &OverlayStyle) -> Self {
        let (label_width, _) = measurer.measure(COLORBAR_LABEL_SAMPLE, style.tick_font_size);
        Self {
            left: (canvas.width * 0.05).max(style.title_font_size + 4.0 * style.tick_font_size),
            top: canvas.height * 0.04,
            right: label_width + style.colorbar_reserve,
            bottom: (canvas.height * 0.05)
                .max(style.title_font_size + 2.0 * style.tick_font_size),
        }
    }
}

/// Canvas geometry: size, gutters and the plot rectangle between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatmapLayout {
    canvas: Size,
    gutters: Gutters,
    plot: Rect,
}

impl HeatmapLayout {
    /// Lays out a canvas with explicit gutters.
    pub fn new(canvas: Size, gutters: Gutters) -> Result<Self, LayoutError> {
        let plot = Rect::new(
            gutters.left,
            gutters.top,
            canvas.width - gutters.right,
            canvas.height - gutters.bottom,
        );
        if !(plot.width() > 0.0 && plot.height() > 0.0) {
            return Err(LayoutError::EmptyPlot {
                width: canvas.width,
                height: canvas.height,
            });
        }
        Ok(Self {
            canvas,
            gutters,
            plot,
        })
    }

    /// Lays out a canvas with gutters sized from label metrics.
    pub fn compute(
        canvas: Size,
        measurer: &impl TextMeasurer,
        style: &OverlayStyle,
    ) -> Result<Self, LayoutError> {
        Self::new(canvas, Gutters::compute(canvas, measurer, style))
    }

    /// Canvas size.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// The gutters.
    pub fn gutters(&self) -> Gutters {
        self.gutters
    }

    /// The plot area.
    pub fn plot(&self) -> Rect {
        self.plot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeuristicTextMeasurer;

    #[test]
    fn gutters_follow_canvas_and_fonts() {
        let style = OverlayStyle::default();
        let g = Gutters::compute(Size::new(800.0, 600.0), &HeuristicTextMeasurer, &style);
        // 0.05 * 800 = 40 < 20 + 64.
        assert_eq!(g.left, 84.0);
        assert_eq!(g.top, 24.0);
        // 8 glyphs * 0.6 * 16 + 70.
        assert!((g.right - 146.8).abs() < 1e-9);
        // 0.05 * 600 = 30 < 20 + 32.
        assert_eq!(g.bottom, 52.0);

        let wide = Gutters::compute(Size::new(4000.0, 2000.0), &HeuristicTextMeasurer, &style);
        assert_eq!(wide.left, 200.0);
        assert_eq!(wide.bottom, 100.0);
    }

    #[test]
    fn plot_sits_between_gutters() {
        let layout = HeatmapLayout::compute(
            Size::new(800.0, 600.0),
            &HeuristicTextMeasurer,
            &OverlayStyle::default(),
        )
        .unwrap();
        let plot = layout.plot();
        assert_eq!(plot.x0, 84.0);
        assert_eq!(plot.y0, 24.0);
        assert_eq!(plot.y1, 548.0);
        assert!((plot.x1 - 653.2).abs() < 1e-9);
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let err = HeatmapLayout::compute(
            Size::new(120.0, 60.0),
            &HeuristicTextMeasurer,
            &OverlayStyle::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            LayoutError::EmptyPlot {
                width: 120.0,
                height: 60.0
            }
        );
    }
}
