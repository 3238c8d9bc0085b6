// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for gutter layout.
//!
//! The gutters around the plot are sized from label metrics. Hosts plug in their
//! real text backend (the browser widget measures on a canvas), or use
//! [`HeuristicTextMeasurer`] where no fonts are available.

/// A minimal text measurement interface used by [`HeatmapLayout`](crate::HeatmapLayout).
pub trait TextMeasurer {
    /// Returns `(width, height)` in pixels for one line of sans-serif text.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        (**self).measure(text, font_size)
    }
}

/// A tiny heuristic text measurer suitable for headless rendering and tests.
///
/// It assumes an average glyph width of ~0.6em and height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = 0.6 * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}
