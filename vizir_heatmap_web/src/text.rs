// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement with the browser's `measureText`.

use vizir_heatmap_guides::{HeuristicTextMeasurer, TextMeasurer};
use web_sys::CanvasRenderingContext2d;

use crate::paint::css_font;

/// Measures sans-serif text on a 2D canvas context.
///
/// Falls back to [`HeuristicTextMeasurer`] if the context rejects the call.
#[derive(Clone, Debug)]
pub(crate) struct CanvasTextMeasurer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasTextMeasurer {
    pub(crate) fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasurer for CanvasTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        self.ctx.set_font(&css_font(font_size));
        match self.ctx.measure_text(text) {
            Ok(metrics) => {
                let height =
                    metrics.actual_bounding_box_ascent() + metrics.actual_bounding_box_descent();
                (metrics.width(), if height > 0.0 { height } else { font_size })
            }
            Err(_) => HeuristicTextMeasurer.measure(text, font_size),
        }
    }
}
