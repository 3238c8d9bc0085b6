// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The colorbar in the right gutter.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::{Brush, Color};
use vizir_heatmap::{ColorScaleLimits, Palette};

use crate::format::format_exponential;
use crate::layout::HeatmapLayout;
use crate::mark::{Layer, OverlayMark, TextAnchor, TextBaseline, TextChannels};
use crate::style::OverlayStyle;
use crate::z_order;

/// Fractions of the color range that get a tick and label.
pub const COLORBAR_TICKS: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

/// The colorbar rectangle: `colorbar_width` wide at `x = width - 0.8 * right`,
/// spanning the plot vertically.
pub fn colorbar_rect(layout: &HeatmapLayout, style: &OverlayStyle) -> Rect {
    let plot = layout.plot();
    let x = layout.canvas().width - 0.8 * layout.gutters().right;
    Rect::new(x, plot.y0, x + style.colorbar_width, plot.y1)
}

/// Generates the gradient (one-pixel rows, top row at the top of the range), its
/// frame, and six labelled ticks in `toExponential(2)` form.
pub fn colorbar_marks(
    layout: &HeatmapLayout,
    palette: Palette,
    limits: &ColorScaleLimits,
    style: &OverlayStyle,
) -> Vec<OverlayMark> {
    let bar = colorbar_rect(layout, style);
    let text = Brush::Solid(style.text_color);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "plot heights are small positive pixel counts"
    )]
    let rows = bar.height() as usize;
    let mut out = Vec::with_capacity(rows + COLORBAR_TICKS.len() + 2);

    let denom = rows.saturating_sub(1).max(1) as f64;
    for i in 0..rows {
        let t = 1.0 - i as f64 / denom;
        let [r, g, b] = palette.map(t);
        let y = bar.y0 + i as f64;
        out.push(OverlayMark::rect(
            Layer::Markup,
            z_order::COLORBAR_FILL,
            Rect::new(bar.x0, y, bar.x1, y + 1.0),
            Color::new([r, g, b, 1.0]),
        ));
    }

    out.push(OverlayMark::stroke(
        Layer::Markup,
        z_order::COLORBAR_FRAME,
        bar.to_path(0.1),
        text.clone(),
        1.0,
    ));

    let mut ticks = BezPath::new();
    for t in COLORBAR_TICKS {
        let y = bar.y0 + (1.0 - t) * bar.height();
        ticks.move_to((bar.x1, y));
        ticks.line_to((bar.x1 + style.colorbar_tick_length, y));
        out.push(OverlayMark::text(
            Layer::Markup,
            z_order::AXIS_LABELS,
            TextChannels {
                pos: Point::new(bar.x1 + 8.0, y),
                text: format_exponential(limits.value_at(t), 2),
                font_size: style.tick_font_size,
                angle: 0.0,
                anchor: TextAnchor::Start,
                baseline: TextBaseline::Middle,
                fill: text.clone(),
            },
        ));
    }
    out.push(OverlayMark::stroke(
        Layer::Markup,
        z_order::AXIS_RULES,
        ticks,
        text,
        1.0,
    ));
    out
}
