// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bin axes along the bottom and left edges of the plot.
//!
//! Every bin edge gets a tick mark. Labels show absolute bin numbers and are thinned
//! to roughly ten per axis: a label every `floor(n / min(10, n))` edges.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{BezPath, Point};
use peniko::Brush;
use vizir_heatmap::GridTransform;

use crate::mark::{Layer, OverlayMark, TextAnchor, TextBaseline, TextChannels};
use crate::style::OverlayStyle;
use crate::z_order;

/// Label spacing, in bins, for an axis showing `bins` bins.
pub fn label_every(bins: i64) -> i64 {
    let bins = bins.max(1);
    (bins / bins.min(10)).max(1)
}

/// Generates both axes, their tick labels and (non-empty) titles.
pub fn axis_marks(
    grid: &GridTransform,
    style: &OverlayStyle,
    x_title: &str,
    y_title: &str,
) -> Vec<OverlayMark> {
    let plot = grid.plot();
    let window = grid.window();
    let (ox, oy) = (plot.x0, plot.y1);
    let text = Brush::Solid(style.text_color);
    let mut out = Vec::new();

    let mut rules = BezPath::new();
    rules.move_to((ox, plot.y0));
    rules.line_to((ox, oy));
    rules.line_to((plot.x1, oy));

    let nx = window.x_count();
    let x_every = label_every(nx);
    for i in 0..=nx {
        let x = grid.column_edge(i);
        rules.move_to((x, oy));
        rules.line_to((x, oy + style.tick_length));
        if i % x_every == 0 {
            out.push(label(
                (i + window.x_min).to_string(),
                Point::new(x, oy + style.tick_font_size + 3.0),
                TextAnchor::Middle,
                style,
                &text,
            ));
        }
    }

    let ny = window.y_count();
    let y_every = label_every(ny);
    for i in 0..=ny {
        let y = grid.row_edge(i);
        rules.move_to((ox, y));
        rules.line_to((ox - style.tick_length, y));
        if i % y_every == 0 {
            out.push(label(
                (i + window.y_min).to_string(),
                Point::new(ox - 6.0, y + 3.0),
                TextAnchor::End,
                style,
                &text,
            ));
        }
    }

    out.push(OverlayMark::stroke(
        Layer::Markup,
        z_order::AXIS_RULES,
        rules,
        text.clone(),
        style.axis_stroke_width,
    ));

    if !x_title.is_empty() {
        out.push(title(
            x_title,
            Point::new(
                ox + plot.width() / 2.0,
                oy + style.title_font_size + style.tick_font_size,
            ),
            0.0,
            style,
            &text,
        ));
    }
    if !y_title.is_empty() {
        out.push(title(
            y_title,
            Point::new(ox - 3.0 * style.title_font_size, plot.center().y),
            -90.0,
            style,
            &text,
        ));
    }
    out
}

fn label(
    text: String,
    pos: Point,
    anchor: TextAnchor,
    style: &OverlayStyle,
    fill: &Brush,
) -> OverlayMark {
    OverlayMark::text(
        Layer::Markup,
        z_order::AXIS_LABELS,
        TextChannels {
            pos,
            text,
            font_size: style.tick_font_size,
            angle: 0.0,
            anchor,
            baseline: TextBaseline::Alphabetic,
            fill: fill.clone(),
        },
    )
}

fn title(text: &str, pos: Point, angle: f64, style: &OverlayStyle, fill: &Brush) -> OverlayMark {
    OverlayMark::text(
        Layer::Markup,
        z_order::AXIS_TITLES,
        TextChannels {
            pos,
            text: text.to_string(),
            font_size: style.title_font_size,
            angle,
            anchor: TextAnchor::Middle,
            baseline: TextBaseline::Alphabetic,
            fill: fill.clone(),
        },
    )
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use kurbo::Rect;
    use vizir_heatmap::{Bin, BinRect};

    use super::*;

    fn labels(marks: &[OverlayMark], anchor: TextAnchor) -> Vec<&str> {
        marks
            .iter()
            .filter_map(OverlayMark::as_text)
            .filter(|t| t.anchor == anchor && t.font_size == 16.0)
            .map(|t| t.text.as_str())
            .collect()
    }

    #[test]
    fn label_spacing_thins_to_about_ten() {
        assert_eq!(label_every(1), 1);
        assert_eq!(label_every(4), 1);
        assert_eq!(label_every(10), 1);
        assert_eq!(label_every(25), 2);
        assert_eq!(label_every(100), 10);
        assert_eq!(label_every(0), 1);
    }

    #[test]
    fn small_window_labels_every_edge_with_absolute_bins() {
        let grid = GridTransform::new(
            Rect::new(80.0, 20.0, 480.0, 420.0),
            BinRect::from_corners(Bin::new(1, 2), Bin::new(3, 4)),
        )
        .unwrap();
        let marks = axis_marks(&grid, &OverlayStyle::default(), "x", "y");
        assert_eq!(labels(&marks, TextAnchor::Middle), ["1", "2", "3", "4"]);
        assert_eq!(labels(&marks, TextAnchor::End), ["2", "3", "4", "5"]);

        let first_x = marks.iter().find_map(OverlayMark::as_text).unwrap();
        assert_eq!(first_x.pos, Point::new(80.0, 439.0));
    }

    #[test]
    fn titles_are_optional_and_y_title_is_rotated() {
        let grid = GridTransform::new(
            Rect::new(80.0, 20.0, 480.0, 420.0),
            BinRect::full(50, 50).unwrap(),
        )
        .unwrap();
        let style = OverlayStyle::default();
        let untitled = axis_marks(&grid, &style, "", "");
        assert!(untitled.iter().filter_map(OverlayMark::as_text).all(|t| t.font_size == 16.0));

        let titled = axis_marks(&grid, &style, "energy", "time");
        let y_title = titled
            .iter()
            .filter_map(OverlayMark::as_text)
            .find(|t| t.text == "time")
            .unwrap();
        assert_eq!(y_title.angle, -90.0);
        assert_eq!(y_title.pos, Point::new(20.0, 220.0));
        // 51 edges, labelled every 5 bins.
        assert_eq!(labels(&titled, TextAnchor::Middle).len(), 11);
    }
}
