// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-stop overlay generation for a heatmap.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use vizir_heatmap::{Frame, GridTransform, Heatmap, Palette, Polygon};

use crate::annotation::{crosshair, polygon_outline, selection_box};
use crate::axis::axis_marks;
use crate::colorbar::colorbar_marks;
use crate::layout::HeatmapLayout;
use crate::mark::{Layer, OverlayMark, sort_for_paint};
use crate::style::OverlayStyle;

/// Layout, style and titles for a heatmap's overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatmapGuides {
    layout: HeatmapLayout,
    style: OverlayStyle,
    x_title: String,
    y_title: String,
}

impl HeatmapGuides {
    /// Creates untitled guides.
    pub fn new(layout: HeatmapLayout, style: OverlayStyle) -> Self {
        Self {
            layout,
            style,
            x_title: String::new(),
            y_title: String::new(),
        }
    }

    /// Sets the axis titles.
    #[must_use]
    pub fn with_titles(mut self, x_title: impl Into<String>, y_title: impl Into<String>) -> Self {
        self.x_title = x_title.into();
        self.y_title = y_title.into();
        self
    }

    /// The canvas layout.
    pub fn layout(&self) -> &HeatmapLayout {
        &self.layout
    }

    /// The overlay style.
    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Axes, titles and colorbar for a rendered frame ([`Layer::Markup`]).
    pub fn markup(&self, frame: &Frame, palette: Palette) -> Vec<OverlayMark> {
        let mut out = axis_marks(&frame.grid, &self.style, &self.x_title, &self.y_title);
        out.extend(colorbar_marks(
            &self.layout,
            palette,
            &frame.limits,
            &self.style,
        ));
        sort_for_paint(&mut out);
        out
    }

    /// The hover crosshair at `p`.
    pub fn crosshair(&self, p: Point) -> OverlayMark {
        crosshair(self.layout.plot(), p, &self.style)
    }

    /// The drag-selection outline.
    pub fn selection(&self, rect: Rect) -> OverlayMark {
        selection_box(rect, &self.style)
    }

    /// The polygon outline ([`Layer::Polygon`]), if it has at least two vertices.
    pub fn polygon(&self, grid: &GridTransform, polygon: &Polygon) -> Option<OverlayMark> {
        polygon_outline(grid, polygon, &self.style)
    }

    /// Crosshair and selection for the model's current interaction state
    /// ([`Layer::Annotation`]).
    pub fn annotations(&self, heatmap: &Heatmap) -> Vec<OverlayMark> {
        let mut out: Vec<_> = heatmap
            .crosshair()
            .map(|p| self.crosshair(p))
            .into_iter()
            .chain(heatmap.selection().map(|r| self.selection(r)))
            .collect();
        sort_for_paint(&mut out);
        out
    }

    /// Every overlay layer for a frame, in paint order.
    pub fn all(&self, heatmap: &Heatmap, frame: &Frame) -> Vec<OverlayMark> {
        let mut out = self.markup(frame, heatmap.palette());
        out.extend(self.polygon(&frame.grid, heatmap.polygon()));
        out.extend(self.annotations(heatmap));
        sort_for_paint(&mut out);
        out
    }

    /// The marks of `marks` that belong to `layer`.
    pub fn layer(marks: &[OverlayMark], layer: Layer) -> impl Iterator<Item = &OverlayMark> {
        marks.iter().filter(move |m| m.layer == layer)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use kurbo::Size;
    use vizir_heatmap::{Bin, Dataset, DenseGrid, PointerEvent, ScaleMode};

    use super::*;
    use crate::HeuristicTextMeasurer;

    fn setup() -> (HeatmapGuides, Heatmap) {
        let canvas = Size::new(640.0, 480.0);
        let style = OverlayStyle::default();
        let layout = HeatmapLayout::compute(canvas, &HeuristicTextMeasurer, &style).unwrap();
        let mut heatmap =
            Heatmap::new(canvas, layout.plot(), ScaleMode::Linear, Palette::Turbo).unwrap();
        heatmap
            .set_data(Dataset::Dense(DenseGrid::from_values(vec![
                vec![1.0, 2.0, 3.0],
                vec![4.0, 5.0, 6.0],
            ])))
            .unwrap();
        (
            HeatmapGuides::new(layout, style).with_titles("x bin", "y bin"),
            heatmap,
        )
    }

    #[test]
    fn all_layers_are_in_paint_order() {
        let (guides, mut heatmap) = setup();
        let frame = heatmap.render().unwrap();
        heatmap.polygon_mut().push(Bin::new(0, 0));
        heatmap.polygon_mut().push(Bin::new(2, 1));
        let centre = frame.grid.bin_to_pixel(Bin::new(1, 1));
        heatmap.pointer(PointerEvent::Move(centre));

        let marks = guides.all(&heatmap, &frame);
        assert!(marks.windows(2).all(|w| (w[0].layer, w[0].z_index) <= (w[1].layer, w[1].z_index)));
        assert_eq!(HeatmapGuides::layer(&marks, Layer::Polygon).count(), 1);
        assert_eq!(HeatmapGuides::layer(&marks, Layer::Annotation).count(), 1);
        assert!(
            marks
                .iter()
                .filter_map(OverlayMark::as_text)
                .any(|t| t.text == "x bin")
        );
    }

    #[test]
    fn no_annotations_when_idle() {
        let (guides, heatmap) = setup();
        assert!(guides.annotations(&heatmap).is_empty());
    }
}
