// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay styling.

use peniko::Color;
use peniko::color::palette::css;

/// Colors, font sizes and fixed dimensions shared by every guide.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Axis, label, title and colorbar-frame color.
    pub text_color: Color,
    /// Crosshair, selection and polygon color.
    pub annotation_color: Color,
    /// Font size of axis and colorbar tick labels.
    pub tick_font_size: f64,
    /// Font size of axis titles.
    pub title_font_size: f64,
    /// Width reserved in the right gutter for the colorbar, excluding its labels.
    pub colorbar_reserve: f64,
    /// Width of the colorbar gradient.
    pub colorbar_width: f64,
    /// Length of axis tick marks.
    pub tick_length: f64,
    /// Length of colorbar tick marks.
    pub colorbar_tick_length: f64,
    /// Stroke width of axis rules.
    pub axis_stroke_width: f64,
    /// Stroke width of the crosshair.
    pub crosshair_stroke_width: f64,
    /// Stroke width of the selection rectangle and polygon outline.
    pub annotation_stroke_width: f64,
}

impl OverlayStyle {
    /// Sets the text color.
    #[must_use]
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Sets the annotation color.
    #[must_use]
    pub fn with_annotation_color(mut self, color: Color) -> Self {
        self.annotation_color = color;
        self
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            text_color: css::BLACK,
            annotation_color: css::RED,
            tick_font_size: 16.0,
            title_font_size: 20.0,
            colorbar_reserve: 70.0,
            colorbar_width: 20.0,
            tick_length: 4.0,
            colorbar_tick_length: 5.0,
            axis_stroke_width: 2.0,
            crosshair_stroke_width: 1.0,
            annotation_stroke_width: 3.0,
        }
    }
}
