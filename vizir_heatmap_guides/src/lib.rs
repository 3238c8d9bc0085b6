// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay ("guide") generation for `vizir_heatmap`.
//!
//! The heatmap cells are drawn by an instanced GPU pass; everything around and on top
//! of them is produced here as renderer-agnostic [`OverlayMark`]s:
//! - **Layout** splits the canvas into gutters and a plot area from label metrics.
//! - **Axes** tick every bin edge and label roughly ten of them.
//! - **Colorbar** shows the active palette over the visible value range.
//! - **Annotations** cover the hover crosshair, drag selection and polygon outline.
//!
//! Marks are tagged with the [`Layer`] they belong to so hosts with stacked surfaces
//! repaint only what changed. Text is unshaped; renderers place it by anchor and
//! baseline.

#![no_std]

extern crate alloc;

mod annotation;
mod axis;
mod colorbar;
mod format;
mod guides;
mod layout;
mod mark;
mod measure;
mod style;
pub mod z_order;

pub use annotation::{crosshair, polygon_outline, selection_box};
pub use axis::{axis_marks, label_every};
pub use colorbar::{COLORBAR_TICKS, colorbar_marks, colorbar_rect};
pub use format::format_exponential;
pub use guides::HeatmapGuides;
pub use layout::{COLORBAR_LABEL_SAMPLE, Gutters, HeatmapLayout, LayoutError};
pub use mark::{
    Layer, MarkPayload, OverlayMark, PathChannels, RectChannels, TextAnchor, TextBaseline,
    TextChannels, sort_for_paint,
};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use style::OverlayStyle;
