// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer-agnostic overlay marks.
//!
//! Guides are emitted as flat lists of [`OverlayMark`]s. Each mark names the
//! [`Layer`] it belongs to, so a host with stacked drawing surfaces can clear and
//! repaint one layer without touching the others.

extern crate alloc;

use alloc::string::String;

use kurbo::{BezPath, Point, Rect};
use peniko::Brush;

/// The drawing surface a mark belongs to, bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Axes, titles and colorbar. Repainted on every render.
    Markup,
    /// The polygon outline. Repainted on polygon edits.
    Polygon,
    /// Crosshair and drag selection. Repainted on pointer input.
    Annotation,
}

/// Horizontal anchoring for text, relative to [`TextChannels::pos`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Anchor at the start (left in LTR).
    Start,
    /// Anchor in the middle.
    Middle,
    /// Anchor at the end (right in LTR).
    End,
}

/// Vertical alignment for text, relative to [`TextChannels::pos`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// Baseline is centered on the anchor point.
    Middle,
    /// Baseline is the font's alphabetic baseline.
    Alphabetic,
}

/// A filled axis-aligned rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct RectChannels {
    /// Rectangle geometry in canvas pixels.
    pub rect: Rect,
    /// Fill paint.
    pub fill: Brush,
}

/// A single line of unshaped text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextChannels {
    /// Anchor position in canvas pixels.
    pub pos: Point,
    /// Text content.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Rotation about `pos` in degrees; positive angles rotate clockwise.
    pub angle: f64,
    /// Horizontal anchoring.
    pub anchor: TextAnchor,
    /// Vertical alignment.
    pub baseline: TextBaseline,
    /// Fill paint.
    pub fill: Brush,
}

/// A stroked (and optionally filled) vector path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathChannels {
    /// Path geometry in canvas pixels.
    pub path: BezPath,
    /// Fill paint; `None` for stroke-only paths.
    pub fill: Option<Brush>,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width in pixels.
    pub stroke_width: f64,
}

/// Per-kind geometry and paint of a mark.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// An axis-aligned rectangle.
    Rect(RectChannels),
    /// A text item positioned at a point.
    Text(TextChannels),
    /// A vector path.
    Path(PathChannels),
}

/// One overlay primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayMark {
    /// Surface this mark is painted on.
    pub layer: Layer,
    /// Paint order within the layer (ascending).
    pub z_index: i32,
    /// Geometry and paint.
    pub payload: MarkPayload,
}

impl OverlayMark {
    /// A filled rectangle.
    pub fn rect(layer: Layer, z_index: i32, rect: Rect, fill: impl Into<Brush>) -> Self {
        Self {
            layer,
            z_index,
            payload: MarkPayload::Rect(RectChannels {
                rect,
                fill: fill.into(),
            }),
        }
    }

    /// A stroke-only path.
    pub fn stroke(
        layer: Layer,
        z_index: i32,
        path: BezPath,
        stroke: impl Into<Brush>,
        stroke_width: f64,
    ) -> Self {
        Self {
            layer,
            z_index,
            payload: MarkPayload::Path(PathChannels {
                path,
                fill: None,
                stroke: stroke.into(),
                stroke_width,
            }),
        }
    }

    /// A text mark.
    pub fn text(layer: Layer, z_index: i32, text: TextChannels) -> Self {
        Self {
            layer,
            z_index,
            payload: MarkPayload::Text(text),
        }
    }

    /// The text content, for text marks.
    pub fn as_text(&self) -> Option<&TextChannels> {
        match &self.payload {
            MarkPayload::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Sorts marks into paint order: by layer, then `z_index`. The sort is stable, so
/// marks with equal keys keep their generation order.
pub fn sort_for_paint(marks: &mut [OverlayMark]) {
    marks.sort_by_key(|m| (m.layer, m.z_index));
}
