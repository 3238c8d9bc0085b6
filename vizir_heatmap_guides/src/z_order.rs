// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions for heatmap overlay marks.
//!
//! Values only order marks within one [`Layer`](crate::Layer); layers themselves
//! are stacked surfaces.

/// Colorbar gradient rows.
pub const COLORBAR_FILL: i32 = 0;
/// Colorbar border.
pub const COLORBAR_FRAME: i32 = 10;
/// Axis domain lines and tick marks.
pub const AXIS_RULES: i32 = 30;
/// Axis and colorbar tick labels.
pub const AXIS_LABELS: i32 = 40;
/// Axis titles.
pub const AXIS_TITLES: i32 = 50;

/// Polygon outline.
pub const POLYGON: i32 = 0;

/// Hover crosshair.
pub const CROSSHAIR: i32 = 0;
/// Drag-selection rectangle.
pub const SELECTION: i32 = 10;
