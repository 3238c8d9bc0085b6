// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser heatmap widget for VizIR.
//!
//! On `wasm32` targets this crate exports `HeatmapWidget` to JS:
//!
//! ```js
//! import init, { HeatmapWidget } from "./vizir_heatmap_web.js";
//!
//! await init();
//! const plot = new HeatmapWidget("plot", "controls", {
//!     xAxisTitle: "x bin",
//!     yAxisTitle: "y bin",
//!     colorscale: "viridis",
//!     polycallback: (vertices) => console.log(vertices),
//! });
//! plot.draw([[1, 2, 3], [4, 5, 6]]);
//! ```
//!
//! Cells are drawn in a single instanced WebGL2 call. Axes, colorbar, polygon and
//! pointer annotations are painted on three Canvas 2D layers stacked above it, from
//! marks generated by [`vizir_heatmap_guides`].
//!
//! Option and data decoding are target-independent and available everywhere.

mod data;
mod error;
mod options;
mod paint;

#[cfg(target_arch = "wasm32")]
mod controls;
#[cfg(target_arch = "wasm32")]
mod gl;
#[cfg(target_arch = "wasm32")]
mod text;
#[cfg(target_arch = "wasm32")]
mod timers;
#[cfg(target_arch = "wasm32")]
mod widget;

pub use data::{DatasetInput, SparseInput};
pub use error::WidgetError;
pub use options::{Background, HeatmapOptions, WidgetConfig, resolve_extent};
pub use paint::{css_font, css_paint};
#[cfg(target_arch = "wasm32")]
pub use widget::HeatmapWidget;
