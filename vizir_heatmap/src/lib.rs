// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering and interaction core of an interactive heatmap.
//!
//! This crate holds everything about a heatmap widget that does not touch a
//! platform API:
//! - **Palettes** map normalized values to colors through a precomputed lookup table.
//! - **Grid transforms** convert between canvas pixels and data bins for the
//!   current view window.
//! - **Instance buffers** hold one offset and color per visible cell, ready for an
//!   instanced quad draw.
//! - **Gestures** turn raw pointer events and debounce timers into zooms and
//!   polygon vertices.
//!
//! [`Heatmap`] ties these together. A host (the browser widget, or a headless
//! driver) forwards input, applies the returned [`Effect`]s and draws each
//! [`Frame`].
//!
//! ```
//! use kurbo::{Rect, Size};
//! use vizir_heatmap::{Dataset, DenseGrid, Heatmap, Palette, ScaleMode};
//!
//! let mut heatmap = Heatmap::new(
//!     Size::new(500.0, 450.0),
//!     Rect::new(60.0, 18.0, 460.0, 418.0),
//!     ScaleMode::Linear,
//!     Palette::Viridis,
//! )
//! .unwrap();
//! heatmap
//!     .set_data(Dataset::Dense(DenseGrid::from_values(vec![
//!         vec![1.0, 2.0],
//!         vec![3.0, 4.0],
//!     ])))
//!     .unwrap();
//! let frame = heatmap.render().unwrap();
//! assert_eq!(frame.instances.len(), 4);
//! ```

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod anchors;
mod color_scale;
mod dataset;
#[cfg(not(feature = "std"))]
mod float;
mod gesture;
mod grid;
mod heatmap;
mod instances;
mod palette;
mod polygon;
mod status;
mod window;

pub use color_scale::{
    ColorScaleLimits, NonPositiveUnderLog, ResolvedLimits, ScaleMode, UnknownScaleMode,
    resolve_limits, scan_limits,
};
pub use dataset::{Dataset, DenseGrid, SparseGrid};
pub use gesture::{
    DragState, GestureCommand, GestureCommands, GestureMachine, GestureState, PointerEvent,
    TimerKind,
};
pub use grid::{Bin, GridTransform};
pub use heatmap::{Effect, Effects, Frame, Heatmap, Uniforms};
pub use instances::{COLOR_COMPONENTS, InstanceBuffers, OFFSET_COMPONENTS, build_instances};
pub use palette::{ColorTable, DEFAULT_TABLE_SIZE, Palette, UnknownPalette, map_color};
pub use polygon::Polygon;
pub use status::CursorReport;
pub use window::{BinRect, ViewWindow};

/// Errors reported by the heatmap model.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The plot area left after gutters is not strictly positive.
    #[error("plot area must be positive, got {width} x {height}")]
    EmptyPlot {
        /// Plot width in pixels.
        width: f64,
        /// Plot height in pixels.
        height: f64,
    },
    /// The dataset has no bins.
    #[error("dataset has no bins")]
    EmptyDataset,
}
