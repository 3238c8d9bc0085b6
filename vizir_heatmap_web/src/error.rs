// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget errors.

use vizir_heatmap_guides::LayoutError;

/// Failures while building or driving the widget.
///
/// At the JS boundary these become thrown `Error`s.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WidgetError {
    /// A container id did not resolve to an element.
    #[error("No element found with ID \"{0}\"")]
    MissingElement(String),
    /// No global `window` / `document` (not running in a browser page).
    #[error("no browser window available")]
    MissingWindow,
    /// The canvas refused a drawing context.
    #[error("{0} is not supported by your browser")]
    UnsupportedContext(&'static str),
    /// Shader compilation failed.
    #[error("shader compilation failed: {0}")]
    Shader(String),
    /// Program linking failed.
    #[error("program linking failed: {0}")]
    Program(String),
    /// An option had a value that could not be interpreted.
    #[error("invalid value {value:?} for option `{name}`")]
    InvalidOption {
        /// The option key, as spelled in JS.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The data argument had an unrecognized shape.
    #[error("unrecognized heatmap data: {0}")]
    Data(String),
    /// A DOM or WebGL call threw.
    #[error("{0}")]
    Js(String),
    /// The heatmap model rejected its input.
    #[error(transparent)]
    Model(#[from] vizir_heatmap::Error),
    /// The canvas is too small for the axes and colorbar.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for WidgetError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
