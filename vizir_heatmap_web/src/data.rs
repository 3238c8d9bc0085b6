// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoding of the `setData` / `draw` argument.
//!
//! Two shapes are accepted: an object with `xBins`, `yBins`, `x`, `y` and `z`
//! arrays, or a row-major array of rows. `null` values mark bins without data.

use serde::Deserialize;
use vizir_heatmap::{Dataset, DenseGrid, SparseGrid};

/// A sparse dataset as sent from JS.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparseInput {
    /// Number of columns.
    pub x_bins: usize,
    /// Number of rows.
    pub y_bins: usize,
    /// Column of each triple.
    pub x: Vec<i64>,
    /// Row of each triple.
    pub y: Vec<i64>,
    /// Value of each triple.
    pub z: Vec<Option<f64>>,
}

/// Either accepted data shape.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DatasetInput {
    /// `{ xBins, yBins, x, y, z }`.
    Sparse(SparseInput),
    /// `[[row 0], [row 1], ...]`.
    Dense(Vec<Vec<Option<f64>>>),
}

impl From<DatasetInput> for Dataset {
    fn from(input: DatasetInput) -> Self {
        match input {
            DatasetInput::Sparse(s) => {
                Self::Sparse(SparseGrid::new(s.x_bins, s.y_bins, s.x, s.y, s.z))
            }
            DatasetInput::Dense(rows) => Self::Dense(DenseGrid::new(rows)),
        }
    }
}
