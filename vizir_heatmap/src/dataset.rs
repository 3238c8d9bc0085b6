// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Heatmap input data.
//!
//! A dataset is either a dense grid (`rows[y][x]`) or a sparse list of
//! `(x, y, z)` triples with declared bin counts. Any value may be missing.
//!
//! Shape is not validated: ragged rows or mismatched sparse arrays never panic,
//! the out-of-range reads simply behave like missing values.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::grid::Bin;
use crate::window::{BinRect, to_i64};

/// A dense grid of values, indexed `rows[y][x]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DenseGrid {
    rows: Vec<Vec<Option<f64>>>,
}

impl DenseGrid {
    /// Wraps a row-major grid. Row length is taken from the first row.
    pub fn new(rows: Vec<Vec<Option<f64>>>) -> Self {
        Self { rows }
    }

    /// Convenience constructor for grids without missing values.
    pub fn from_values(rows: Vec<Vec<f64>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        )
    }

    /// Number of columns (length of the first row).
    pub fn cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// The value at column `x`, row `y`.
    pub fn get(&self, x: i64, y: i64) -> Option<f64> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied().flatten()
    }
}

/// A sparse list of `(x, y, z)` triples over an `x_bins` by `y_bins` grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseGrid {
    x_bins: usize,
    y_bins: usize,
    x: Vec<i64>,
    y: Vec<i64>,
    z: Vec<Option<f64>>,
    lookup: HashMap<Bin, Option<f64>>,
}

impl SparseGrid {
    /// Builds a sparse grid and its per-bin lookup index.
    ///
    /// When a bin is listed more than once, the lookup keeps the last value.
    pub fn new(
        x_bins: usize,
        y_bins: usize,
        x: Vec<i64>,
        y: Vec<i64>,
        z: Vec<Option<f64>>,
    ) -> Self {
        let lookup = x
            .iter()
            .zip(&y)
            .zip(&z)
            .map(|((&x, &y), &z)| (Bin::new(x, y), z))
            .collect();
        Self {
            x_bins,
            y_bins,
            x,
            y,
            z,
            lookup,
        }
    }

    /// Declared number of columns.
    pub fn x_bins(&self) -> usize {
        self.x_bins
    }

    /// Declared number of rows.
    pub fn y_bins(&self) -> usize {
        self.y_bins
    }

    /// Number of listed triples (bounded by the shortest of the three arrays).
    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len()).min(self.z.len())
    }

    /// Whether no triples are listed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The listed triples, in input order.
    pub fn entries(&self) -> impl Iterator<Item = (Bin, Option<f64>)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((&x, &y), &z)| (Bin::new(x, y), z))
    }

    /// The value recorded for a bin (last write wins).
    pub fn get(&self, x: i64, y: i64) -> Option<f64> {
        self.lookup.get(&Bin::new(x, y)).copied().flatten()
    }
}

/// Heatmap input: dense or sparse.
#[derive(Clone, Debug, PartialEq)]
pub enum Dataset {
    /// Row-major grid.
    Dense(DenseGrid),
    /// Coordinate list.
    Sparse(SparseGrid),
}

impl Dataset {
    /// The full bin extent, or `None` for a dataset with no bins.
    pub fn extent(&self) -> Option<BinRect> {
        match self {
            Self::Dense(d) => BinRect::full(d.cols(), d.rows()),
            Self::Sparse(s) => BinRect::full(s.x_bins(), s.y_bins()),
        }
    }

    /// The value stored for a bin, if any.
    pub fn value(&self, bin: Bin) -> Option<f64> {
        match self {
            Self::Dense(d) => d.get(bin.x, bin.y),
            Self::Sparse(s) => s.get(bin.x, bin.y),
        }
    }

    /// Visits every present value inside `window`.
    ///
    /// Dense grids are walked row by row over the window's index range; sparse
    /// triples are filtered by window membership and visited in input order.
    pub fn for_each_visible(&self, window: BinRect, mut f: impl FnMut(Bin, f64)) {
        match self {
            Self::Dense(d) => {
                let y_end = window.y_max.min(to_i64(d.rows()) - 1);
                let x_end = window.x_max.min(to_i64(d.cols()) - 1);
                for y in window.y_min.max(0)..=y_end {
                    for x in window.x_min.max(0)..=x_end {
                        if let Some(v) = d.get(x, y) {
                            f(Bin::new(x, y), v);
                        }
                    }
                }
            }
            Self::Sparse(s) => {
                for (bin, z) in s.entries() {
                    if let Some(v) = z
                        && window.contains_bin(bin)
                    {
                        f(bin, v);
                    }
                }
            }
        }
    }
}

impl From<DenseGrid> for Dataset {
    fn from(value: DenseGrid) -> Self {
        Self::Dense(value)
    }
}

impl From<SparseGrid> for Dataset {
    fn from(value: SparseGrid) -> Self {
        Self::Sparse(value)
    }
}
