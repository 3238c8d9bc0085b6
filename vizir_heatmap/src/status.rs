// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hover readout shown next to the plot.

use core::fmt;

use crate::grid::Bin;

/// What the cursor is over.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CursorReport {
    /// Outside the plot, or no data loaded.
    #[default]
    Outside,
    /// Over a visible bin.
    Bin {
        /// The hovered bin.
        bin: Bin,
        /// Its value under the active scale transform, if it has one.
        value: Option<f64>,
    },
}

impl fmt::Display for CursorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outside => f.write_str("Cursor: -"),
            Self::Bin {
                bin,
                value: Some(v),
            } => write!(f, "Cursor: ({bin}: {v})"),
            Self::Bin { bin, value: None } => write!(f, "Cursor: ({bin}: -)"),
        }
    }
}
