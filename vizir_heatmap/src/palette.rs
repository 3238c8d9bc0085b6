// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Palettes and precomputed color lookup tables.
//!
//! A [`Palette`] is an ordered list of anchor colors. [`map_color`] interpolates
//! linearly between the two anchors nearest to `t`, and a [`ColorTable`] samples
//! that interpolation at a fixed number of evenly spaced points so render-time
//! lookup is a single index.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::anchors;

/// Number of entries in a default [`ColorTable`].
pub const DEFAULT_TABLE_SIZE: usize = 256;

/// The built-in palettes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Palette {
    /// Perceptually uniform sequential palette (11 anchors).
    Viridis,
    /// Wide-spectrum rainbow palette (256 anchors).
    #[default]
    Turbo,
}

impl Palette {
    /// All palettes, in control-panel order.
    pub const ALL: [Self; 2] = [Self::Viridis, Self::Turbo];

    /// Returns the ordered anchor colors of this palette.
    pub fn anchors(self) -> &'static [[f32; 3]] {
        match self {
            Self::Viridis => &anchors::VIRIDIS,
            Self::Turbo => &anchors::TURBO,
        }
    }

    /// Maps `t` in `[0, 1]` to an RGB triple; see [`map_color`].
    pub fn map(self, t: f64) -> [f32; 3] {
        map_color(self.anchors(), t)
    }

    /// The lower-case name used by option strings and the control panel.
    pub fn name(self) -> &'static str {
        match self {
            Self::Viridis => "viridis",
            Self::Turbo => "turbo",
        }
    }

    /// The human-readable label shown in the control panel.
    pub fn label(self) -> &'static str {
        match self {
            Self::Viridis => "Viridis",
            Self::Turbo => "Turbo",
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown palette name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown palette (expected `viridis` or `turbo`)")]
pub struct UnknownPalette;

impl FromStr for Palette {
    type Err = UnknownPalette;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viridis" => Ok(Self::Viridis),
            "turbo" => Ok(Self::Turbo),
            _ => Err(UnknownPalette),
        }
    }
}

/// Interpolates linearly between the two anchors nearest to `t`.
///
/// `t` is clamped to `[0, 1]` (NaN maps to `0`). `t == 1` returns the final
/// anchor exactly. Every returned component lies within the anchors' own range.
pub fn map_color(anchors: &[[f32; 3]], t: f64) -> [f32; 3] {
    let Some(last) = anchors.last() else {
        return [0.0; 3];
    };
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    if t >= 1.0 || anchors.len() == 1 {
        return *last;
    }

    let scaled = t * (anchors.len() - 1) as f64;
    let i = index_from_floor(scaled.floor(), anchors.len() - 2);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "interpolation weight lies in [0, 1]"
    )]
    let frac = (scaled - i as f64) as f32;
    let (a, b) = (anchors[i], anchors[i + 1]);
    [
        a[0] + frac * (b[0] - a[0]),
        a[1] + frac * (b[1] - a[1]),
        a[2] + frac * (b[2] - a[2]),
    ]
}

/// A fixed-size lookup table sampling a palette at `i / (N - 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorTable {
    palette: Palette,
    entries: Vec<[f32; 3]>,
}

impl ColorTable {
    /// Builds a table of `size` entries for `palette`.
    ///
    /// Sizes below 2 are raised to 2 so both ends of the palette are present.
    pub fn new(palette: Palette, size: usize) -> Self {
        let size = size.max(2);
        let denom = (size - 1) as f64;
        let entries = (0..size).map(|i| palette.map(i as f64 / denom)).collect();
        Self { palette, entries }
    }

    /// Builds a [`DEFAULT_TABLE_SIZE`]-entry table.
    pub fn with_default_size(palette: Palette) -> Self {
        Self::new(palette, DEFAULT_TABLE_SIZE)
    }

    /// The palette this table samples.
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; tables hold at least two entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `index`, clamped to the table.
    pub fn entry(&self, index: usize) -> [f32; 3] {
        self.entries[index.min(self.entries.len() - 1)]
    }

    /// Maps a normalized value to a table index: `floor(normalized * (N - 1))`,
    /// clamped to `[0, N - 1]`. Returns `None` for NaN.
    pub fn index_for(&self, normalized: f64) -> Option<usize> {
        if normalized.is_nan() {
            return None;
        }
        let top = self.entries.len() - 1;
        let scaled = (normalized * top as f64).floor();
        Some(index_from_floor(scaled, top))
    }
}

/// Converts an already-floored value to an index in `[0, max]`.
fn index_from_floor(floored: f64, max: usize) -> usize {
    if floored <= 0.0 {
        return 0;
    }
    if floored >= max as f64 {
        return max;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is a non-negative integer below `max`"
    )]
    {
        floored as usize
    }
}
