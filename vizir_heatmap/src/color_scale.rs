// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale modes and the per-frame color-scale extrema pass.
//!
//! The color lookup is normalized to the range of the *visible* values, so zooming
//! in re-contrasts the palette. The range is recomputed on every render.

use core::fmt;
use core::str::FromStr;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::dataset::Dataset;
use crate::window::BinRect;

/// How raw values are transformed before color mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScaleMode {
    /// Values are used as-is.
    #[default]
    Linear,
    /// Values are mapped through the natural logarithm.
    Logarithmic,
}

impl ScaleMode {
    /// All modes, in control-panel order.
    pub const ALL: [Self; 2] = [Self::Linear, Self::Logarithmic];

    /// Applies the scale transform to a raw value.
    ///
    /// The result may be non-finite (`ln(0)` is `-inf`, `ln(-1)` is NaN); callers
    /// skip such values.
    pub fn transform(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Logarithmic => value.ln(),
        }
    }

    /// The lower-case name used by option strings and the control panel.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Logarithmic => "log",
        }
    }

    /// The human-readable label shown in the control panel.
    pub fn label(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::Logarithmic => "Log",
        }
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown scale mode name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown scale mode (expected `linear` or `log`)")]
pub struct UnknownScaleMode;

impl FromStr for ScaleMode {
    type Err = UnknownScaleMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "log" => Ok(Self::Logarithmic),
            _ => Err(UnknownScaleMode),
        }
    }
}

/// The visible window contains a value that has no logarithm.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("log scale requires positive values, found {value} at bin ({x}, {y})")]
pub struct NonPositiveUnderLog {
    /// Column of the first offending value.
    pub x: i64,
    /// Row of the first offending value.
    pub y: i64,
    /// The offending raw value.
    pub value: f64,
}

/// The transformed value range used to normalize colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScaleLimits {
    /// Scale mode the limits were computed under.
    pub mode: ScaleMode,
    /// Smallest visible transformed value.
    pub zmin: f64,
    /// Largest visible transformed value (always greater than `zmin`).
    pub zmax: f64,
}

impl ColorScaleLimits {
    /// Limits for a window with no visible values.
    pub const EMPTY: Self = Self {
        mode: ScaleMode::Linear,
        zmin: 0.0,
        zmax: 1.0,
    };

    /// Builds limits from an observed range, widening a degenerate range by 1.
    pub fn new(mode: ScaleMode, zmin: f64, zmax: f64) -> Self {
        let zmax = if zmax > zmin { zmax } else { zmin + 1.0 };
        Self { mode, zmin, zmax }
    }

    /// Maps a transformed value to `[0, 1]` (unclamped).
    pub fn normalize(&self, transformed: f64) -> f64 {
        (transformed - self.zmin) / (self.zmax - self.zmin)
    }

    /// The transformed value at fraction `t` of the range.
    pub fn value_at(&self, t: f64) -> f64 {
        self.zmin + t * (self.zmax - self.zmin)
    }
}

/// Scans the visible values of `dataset` for their transformed extrema.
///
/// Under [`ScaleMode::Logarithmic`] the scan fails on the first visible value
/// that is `<= 0`. Values that are non-finite after the transform are skipped.
/// A window with no usable values yields `(0, 1)`.
pub fn scan_limits(
    dataset: &Dataset,
    window: BinRect,
    mode: ScaleMode,
) -> Result<ColorScaleLimits, NonPositiveUnderLog> {
    let mut range: Option<(f64, f64)> = None;
    let mut rejected = None;
    dataset.for_each_visible(window, |bin, value| {
        if rejected.is_some() {
            return;
        }
        if mode == ScaleMode::Logarithmic && value <= 0.0 {
            rejected = Some(NonPositiveUnderLog {
                x: bin.x,
                y: bin.y,
                value,
            });
            return;
        }
        let v = mode.transform(value);
        if !v.is_finite() {
            return;
        }
        range = Some(match range {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    });
    if let Some(err) = rejected {
        return Err(err);
    }
    Ok(match range {
        Some((lo, hi)) => ColorScaleLimits::new(mode, lo, hi),
        None => ColorScaleLimits {
            mode,
            ..ColorScaleLimits::EMPTY
        },
    })
}

/// Limits after applying the log fallback rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedLimits {
    /// Limits to render with; `limits.mode` is the effective scale mode.
    pub limits: ColorScaleLimits,
    /// Whether the requested log mode was rejected in favor of linear.
    pub fell_back: bool,
}

/// Computes limits for `mode`, falling back to linear if log is rejected.
///
/// The fallback re-runs the scan in linear mode, which has no rejection
/// condition, so resolution always terminates.
pub fn resolve_limits(dataset: &Dataset, window: BinRect, mode: ScaleMode) -> ResolvedLimits {
    match scan_limits(dataset, window, mode) {
        Ok(limits) => ResolvedLimits {
            limits,
            fell_back: false,
        },
        Err(err) => {
            log::info!("{err}; falling back to linear scale");
            let limits = match scan_limits(dataset, window, ScaleMode::Linear) {
                Ok(limits) => limits,
                Err(_) => ColorScaleLimits::EMPTY,
            };
            ResolvedLimits {
                limits,
                fell_back: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::dataset::{DenseGrid, SparseGrid};

    fn scenario_grid() -> Dataset {
        Dataset::Dense(DenseGrid::from_values(vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![5.0, 6.0, 7.0, 8.0],
            vec![9.0, 10.0, 11.0, 12.0],
            vec![13.0, 14.0, 15.0, 16.0],
        ]))
    }

    #[test]
    fn linear_limits_cover_visible_values() {
        let d = scenario_grid();
        let limits = scan_limits(&d, d.extent().unwrap(), ScaleMode::Linear).unwrap();
        assert_eq!((limits.zmin, limits.zmax), (1.0, 16.0));
    }

    #[test]
    fn limits_follow_the_window() {
        let d = scenario_grid();
        let window = BinRect {
            x_min: 1,
            x_max: 2,
            y_min: 1,
            y_max: 2,
        };
        let limits = scan_limits(&d, window, ScaleMode::Linear).unwrap();
        assert_eq!((limits.zmin, limits.zmax), (6.0, 11.0));
    }

    #[test]
    fn log_limits_are_transformed() {
        let d = scenario_grid();
        let limits = scan_limits(&d, d.extent().unwrap(), ScaleMode::Logarithmic).unwrap();
        assert_eq!(limits.zmin, 0.0);
        assert!((limits.zmax - 16.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn degenerate_range_is_widened_by_one() {
        let d = Dataset::Dense(DenseGrid::from_values(vec![vec![3.0, 3.0], vec![3.0, 3.0]]));
        let limits = scan_limits(&d, d.extent().unwrap(), ScaleMode::Linear).unwrap();
        assert_eq!((limits.zmin, limits.zmax), (3.0, 4.0));
        assert_eq!(limits.normalize(3.0), 0.0);
    }

    #[test]
    fn empty_window_defaults_to_unit_range() {
        let d = Dataset::Dense(DenseGrid::new(vec![vec![None, None]]));
        let limits = scan_limits(&d, d.extent().unwrap(), ScaleMode::Logarithmic).unwrap();
        assert_eq!((limits.zmin, limits.zmax), (0.0, 1.0));
        assert_eq!(limits.mode, ScaleMode::Logarithmic);
    }

    #[test]
    fn non_positive_visible_value_forces_linear_fallback() {
        let d = Dataset::Sparse(SparseGrid::new(
            2,
            2,
            vec![0, 1],
            vec![0, 1],
            vec![Some(5.0), Some(-1.0)],
        ));
        let window = d.extent().unwrap();
        let err = scan_limits(&d, window, ScaleMode::Logarithmic).unwrap_err();
        assert_eq!((err.x, err.y, err.value), (1, 1, -1.0));

        let resolved = resolve_limits(&d, window, ScaleMode::Logarithmic);
        assert!(resolved.fell_back);
        assert_eq!(resolved.limits.mode, ScaleMode::Linear);
        assert_eq!((resolved.limits.zmin, resolved.limits.zmax), (-1.0, 5.0));

        let again = resolve_limits(&d, window, resolved.limits.mode);
        assert!(!again.fell_back);
        assert_eq!(again.limits, resolved.limits);
    }

    #[test]
    fn zero_is_rejected_under_log() {
        let d = Dataset::Dense(DenseGrid::from_values(vec![vec![0.0, 2.0]]));
        assert!(scan_limits(&d, d.extent().unwrap(), ScaleMode::Logarithmic).is_err());
    }

    #[test]
    fn non_positive_value_outside_window_does_not_reject_log() {
        let d = Dataset::Dense(DenseGrid::from_values(vec![vec![-4.0, 2.0, 8.0]]));
        let window = BinRect {
            x_min: 1,
            x_max: 2,
            y_min: 0,
            y_max: 0,
        };
        let resolved = resolve_limits(&d, window, ScaleMode::Logarithmic);
        assert!(!resolved.fell_back);
        assert_eq!(resolved.limits.mode, ScaleMode::Logarithmic);
    }

    #[test]
    fn non_finite_values_are_skipped() {
        let d = Dataset::Dense(DenseGrid::from_values(vec![vec![f64::NAN, 2.0, f64::INFINITY, 4.0]]));
        let limits = scan_limits(&d, d.extent().unwrap(), ScaleMode::Linear).unwrap();
        assert_eq!((limits.zmin, limits.zmax), (2.0, 4.0));
    }

    #[test]
    fn scale_mode_names_round_trip() {
        for mode in ScaleMode::ALL {
            assert_eq!(mode.name().parse::<ScaleMode>(), Ok(mode));
        }
        assert!("logarithmic".parse::<ScaleMode>().is_err());
    }
}
