// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colorbar label formatting.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};

/// Formats `value` in scientific notation with `digits` fractional digits and a
/// signed exponent: `12345.0` with 2 digits is `1.23e+4`, `0.0` is `0.00e+0`.
///
/// Non-finite values print as `NaN`, `Infinity` and `-Infinity`.
pub fn format_exponential(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let s = format!("{value:.digits$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponent_is_always_signed() {
        assert_eq!(format_exponential(12345.0, 2), "1.23e+4");
        assert_eq!(format_exponential(0.000_123_4, 2), "1.23e-4");
        assert_eq!(format_exponential(1.0, 2), "1.00e+0");
        assert_eq!(format_exponential(0.0, 2), "0.00e+0");
        assert_eq!(format_exponential(-2.5, 2), "-2.50e+0");
        assert_eq!(format_exponential(16.0, 2), "1.60e+1");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(format_exponential(f64::NAN, 2), "NaN");
        assert_eq!(format_exponential(f64::INFINITY, 2), "Infinity");
        assert_eq!(format_exponential(f64::NEG_INFINITY, 2), "-Infinity");
    }
}
