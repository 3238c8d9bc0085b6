// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction options.
//!
//! The JS options object is deserialized into [`HeatmapOptions`] as-is and then
//! resolved into a typed [`WidgetConfig`]. Unknown keys (including the
//! `polycallback` function, which is read separately) are ignored.

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::Deserialize;
use vizir_heatmap::{Palette, ScaleMode};
use vizir_heatmap_guides::OverlayStyle;

use crate::error::WidgetError;

/// The options object passed to the widget constructor.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeatmapOptions {
    /// Canvas width in CSS pixels.
    pub width: Option<f64>,
    /// Canvas height in CSS pixels.
    pub height: Option<f64>,
    /// Background behind the cells; a CSS color or `transparent`.
    pub bkg_color: Option<String>,
    /// Axis, label and colorbar frame color.
    pub text_color: Option<String>,
    /// Crosshair, selection and polygon color.
    pub annotation_color: Option<String>,
    /// Title under the x axis.
    pub x_axis_title: Option<String>,
    /// Title left of the y axis.
    pub y_axis_title: Option<String>,
    /// Initial scale mode, `linear` or `log`.
    pub scale: Option<String>,
    /// Initial palette, `viridis` or `turbo`.
    pub colorscale: Option<String>,
}

/// What the GPU canvas is cleared to.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Background {
    /// Fully transparent, showing the page beneath.
    #[default]
    Transparent,
    /// An opaque color.
    Solid(Color),
}

impl Background {
    /// The RGBA clear color. Solid backgrounds are always opaque.
    pub fn clear_color(self) -> [f32; 4] {
        match self {
            Self::Transparent => [0.0; 4],
            Self::Solid(color) => {
                let [r, g, b, _] = color.components;
                [r, g, b, 1.0]
            }
        }
    }
}

/// Options with defaults applied and every value parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetConfig {
    /// Requested width, if one was given.
    pub width: Option<f64>,
    /// Requested height, if one was given.
    pub height: Option<f64>,
    /// GPU canvas background.
    pub background: Background,
    /// Overlay colors and metrics.
    pub style: OverlayStyle,
    /// X axis title (may be empty).
    pub x_title: String,
    /// Y axis title (may be empty).
    pub y_title: String,
    /// Initial scale mode.
    pub scale: ScaleMode,
    /// Initial palette.
    pub palette: Palette,
}

impl HeatmapOptions {
    /// Applies defaults and parses colors and enum names.
    pub fn resolve(&self) -> Result<WidgetConfig, WidgetError> {
        let background = match self.bkg_color.as_deref() {
            None | Some("") => Background::Transparent,
            Some(s) if s.trim().eq_ignore_ascii_case("transparent") => Background::Transparent,
            Some(s) => Background::Solid(css_color("bkgColor", s)?),
        };
        let defaults = OverlayStyle::default();
        let text_color = non_empty(&self.text_color)
            .map(|s| css_color("textColor", s))
            .transpose()?
            .unwrap_or(defaults.text_color);
        let annotation_color = non_empty(&self.annotation_color)
            .map(|s| css_color("annotationColor", s))
            .transpose()?
            .unwrap_or(defaults.annotation_color);
        let scale = non_empty(&self.scale)
            .map(|s| {
                s.parse().map_err(|_| WidgetError::InvalidOption {
                    name: "scale",
                    value: s.into(),
                })
            })
            .transpose()?
            .unwrap_or_default();
        let palette = non_empty(&self.colorscale)
            .map(|s| {
                s.parse().map_err(|_| WidgetError::InvalidOption {
                    name: "colorscale",
                    value: s.into(),
                })
            })
            .transpose()?
            .unwrap_or_default();

        Ok(WidgetConfig {
            width: self.width.filter(|w| *w > 0.0),
            height: self.height.filter(|h| *h > 0.0),
            background,
            style: defaults
                .with_text_color(text_color)
                .with_annotation_color(annotation_color),
            x_title: self.x_axis_title.clone().unwrap_or_default(),
            y_title: self.y_axis_title.clone().unwrap_or_default(),
            scale,
            palette,
        })
    }
}

/// Picks a canvas extent: the explicit option, else the container's size, else
/// the window's.
pub fn resolve_extent(option: Option<f64>, container: f64, window: f64) -> f64 {
    option
        .filter(|v| *v > 0.0)
        .or((container > 0.0).then_some(container))
        .unwrap_or(window)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn css_color(name: &'static str, value: &str) -> Result<Color, WidgetError> {
    parse_color(value)
        .map(|c| c.to_alpha_color::<Srgb>())
        .map_err(|_| WidgetError::InvalidOption {
            name,
            value: value.into(),
        })
}

#[cfg(test)]
mod tests {
    use peniko::color::palette::css::{BLACK, RED};

    use super::*;

    fn options(json: &str) -> HeatmapOptions {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn empty_options_take_the_defaults() {
        let config = options("{}").resolve().unwrap();
        assert_eq!(config.background, Background::Transparent);
        assert_eq!(config.background.clear_color(), [0.0; 4]);
        assert_eq!(config.style.text_color, BLACK);
        assert_eq!(config.style.annotation_color, RED);
        assert_eq!(config.scale, ScaleMode::Linear);
        assert_eq!(config.palette, Palette::Turbo);
        assert_eq!(config.width, None);
        assert!(config.x_title.is_empty());
    }

    #[test]
    fn camel_case_keys_are_recognized() {
        let config = options(
            r##"{
                "width": 800,
                "height": 0,
                "bkgColor": "#336699",
                "textColor": "white",
                "xAxisTitle": "channel",
                "yAxisTitle": "time",
                "scale": "log",
                "colorscale": "viridis",
                "somethingElse": true
            }"##,
        )
        .resolve()
        .unwrap();
        assert_eq!(config.width, Some(800.0));
        assert_eq!(config.height, None);
        let [r, g, b, a] = config.background.clear_color();
        assert!((r - 0.2).abs() < 1e-6 && (g - 0.4).abs() < 1e-6 && (b - 0.6).abs() < 1e-6);
        assert_eq!(a, 1.0);
        assert_eq!(config.style.text_color.components, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(config.x_title, "channel");
        assert_eq!(config.y_title, "time");
        assert_eq!(config.scale, ScaleMode::Logarithmic);
        assert_eq!(config.palette, Palette::Viridis);
    }

    #[test]
    fn bad_values_name_the_option() {
        let err = options(r#"{"scale": "sqrt"}"#).resolve().unwrap_err();
        assert_eq!(
            err,
            WidgetError::InvalidOption {
                name: "scale",
                value: "sqrt".into()
            }
        );
        let err = options(r#"{"annotationColor": "not a color"}"#)
            .resolve()
            .unwrap_err();
        assert!(matches!(
            err,
            WidgetError::InvalidOption {
                name: "annotationColor",
                ..
            }
        ));
    }

    #[test]
    fn transparent_is_case_insensitive() {
        let config = options(r#"{"bkgColor": "Transparent"}"#).resolve().unwrap();
        assert_eq!(config.background, Background::Transparent);
    }

    #[test]
    fn extent_precedence() {
        assert_eq!(resolve_extent(Some(300.0), 200.0, 1000.0), 300.0);
        assert_eq!(resolve_extent(None, 200.0, 1000.0), 200.0);
        assert_eq!(resolve_extent(Some(0.0), 0.0, 1000.0), 1000.0);
    }
}
