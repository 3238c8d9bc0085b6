// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas 2D painting of overlay marks.

use peniko::Brush;

#[cfg(target_arch = "wasm32")]
use {
    crate::error::WidgetError,
    kurbo::PathEl,
    vizir_heatmap_guides::{MarkPayload, OverlayMark, TextAnchor, TextBaseline, TextChannels},
    web_sys::CanvasRenderingContext2d,
};

/// CSS text for a solid brush. Other brushes paint as transparent.
pub fn css_paint(brush: &Brush) -> String {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            if rgba.a == 255 {
                format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
            } else {
                format!(
                    "rgba({}, {}, {}, {})",
                    rgba.r,
                    rgba.g,
                    rgba.b,
                    f64::from(rgba.a) / 255.0
                )
            }
        }
        _ => "transparent".to_string(),
    }
}

/// CSS font shorthand for overlay text.
pub fn css_font(font_size: f64) -> String {
    format!("{font_size}px sans-serif")
}

/// One stacked 2D canvas.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Debug)]
pub(crate) struct Surface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

#[cfg(target_arch = "wasm32")]
impl Surface {
    pub(crate) fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }

    pub(crate) fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// Clears the surface and paints `marks` in iteration order.
    pub(crate) fn repaint<'a>(
        &self,
        marks: impl IntoIterator<Item = &'a OverlayMark>,
    ) -> Result<(), WidgetError> {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        for mark in marks {
            self.paint(mark)?;
        }
        Ok(())
    }

    fn paint(&self, mark: &OverlayMark) -> Result<(), WidgetError> {
        let ctx = &self.ctx;
        match &mark.payload {
            MarkPayload::Rect(r) => {
                ctx.set_fill_style_str(&css_paint(&r.fill));
                ctx.fill_rect(r.rect.x0, r.rect.y0, r.rect.width(), r.rect.height());
            }
            MarkPayload::Path(p) => {
                ctx.begin_path();
                for el in p.path.elements() {
                    match *el {
                        PathEl::MoveTo(a) => ctx.move_to(a.x, a.y),
                        PathEl::LineTo(a) => ctx.line_to(a.x, a.y),
                        PathEl::QuadTo(a, b) => ctx.quadratic_curve_to(a.x, a.y, b.x, b.y),
                        PathEl::CurveTo(a, b, c) => {
                            ctx.bezier_curve_to(a.x, a.y, b.x, b.y, c.x, c.y);
                        }
                        PathEl::ClosePath => ctx.close_path(),
                    }
                }
                if let Some(fill) = &p.fill {
                    ctx.set_fill_style_str(&css_paint(fill));
                    ctx.fill();
                }
                if p.stroke_width > 0.0 {
                    ctx.set_stroke_style_str(&css_paint(&p.stroke));
                    ctx.set_line_width(p.stroke_width);
                    ctx.stroke();
                }
            }
            MarkPayload::Text(t) => self.text(t)?,
        }
        Ok(())
    }

    fn text(&self, t: &TextChannels) -> Result<(), WidgetError> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(t.pos.x, t.pos.y)?;
        if t.angle != 0.0 {
            ctx.rotate(t.angle.to_radians())?;
        }
        ctx.set_font(&css_font(t.font_size));
        ctx.set_text_align(match t.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "center",
            TextAnchor::End => "end",
        });
        ctx.set_text_baseline(match t.baseline {
            TextBaseline::Middle => "middle",
            TextBaseline::Alphabetic => "alphabetic",
        });
        ctx.set_fill_style_str(&css_paint(&t.fill));
        let drawn = ctx.fill_text(&t.text, 0.0, 0.0);
        ctx.restore();
        Ok(drawn?)
    }
}

#[cfg(test)]
mod tests {
    use peniko::Color;
    use peniko::color::palette::css::RED;

    use super::*;

    #[test]
    fn opaque_colors_are_hex() {
        assert_eq!(css_paint(&Brush::Solid(RED)), "#ff0000");
    }

    #[test]
    fn translucent_colors_are_rgba() {
        let brush = Brush::Solid(Color::from_rgba8(0, 128, 255, 51));
        assert_eq!(css_paint(&brush), "rgba(0, 128, 255, 0.2)");
    }

    #[test]
    fn font_shorthand() {
        assert_eq!(css_font(16.0), "16px sans-serif");
    }
}
