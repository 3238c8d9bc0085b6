// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a heatmap frame: cells first, then overlay marks.

use std::fmt::Write as _;

use kurbo::{Rect, Size};
use peniko::{Brush, Color};
use vizir_heatmap::Frame;
use vizir_heatmap_guides::{MarkPayload, OverlayMark, TextAnchor, TextBaseline};

#[derive(Debug)]
pub(crate) struct SvgScene {
    size: Size,
    background: Option<Color>,
    cells: Vec<(Rect, Color)>,
    marks: Vec<OverlayMark>,
}

impl SvgScene {
    pub(crate) fn new(size: Size) -> Self {
        Self {
            size,
            background: None,
            cells: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub(crate) fn set_background(&mut self, color: Color) {
        self.background = Some(color);
    }

    /// Adds one rectangle per instance, as the GPU pass would draw them.
    pub(crate) fn add_cells(&mut self, frame: &Frame) {
        let [w, h] = frame.uniforms.cell_size;
        let cell = Size::new(f64::from(w), f64::from(h));
        self.cells.extend(frame.instances.iter().map(|([x, y], rgba)| {
            (
                Rect::from_center_size((f64::from(x), f64::from(y)), cell),
                Color::new(rgba),
            )
        }));
    }

    /// Adds overlay marks, which must already be in paint order.
    pub(crate) fn add_marks(&mut self, marks: impl IntoIterator<Item = OverlayMark>) {
        self.marks.extend(marks);
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let mut out = String::new();
        let (w, h) = (self.size.width, self.size.height);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="sans-serif">"#
        );
        if let Some(bg) = self.background {
            let _ = write!(out, r#"<rect width="{w}" height="{h}""#);
            write_paint_attr(&mut out, "fill", &Brush::Solid(bg));
            out.push_str("/>\n");
        }

        out.push_str("<g shape-rendering=\"crispEdges\">\n");
        for (rect, color) in &self.cells {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                rect.x0,
                rect.y0,
                rect.width(),
                rect.height()
            );
            write_paint_attr(&mut out, "fill", &Brush::Solid(*color));
            out.push_str("/>\n");
        }
        out.push_str("</g>\n");

        for mark in &self.marks {
            match &mark.payload {
                MarkPayload::Rect(r) => {
                    let _ = write!(
                        out,
                        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                        r.rect.x0,
                        r.rect.y0,
                        r.rect.width(),
                        r.rect.height(),
                    );
                    write_paint_attr(&mut out, "fill", &r.fill);
                    out.push_str("/>\n");
                }
                MarkPayload::Text(t) => {
                    let baseline = match t.baseline {
                        TextBaseline::Middle => "middle",
                        TextBaseline::Alphabetic => "alphabetic",
                    };
                    let _ = write!(
                        out,
                        r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
                        t.pos.x, t.pos.y, t.font_size, baseline
                    );
                    if t.angle != 0.0 {
                        let _ = write!(
                            out,
                            r#" transform="rotate({} {} {})""#,
                            t.angle, t.pos.x, t.pos.y
                        );
                    }
                    out.push_str(match t.anchor {
                        TextAnchor::Start => r#" text-anchor="start""#,
                        TextAnchor::Middle => r#" text-anchor="middle""#,
                        TextAnchor::End => r#" text-anchor="end""#,
                    });
                    write_paint_attr(&mut out, "fill", &t.fill);
                    out.push('>');
                    out.push_str(&escape_xml(&t.text));
                    out.push_str("</text>\n");
                }
                MarkPayload::Path(p) => {
                    let _ = write!(out, r#"<path d="{}""#, p.path.to_svg());
                    match &p.fill {
                        Some(fill) => write_paint_attr(&mut out, "fill", fill),
                        None => out.push_str(r#" fill="none""#),
                    }
                    if p.stroke_width > 0.0 {
                        write_paint_attr(&mut out, "stroke", &p.stroke);
                        let _ = write!(out, r#" stroke-width="{}""#, p.stroke_width);
                    }
                    out.push_str("/>\n");
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = (rgba.a != 255).then(|| f64::from(rgba.a) / 255.0);
            (fill, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{o}""#);
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use peniko::color::palette::css::RED;
    use vizir_heatmap::{Dataset, DenseGrid, Heatmap, Palette, ScaleMode};
    use vizir_heatmap_guides::{Layer, TextChannels};

    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn cells_are_centred_on_their_offsets() {
        let mut heatmap = Heatmap::new(
            Size::new(200.0, 200.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            ScaleMode::Linear,
            Palette::Viridis,
        )
        .unwrap();
        heatmap
            .set_data(Dataset::Dense(DenseGrid::from_values(vec![
                vec![1.0, 2.0],
                vec![3.0, 4.0],
            ])))
            .unwrap();
        let frame = heatmap.render().unwrap();

        let mut scene = SvgScene::new(heatmap.canvas_size());
        scene.add_cells(&frame);
        assert_eq!(scene.cell_count(), 4);
        let svg = scene.to_svg_string();
        // Row 0 sits at the bottom of the plot.
        assert!(svg.contains(r#"<rect x="0" y="50" width="50" height="50""#), "{svg}");
    }

    #[test]
    fn rotated_text_and_translucent_paint() {
        let mut scene = SvgScene::new(Size::new(100.0, 100.0));
        scene.add_marks([OverlayMark::text(
            Layer::Markup,
            0,
            TextChannels {
                pos: Point::new(10.0, 50.0),
                text: "y <bin>".into(),
                font_size: 20.0,
                angle: -90.0,
                anchor: TextAnchor::Middle,
                baseline: TextBaseline::Alphabetic,
                fill: Brush::Solid(RED.with_alpha(0.5)),
            },
        )]);
        let svg = scene.to_svg_string();
        assert!(svg.contains(r#"transform="rotate(-90 10 50)""#));
        assert!(svg.contains("y &lt;bin&gt;"));
        assert!(svg.contains(r##"fill="#ff0000" fill-opacity="##));
    }
}
