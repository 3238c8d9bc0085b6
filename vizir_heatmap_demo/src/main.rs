// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders a scripted heatmap session to SVG frames.
//!
//! The session hovers, drags a zoom box, places polygon vertices, switches the color
//! scale and palette, and finally double-clicks back to the full view. Each step is
//! written as `NN-name.svg` under `--out-dir`, next to an `index.html` that shows
//! them in order.

mod driver;
mod svg;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use kurbo::{Point, Size};
use peniko::color::palette::css::WHITE;
use vizir_heatmap::{
    Bin, Dataset, DenseGrid, Heatmap, Palette, PointerEvent, ScaleMode, SparseGrid,
};
use vizir_heatmap_guides::{HeatmapGuides, HeatmapLayout, HeuristicTextMeasurer, OverlayStyle};

use crate::driver::Driver;
use crate::svg::{SvgScene, escape_xml};

#[derive(Debug, Parser)]
#[command(version, about = "Render a scripted heatmap session to SVG frames")]
struct Cli {
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 640.0)]
    width: f64,
    /// Canvas height in pixels.
    #[arg(long, default_value_t = 480.0)]
    height: f64,
    /// Initial color scale (`linear` or `log`).
    #[arg(long, default_value_t = ScaleMode::Linear)]
    scale: ScaleMode,
    /// Initial palette (`viridis` or `turbo`).
    #[arg(long, default_value_t = Palette::Turbo)]
    palette: Palette,
    /// Bins per axis.
    #[arg(long, default_value_t = 32)]
    bins: usize,
    /// Use a sparse dataset with some non-positive values.
    #[arg(long)]
    sparse: bool,
    /// Directory the frames are written to.
    #[arg(long, default_value = "heatmap_frames")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if cli.bins < 4 {
        bail!("--bins must be at least 4, got {}", cli.bins);
    }

    let canvas = Size::new(cli.width, cli.height);
    let style = OverlayStyle::default();
    let layout = HeatmapLayout::compute(canvas, &HeuristicTextMeasurer, &style)?;
    let mut heatmap = Heatmap::new(canvas, layout.plot(), cli.scale, cli.palette)?;
    let dataset = if cli.sparse {
        sparse_dataset(cli.bins)
    } else {
        dense_dataset(cli.bins)
    };
    heatmap.set_data(dataset)?;
    let guides = HeatmapGuides::new(layout, style).with_titles("x bin", "y bin");

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    let mut session = Session {
        driver: Driver::new(heatmap),
        guides,
        out_dir: cli.out_dir,
        written: Vec::new(),
    };

    let n = i64::try_from(cli.bins)?;
    session.snapshot("initial")?;

    let centre = session.at(n / 2, n / 2)?;
    session.driver.pointer(PointerEvent::Move(centre));
    session.snapshot("hover")?;

    let (from, to) = (session.at(n / 4, n / 4)?, session.at(3 * n / 4, 3 * n / 4)?);
    session.driver.begin_drag(from, to);
    session.snapshot("dragging")?;
    session.driver.end_drag(to);
    session.snapshot("zoomed")?;

    let (lo, hi) = (n / 4 + 1, 3 * n / 4 - 1);
    for (x, y) in [(lo, lo), (hi, lo), (hi, hi), (lo, hi)] {
        let p = session.at(x, y)?;
        session.driver.click(p);
    }
    session.snapshot("polygon")?;

    let other_scale = match session.driver.heatmap().scale_mode() {
        ScaleMode::Linear => ScaleMode::Logarithmic,
        ScaleMode::Logarithmic => ScaleMode::Linear,
    };
    session.driver.heatmap_mut().set_scale_mode(other_scale);
    session.snapshot("rescaled")?;

    let other_palette = match session.driver.heatmap().palette() {
        Palette::Viridis => Palette::Turbo,
        Palette::Turbo => Palette::Viridis,
    };
    session.driver.heatmap_mut().set_palette(other_palette);
    session.snapshot("palette")?;

    let p = session.at(n / 2, n / 2)?;
    session.driver.double_click(p);
    session.driver.pointer(PointerEvent::Out(p));
    session.snapshot("reset")?;

    session.write_index()
}

struct Session {
    driver: Driver,
    guides: HeatmapGuides,
    out_dir: PathBuf,
    written: Vec<String>,
}

impl Session {
    /// Pixel centre of a bin in the current view.
    fn at(&self, x: i64, y: i64) -> Result<Point> {
        let grid = self.driver.heatmap().grid().context("no data loaded")?;
        Ok(grid.bin_to_pixel(Bin::new(x, y)))
    }

    fn snapshot(&mut self, name: &str) -> Result<()> {
        let heatmap = self.driver.heatmap_mut();
        let frame = heatmap.render().context("no data loaded")?;
        if frame.fell_back {
            log::warn!("log scale rejected for the visible values; drew linear instead");
        }

        let mut scene = SvgScene::new(heatmap.canvas_size());
        scene.set_background(WHITE);
        scene.add_cells(&frame);
        scene.add_marks(self.guides.all(heatmap, &frame));

        let file = format!("{:02}-{name}.svg", self.written.len() + 1);
        let path = self.out_dir.join(&file);
        write(&path, &scene.to_svg_string())?;
        log::info!("wrote {} ({} cells)", path.display(), scene.cell_count());
        self.written.push(file);
        Ok(())
    }

    fn write_index(&self) -> Result<()> {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>heatmap session</title></head><body>\n",
        );
        for file in &self.written {
            let file = escape_xml(file);
            html.push_str(&format!(
                "<figure><img src=\"{file}\"><figcaption>{file}</figcaption></figure>\n"
            ));
        }
        html.push_str("</body></html>\n");
        write(&self.out_dir.join("index.html"), &html)
    }
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

/// Two Gaussian bumps over a gentle ramp; strictly positive so log scale applies.
fn dense_dataset(bins: usize) -> Dataset {
    let n = bins as f64;
    let bump = |x: f64, y: f64, cx: f64, cy: f64, s: f64| {
        (-((x - cx).powi(2) + (y - cy).powi(2)) / (2.0 * s * s)).exp()
    };
    let rows = (0..bins)
        .map(|y| {
            (0..bins)
                .map(|x| {
                    let (x, y) = (x as f64, y as f64);
                    1.0 + x / n
                        + 100.0 * bump(x, y, 0.3 * n, 0.6 * n, 0.12 * n)
                        + 40.0 * bump(x, y, 0.7 * n, 0.3 * n, 0.08 * n)
                })
                .collect()
        })
        .collect();
    Dataset::Dense(DenseGrid::from_values(rows))
}

/// Every third bin of a wave, with a missing value on each diagonal bin.
fn sparse_dataset(bins: usize) -> Dataset {
    let (mut xs, mut ys, mut zs) = (Vec::new(), Vec::new(), Vec::new());
    for y in 0..bins {
        for x in (y % 3..bins).step_by(3) {
            let value = (x as f64 * 0.4).sin() * 10.0 + y as f64 * 0.5;
            xs.push(x as i64);
            ys.push(y as i64);
            zs.push((x != y).then_some(value));
        }
    }
    Dataset::Sparse(SparseGrid::new(bins, bins, xs, ys, zs))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_modes_by_name() {
        let cli = Cli::try_parse_from(["demo", "--scale", "log", "--palette", "viridis"]).unwrap();
        assert_eq!(cli.scale, ScaleMode::Logarithmic);
        assert_eq!(cli.palette, Palette::Viridis);
        assert!(Cli::try_parse_from(["demo", "--scale", "sqrt"]).is_err());
    }

    #[test]
    fn sparse_dataset_has_values_below_zero() {
        let Dataset::Sparse(grid) = sparse_dataset(12) else {
            panic!("expected a sparse dataset");
        };
        assert!(grid.entries().any(|(_, z)| z.is_some_and(|z| z <= 0.0)));
        assert!(grid.entries().any(|(_, z)| z.is_none()));
    }
}
