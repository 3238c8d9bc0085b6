// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance attribute buffers for the instanced cell draw.
//!
//! Each visible bin with a usable value becomes one instance of a unit quad: a
//! pixel-space centre offset (2 floats) and an RGBA color (4 floats).

extern crate alloc;

use alloc::vec::Vec;

use crate::color_scale::ColorScaleLimits;
use crate::dataset::Dataset;
use crate::grid::GridTransform;
use crate::palette::ColorTable;

/// Floats per instance in [`InstanceBuffers::offsets`].
pub const OFFSET_COMPONENTS: usize = 2;
/// Floats per instance in [`InstanceBuffers::colors`].
pub const COLOR_COMPONENTS: usize = 4;

/// Interleaving-free instance data, ready for upload.
///
/// Both buffers are exact-length: `offsets.len() == 2 * len()` and
/// `colors.len() == 4 * len()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceBuffers {
    /// Cell centres in canvas pixels, `[x0, y0, x1, y1, ...]`.
    pub offsets: Vec<f32>,
    /// Cell colors, `[r0, g0, b0, a0, ...]` with alpha always 1.
    pub colors: Vec<f32>,
}

impl InstanceBuffers {
    /// Number of instances.
    pub fn len(&self) -> usize {
        self.offsets.len() / OFFSET_COMPONENTS
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Iterates `(centre, rgba)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = ([f32; 2], [f32; 4])> + '_ {
        self.offsets
            .chunks_exact(OFFSET_COMPONENTS)
            .zip(self.colors.chunks_exact(COLOR_COMPONENTS))
            .map(|(o, c)| ([o[0], o[1]], [c[0], c[1], c[2], c[3]]))
    }
}

/// Builds instance buffers for every visible bin of `dataset`.
///
/// The window is taken from `grid`. Values are transformed with `limits.mode`,
/// normalized to `limits` and looked up in `table`. Missing values and values that
/// are non-finite after the transform produce no instance.
pub fn build_instances(
    dataset: &Dataset,
    grid: &GridTransform,
    limits: &ColorScaleLimits,
    table: &ColorTable,
) -> InstanceBuffers {
    let window = grid.window();
    // Upper bound for dense data; sparse data is usually far smaller than its window.
    let capacity = match dataset {
        Dataset::Dense(_) => usize::try_from(window.bin_count()).unwrap_or(0),
        Dataset::Sparse(s) => s.len(),
    };
    let mut out = InstanceBuffers {
        offsets: Vec::with_capacity(capacity * OFFSET_COMPONENTS),
        colors: Vec::with_capacity(capacity * COLOR_COMPONENTS),
    };

    dataset.for_each_visible(window, |bin, value| {
        let v = limits.mode.transform(value);
        if !v.is_finite() {
            return;
        }
        let Some(index) = table.index_for(limits.normalize(v)) else {
            return;
        };
        let [r, g, b] = table.entry(index);
        let centre = grid.bin_to_pixel(bin);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "pixel coordinates fit comfortably in f32"
        )]
        let offset = [centre.x as f32, centre.y as f32];
        out.offsets.extend_from_slice(&offset);
        out.colors.extend_from_slice(&[r, g, b, 1.0]);
    });

    out.offsets.shrink_to_fit();
    out.colors.shrink_to_fit();
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use kurbo::Rect;

    use super::*;
    use crate::color_scale::{ScaleMode, scan_limits};
    use crate::dataset::{DenseGrid, SparseGrid};
    use crate::grid::Bin;
    use crate::palette::Palette;
    use crate::window::BinRect;

    fn plot() -> Rect {
        Rect::new(50.0, 20.0, 450.0, 420.0)
    }

    fn build(d: &Dataset, window: BinRect, mode: ScaleMode) -> (InstanceBuffers, ColorTable) {
        let grid = GridTransform::new(plot(), window).unwrap();
        let limits = scan_limits(d, window, mode).unwrap();
        let table = ColorTable::with_default_size(Palette::Viridis);
        (build_instances(d, &grid, &limits, &table), table)
    }

    fn scenario_grid() -> Dataset {
        Dataset::Dense(DenseGrid::from_values(vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![5.0, 6.0, 7.0, 8.0],
            vec![9.0, 10.0, 11.0, 12.0],
            vec![13.0, 14.0, 15.0, 16.0],
        ]))
    }

    #[test]
    fn dense_grid_emits_one_instance_per_bin() {
        let d = scenario_grid();
        let (buffers, table) = build(&d, d.extent().unwrap(), ScaleMode::Linear);
        assert_eq!(buffers.len(), 16);
        assert_eq!(buffers.offsets.len(), 32);
        assert_eq!(buffers.colors.len(), 64);

        // Row 0, column 0 holds the minimum and is drawn bottom-left.
        let (centre, rgba) = buffers.iter().next().unwrap();
        assert_eq!(centre, [100.0, 370.0]);
        let [r, g, b] = table.entry(0);
        assert_eq!(rgba, [r, g, b, 1.0]);
    }

    #[test]
    fn maximum_maps_to_last_table_entry() {
        let d = scenario_grid();
        let (buffers, table) = build(&d, d.extent().unwrap(), ScaleMode::Logarithmic);
        let (_, rgba) = buffers.iter().last().unwrap();
        let [r, g, b] = table.entry(table.len() - 1);
        assert_eq!(rgba, [r, g, b, 1.0]);
    }

    #[test]
    fn window_crop_limits_instances() {
        let d = scenario_grid();
        let window = BinRect::from_corners(Bin::new(1, 1), Bin::new(3, 3));
        let (buffers, _) = build(&d, window, ScaleMode::Linear);
        assert_eq!(buffers.len(), 9);
        assert!(buffers.len() as u64 <= window.bin_count());
    }

    #[test]
    fn missing_and_non_finite_values_are_absent() {
        let d = Dataset::Dense(DenseGrid::new(vec![vec![
            Some(1.0),
            None,
            Some(f64::NAN),
            Some(4.0),
        ]]));
        let (buffers, _) = build(&d, d.extent().unwrap(), ScaleMode::Linear);
        assert_eq!(buffers.len(), 2);
        assert_eq!(buffers.colors.len(), 8);
    }

    #[test]
    fn sparse_data_outside_window_is_filtered() {
        let d = Dataset::Sparse(SparseGrid::new(
            8,
            8,
            vec![0, 3, 7, 5],
            vec![0, 3, 7, 1],
            vec![Some(1.0), Some(2.0), None, Some(9.0)],
        ));
        let window = BinRect::from_corners(Bin::new(2, 0), Bin::new(7, 7));
        let (buffers, _) = build(&d, window, ScaleMode::Linear);
        assert_eq!(buffers.len(), 2);
    }

    #[test]
    fn degenerate_values_share_one_table_index() {
        let d = Dataset::Dense(DenseGrid::from_values(vec![vec![7.5; 5]; 3]));
        let window = d.extent().unwrap();
        let (buffers, table) = build(&d, window, ScaleMode::Linear);
        assert_eq!(buffers.len(), 15);
        let [r, g, b] = table.entry(0);
        for (_, rgba) in buffers.iter() {
            assert_eq!(rgba, [r, g, b, 1.0]);
        }
    }
}
