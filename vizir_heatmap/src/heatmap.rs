// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The platform-independent heatmap model.
//!
//! [`Heatmap`] owns the dataset, view window, color-scale state, polygon and gesture
//! recognizer. Hosts feed it pointer events and timer expiries, apply the returned
//! [`Effect`]s (timers, overlays, status text), and call [`Heatmap::render`] to get
//! the buffers and uniforms for one frame.

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::Error;
use crate::color_scale::{ColorScaleLimits, ScaleMode, resolve_limits};
use crate::dataset::Dataset;
use crate::gesture::{GestureCommand, GestureMachine, GestureState, PointerEvent, TimerKind};
use crate::grid::{Bin, GridTransform, checked_plot_size};
use crate::instances::{InstanceBuffers, build_instances};
use crate::palette::{ColorTable, Palette};
use crate::polygon::Polygon;
use crate::status::CursorReport;
use crate::window::{BinRect, ViewWindow};

/// Per-frame shader uniforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniforms {
    /// Size of one cell in pixels.
    pub cell_size: [f32; 2],
    /// Canvas size in pixels.
    pub resolution: [f32; 2],
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Per-instance attributes.
    pub instances: InstanceBuffers,
    /// Per-frame uniforms.
    pub uniforms: Uniforms,
    /// The color-scale range the instances were colored with.
    pub limits: ColorScaleLimits,
    /// Whether log scale was requested but rejected for this frame.
    pub fell_back: bool,
    /// Pixel geometry of the visible window (for axes and overlays).
    pub grid: GridTransform,
}

/// Something the host must do in response to an input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Start (or restart) a debounce timer.
    Schedule(TimerKind),
    /// Cancel a debounce timer.
    Cancel(TimerKind),
    /// Show or hide the drag-selection rectangle.
    Selection(Option<Rect>),
    /// Show or hide the crosshair.
    Crosshair(Option<Point>),
    /// Update the hover readout.
    Cursor(CursorReport),
    /// The view window changed; re-render.
    ViewChanged,
    /// The polygon changed; redraw it and notify listeners.
    PolygonChanged,
}

/// Effects produced by one input.
pub type Effects = SmallVec<[Effect; 4]>;

#[derive(Clone, Debug)]
struct Loaded {
    dataset: Dataset,
    view: ViewWindow,
}

/// The heatmap model.
#[derive(Clone, Debug)]
pub struct Heatmap {
    canvas: Size,
    plot: Rect,
    mode: ScaleMode,
    table: ColorTable,
    data: Option<Loaded>,
    polygon: Polygon,
    gesture: GestureMachine,
    selection: Option<Rect>,
    crosshair: Option<Point>,
}

impl Heatmap {
    /// Creates an empty model for a canvas of `canvas` pixels whose cells are drawn
    /// in `plot`.
    pub fn new(canvas: Size, plot: Rect, mode: ScaleMode, palette: Palette) -> Result<Self, Error> {
        checked_plot_size(plot)?;
        Ok(Self {
            canvas,
            plot,
            mode,
            table: ColorTable::with_default_size(palette),
            data: None,
            polygon: Polygon::new(),
            gesture: GestureMachine::new(),
            selection: None,
            crosshair: None,
        })
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    /// Plot rectangle in canvas pixels.
    pub fn plot_rect(&self) -> Rect {
        self.plot
    }

    /// The active scale mode.
    ///
    /// After a render that fell back from log, this is [`ScaleMode::Linear`].
    pub fn scale_mode(&self) -> ScaleMode {
        self.mode
    }

    /// The active palette.
    pub fn palette(&self) -> Palette {
        self.table.palette()
    }

    /// The active color lookup table.
    pub fn color_table(&self) -> &ColorTable {
        &self.table
    }

    /// The loaded dataset, if any.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.data.as_ref().map(|d| &d.dataset)
    }

    /// The visible bins, if data is loaded.
    pub fn window(&self) -> Option<BinRect> {
        self.data.as_ref().map(|d| d.view.current())
    }

    /// The full extent of the loaded data.
    pub fn full_extent(&self) -> Option<BinRect> {
        self.data.as_ref().map(|d| d.view.full())
    }

    /// Pixel geometry of the visible window, if data is loaded.
    pub fn grid(&self) -> Option<GridTransform> {
        let window = self.window()?;
        GridTransform::new(self.plot, window).ok()
    }

    /// The polygon annotation.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Mutable access to the polygon, for control-panel edits.
    ///
    /// Edits made here do not produce effects; the caller redraws and notifies.
    pub fn polygon_mut(&mut self) -> &mut Polygon {
        &mut self.polygon
    }

    /// The gesture recognizer state.
    pub fn gesture_state(&self) -> &GestureState {
        self.gesture.state()
    }

    /// The live drag-selection rectangle.
    pub fn selection(&self) -> Option<Rect> {
        self.selection
    }

    /// The crosshair position.
    pub fn crosshair(&self) -> Option<Point> {
        self.crosshair
    }

    /// Replaces the dataset and resets the view to its full extent.
    ///
    /// Any gesture in progress is abandoned; the returned effects cancel its timers.
    pub fn set_data(&mut self, dataset: Dataset) -> Result<Effects, Error> {
        let full = dataset.extent().ok_or(Error::EmptyDataset)?;
        log::debug!(
            "loaded {} x {} heatmap",
            full.x_count(),
            full.y_count()
        );
        self.data = Some(Loaded {
            dataset,
            view: ViewWindow::new(full),
        });
        self.selection = None;
        self.crosshair = None;
        let mut out = Effects::new();
        for command in self.gesture.reset() {
            self.apply(command, &mut out);
        }
        Ok(out)
    }

    /// Requests a scale mode for subsequent renders.
    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.mode = mode;
    }

    /// Switches palette, rebuilding the lookup table if it changed.
    pub fn set_palette(&mut self, palette: Palette) {
        if palette != self.table.palette() {
            self.table = ColorTable::with_default_size(palette);
        }
    }

    /// Builds the frame for the current dataset, window, scale mode and palette.
    ///
    /// Returns `None` if no data is loaded. If log scale is rejected for the
    /// visible values, the model switches to linear and reports `fell_back`.
    pub fn render(&mut self) -> Option<Frame> {
        let grid = self.grid()?;
        let data = self.data.as_ref()?;
        let resolved = resolve_limits(&data.dataset, grid.window(), self.mode);
        if resolved.fell_back {
            self.mode = resolved.limits.mode;
        }
        let instances = build_instances(&data.dataset, &grid, &resolved.limits, &self.table);
        let cell = grid.cell_size();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "pixel sizes fit comfortably in f32"
        )]
        let uniforms = Uniforms {
            cell_size: [cell.x as f32, cell.y as f32],
            resolution: [self.canvas.width as f32, self.canvas.height as f32],
        };
        Some(Frame {
            instances,
            uniforms,
            limits: resolved.limits,
            fell_back: resolved.fell_back,
            grid,
        })
    }

    /// The hover readout for a pixel.
    pub fn hover(&self, p: Point) -> CursorReport {
        let (Some(grid), Some(data)) = (self.grid(), self.data.as_ref()) else {
            return CursorReport::Outside;
        };
        let p = floor_point(p);
        let bin = grid.pixel_to_bin(p);
        if !grid.contains_pixel(p) || !grid.window().contains_bin(bin) {
            return CursorReport::Outside;
        }
        let value = data
            .dataset
            .value(bin)
            .map(|v| self.mode.transform(v))
            .filter(|v| !v.is_nan());
        CursorReport::Bin { bin, value }
    }

    /// Feeds a pointer event. Ignored until data is loaded.
    pub fn pointer(&mut self, event: PointerEvent) -> Effects {
        let mut out = Effects::new();
        if self.data.is_none() {
            return out;
        }
        let event = match event {
            PointerEvent::Move(p) => PointerEvent::Move(floor_point(p)),
            PointerEvent::Down(p) => PointerEvent::Down(floor_point(p)),
            PointerEvent::Up(p) => PointerEvent::Up(floor_point(p)),
            PointerEvent::Out(p) => PointerEvent::Out(floor_point(p)),
            PointerEvent::Click(p) => PointerEvent::Click(floor_point(p)),
            PointerEvent::DoubleClick(p) => PointerEvent::DoubleClick(floor_point(p)),
        };

        match event {
            PointerEvent::Move(p) => {
                let crosshair = (!self.gesture.is_dragging()
                    && self.grid().is_some_and(|g| g.contains_pixel(p)))
                .then_some(p);
                self.set_crosshair(crosshair, &mut out);
                out.push(Effect::Cursor(self.hover(p)));
            }
            PointerEvent::Out(_) => {
                self.set_crosshair(None, &mut out);
                out.push(Effect::Cursor(CursorReport::Outside));
            }
            _ => {}
        }

        let commands = self.gesture.pointer(event);
        for command in commands {
            self.apply(command, &mut out);
        }
        out
    }

    /// Reports that a debounce timer fired. Ignored until data is loaded.
    pub fn on_timer(&mut self, kind: TimerKind) -> Effects {
        let mut out = Effects::new();
        let Some(grid) = self.grid() else {
            return out;
        };
        let commands = self.gesture.timer_fired(kind, &grid);
        for command in commands {
            self.apply(command, &mut out);
        }
        out
    }

    /// Returns to the full extent, clearing the polygon and every overlay.
    pub fn zoom_out(&mut self) -> Effects {
        let mut out = Effects::new();
        for command in self.gesture.reset() {
            self.apply(command, &mut out);
        }
        self.apply(GestureCommand::ResetView, &mut out);
        out
    }

    fn set_crosshair(&mut self, crosshair: Option<Point>, out: &mut Effects) {
        if self.crosshair != crosshair {
            self.crosshair = crosshair;
            out.push(Effect::Crosshair(crosshair));
        }
    }

    fn apply(&mut self, command: GestureCommand, out: &mut Effects) {
        match command {
            GestureCommand::Schedule(kind) => out.push(Effect::Schedule(kind)),
            GestureCommand::Cancel(kind) => out.push(Effect::Cancel(kind)),
            GestureCommand::ShowSelection { from, to } => {
                let rect = Rect::from_points(from, to);
                self.selection = Some(rect);
                self.set_crosshair(None, out);
                out.push(Effect::Selection(Some(rect)));
            }
            GestureCommand::ClearSelection => {
                self.selection = None;
                out.push(Effect::Selection(None));
            }
            GestureCommand::Zoom { a, b } => {
                let Some(data) = self.data.as_mut() else {
                    return;
                };
                if data.view.zoom_to(a, b) {
                    log::debug!("zoomed to {:?}", data.view.current());
                    self.view_changed(out);
                } else {
                    log::debug!("ignoring zoom to ({a}) - ({b}) outside the data");
                }
            }
            GestureCommand::ResetView => {
                let Some(data) = self.data.as_mut() else {
                    return;
                };
                data.view.reset();
                self.view_changed(out);
            }
            GestureCommand::AddVertex(bin) => self.add_vertex(bin, out),
        }
    }

    fn view_changed(&mut self, out: &mut Effects) {
        self.selection = None;
        self.set_crosshair(None, out);
        out.push(Effect::ViewChanged);
        if self.polygon.clear() {
            out.push(Effect::PolygonChanged);
        }
    }

    fn add_vertex(&mut self, bin: Bin, out: &mut Effects) {
        if self.window().is_some_and(|w| w.contains_bin(bin)) {
            self.polygon.push(bin);
            out.push(Effect::PolygonChanged);
        } else {
            log::debug!("ignoring click outside the plot at bin ({bin})");
        }
    }
}

fn floor_point(p: Point) -> Point {
    Point::new(p.x.floor(), p.y.floor())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use std::vec::Vec;

    use super::*;
    use crate::dataset::{DenseGrid, SparseGrid};

    const CANVAS: Size = Size::new(500.0, 450.0);

    fn plot() -> Rect {
        Rect::new(60.0, 18.0, 460.0, 418.0)
    }

    fn scenario_grid() -> Dataset {
        Dataset::Dense(DenseGrid::from_values(vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![5.0, 6.0, 7.0, 8.0],
            vec![9.0, 10.0, 11.0, 12.0],
            vec![13.0, 14.0, 15.0, 16.0],
        ]))
    }

    fn loaded(mode: ScaleMode) -> Heatmap {
        let mut h = Heatmap::new(CANVAS, plot(), mode, Palette::Turbo).unwrap();
        h.set_data(scenario_grid()).unwrap();
        h
    }

    enum Step {
        Input(PointerEvent),
        /// Hold still long enough for a pending press timer to fire.
        Hold,
    }

    fn absorb(effects: Effects, pending: &mut Vec<TimerKind>, seen: &mut Vec<Effect>) {
        for e in effects {
            match e {
                Effect::Schedule(k) => {
                    pending.retain(|p| *p != k);
                    pending.push(k);
                }
                Effect::Cancel(k) => pending.retain(|p| *p != k),
                other => seen.push(other),
            }
        }
    }

    /// Drives input and fires timers as a browser host would, returning every
    /// non-timer effect. Timers still pending at the end all fire.
    fn drive(h: &mut Heatmap, steps: &[Step]) -> Vec<Effect> {
        let mut pending = Vec::new();
        let mut seen = Vec::new();
        for step in steps {
            match step {
                Step::Input(event) => absorb(h.pointer(*event), &mut pending, &mut seen),
                Step::Hold => {
                    if pending.contains(&TimerKind::Press) {
                        pending.retain(|p| *p != TimerKind::Press);
                        absorb(h.on_timer(TimerKind::Press), &mut pending, &mut seen);
                    }
                }
            }
        }
        while let Some(kind) = pending.pop() {
            absorb(h.on_timer(kind), &mut pending, &mut seen);
        }
        seen
    }

    #[test]
    fn scenario_dense_linear() {
        let mut h = loaded(ScaleMode::Linear);
        let frame = h.render().unwrap();
        assert_eq!((frame.limits.zmin, frame.limits.zmax), (1.0, 16.0));
        assert_eq!(frame.instances.len(), 16);
        assert!(!frame.fell_back);
        let (_, first) = frame.instances.iter().next().unwrap();
        let [r, g, b] = h.color_table().entry(0);
        assert_eq!(first, [r, g, b, 1.0]);
        assert_eq!(frame.uniforms.cell_size, [100.0, 100.0]);
        assert_eq!(frame.uniforms.resolution, [500.0, 450.0]);
    }

    #[test]
    fn scenario_dense_log() {
        let mut h = loaded(ScaleMode::Linear);
        h.set_scale_mode(ScaleMode::Logarithmic);
        let frame = h.render().unwrap();
        assert_eq!(frame.limits.zmin, 0.0);
        assert!((frame.limits.zmax - 2.772_588_722_239_781).abs() < 1e-12);
        assert_eq!(h.color_table().index_for(frame.limits.normalize(0.0)), Some(0));
        assert_eq!(h.scale_mode(), ScaleMode::Logarithmic);
    }

    #[test]
    fn scenario_sparse_log_falls_back() {
        let mut h = Heatmap::new(CANVAS, plot(), ScaleMode::Logarithmic, Palette::Viridis).unwrap();
        h.set_data(Dataset::Sparse(SparseGrid::new(
            2,
            2,
            vec![0, 1],
            vec![0, 1],
            vec![Some(5.0), Some(-1.0)],
        )))
        .unwrap();
        let frame = h.render().unwrap();
        assert!(frame.fell_back);
        assert_eq!(h.scale_mode(), ScaleMode::Linear);
        assert_eq!(frame.instances.len(), 2);

        let again = h.render().unwrap();
        assert!(!again.fell_back);
    }

    #[test]
    fn scenario_drag_zoom_then_double_click_reset() {
        let mut h = loaded(ScaleMode::Linear);
        let grid = h.grid().unwrap();
        let a = grid.bin_to_pixel(Bin::new(1, 1));
        let b = grid.bin_to_pixel(Bin::new(3, 3));
        let seen = drive(
            &mut h,
            &[
                Step::Input(PointerEvent::Down(a)),
                Step::Hold,
                Step::Input(PointerEvent::Move(b)),
                Step::Input(PointerEvent::Up(b)),
                Step::Input(PointerEvent::Click(b)),
            ],
        );
        assert!(seen.contains(&Effect::ViewChanged));
        assert_eq!(
            h.window(),
            Some(BinRect {
                x_min: 1,
                x_max: 3,
                y_min: 1,
                y_max: 3
            })
        );
        assert_eq!(h.selection(), None);
        assert!(h.polygon().is_empty(), "trailing click must not add a vertex");

        let frame = h.render().unwrap();
        assert_eq!(frame.instances.len(), 9);
        assert_eq!((frame.limits.zmin, frame.limits.zmax), (6.0, 16.0));

        drive(&mut h, &[Step::Input(PointerEvent::DoubleClick(b))]);
        assert_eq!(h.window(), h.full_extent());
    }

    #[test]
    fn new_data_abandons_a_pending_zoom() {
        let mut h = loaded(ScaleMode::Linear);
        let grid = h.grid().unwrap();
        let (from, to) = (grid.bin_to_pixel(Bin::new(0, 0)), grid.bin_to_pixel(Bin::new(1, 1)));
        h.pointer(PointerEvent::Down(from));
        h.on_timer(TimerKind::Press);
        h.pointer(PointerEvent::Move(to));
        h.pointer(PointerEvent::Up(to));
        assert!(h.selection().is_some());

        let effects = h
            .set_data(Dataset::Dense(DenseGrid::from_values(vec![vec![1.0; 100]; 100])))
            .unwrap();
        assert!(effects.contains(&Effect::Cancel(TimerKind::Release)));
        assert!(h.selection().is_none());
        assert_eq!(*h.gesture_state(), GestureState::Idle);

        // A release timer the host failed to cancel is now stale.
        assert!(h.on_timer(TimerKind::Release).is_empty());
        assert_eq!(h.window(), h.full_extent());
        assert_eq!(h.window(), BinRect::full(100, 100));
    }

    #[test]
    fn click_adds_vertex_and_zoom_clears_polygon() {
        let mut h = loaded(ScaleMode::Linear);
        let grid = h.grid().unwrap();
        let p = grid.bin_to_pixel(Bin::new(2, 0));
        let seen = drive(
            &mut h,
            &[
                Step::Input(PointerEvent::Down(p)),
                Step::Input(PointerEvent::Up(p)),
                Step::Input(PointerEvent::Click(p)),
            ],
        );
        assert_eq!(seen, [Effect::PolygonChanged]);
        assert_eq!(h.polygon().vertices(), [Bin::new(2, 0)]);

        let effects = h.zoom_out();
        assert!(effects.contains(&Effect::PolygonChanged));
        assert!(h.polygon().is_empty());
    }

    #[test]
    fn click_in_gutter_adds_nothing() {
        let mut h = loaded(ScaleMode::Linear);
        let p = Point::new(10.0, 440.0);
        drive(&mut h, &[Step::Input(PointerEvent::Click(p))]);
        assert!(h.polygon().is_empty());
    }

    #[test]
    fn hover_reports_bin_and_value() {
        let mut h = loaded(ScaleMode::Linear);
        let p = h.grid().unwrap().bin_to_pixel(Bin::new(3, 2));
        let effects = h.pointer(PointerEvent::Move(p));
        assert!(effects.contains(&Effect::Cursor(CursorReport::Bin {
            bin: Bin::new(3, 2),
            value: Some(12.0)
        })));
        assert_eq!(h.crosshair(), Some(p));

        let effects = h.pointer(PointerEvent::Move(Point::new(5.0, 5.0)));
        assert!(effects.contains(&Effect::Cursor(CursorReport::Outside)));
        assert!(effects.contains(&Effect::Crosshair(None)));
    }

    #[test]
    fn hover_floors_fractional_pixels() {
        let h = loaded(ScaleMode::Linear);
        // 159.9 floors to 159, the last pixel of column 0.
        let report = h.hover(Point::new(159.9, 417.5));
        assert_eq!(
            report,
            CursorReport::Bin {
                bin: Bin::new(0, 0),
                value: Some(1.0)
            }
        );
    }

    #[test]
    fn events_are_ignored_without_data() {
        let mut h = Heatmap::new(CANVAS, plot(), ScaleMode::Linear, Palette::Turbo).unwrap();
        assert!(h.pointer(PointerEvent::Down(Point::new(100.0, 100.0))).is_empty());
        assert!(h.on_timer(TimerKind::Press).is_empty());
        assert!(h.render().is_none());
        assert_eq!(h.hover(Point::new(100.0, 100.0)), CursorReport::Outside);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert_eq!(
            Heatmap::new(CANVAS, Rect::new(10.0, 10.0, 10.0, 10.0), ScaleMode::Linear, Palette::Turbo)
                .err(),
            Some(Error::EmptyPlot {
                width: 0.0,
                height: 0.0
            })
        );
        let mut h = Heatmap::new(CANVAS, plot(), ScaleMode::Linear, Palette::Turbo).unwrap();
        assert_eq!(
            h.set_data(Dataset::Dense(DenseGrid::new(vec![]))),
            Err(Error::EmptyDataset)
        );
    }

    #[test]
    fn palette_switch_rebuilds_table() {
        let mut h = loaded(ScaleMode::Linear);
        let before = h.render().unwrap();
        h.set_palette(Palette::Viridis);
        assert_eq!(h.palette(), Palette::Viridis);
        let after = h.render().unwrap();
        assert_eq!(before.instances.offsets, after.instances.offsets);
        assert_ne!(before.instances.colors, after.instances.colors);
    }
}
