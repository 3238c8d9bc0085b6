// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The JS-facing widget.
//!
//! The widget owns four stacked canvases inside the target element: the WebGL2
//! cell pass at the bottom, then markup (axes and colorbar), the polygon outline,
//! and the annotation layer on top, which also receives pointer input. Pointer
//! events and timers feed the [`Heatmap`] model; the [`Effect`]s it returns say
//! which layers to repaint and which timers to arm.
//!
//! The polygon callback is always invoked after the widget's state is released,
//! so it may call back into the widget.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use kurbo::{Point, Size};
use vizir_heatmap::{Bin, Effect, Effects, Heatmap, PointerEvent, TimerKind};
use vizir_heatmap_guides::{HeatmapGuides, HeatmapLayout};
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, HtmlElement, MouseEvent,
};

use crate::controls::{Controls, EditHandler, VertexEdit};
use crate::data::DatasetInput;
use crate::error::WidgetError;
use crate::gl::CellRenderer;
use crate::options::{Background, HeatmapOptions, resolve_extent};
use crate::paint::Surface;
use crate::text::CanvasTextMeasurer;
use crate::timers::Timers;

type Shared = Rc<RefCell<Inner>>;

const POINTER_EVENTS: [(&str, fn(Point) -> PointerEvent); 6] = [
    ("mousemove", PointerEvent::Move),
    ("mousedown", PointerEvent::Down),
    ("mouseup", PointerEvent::Up),
    ("mouseout", PointerEvent::Out),
    ("click", PointerEvent::Click),
    ("dblclick", PointerEvent::DoubleClick),
];

/// An interactive heatmap bound to two container elements.
#[wasm_bindgen]
pub struct HeatmapWidget {
    inner: Shared,
    _pointer_listeners: Vec<Closure<dyn FnMut(MouseEvent)>>,
    _control_listeners: Vec<Closure<dyn FnMut(Event)>>,
}

impl fmt::Debug for HeatmapWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeatmapWidget").finish_non_exhaustive()
    }
}

#[wasm_bindgen]
impl HeatmapWidget {
    /// Builds the canvas stack inside `canvasDivId` and the control panel inside
    /// `controlDivId`.
    ///
    /// Throws if either element is missing, WebGL2 is unavailable, an option is
    /// malformed, or the canvas is too small for the axes.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_div_id: &str,
        control_div_id: &str,
        options: JsValue,
    ) -> Result<Self, JsError> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        Ok(Self::build(canvas_div_id, control_div_id, &options)?)
    }

    /// Replaces the dataset and resets the view, without drawing.
    ///
    /// Accepts a row-major array of rows or `{ xBins, yBins, x, y, z }`.
    #[wasm_bindgen(js_name = setData)]
    pub fn set_data(&self, data: JsValue) -> Result<(), JsError> {
        Ok(self.run(|inner| inner.load(data).map(|()| false))?)
    }

    /// Redraws every layer, first loading `data` if one is given.
    pub fn draw(&self, data: JsValue) -> Result<(), JsError> {
        Ok(self.run(|inner| {
            if !data.is_undefined() && !data.is_null() {
                inner.load(data)?;
            }
            inner.draw().map(|()| false)
        })?)
    }

    /// Selects `linear` or `log` scale and redraws.
    #[wasm_bindgen(js_name = setScale)]
    pub fn set_scale(&self, scale: &str) -> Result<(), JsError> {
        let mode = scale.parse().map_err(|_| WidgetError::InvalidOption {
            name: "scale",
            value: scale.into(),
        })?;
        Ok(self.run(|inner| {
            inner.heatmap.set_scale_mode(mode);
            inner.controls.show_scale(mode);
            inner.draw().map(|()| false)
        })?)
    }

    /// Selects the `viridis` or `turbo` palette and redraws.
    #[wasm_bindgen(js_name = setColorscale)]
    pub fn set_colorscale(&self, name: &str) -> Result<(), JsError> {
        let palette = name.parse().map_err(|_| WidgetError::InvalidOption {
            name: "colorscale",
            value: name.into(),
        })?;
        Ok(self.run(|inner| {
            inner.heatmap.set_palette(palette);
            inner.controls.show_palette(palette);
            inner.draw().map(|()| false)
        })?)
    }

    /// The active scale mode, which reads `linear` after a log fallback.
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> String {
        self.inner.borrow().heatmap.scale_mode().name().into()
    }

    /// The polygon vertices as `[[xBin, yBin], ...]`.
    pub fn vertices(&self) -> Result<JsValue, JsError> {
        let pairs = self.inner.borrow().heatmap.polygon().to_pairs();
        Ok(serde_wasm_bindgen::to_value(&pairs)?)
    }

    /// Returns to the full extent, as a double-click does.
    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) -> Result<(), JsError> {
        Ok(self.run(|inner| {
            let effects = inner.heatmap.zoom_out();
            inner.apply(effects)
        })?)
    }
}

impl HeatmapWidget {
    fn build(
        canvas_div_id: &str,
        control_div_id: &str,
        options: &JsValue,
    ) -> Result<Self, WidgetError> {
        let parsed: HeatmapOptions = if options.is_undefined() || options.is_null() {
            HeatmapOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options.clone()).map_err(|e| {
                WidgetError::InvalidOption {
                    name: "options",
                    value: e.to_string(),
                }
            })?
        };
        let config = parsed.resolve()?;
        let polycallback = if options.is_object() {
            js_sys::Reflect::get(options, &JsValue::from_str("polycallback"))?
                .dyn_into::<js_sys::Function>()
                .ok()
        } else {
            None
        };

        let window = web_sys::window().ok_or(WidgetError::MissingWindow)?;
        let document = window.document().ok_or(WidgetError::MissingWindow)?;
        let target = element(&document, canvas_div_id)?;
        let control_target = element(&document, control_div_id)?;

        let bounds = target.get_bounding_client_rect();
        let width = resolve_extent(
            config.width,
            bounds.width(),
            window.inner_width()?.as_f64().unwrap_or(0.0),
        );
        let height = resolve_extent(
            config.height,
            bounds.height(),
            window.inner_height()?.as_f64().unwrap_or(0.0),
        );
        if config.width.is_some() || bounds.width() <= 0.0 {
            target.style().set_property("width", &format!("{width}px"))?;
        }
        if config.height.is_some() || bounds.height() <= 0.0 {
            target.style().set_property("height", &format!("{height}px"))?;
        }
        let size = Size::new(width, height);

        let cells = CellRenderer::new(&stacked_canvas(&document, &target, 0, size)?)?;
        let markup = surface(&stacked_canvas(&document, &target, 1, size)?, size)?;
        let polygon = surface(&stacked_canvas(&document, &target, 2, size)?, size)?;
        let annotation_canvas = stacked_canvas(&document, &target, 3, size)?;
        let annotation = surface(&annotation_canvas, size)?;

        let measurer = CanvasTextMeasurer::new(markup.context().clone());
        let layout = HeatmapLayout::compute(size, &measurer, &config.style)?;
        let heatmap = Heatmap::new(size, layout.plot(), config.scale, config.palette)?;
        let guides =
            HeatmapGuides::new(layout, config.style).with_titles(config.x_title, config.y_title);
        let controls = Controls::build(&document, &control_target, config.scale, config.palette)?;

        let inner: Shared = Rc::new_cyclic(|this| {
            RefCell::new(Inner {
                this: this.clone(),
                heatmap,
                guides,
                cells,
                background: config.background,
                markup,
                polygon,
                annotation,
                controls,
                timers: Timers::new(window),
                polycallback,
            })
        });

        let mut pointer_listeners = Vec::with_capacity(POINTER_EVENTS.len());
        for (name, event) in POINTER_EVENTS {
            let this = Rc::downgrade(&inner);
            let listener = Closure::wrap(Box::new(move |e: MouseEvent| {
                let p = Point::new(f64::from(e.offset_x()), f64::from(e.offset_y()));
                dispatch(&this, |inner| {
                    let effects = inner.heatmap.pointer(event(p));
                    inner.apply(effects)
                });
            }) as Box<dyn FnMut(MouseEvent)>);
            annotation_canvas
                .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
            pointer_listeners.push(listener);
        }

        let (scale_select, palette_select) = {
            let inner = inner.borrow();
            (
                inner.controls.scale_select().clone(),
                inner.controls.palette_select().clone(),
            )
        };
        let this = Rc::downgrade(&inner);
        let on_scale = Closure::wrap(Box::new(move |_: Event| {
            dispatch(&this, |inner| {
                if let Some(mode) = inner.controls.selected_scale() {
                    inner.heatmap.set_scale_mode(mode);
                }
                inner.draw().map(|()| false)
            });
        }) as Box<dyn FnMut(Event)>);
        scale_select.add_event_listener_with_callback("change", on_scale.as_ref().unchecked_ref())?;
        let this = Rc::downgrade(&inner);
        let on_palette = Closure::wrap(Box::new(move |_: Event| {
            dispatch(&this, |inner| {
                if let Some(palette) = inner.controls.selected_palette() {
                    inner.heatmap.set_palette(palette);
                }
                inner.draw().map(|()| false)
            });
        }) as Box<dyn FnMut(Event)>);
        palette_select
            .add_event_listener_with_callback("change", on_palette.as_ref().unchecked_ref())?;

        log::debug!("heatmap widget ready at {width} x {height}");
        Ok(Self {
            inner,
            _pointer_listeners: pointer_listeners,
            _control_listeners: vec![on_scale, on_palette],
        })
    }

    fn run(
        &self,
        f: impl FnOnce(&mut Inner) -> Result<bool, WidgetError>,
    ) -> Result<(), WidgetError> {
        let changed = {
            let mut inner = self
                .inner
                .try_borrow_mut()
                .map_err(|_| WidgetError::Js("heatmap widget is busy".into()))?;
            f(&mut inner)?
        };
        if changed {
            notify_polygon(&self.inner);
        }
        Ok(())
    }
}

/// Widget state shared with event listeners and timers.
struct Inner {
    this: Weak<RefCell<Self>>,
    heatmap: Heatmap,
    guides: HeatmapGuides,
    cells: CellRenderer,
    background: Background,
    markup: Surface,
    polygon: Surface,
    annotation: Surface,
    controls: Controls,
    timers: Timers,
    polycallback: Option<js_sys::Function>,
}

impl Inner {
    fn load(&mut self, data: JsValue) -> Result<(), WidgetError> {
        let input: DatasetInput =
            serde_wasm_bindgen::from_value(data).map_err(|e| WidgetError::Data(e.to_string()))?;
        let effects = self.heatmap.set_data(input.into())?;
        self.apply(effects)?;
        Ok(())
    }

    /// Re-renders the cells and every overlay layer.
    fn draw(&mut self) -> Result<(), WidgetError> {
        let clear = self.background.clear_color();
        let Some(frame) = self.heatmap.render() else {
            self.cells.clear(clear);
            return self.markup.repaint(std::iter::empty());
        };
        if frame.fell_back {
            self.controls.show_scale(self.heatmap.scale_mode());
        }
        self.cells.draw(&frame, clear);
        self.markup
            .repaint(&self.guides.markup(&frame, self.heatmap.palette()))?;
        self.paint_polygon()?;
        self.paint_annotations()
    }

    fn paint_polygon(&self) -> Result<(), WidgetError> {
        let outline = self
            .heatmap
            .grid()
            .and_then(|grid| self.guides.polygon(&grid, self.heatmap.polygon()));
        self.polygon.repaint(outline.iter())
    }

    fn paint_annotations(&self) -> Result<(), WidgetError> {
        self.annotation
            .repaint(&self.guides.annotations(&self.heatmap))
    }

    fn show_vertices(&mut self) -> Result<(), WidgetError> {
        let this = self.this.clone();
        let on_edit: EditHandler = Rc::new(move |edit| {
            dispatch(&this, |inner| inner.edit_vertex(edit));
        });
        self.controls
            .show_vertices(self.heatmap.polygon(), &on_edit)
    }

    /// Carries out model effects. Returns whether the polygon changed.
    fn apply(&mut self, effects: Effects) -> Result<bool, WidgetError> {
        let mut polygon_changed = false;
        let mut annotations_dirty = false;
        for effect in effects {
            match effect {
                Effect::Schedule(kind) => {
                    let this = self.this.clone();
                    self.timers.schedule(kind, move || fire(&this, kind))?;
                }
                Effect::Cancel(kind) => self.timers.cancel(kind),
                Effect::Selection(_) | Effect::Crosshair(_) => annotations_dirty = true,
                Effect::Cursor(report) => self.controls.show_cursor(&report),
                Effect::ViewChanged => {
                    self.draw()?;
                    annotations_dirty = false;
                }
                Effect::PolygonChanged => {
                    self.paint_polygon()?;
                    self.show_vertices()?;
                    polygon_changed = true;
                }
            }
        }
        if annotations_dirty {
            self.paint_annotations()?;
        }
        Ok(polygon_changed)
    }

    fn edit_vertex(&mut self, edit: VertexEdit) -> Result<bool, WidgetError> {
        let polygon = self.heatmap.polygon_mut();
        let (changed, relist) = match edit {
            VertexEdit::SetX(i, x) => {
                let current = polygon.vertices().get(i).copied();
                (current.is_some_and(|b| polygon.set(i, Bin::new(x, b.y))), false)
            }
            VertexEdit::SetY(i, y) => {
                let current = polygon.vertices().get(i).copied();
                (current.is_some_and(|b| polygon.set(i, Bin::new(b.x, y))), false)
            }
            VertexEdit::Remove(i) => (polygon.remove(i), true),
            VertexEdit::MoveUp(i) => (polygon.move_up(i), true),
            VertexEdit::MoveDown(i) => (polygon.move_down(i), true),
        };
        if changed {
            self.paint_polygon()?;
            if relist {
                self.show_vertices()?;
            }
        }
        Ok(changed)
    }
}

/// Runs `f` against the widget from an event listener or timer, then notifies the
/// polygon callback if asked to. Errors are logged; there is no caller to throw to.
fn dispatch(
    this: &Weak<RefCell<Inner>>,
    f: impl FnOnce(&mut Inner) -> Result<bool, WidgetError>,
) {
    let Some(shared) = this.upgrade() else {
        return;
    };
    let outcome = match shared.try_borrow_mut() {
        Ok(mut inner) => f(&mut inner),
        Err(_) => {
            log::warn!("heatmap widget is busy; dropping re-entrant event");
            return;
        }
    };
    match outcome {
        Ok(true) => notify_polygon(&shared),
        Ok(false) => {}
        Err(err) => log::error!("heatmap widget: {err}"),
    }
}

fn fire(this: &Weak<RefCell<Inner>>, kind: TimerKind) {
    dispatch(this, |inner| {
        inner.timers.fired(kind);
        let effects = inner.heatmap.on_timer(kind);
        inner.apply(effects)
    });
}

fn notify_polygon(shared: &Shared) {
    let (callback, pairs) = {
        let inner = shared.borrow();
        (inner.polycallback.clone(), inner.heatmap.polygon().to_pairs())
    };
    let Some(callback) = callback else {
        return;
    };
    let result = serde_wasm_bindgen::to_value(&pairs)
        .map_err(|e| WidgetError::Js(e.to_string()))
        .and_then(|value| Ok(callback.call1(&JsValue::NULL, &value)?));
    if let Err(err) = result {
        log::error!("polycallback failed: {err}");
    }
}

fn element(document: &Document, id: &str) -> Result<HtmlElement, WidgetError> {
    document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| WidgetError::MissingElement(id.into()))
}

fn stacked_canvas(
    document: &Document,
    target: &HtmlElement,
    z_index: u8,
    size: Size,
) -> Result<HtmlCanvasElement, WidgetError> {
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| WidgetError::Js("<canvas> has an unexpected element type".into()))?;
    let style = canvas.style();
    style.set_property("position", "absolute")?;
    style.set_property("z-index", &z_index.to_string())?;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "canvas extents are positive pixel counts"
    )]
    let (width, height) = (size.width as u32, size.height as u32);
    canvas.set_width(width);
    canvas.set_height(height);
    target.append_child(&canvas)?;
    Ok(canvas)
}

fn surface(canvas: &HtmlCanvasElement, size: Size) -> Result<Surface, WidgetError> {
    let ctx = canvas
        .get_context("2d")?
        .ok_or(WidgetError::UnsupportedContext("Canvas 2D"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| WidgetError::UnsupportedContext("Canvas 2D"))?;
    Ok(Surface::new(ctx, size.width, size.height))
}
