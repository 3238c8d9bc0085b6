// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The control panel: cursor readout, scale and palette selectors, and the
//! polygon vertex editor.

use std::fmt;
use std::rc::Rc;

use vizir_heatmap::{CursorReport, Palette, Polygon, ScaleMode};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlElement, HtmlInputElement,
    HtmlOptionElement, HtmlSelectElement,
};

use crate::error::WidgetError;

/// An edit requested from the vertex list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VertexEdit {
    SetX(usize, i64),
    SetY(usize, i64),
    Remove(usize),
    MoveUp(usize),
    MoveDown(usize),
}

pub(crate) type EditHandler = Rc<dyn Fn(VertexEdit)>;

/// DOM elements of the control panel.
pub(crate) struct Controls {
    document: Document,
    cursor: HtmlElement,
    scale: HtmlSelectElement,
    palette: HtmlSelectElement,
    vertices: HtmlElement,
    vertex_listeners: Vec<Closure<dyn FnMut(Event)>>,
}

impl fmt::Debug for Controls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controls")
            .field("scale", &self.scale.value())
            .field("palette", &self.palette.value())
            .field("vertex_listeners", &self.vertex_listeners.len())
            .finish_non_exhaustive()
    }
}

impl Controls {
    /// Appends the panel to `target`.
    pub(crate) fn build(
        document: &Document,
        target: &Element,
        scale: ScaleMode,
        palette: Palette,
    ) -> Result<Self, WidgetError> {
        let cursor: HtmlElement = create(document, "div")?;
        cursor.set_text_content(Some(&CursorReport::Outside.to_string()));
        target.append_child(&cursor)?;

        let scale = selector(
            document,
            target,
            "Scale: ",
            ScaleMode::ALL.map(|m| (m.name(), m.label())),
            scale.name(),
        )?;
        let palette = selector(
            document,
            target,
            "Colorscale: ",
            Palette::ALL.map(|p| (p.name(), p.label())),
            palette.name(),
        )?;

        let vertices: HtmlElement = create(document, "div")?;
        target.append_child(&vertices)?;

        Ok(Self {
            document: document.clone(),
            cursor,
            scale,
            palette,
            vertices,
            vertex_listeners: Vec::new(),
        })
    }

    pub(crate) fn scale_select(&self) -> &HtmlSelectElement {
        &self.scale
    }

    pub(crate) fn palette_select(&self) -> &HtmlSelectElement {
        &self.palette
    }

    pub(crate) fn selected_scale(&self) -> Option<ScaleMode> {
        self.scale.value().parse().ok()
    }

    pub(crate) fn selected_palette(&self) -> Option<Palette> {
        self.palette.value().parse().ok()
    }

    pub(crate) fn show_scale(&self, mode: ScaleMode) {
        self.scale.set_value(mode.name());
    }

    pub(crate) fn show_palette(&self, palette: Palette) {
        self.palette.set_value(palette.name());
    }

    pub(crate) fn show_cursor(&self, report: &CursorReport) {
        self.cursor.set_text_content(Some(&report.to_string()));
    }

    /// Rebuilds the vertex list: one row of inputs and buttons per vertex.
    pub(crate) fn show_vertices(
        &mut self,
        polygon: &Polygon,
        on_edit: &EditHandler,
    ) -> Result<(), WidgetError> {
        self.vertices.set_inner_html("");
        self.vertex_listeners.clear();

        let list: HtmlElement = create(&self.document, "ul")?;
        let last = polygon.len().saturating_sub(1);
        for (index, bin) in polygon.vertices().iter().enumerate() {
            let item: HtmlElement = create(&self.document, "li")?;
            item.style().set_property("margin-bottom", "8px")?;
            item.append_with_str_1(&format!("Vertex {}: ", index + 1))?;

            let x = self.coordinate_input(bin.x, on_edit, move |v| VertexEdit::SetX(index, v))?;
            item.append_child(&x)?;
            item.append_with_str_1(", ")?;
            let y = self.coordinate_input(bin.y, on_edit, move |v| VertexEdit::SetY(index, v))?;
            item.append_child(&y)?;

            for (label, title, disabled, edit) in [
                ("\u{1f5d1}\u{fe0f}", "Delete vertex", false, VertexEdit::Remove(index)),
                ("\u{2b06}\u{fe0f}", "Move up", index == 0, VertexEdit::MoveUp(index)),
                ("\u{2b07}\u{fe0f}", "Move down", index == last, VertexEdit::MoveDown(index)),
            ] {
                let button: HtmlButtonElement = create(&self.document, "button")?;
                button.set_text_content(Some(label));
                button.set_title(title);
                button.set_disabled(disabled);
                let on_edit = on_edit.clone();
                self.listen(&button, "click", move || on_edit(edit))?;
                item.append_child(&button)?;
            }
            list.append_child(&item)?;
        }
        self.vertices.append_child(&list)?;
        Ok(())
    }

    fn coordinate_input(
        &mut self,
        value: i64,
        on_edit: &EditHandler,
        edit: impl Fn(i64) -> VertexEdit + 'static,
    ) -> Result<HtmlInputElement, WidgetError> {
        let input: HtmlInputElement = create(&self.document, "input")?;
        input.set_type("number");
        input.set_value(&value.to_string());
        input.style().set_property("width", "70px")?;
        let on_edit = on_edit.clone();
        let source = input.clone();
        self.listen(&input, "input", move || {
            let v = source.value_as_number();
            if v.is_finite() {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "bin numbers typed by hand are small"
                )]
                let v = v.floor() as i64;
                on_edit(edit(v));
            }
        })?;
        Ok(input)
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        event: &str,
        mut handler: impl FnMut() + 'static,
    ) -> Result<(), WidgetError> {
        let closure = Closure::wrap(Box::new(move |_: Event| handler()) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.vertex_listeners.push(closure);
        Ok(())
    }
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, WidgetError> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| WidgetError::Js(format!("<{tag}> has an unexpected element type")))
}

/// A block label followed by a `<select>` with the given `(value, text)` options.
fn selector<const N: usize>(
    document: &Document,
    target: &Element,
    label: &str,
    options: [(&str, &str); N],
    selected: &str,
) -> Result<HtmlSelectElement, WidgetError> {
    let caption: HtmlElement = create(document, "label")?;
    caption.set_text_content(Some(label));
    caption.style().set_property("margin-right", "10px")?;
    caption.style().set_property("display", "block")?;
    target.append_child(&caption)?;

    let select: HtmlSelectElement = create(document, "select")?;
    for (value, text) in options {
        let option: HtmlOptionElement = create(document, "option")?;
        option.set_value(value);
        option.set_text(text);
        select.append_child(&option)?;
    }
    select.set_value(selected);
    target.append_child(&select)?;
    Ok(select)
}
