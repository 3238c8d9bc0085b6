// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The WebGL2 cell pass.
//!
//! Every visible bin is one instance of a unit quad. Per-instance attributes carry
//! the cell centre in canvas pixels and its RGBA color; the vertex shader scales
//! the quad by the cell size and maps pixels to clip space with y pointing down.

use vizir_heatmap::{COLOR_COMPONENTS, Frame, OFFSET_COMPONENTS};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::WidgetError;

const VERTEX_SHADER: &str = r#"#version 300 es
in vec2 a_vertex;
in vec2 a_offset;
in vec4 a_color;
uniform vec2 u_cellSize;
uniform vec2 u_resolution;
out vec4 v_color;

void main() {
    vec2 pixel = a_vertex * u_cellSize + a_offset;
    vec2 clip = pixel / u_resolution * 2.0 - 1.0;
    gl_Position = vec4(clip * vec2(1, -1), 0, 1);
    v_color = a_color;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in vec4 v_color;
out vec4 outColor;

void main() {
    outColor = v_color;
}
"#;

/// Unit quad as a triangle strip, centred on the origin.
const QUAD: [f32; 8] = [-0.5, -0.5, 0.5, -0.5, -0.5, 0.5, 0.5, 0.5];

/// Program, vertex layout and instance buffers for the cell pass.
#[derive(Debug)]
pub(crate) struct CellRenderer {
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    offsets: WebGlBuffer,
    colors: WebGlBuffer,
    cell_size: Option<WebGlUniformLocation>,
    resolution: Option<WebGlUniformLocation>,
}

impl CellRenderer {
    /// Acquires a WebGL2 context on `canvas` and builds the pipeline.
    pub(crate) fn new(canvas: &HtmlCanvasElement) -> Result<Self, WidgetError> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or(WidgetError::UnsupportedContext("WebGL2"))?
            .dyn_into()
            .map_err(|_| WidgetError::UnsupportedContext("WebGL2"))?;
        let program = link_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        gl.use_program(Some(&program));

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| WidgetError::Js("could not create vertex array".into()))?;
        gl.bind_vertex_array(Some(&vao));

        let quad = create_buffer(&gl)?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad));
        upload(&gl, &QUAD, GL::STATIC_DRAW);
        bind_attribute(&gl, &program, "a_vertex", 2, false)?;

        let offsets = create_buffer(&gl)?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&offsets));
        bind_attribute(&gl, &program, "a_offset", OFFSET_COMPONENTS, true)?;

        let colors = create_buffer(&gl)?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&colors));
        bind_attribute(&gl, &program, "a_color", COLOR_COMPONENTS, true)?;

        gl.bind_vertex_array(None);

        let width = i32::try_from(canvas.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(canvas.height()).unwrap_or(i32::MAX);
        gl.viewport(0, 0, width, height);

        Ok(Self {
            cell_size: gl.get_uniform_location(&program, "u_cellSize"),
            resolution: gl.get_uniform_location(&program, "u_resolution"),
            gl,
            program,
            vao,
            offsets,
            colors,
        })
    }

    /// Uploads a frame's instances and draws them over a cleared canvas.
    pub(crate) fn draw(&self, frame: &Frame, clear: [f32; 4]) {
        let gl = &self.gl;
        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));

        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.offsets));
        upload(gl, &frame.instances.offsets, GL::DYNAMIC_DRAW);
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.colors));
        upload(gl, &frame.instances.colors, GL::DYNAMIC_DRAW);

        let [cw, ch] = frame.uniforms.cell_size;
        let [rw, rh] = frame.uniforms.resolution;
        gl.uniform2f(self.cell_size.as_ref(), cw, ch);
        gl.uniform2f(self.resolution.as_ref(), rw, rh);

        self.clear(clear);
        let count = i32::try_from(frame.instances.len()).unwrap_or(i32::MAX);
        gl.draw_arrays_instanced(GL::TRIANGLE_STRIP, 0, 4, count);
        gl.bind_vertex_array(None);
    }

    /// Clears the canvas to `color`.
    pub(crate) fn clear(&self, [r, g, b, a]: [f32; 4]) {
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(GL::COLOR_BUFFER_BIT);
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, WidgetError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| WidgetError::Shader("could not create shader".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        Err(WidgetError::Shader(
            gl.get_shader_info_log(&shader).unwrap_or_default(),
        ))
    }
}

fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram, WidgetError> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl
        .create_program()
        .ok_or_else(|| WidgetError::Program("could not create program".into()))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(WidgetError::Program(
            gl.get_program_info_log(&program).unwrap_or_default(),
        ))
    }
}

fn create_buffer(gl: &GL) -> Result<WebGlBuffer, WidgetError> {
    gl.create_buffer()
        .ok_or_else(|| WidgetError::Js("could not create buffer".into()))
}

/// Points `name` at the bound `ARRAY_BUFFER`, tightly packed floats.
fn bind_attribute(
    gl: &GL,
    program: &WebGlProgram,
    name: &str,
    components: usize,
    per_instance: bool,
) -> Result<(), WidgetError> {
    let location = u32::try_from(gl.get_attrib_location(program, name))
        .map_err(|_| WidgetError::Program(format!("missing attribute `{name}`")))?;
    gl.enable_vertex_attrib_array(location);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        reason = "attributes have at most four components"
    )]
    let size = components as i32;
    gl.vertex_attrib_pointer_with_i32(location, size, GL::FLOAT, false, 0, 0);
    if per_instance {
        gl.vertex_attrib_divisor(location, 1);
    }
    Ok(())
}

fn upload(gl: &GL, data: &[f32], usage: u32) {
    let array = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, usage);
}
