//! Triangle drawn from a vertex array object backed by a buffer

use gles_engine::prelude::*;

use crate::{triangle_transform, CLEAR_COLOR};

/// Attribute index of `pos`
pub const ATTR_POS: u32 = 0;
/// Attribute index of `color`
pub const ATTR_COLOR: u32 = 1;

/// Interleaved `x, y, r, g, b` per vertex
pub const VERTICES: [[f32; 5]; 3] = [
    [-1.0, -1.0, 1.0, 0.0, 0.0],
    [1.0, -1.0, 0.0, 1.0, 0.0],
    [0.0, 1.0, 0.0, 0.0, 1.0],
];

/// Bytes between consecutive vertices
pub const STRIDE: i32 = (5 * std::mem::size_of::<f32>()) as i32;
/// Byte offset of the color within a vertex
pub const COLOR_OFFSET: i32 = (2 * std::mem::size_of::<f32>()) as i32;

/// Triangle drawn through a VAO and VBO
#[derive(Debug, Default)]
pub struct VaoBufferTriangle {
    program: Option<ShaderProgram>,
    u_matrix: Option<glow::UniformLocation>,
    vao: Option<glow::VertexArray>,
    vbo: Option<glow::Buffer>,
}

impl VaoBufferTriangle {
    /// Create the example, GL objects are built in `on_init`
    pub fn new() -> Self {
        Self::default()
    }

    fn create_vertex_array(&mut self, gl: &glow::Context) -> Result<(), AppError> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(AppError::Gl)?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().map_err(AppError::Gl)?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&VERTICES),
                glow::STATIC_DRAW,
            );

            gl.vertex_attrib_pointer_f32(ATTR_POS, 2, glow::FLOAT, false, STRIDE, 0);
            gl.vertex_attrib_pointer_f32(ATTR_COLOR, 3, glow::FLOAT, false, STRIDE, COLOR_OFFSET);
            gl.enable_vertex_attrib_array(ATTR_POS);
            gl.enable_vertex_attrib_array(ATTR_COLOR);

            self.vao = Some(vao);
            self.vbo = Some(vbo);
        }
        Ok(())
    }
}

impl Application for VaoBufferTriangle {
    fn on_init(&mut self, ctx: &InitContext<'_>) -> Result<(), AppError> {
        let gl = ctx.gl;
        let [r, g, b, a] = CLEAR_COLOR;
        unsafe { gl.clear_color(r, g, b, a) };

        let shaders = &ctx.config.shaders;
        let vertex = shaders.vertex_source(ShaderSource::VertexMvp.source())?;
        let fragment = shaders.fragment_source(ShaderSource::FragmentPassthrough.source())?;

        let program = ShaderProgram::compile_and_link(gl, &vertex, &fragment)?;
        program.bind_attrib_location(gl, ATTR_POS, "pos");
        program.bind_attrib_location(gl, ATTR_COLOR, "color");
        program.relink(gl)?;

        self.u_matrix = program.uniform_location(gl, "modelviewProjection");
        self.create_vertex_array(gl)?;
        program.use_program(gl);

        log::info!("VAO triangle ready, program {}", program.id());
        self.program = Some(program);
        Ok(())
    }

    fn on_frame(&mut self, gl: &glow::Context, rotation: ViewRotation) -> Result<(), AppError> {
        let mvp = triangle_transform(rotation);
        let [r, g, b, a] = CLEAR_COLOR;
        unsafe {
            gl.uniform_matrix_4_f32_slice(self.u_matrix.as_ref(), false, as_column_major(&mvp));

            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
        }
        Ok(())
    }
}
