//! Triangle with vertex data generated in the shader
//!
//! No vertex arrays or buffers: positions and colors are indexed by
//! `gl_VertexID`. With `examples.rotate` set, `hasMVP` is switched on and the
//! Up/Down rotation is applied.

use gles_engine::prelude::*;

use crate::{triangle_transform, CLEAR_COLOR};

/// Vertex shader with built-in vertex data
pub const VERTEX_SHADER: &str = "#version 320 es
uniform int hasMVP;
uniform mat4 modelviewProjection;
out vec4 v_color;
void main() {
    const vec4 colors[3] = vec4[3](
        vec4(1.0, 0.0, 0.0, 1.0),
        vec4(0.0, 1.0, 0.0, 1.0),
        vec4(0.0, 0.0, 1.0, 1.0)
    );
    const vec4 verts[3] = vec4[3](
        vec4(-1.0, -1.0, 1.0, 1.0),
        vec4( 1.0, -1.0, 1.0, 1.0),
        vec4( 0.0,  1.0, 1.0, 1.0)
    );
    vec4 pos = verts[gl_VertexID];
    if (hasMVP == 1) {
        gl_Position = modelviewProjection * pos;
    } else {
        gl_Position = pos;
    }
    v_color = colors[gl_VertexID];
}
";

/// Triangle drawn from `gl_VertexID` alone
#[derive(Debug, Default)]
pub struct NoVaoTriangle {
    program: Option<ShaderProgram>,
    u_matrix: Option<glow::UniformLocation>,
    rotate: bool,
}

impl NoVaoTriangle {
    /// Create the example, GL objects are built in `on_init`
    pub fn new() -> Self {
        Self::default()
    }
}

impl Application for NoVaoTriangle {
    fn on_init(&mut self, ctx: &InitContext<'_>) -> Result<(), AppError> {
        let gl = ctx.gl;
        let shaders = &ctx.config.shaders;
        let vertex = shaders.vertex_source(VERTEX_SHADER)?;
        let fragment = shaders.fragment_source(ShaderSource::FragmentPassthrough.source())?;

        let program = ShaderProgram::compile_and_link(gl, &vertex, &fragment)?;
        program.use_program(gl);

        self.rotate = ctx.config.examples.rotate;
        if self.rotate {
            self.u_matrix = program.uniform_location(gl, "modelviewProjection");
            let has_mvp = program.uniform_location(gl, "hasMVP");
            unsafe { gl.uniform_1_i32(has_mvp.as_ref(), 1) };
        }

        let [r, g, b, a] = CLEAR_COLOR;
        unsafe { gl.clear_color(r, g, b, a) };

        log::info!("No-VAO triangle ready, program {}", program.id());
        self.program = Some(program);
        Ok(())
    }

    fn on_frame(&mut self, gl: &glow::Context, rotation: ViewRotation) -> Result<(), AppError> {
        let [r, g, b, a] = CLEAR_COLOR;
        unsafe {
            if self.rotate {
                let mvp = triangle_transform(rotation);
                gl.uniform_matrix_4_f32_slice(self.u_matrix.as_ref(), false, as_column_major(&mvp));
            }

            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            gl.draw_arrays(glow::TRIANGLE_STRIP, 0, 3);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_shader_uses_vertex_id() {
        assert!(VERTEX_SHADER.starts_with("#version 320 es\n"));
        assert!(VERTEX_SHADER.contains("uniform int hasMVP;"));
        assert!(VERTEX_SHADER.contains("uniform mat4 modelviewProjection;"));
        assert!(VERTEX_SHADER.contains("verts[gl_VertexID]"));
        assert!(VERTEX_SHADER.contains("out vec4 v_color;"));
    }

    #[test]
    fn test_new_has_no_gl_state() {
        let app = NoVaoTriangle::new();
        assert!(app.program.is_none());
        assert!(app.u_matrix.is_none());
        assert!(!app.rotate);
    }
}
