//! Shader management and compilation
//!
//! Compiles GLSL ES source into a linked program object. Compile and link
//! failures carry the driver's info log so the caller can report it.

use glow::HasContext;
use thiserror::Error;

/// Shader compile and link errors
#[derive(Error, Debug)]
pub enum ShaderError {
    /// `glCreateShader` / `glCreateProgram` failed
    #[error("failed to create {kind}: {message}")]
    Create {
        /// What was being created
        kind: &'static str,
        /// Driver message
        message: String,
    },

    /// A stage failed to compile
    #[error("{stage} shader ({shader}) did not compile!\nError returned:\n{log}")]
    Compile {
        /// Failing stage
        stage: ShaderStage,
        /// GL name of the shader object
        shader: u32,
        /// Driver info log
        log: String,
    },

    /// The program failed to link
    #[error("linking shaders({vertex}, {fragment})\nError returned:\n{log}")]
    Link {
        /// GL name of the vertex shader
        vertex: u32,
        /// GL name of the fragment shader
        fragment: u32,
        /// Driver info log
        log: String,
    },

    /// Linking an existing program again failed
    #[error("relinking program ({program})\nError returned:\n{log}")]
    Relink {
        /// GL name of the program
        program: u32,
        /// Driver info log
        log: String,
    },
}

/// Convenience alias for shader results
pub type ShaderResult<T> = Result<T, ShaderError>;

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

impl ShaderStage {
    /// GL enum for `glCreateShader`
    pub fn gl_type(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => f.write_str("Vertex"),
            Self::Fragment => f.write_str("Fragment"),
        }
    }
}

/// Built-in shader sources shared by the examples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderSource {
    /// Writes the interpolated `v_color` to the framebuffer
    FragmentPassthrough,
    /// Transforms `pos` by `modelviewProjection` and forwards `color`
    VertexMvp,
}

impl ShaderSource {
    /// GLSL ES 3.20 source text
    pub fn source(self) -> &'static str {
        match self {
            Self::FragmentPassthrough => FRAGMENT_PASSTHROUGH,
            Self::VertexMvp => VERTEX_MVP,
        }
    }
}

const FRAGMENT_PASSTHROUGH: &str = "#version 320 es
precision mediump float;
in vec4 v_color;
out vec4 color_out;
void main() {
    color_out = v_color;
}
";

const VERTEX_MVP: &str = "#version 320 es
uniform mat4 modelviewProjection;
in vec4 pos;
in vec4 color;
out vec4 v_color;
void main() {
    gl_Position = modelviewProjection * pos;
    v_color = color;
}
";

fn gl_name(id: std::num::NonZeroU32) -> u32 {
    id.get()
}

/// Linked GL program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    program: glow::Program,
}

impl ShaderProgram {
    /// Compile both stages and link them into a program
    pub fn compile_and_link(
        gl: &glow::Context,
        vertex_source: &str,
        fragment_source: &str,
    ) -> ShaderResult<Self> {
        let fragment = compile_stage(gl, ShaderStage::Fragment, fragment_source)?;
        let vertex = match compile_stage(gl, ShaderStage::Vertex, vertex_source) {
            Ok(vertex) => vertex,
            Err(err) => {
                unsafe { gl.delete_shader(fragment) };
                return Err(err);
            }
        };

        let result = link(gl, vertex, fragment);
        unsafe {
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);
        }

        let program = result?;
        log::debug!("Linked shader program {}", gl_name(program.0));
        Ok(Self { program })
    }

    /// Link again, e.g. after `bind_attrib_location`
    pub fn relink(&self, gl: &glow::Context) -> ShaderResult<()> {
        unsafe {
            gl.link_program(self.program);
            if gl.get_program_link_status(self.program) {
                Ok(())
            } else {
                Err(ShaderError::Relink {
                    program: self.id(),
                    log: gl.get_program_info_log(self.program),
                })
            }
        }
    }

    /// GL program object
    pub fn handle(&self) -> glow::Program {
        self.program
    }

    /// GL name of the program, never zero
    pub fn id(&self) -> u32 {
        gl_name(self.program.0)
    }

    /// Make this the current program
    pub fn use_program(&self, gl: &glow::Context) {
        unsafe { gl.use_program(Some(self.program)) };
    }

    /// Assign a vertex attribute index, takes effect on the next link
    pub fn bind_attrib_location(&self, gl: &glow::Context, index: u32, name: &str) {
        unsafe { gl.bind_attrib_location(self.program, index, name) };
    }

    /// Look up a uniform, `None` if it is inactive or missing
    pub fn uniform_location(&self, gl: &glow::Context, name: &str) -> Option<glow::UniformLocation> {
        let location = unsafe { gl.get_uniform_location(self.program, name) };
        if location.is_none() {
            log::warn!("Uniform {name} not found in program {}", self.id());
        }
        location
    }
}

fn compile_stage(gl: &glow::Context, stage: ShaderStage, source: &str) -> ShaderResult<glow::Shader> {
    unsafe {
        let shader = gl
            .create_shader(stage.gl_type())
            .map_err(|message| ShaderError::Create { kind: "shader", message })?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if gl.get_shader_compile_status(shader) {
            Ok(shader)
        } else {
            let log = gl.get_shader_info_log(shader);
            let name = gl_name(shader.0);
            gl.delete_shader(shader);
            Err(ShaderError::Compile { stage, shader: name, log })
        }
    }
}

fn link(gl: &glow::Context, vertex: glow::Shader, fragment: glow::Shader) -> ShaderResult<glow::Program> {
    unsafe {
        let program = gl
            .create_program()
            .map_err(|message| ShaderError::Create { kind: "program", message })?;
        gl.attach_shader(program, fragment);
        gl.attach_shader(program, vertex);
        gl.link_program(program);

        if gl.get_program_link_status(program) {
            gl.detach_shader(program, fragment);
            gl.detach_shader(program, vertex);
            Ok(program)
        } else {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            Err(ShaderError::Link {
                vertex: gl_name(vertex.0),
                fragment: gl_name(fragment.0),
                log,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(ShaderStage::Vertex.to_string(), "Vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "Fragment");
        assert_eq!(ShaderStage::Vertex.gl_type(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_type(), glow::FRAGMENT_SHADER);
    }

    #[test]
    fn test_compile_error_report() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Vertex,
            shader: 3,
            log: "0:1: syntax error".to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("Vertex shader (3) did not compile!"));
        assert!(message.ends_with("0:1: syntax error"));
    }

    #[test]
    fn test_link_error_report() {
        let err = ShaderError::Link {
            vertex: 2,
            fragment: 1,
            log: "varying mismatch".to_string(),
        };
        assert_eq!(err.to_string(), "linking shaders(2, 1)\nError returned:\nvarying mismatch");
    }

    #[test]
    fn test_relink_error_names_program() {
        let err = ShaderError::Relink {
            program: 7,
            log: "attribute pos bound twice".to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("relinking program (7)"));
        assert!(!message.contains("(0, 0)"));
        assert!(message.ends_with("attribute pos bound twice"));
    }

    #[test]
    fn test_builtin_sources_target_gles_320() {
        for source in [ShaderSource::FragmentPassthrough, ShaderSource::VertexMvp] {
            assert!(source.source().starts_with("#version 320 es\n"));
        }
        assert!(ShaderSource::VertexMvp.source().contains("uniform mat4 modelviewProjection;"));
        assert!(ShaderSource::FragmentPassthrough.source().contains("out vec4 color_out;"));
    }
}
