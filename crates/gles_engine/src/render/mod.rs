//! Rendering subsystem
//!
//! - **`window`**: X11 display connection and output window
//! - **`egl`**: EGL display, config, context and surface
//! - **`context`**: the bootstrap tying both together
//! - **`shader`**: GLSL ES compilation and linking
//! - **`backend`**: traits the render loop is written against

pub mod backend;
pub mod context;
pub mod egl;
pub mod shader;
pub mod window;

pub use backend::{EventSource, FrameSink};
pub use context::{GlInfo, RenderContext};
pub use shader::{ShaderError, ShaderProgram, ShaderSource, ShaderStage};
