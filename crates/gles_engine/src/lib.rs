//! # GLES Engine
//!
//! Opens an X11 window, creates an EGL-backed OpenGL ES 3 context and runs a
//! blocking, event-driven render loop around an [`Application`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gles_engine::prelude::*;
//!
//! struct Clear;
//!
//! impl Application for Clear {
//!     fn on_init(&mut self, ctx: &InitContext<'_>) -> Result<(), AppError> {
//!         unsafe { ctx.gl.clear_color(0.4, 0.4, 0.4, 0.0) };
//!         Ok(())
//!     }
//!
//!     fn on_frame(&mut self, gl: &glow::Context, _rotation: ViewRotation) -> Result<(), AppError> {
//!         unsafe { gl.clear(glow::COLOR_BUFFER_BIT) };
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), EngineError> {
//!     Engine::run(AppConfig::default(), &mut Clear)
//! }
//! ```

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod events;
pub mod render;

mod application;
mod engine;

pub use application::{Application, AppError, InitContext, ViewRotation};
pub use engine::{Engine, EngineError, EngineResult, EventLoop, LoopAction, LoopState};

/// Re-export of the GL bindings the callbacks receive
pub use glow;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError, InitContext, ViewRotation,
        Engine, EngineError,
        foundation::math::{Mat4, make_rotate_z, make_scale, multiply, as_column_major},
        render::{ShaderProgram, ShaderSource},
        core::{AppConfig, Config, RedrawPolicy},
    };
    pub use glow::{self, HasContext};
}
