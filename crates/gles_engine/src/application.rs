//! Application trait and lifecycle management

use crate::core::{AppConfig, ConfigError};
use crate::render::shader::ShaderError;
use thiserror::Error;

/// View rotation accumulated from arrow key presses, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewRotation {
    /// Up/Down arrows
    pub pitch: f32,
    /// Left/Right arrows
    pub yaw: f32,
}

impl ViewRotation {
    /// Create a rotation from explicit angles
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }
}

/// Everything an application may need while setting up GL state
#[derive(Clone, Copy)]
pub struct InitContext<'a> {
    /// GL function table of the current context
    pub gl: &'a glow::Context,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Full application configuration
    pub config: &'a AppConfig,
}

impl std::fmt::Debug for InitContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitContext")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Application lifecycle trait
///
/// Implement this trait to plug example-specific GL setup and drawing into
/// the engine's event loop.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the context is current and before the first event
    /// is processed. Build shader programs and vertex state here.
    fn on_init(&mut self, ctx: &InitContext<'_>) -> Result<(), AppError>;

    /// Draw one frame
    ///
    /// Called by the event loop before every buffer swap.
    ///
    /// # Arguments
    /// * `gl` - GL function table of the current context
    /// * `rotation` - Current view rotation
    fn on_frame(&mut self, gl: &glow::Context, rotation: ViewRotation) -> Result<(), AppError>;
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Shader compilation or linking failed
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A GL object could not be created
    #[error("GL error: {0}")]
    Gl(String),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
