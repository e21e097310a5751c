//! # Application Configuration
//!
//! Runtime settings for the window, the EGL context, the render loop and the
//! example programs. Everything has a default matching the stock behaviour,
//! so a config file only needs the keys it wants to change.
//!
//! ```toml
//! [window]
//! width = 300
//! height = 300
//!
//! [renderer]
//! redraw = "on_demand"
//!
//! [examples]
//! rotate = false
//! ```

use serde::{Serialize, Deserialize};
use std::path::Path;

pub use crate::config::{Config, ConfigError};

/// Default window edge length in pixels
pub const DEFAULT_WINDOW_SIZE: u32 = 300;

/// Default window title
pub const DEFAULT_WINDOW_TITLE: &str = "EGL - OpenGL ES 3.x";

/// Degrees added to or removed from the view rotation per arrow key press
pub const DEFAULT_ROTATION_STEP: f32 = 5.0;

/// # Window Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Requested client area width
    pub width: u32,
    /// Requested client area height
    pub height: u32,
    /// Title shown by the window manager
    pub title: String,
}

impl WindowConfig {
    /// Create a window configuration with the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Set the window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        // X11 window geometry is 16-bit
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} exceeds the X11 limit",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_SIZE,
            height: DEFAULT_WINDOW_SIZE,
            title: DEFAULT_WINDOW_TITLE.to_string(),
        }
    }
}

/// When the event loop redraws the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedrawPolicy {
    /// Draw and swap after every event that does not end the loop
    #[default]
    Always,
    /// Draw and swap only after expose events and key presses
    OnDemand,
}

/// # Renderer Configuration
///
/// Settings consumed by the X11/EGL bootstrap and the render loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// X display name, `None` uses `$DISPLAY`
    pub display: Option<String>,
    /// Print `GL_RENDERER`, `GL_VERSION`, `GL_VENDOR` and `GL_EXTENSIONS`
    /// once the context is current
    pub print_info: bool,
    /// Request a debug context (`EGL_CONTEXT_OPENGL_DEBUG_BIT_KHR`)
    pub debug_context: bool,
    /// Redraw policy of the event loop
    pub redraw: RedrawPolicy,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            display: None,
            print_info: false,
            debug_context: true,
            redraw: RedrawPolicy::Always,
        }
    }
}

/// # Input Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Rotation change per arrow key press, in degrees
    pub rotation_step: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            rotation_step: DEFAULT_ROTATION_STEP,
        }
    }
}

/// # Shader Configuration
///
/// Optional files replacing the built-in shader sources of an example.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Path to a GLSL ES vertex shader
    pub vertex_shader_path: Option<String>,
    /// Path to a GLSL ES fragment shader
    pub fragment_shader_path: Option<String>,
}

impl ShaderConfig {
    /// Vertex source: the override file if configured, else `builtin`
    pub fn vertex_source(&self, builtin: &str) -> Result<String, ConfigError> {
        Self::read_or(self.vertex_shader_path.as_deref(), builtin)
    }

    /// Fragment source: the override file if configured, else `builtin`
    pub fn fragment_source(&self, builtin: &str) -> Result<String, ConfigError> {
        Self::read_or(self.fragment_shader_path.as_deref(), builtin)
    }

    fn read_or(path: Option<&str>, builtin: &str) -> Result<String, ConfigError> {
        match path {
            Some(path) => {
                log::info!("Loading shader source from {path}");
                Ok(std::fs::read_to_string(path)?)
            }
            None => Ok(builtin.to_string()),
        }
    }

    /// Validate that configured shader files exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.vertex_shader_path, &self.fragment_shader_path]
            .into_iter()
            .flatten()
        {
            if !Path::new(path).exists() {
                return Err(ConfigError::Invalid(format!("shader not found: {path}")));
            }
        }
        Ok(())
    }
}

/// # Example Configuration
///
/// Switches for the example programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExampleConfig {
    /// Apply the view rotation in the no-VAO example
    pub rotate: bool,
}

impl Default for ExampleConfig {
    fn default() -> Self {
        Self { rotate: true }
    }
}

/// # Complete Application Configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Window settings
    pub window: WindowConfig,
    /// EGL context and render loop settings
    pub renderer: RendererConfig,
    /// Keyboard handling
    pub input: InputConfig,
    /// Shader source overrides
    pub shaders: ShaderConfig,
    /// Example toggles
    pub examples: ExampleConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()?;
        self.shaders.validate()?;

        if !self.input.rotation_step.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "rotation step must be finite, got {}",
                self.input.rotation_step
            )));
        }
        Ok(())
    }
}

impl Config for AppConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("gles_engine_{}_{name}", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_defaults_match_stock_behaviour() {
        let config = AppConfig::default();

        assert_eq!(config.window.width, 300);
        assert_eq!(config.window.height, 300);
        assert_eq!(config.window.title, "EGL - OpenGL ES 3.x");
        assert_eq!(config.renderer.display, None);
        assert!(!config.renderer.print_info);
        assert!(config.renderer.debug_context);
        assert_eq!(config.renderer.redraw, RedrawPolicy::Always);
        assert_eq!(config.input.rotation_step, 5.0);
        assert!(config.examples.rotate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [window]
            width = 640

            [renderer]
            redraw = "on_demand"
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 300);
        assert_eq!(config.renderer.redraw, RedrawPolicy::OnDemand);
        assert!(config.renderer.debug_context);
    }

    #[test]
    fn test_toml_file_roundtrip() {
        let path = temp_path("roundtrip.toml");
        let mut config = AppConfig::default();
        config.window = WindowConfig::new(512, 256).with_title("roundtrip");
        config.renderer.display = Some(":1".to_string());
        config.examples.rotate = false;

        config.save_to_file(&path).unwrap();
        let loaded = AppConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_file_roundtrip() {
        let path = temp_path("roundtrip.ron");
        let mut config = AppConfig::default();
        config.input.rotation_step = 2.5;

        config.save_to_file(&path).unwrap();
        let loaded = AppConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let path = temp_path("config.json");
        std::fs::write(&path, "{}").unwrap();
        let result = AppConfig::load_from_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = AppConfig::load_from_file("/nonexistent/gles_engine.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.window.width = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.input.rotation_step = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.shaders.vertex_shader_path = Some("/nonexistent/shader.vert".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shader_source_falls_back_to_builtin() {
        let shaders = ShaderConfig::default();
        assert_eq!(shaders.vertex_source("builtin").unwrap(), "builtin");

        let path = temp_path("override.vert");
        std::fs::write(&path, "override").unwrap();
        let shaders = ShaderConfig {
            vertex_shader_path: Some(path.clone()),
            fragment_shader_path: None,
        };
        assert_eq!(shaders.vertex_source("builtin").unwrap(), "override");
        assert_eq!(shaders.fragment_source("frag").unwrap(), "frag");
        std::fs::remove_file(&path).unwrap();
    }
}
