//! Rendering context bootstrap
//!
//! [`RenderContext::create`] opens the X display, sets up EGL for GLES 3,
//! creates a window matching the EGL config, binds a surface and makes the
//! context current. Field order gives the teardown order: EGL context,
//! surface and display first, then the window, then the X connection.

use glow::HasContext;

use crate::core::{RendererConfig, WindowConfig};
use crate::engine::{EngineError, EngineResult};
use crate::events::WindowEvent;
use crate::render::backend::{EventSource, FrameSink};
use crate::render::egl::EglSession;
use crate::render::window::{X11Display, X11Window};

/// `GL_RENDERER`, `GL_VERSION`, `GL_VENDOR` and `GL_EXTENSIONS`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlInfo {
    /// `GL_RENDERER`
    pub renderer: String,
    /// `GL_VERSION`
    pub version: String,
    /// `GL_VENDOR`
    pub vendor: String,
    /// `GL_EXTENSIONS`
    pub extensions: String,
}

impl std::fmt::Display for GlInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "GL_RENDERER   = {}", self.renderer)?;
        writeln!(f, "GL_VERSION    = {}", self.version)?;
        writeln!(f, "GL_VENDOR     = {}", self.vendor)?;
        write!(f, "GL_EXTENSIONS = {}", self.extensions)
    }
}

/// Current GLES 3 context on an X11 window
pub struct RenderContext {
    gl: glow::Context,
    egl: EglSession,
    window: X11Window,
    display: X11Display,
    width: u32,
    height: u32,
}

impl RenderContext {
    /// Bootstrap the display, window and EGL context
    pub fn create(window_config: &WindowConfig, renderer_config: &RendererConfig) -> EngineResult<Self> {
        window_config.validate()?;

        let display = X11Display::open(renderer_config.display.as_deref())?;
        let mut egl = EglSession::initialize(display.as_ptr().cast())?;

        let visual_id = egl.native_visual_id()?;
        let window = X11Window::new(&display, visual_id, window_config)?;

        egl.create_context(renderer_config.debug_context)?;
        egl.create_window_surface(&window)?;

        let report = egl.surface_report()?;
        log::info!("Using EGL context client version {}", report.client_version);
        report.verify(window_config.width, window_config.height)?;

        window.map();
        egl.make_current()?;

        let gl = unsafe { glow::Context::from_loader_function(|name| egl.get_proc_address(name)) };

        Ok(Self {
            gl,
            egl,
            window,
            display,
            width: window_config.width,
            height: window_config.height,
        })
    }

    /// GL function table of the current context
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Window size requested at creation
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// EGL version reported by the driver
    pub fn egl_version(&self) -> (i32, i32) {
        self.egl.version()
    }

    /// Query renderer strings from the current context
    pub fn gl_info(&self) -> GlInfo {
        unsafe {
            GlInfo {
                renderer: self.gl.get_parameter_string(glow::RENDERER),
                version: self.gl.get_parameter_string(glow::VERSION),
                vendor: self.gl.get_parameter_string(glow::VENDOR),
                extensions: self.gl.get_parameter_string(glow::EXTENSIONS),
            }
        }
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("egl", &self.egl)
            .field("window", &self.window)
            .field("display", &self.display)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl EventSource for RenderContext {
    fn next_event(&mut self) -> Result<WindowEvent, EngineError> {
        Ok(self.display.next_event())
    }
}

impl FrameSink for RenderContext {
    fn set_viewport(&mut self, width: u32, height: u32) {
        log::debug!("Viewport {width}x{height}");
        unsafe { self.gl.viewport(0, 0, width as i32, height as i32) };
    }

    fn present(&mut self) -> Result<(), EngineError> {
        self.egl.swap_buffers()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gl_info_format() {
        let info = GlInfo {
            renderer: "llvmpipe".to_string(),
            version: "OpenGL ES 3.2 Mesa".to_string(),
            vendor: "Mesa".to_string(),
            extensions: "GL_EXT_a GL_EXT_b".to_string(),
        };
        let text = info.to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "GL_RENDERER   = llvmpipe");
        assert_eq!(lines[3], "GL_EXTENSIONS = GL_EXT_a GL_EXT_b");
    }
}
