//! EGL display, config, context and window surface
//!
//! [`EglSession`] owns everything created through EGL. Dropping it releases
//! the current binding, destroys the context, then the surface, then
//! terminates the display.

use std::ffi::c_void;

use khronos_egl as egl;
use thiserror::Error;

use crate::render::window::X11Window;

/// `EGL_OPENGL_ES3_BIT_KHR`
const OPENGL_ES3_BIT: egl::Int = 0x0040;
/// `EGL_CONTEXT_FLAGS_KHR`
const CONTEXT_FLAGS_KHR: egl::Int = 0x30FC;
/// `EGL_CONTEXT_OPENGL_DEBUG_BIT_KHR`
const CONTEXT_OPENGL_DEBUG_BIT_KHR: egl::Int = 0x0001;

/// GLES major version requested from EGL
pub const CLIENT_VERSION: egl::Int = 3;

/// Statically linked EGL entry points
pub type EglInstance = egl::Instance<egl::Static>;

/// EGL errors
#[derive(Error, Debug)]
pub enum EglError {
    /// `eglGetDisplay` returned `EGL_NO_DISPLAY`
    #[error("eglGetDisplay() failed")]
    NoDisplay,

    /// `eglInitialize` failed
    #[error("eglInitialize() failed: {0}")]
    Initialize(#[source] egl::Error),

    /// `eglBindAPI` failed
    #[error("eglBindAPI(EGL_OPENGL_ES_API) failed: {0}")]
    BindApi(#[source] egl::Error),

    /// `eglChooseConfig` failed
    #[error("couldn't get an EGL visual config: {0}")]
    ChooseConfig(#[source] egl::Error),

    /// No config matched the requested attributes
    #[error("no EGL config supports OpenGL ES 3 window rendering")]
    NoConfig,

    /// `eglGetConfigAttrib` failed
    #[error("eglGetConfigAttrib({attribute:#x}) failed: {source}")]
    ConfigAttrib {
        /// Queried attribute
        attribute: egl::Int,
        /// EGL error
        source: egl::Error,
    },

    /// `eglCreateContext` failed
    #[error("eglCreateContext failed: {0}")]
    CreateContext(#[source] egl::Error),

    /// `eglCreateWindowSurface` failed
    #[error("eglCreateWindowSurface failed: {0}")]
    CreateSurface(#[source] egl::Error),

    /// The created surface does not match what was requested
    #[error("EGL surface check failed: {0}")]
    SurfaceCheck(String),

    /// `eglMakeCurrent` failed
    #[error("eglMakeCurrent() failed: {0}")]
    MakeCurrent(#[source] egl::Error),

    /// `eglSwapBuffers` failed
    #[error("eglSwapBuffers() failed: {0}")]
    SwapBuffers(#[source] egl::Error),

    /// A context or surface was used before it was created
    #[error("EGL {0} has not been created")]
    Missing(&'static str),
}

/// Convenience alias for EGL results
pub type EglResult<T> = Result<T, EglError>;

/// Config request: at least one bit per color channel and depth, ES3
/// renderable.
pub fn config_attributes() -> [egl::Int; 11] {
    [
        egl::RED_SIZE, 1,
        egl::GREEN_SIZE, 1,
        egl::BLUE_SIZE, 1,
        egl::DEPTH_SIZE, 1,
        egl::RENDERABLE_TYPE, OPENGL_ES3_BIT,
        egl::NONE,
    ]
}

/// Context request: GLES 3, optionally with the debug flag
pub fn context_attributes(debug: bool) -> Vec<egl::Int> {
    let mut attribs = vec![egl::CONTEXT_CLIENT_VERSION, CLIENT_VERSION];
    if debug {
        attribs.extend([CONTEXT_FLAGS_KHR, CONTEXT_OPENGL_DEBUG_BIT_KHR]);
    }
    attribs.push(egl::NONE);
    attribs
}

/// Surface facts gathered after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceReport {
    /// `EGL_CONTEXT_CLIENT_VERSION` of the context
    pub client_version: i32,
    /// `EGL_WIDTH` of the surface
    pub width: i32,
    /// `EGL_HEIGHT` of the surface
    pub height: i32,
    /// `EGL_SURFACE_TYPE` bitmask of the config
    pub surface_type: i32,
}

impl SurfaceReport {
    /// Check the report against the requested window size
    pub fn verify(&self, width: u32, height: u32) -> EglResult<()> {
        if i64::from(self.width) != i64::from(width) || i64::from(self.height) != i64::from(height) {
            return Err(EglError::SurfaceCheck(format!(
                "surface is {}x{}, window was created {width}x{height}",
                self.width, self.height
            )));
        }
        if self.surface_type & egl::WINDOW_BIT == 0 {
            return Err(EglError::SurfaceCheck(format!(
                "config surface type {:#x} lacks EGL_WINDOW_BIT",
                self.surface_type
            )));
        }
        Ok(())
    }
}

/// Initialized EGL display with its chosen config, context and surface
pub struct EglSession {
    egl: EglInstance,
    display: egl::Display,
    config: egl::Config,
    context: Option<egl::Context>,
    surface: Option<egl::Surface>,
    version: (egl::Int, egl::Int),
}

impl EglSession {
    /// Get and initialize the EGL display of an X connection, bind the
    /// GLES API and choose a config.
    pub fn initialize(native_display: *mut c_void) -> EglResult<Self> {
        let egl = egl::Instance::new(egl::Static);

        let display = unsafe { egl.get_display(native_display) }.ok_or(EglError::NoDisplay)?;
        let version = egl.initialize(display).map_err(EglError::Initialize)?;
        log::info!("Initialized EGL {}.{}", version.0, version.1);

        let session = Self::with_display(egl, display, version)?;
        session.log_infos();
        Ok(session)
    }

    fn with_display(
        egl: EglInstance,
        display: egl::Display,
        version: (egl::Int, egl::Int),
    ) -> EglResult<Self> {
        let choose = || -> EglResult<egl::Config> {
            egl.bind_api(egl::OPENGL_ES_API).map_err(EglError::BindApi)?;
            egl.choose_first_config(display, &config_attributes())
                .map_err(EglError::ChooseConfig)?
                .ok_or(EglError::NoConfig)
        };

        match choose() {
            Ok(config) => Ok(Self {
                egl,
                display,
                config,
                context: None,
                surface: None,
                version,
            }),
            Err(err) => {
                if let Err(term) = egl.terminate(display) {
                    log::warn!("eglTerminate failed: {term}");
                }
                Err(err)
            }
        }
    }

    /// EGL version reported by `eglInitialize`
    pub fn version(&self) -> (i32, i32) {
        self.version
    }

    fn log_infos(&self) {
        for (name, key) in [
            ("EGL_VERSION", egl::VERSION),
            ("EGL_VENDOR", egl::VENDOR),
            ("EGL_EXTENSIONS", egl::EXTENSIONS),
            ("EGL_CLIENT_APIS", egl::CLIENT_APIS),
        ] {
            match self.egl.query_string(Some(self.display), key) {
                Ok(value) => log::info!("{name} = {}", value.to_string_lossy()),
                Err(err) => log::warn!("{name} unavailable: {err}"),
            }
        }
    }

    /// Query an attribute of the chosen config
    pub fn config_attrib(&self, attribute: egl::Int) -> EglResult<egl::Int> {
        self.egl
            .get_config_attrib(self.display, self.config, attribute)
            .map_err(|source| EglError::ConfigAttrib { attribute, source })
    }

    /// X visual ID matching the chosen config
    pub fn native_visual_id(&self) -> EglResult<egl::Int> {
        self.config_attrib(egl::NATIVE_VISUAL_ID)
    }

    /// Create the GLES 3 rendering context
    pub fn create_context(&mut self, debug: bool) -> EglResult<()> {
        let context = self
            .egl
            .create_context(self.display, self.config, None, &context_attributes(debug))
            .map_err(EglError::CreateContext)?;
        self.context = Some(context);
        Ok(())
    }

    /// Create the window surface bound to `window`
    pub fn create_window_surface(&mut self, window: &X11Window) -> EglResult<()> {
        let surface = unsafe {
            self.egl.create_window_surface(
                self.display,
                self.config,
                window.handle() as egl::NativeWindowType,
                None,
            )
        }
        .map_err(EglError::CreateSurface)?;
        self.surface = Some(surface);
        Ok(())
    }

    fn context(&self) -> EglResult<egl::Context> {
        self.context.ok_or(EglError::Missing("context"))
    }

    fn surface(&self) -> EglResult<egl::Surface> {
        self.surface.ok_or(EglError::Missing("surface"))
    }

    /// Gather the facts [`SurfaceReport::verify`] checks.
    ///
    /// Query failures read as zero, which then fails verification.
    pub fn surface_report(&self) -> EglResult<SurfaceReport> {
        let context = self.context()?;
        let surface = self.surface()?;

        let client_version = self
            .egl
            .query_context(self.display, context, egl::CONTEXT_CLIENT_VERSION)
            .unwrap_or(0);
        let width = self.egl.query_surface(self.display, surface, egl::WIDTH).unwrap_or(0);
        let height = self.egl.query_surface(self.display, surface, egl::HEIGHT).unwrap_or(0);
        let surface_type = self.config_attrib(egl::SURFACE_TYPE).unwrap_or(0);

        Ok(SurfaceReport {
            client_version,
            width,
            height,
            surface_type,
        })
    }

    /// Bind the context to the surface on this thread
    pub fn make_current(&self) -> EglResult<()> {
        let surface = self.surface()?;
        self.egl
            .make_current(self.display, Some(surface), Some(surface), Some(self.context()?))
            .map_err(EglError::MakeCurrent)
    }

    /// Present the back buffer
    pub fn swap_buffers(&self) -> EglResult<()> {
        self.egl
            .swap_buffers(self.display, self.surface()?)
            .map_err(EglError::SwapBuffers)
    }

    /// Resolve a GL entry point
    pub fn get_proc_address(&self, name: &str) -> *const c_void {
        self.egl
            .get_proc_address(name)
            .map_or(std::ptr::null(), |f| f as *const c_void)
    }
}

impl std::fmt::Debug for EglSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EglSession")
            .field("display", &self.display.as_ptr())
            .field("version", &self.version)
            .field("has_context", &self.context.is_some())
            .field("has_surface", &self.surface.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EglSession {
    fn drop(&mut self) {
        if let Err(err) = self.egl.make_current(self.display, None, None, None) {
            log::warn!("eglMakeCurrent(NONE) failed: {err}");
        }
        if let Some(context) = self.context.take() {
            if let Err(err) = self.egl.destroy_context(self.display, context) {
                log::warn!("eglDestroyContext failed: {err}");
            }
        }
        if let Some(surface) = self.surface.take() {
            if let Err(err) = self.egl.destroy_surface(self.display, surface) {
                log::warn!("eglDestroySurface failed: {err}");
            }
        }
        if let Err(err) = self.egl.terminate(self.display) {
            log::warn!("eglTerminate failed: {err}");
        }
        log::debug!("EGL session terminated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_attributes_request_es3() {
        let attribs = config_attributes();
        assert_eq!(attribs.last(), Some(&egl::NONE));

        let pairs: Vec<_> = attribs[..10].chunks(2).map(|p| (p[0], p[1])).collect();
        assert!(pairs.contains(&(egl::RENDERABLE_TYPE, OPENGL_ES3_BIT)));
        for key in [egl::RED_SIZE, egl::GREEN_SIZE, egl::BLUE_SIZE, egl::DEPTH_SIZE] {
            assert!(pairs.contains(&(key, 1)));
        }
    }

    #[test]
    fn test_context_attributes_debug_flag() {
        assert_eq!(
            context_attributes(true),
            vec![
                egl::CONTEXT_CLIENT_VERSION, 3,
                CONTEXT_FLAGS_KHR, CONTEXT_OPENGL_DEBUG_BIT_KHR,
                egl::NONE,
            ]
        );
        assert_eq!(
            context_attributes(false),
            vec![egl::CONTEXT_CLIENT_VERSION, 3, egl::NONE]
        );
    }

    fn report(width: i32, height: i32, surface_type: i32) -> SurfaceReport {
        SurfaceReport {
            client_version: 3,
            width,
            height,
            surface_type,
        }
    }

    #[test]
    fn test_surface_report_accepts_matching_window() {
        assert!(report(300, 300, egl::WINDOW_BIT | egl::PBUFFER_BIT).verify(300, 300).is_ok());
    }

    #[test]
    fn test_surface_report_rejects_size_mismatch() {
        let err = report(300, 200, egl::WINDOW_BIT).verify(300, 300).unwrap_err();
        assert!(matches!(err, EglError::SurfaceCheck(_)));
        assert!(err.to_string().contains("300x200"));
    }

    #[test]
    fn test_surface_report_requires_window_bit() {
        let err = report(300, 300, egl::PBUFFER_BIT).verify(300, 300).unwrap_err();
        assert!(err.to_string().contains("EGL_WINDOW_BIT"));
    }
}
