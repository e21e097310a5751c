//! Window management using Xlib
//!
//! Owns the X11 display connection and the single output window. The window
//! visual is taken from the EGL config's native visual ID rather than the
//! screen default, otherwise `eglCreateWindowSurface` may reject the window.

use std::ffi::{CString, c_char, c_int, c_uint};
use std::ptr;

use thiserror::Error;
use x11::{keysym, xlib};

use crate::core::WindowConfig;
use crate::events::{KeyCode, WindowEvent};

/// ASCII escape as produced by `XLookupString`
const ASCII_ESCAPE: c_char = 27;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// `XOpenDisplay` returned null
    #[error("couldn't open display {name}")]
    DisplayOpen {
        /// The requested display, or `$DISPLAY`
        name: String,
    },

    /// No X visual matches the EGL config
    #[error("couldn't get X visual for visual id {visual_id:#x}")]
    VisualLookup {
        /// Native visual ID reported by EGL
        visual_id: i32,
    },

    /// Display name or title contained an interior NUL byte
    #[error("invalid string for X11: {0}")]
    InvalidString(#[from] std::ffi::NulError),
}

/// Convenience alias for window results
pub type WindowResult<T> = Result<T, WindowError>;

/// Connection to an X server, closed on drop
#[derive(Debug)]
pub struct X11Display {
    raw: *mut xlib::Display,
}

impl X11Display {
    /// Open a connection to `name`, or to `$DISPLAY` when `None`
    pub fn open(name: Option<&str>) -> WindowResult<Self> {
        let c_name = name.map(CString::new).transpose()?;
        let name_ptr = c_name.as_ref().map_or(ptr::null(), |n| n.as_ptr());

        let raw = unsafe { xlib::XOpenDisplay(name_ptr) };
        if raw.is_null() {
            let name = name
                .map(str::to_string)
                .or_else(|| std::env::var("DISPLAY").ok())
                .unwrap_or_default();
            return Err(WindowError::DisplayOpen { name });
        }

        log::debug!("Opened X display {raw:p}");
        Ok(Self { raw })
    }

    /// Raw `Display*` for EGL
    pub fn as_ptr(&self) -> *mut xlib::Display {
        self.raw
    }

    /// Block until the next event arrives and translate it
    pub fn next_event(&self) -> WindowEvent {
        let mut event: xlib::XEvent = unsafe { std::mem::zeroed() };
        unsafe { xlib::XNextEvent(self.raw, &mut event) };

        match event.get_type() {
            xlib::Expose => WindowEvent::Expose,
            xlib::ConfigureNotify => {
                let configure = unsafe { event.configure };
                WindowEvent::Configure {
                    width: configure.width.max(0) as u32,
                    height: configure.height.max(0) as u32,
                }
            }
            xlib::KeyPress => {
                let mut key = unsafe { event.key };
                WindowEvent::KeyPressed(translate_key(&mut key))
            }
            other => WindowEvent::Other(other),
        }
    }
}

impl Drop for X11Display {
    fn drop(&mut self) {
        log::debug!("Closing X display");
        unsafe { xlib::XCloseDisplay(self.raw) };
    }
}

/// Map a key press to a [`KeyCode`]: arrows by unshifted keysym, Escape by
/// the text the key produces.
fn translate_key(key: &mut xlib::XKeyEvent) -> KeyCode {
    let sym = unsafe { xlib::XLookupKeysym(key, 0) };

    match sym as c_uint {
        keysym::XK_Left => KeyCode::Left,
        keysym::XK_Right => KeyCode::Right,
        keysym::XK_Up => KeyCode::Up,
        keysym::XK_Down => KeyCode::Down,
        _ => {
            let mut buffer: [c_char; 10] = [0; 10];
            unsafe {
                xlib::XLookupString(
                    key,
                    buffer.as_mut_ptr(),
                    buffer.len() as c_int,
                    ptr::null_mut(),
                    ptr::null_mut(),
                );
            }
            if buffer[0] == ASCII_ESCAPE {
                KeyCode::Escape
            } else {
                KeyCode::Other(u64::from(sym))
            }
        }
    }
}

/// Top-level X11 window
///
/// Must be dropped before the [`X11Display`] it was created on.
#[derive(Debug)]
pub struct X11Window {
    display: *mut xlib::Display,
    handle: xlib::Window,
    colormap: xlib::Colormap,
}

impl X11Window {
    /// Create an unmapped window whose visual is `visual_id`
    pub fn new(display: &X11Display, visual_id: i32, config: &WindowConfig) -> WindowResult<Self> {
        let dpy = display.as_ptr();
        let title = CString::new(config.title.as_str())?;

        let mut template: xlib::XVisualInfo = unsafe { std::mem::zeroed() };
        template.visualid = visual_id as xlib::VisualID;
        let mut num_visuals: c_int = 0;
        let vis_info = unsafe {
            xlib::XGetVisualInfo(dpy, xlib::VisualIDMask, &mut template, &mut num_visuals)
        };
        if vis_info.is_null() || num_visuals == 0 {
            return Err(WindowError::VisualLookup { visual_id });
        }

        let (handle, colormap) = unsafe {
            let screen = xlib::XDefaultScreen(dpy);
            let root = xlib::XRootWindow(dpy, screen);
            let visual = (*vis_info).visual;
            let depth = (*vis_info).depth;

            let colormap = xlib::XCreateColormap(dpy, root, visual, xlib::AllocNone);
            let mut attr: xlib::XSetWindowAttributes = std::mem::zeroed();
            attr.background_pixel = 0;
            attr.border_pixel = 0;
            attr.colormap = colormap;
            attr.event_mask =
                xlib::StructureNotifyMask | xlib::ExposureMask | xlib::KeyPressMask;
            let mask = xlib::CWBackPixel | xlib::CWBorderPixel | xlib::CWColormap | xlib::CWEventMask;

            let handle = xlib::XCreateWindow(
                dpy,
                root,
                0,
                0,
                config.width,
                config.height,
                0,
                depth,
                xlib::InputOutput as c_uint,
                visual,
                mask,
                &mut attr,
            );
            xlib::XFree(vis_info.cast());

            let mut hints: xlib::XSizeHints = std::mem::zeroed();
            hints.x = 0;
            hints.y = 0;
            hints.width = config.width as c_int;
            hints.height = config.height as c_int;
            hints.flags = xlib::USSize | xlib::USPosition;
            xlib::XSetNormalHints(dpy, handle, &mut hints);
            xlib::XSetStandardProperties(
                dpy,
                handle,
                title.as_ptr(),
                title.as_ptr(),
                0,
                ptr::null_mut(),
                0,
                &mut hints,
            );

            (handle, colormap)
        };

        log::info!(
            "Created {}x{} window {handle:#x} with visual {visual_id:#x}",
            config.width,
            config.height
        );
        Ok(Self {
            display: dpy,
            handle,
            colormap,
        })
    }

    /// Native window handle for `eglCreateWindowSurface`
    pub fn handle(&self) -> xlib::Window {
        self.handle
    }

    /// Show the window
    pub fn map(&self) {
        unsafe { xlib::XMapWindow(self.display, self.handle) };
    }
}

impl Drop for X11Window {
    fn drop(&mut self) {
        log::debug!("Destroying window {:#x}", self.handle);
        unsafe {
            xlib::XDestroyWindow(self.display, self.handle);
            xlib::XFreeColormap(self.display, self.colormap);
        }
    }
}
