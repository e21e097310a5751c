//! Window events delivered to the render loop
//!
//! The X11 backend translates native `XEvent`s into these values, which keeps
//! the loop itself free of FFI types.

/// Keys the render loop reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Escape, detected from the ASCII text of the key press
    Escape,
    /// Any other key, carrying the raw keysym
    Other(u64),
}

/// Window events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Part of the window must be repainted
    Expose,

    /// The window was moved or resized
    Configure {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },

    /// A key was pressed
    KeyPressed(KeyCode),

    /// Any event the loop does not handle, carrying the native type code
    Other(i32),
}
