//! Backend traits used by the render loop
//!
//! The loop only needs to wait for events, resize the viewport and present
//! frames. Splitting those out lets tests drive the loop with scripted
//! events and no display.

use crate::engine::EngineError;
use crate::events::WindowEvent;

/// Source of window events
pub trait EventSource {
    /// Block until the next event arrives
    fn next_event(&mut self) -> Result<WindowEvent, EngineError>;
}

/// Target the loop renders into
pub trait FrameSink {
    /// Set the GL viewport to `(0, 0, width, height)`
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Swap the front and back buffers
    fn present(&mut self) -> Result<(), EngineError>;
}
