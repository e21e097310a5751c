//! Core engine implementation
//!
//! [`Engine::run`] bootstraps the rendering context, initializes the
//! application and drives the [`EventLoop`] until Escape is pressed.

use crate::{
    application::{AppError, Application, InitContext, ViewRotation},
    core::{AppConfig, ConfigError, RedrawPolicy},
    events::{KeyCode, WindowEvent},
    render::{
        backend::{EventSource, FrameSink},
        context::RenderContext,
        egl::EglError,
        shader::ShaderError,
        window::WindowError,
    },
};
use thiserror::Error;

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// X11 display or window failure
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// EGL failure
    #[error("EGL error: {0}")]
    Egl(#[from] EglError),

    /// Shader compilation or linking failure
    #[error("Shader error: {0}")]
    Shader(#[from] ShaderError),

    /// Invalid or unreadable configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The application's callbacks failed
    #[error("Application error: {0}")]
    Application(#[from] AppError),

    /// The event source stopped delivering events
    #[error("Event source error: {0}")]
    EventSource(String),
}

impl EngineError {
    /// Process exit code for this failure
    ///
    /// Connection-level failures (display, `eglGetDisplay`, `eglMakeCurrent`)
    /// exit with -1, `eglInitialize` with -2, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Window(WindowError::DisplayOpen { .. })
            | Self::Egl(EglError::NoDisplay | EglError::MakeCurrent(_)) => -1,
            Self::Egl(EglError::Initialize(_)) => -2,
            _ => 1,
        }
    }
}

/// Convenience alias for engine results
pub type EngineResult<T> = Result<T, EngineError>;

/// Event loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for and handling events
    Running,
    /// Escape was pressed
    Terminated,
}

/// Outcome of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    /// Keep going; `redraw` tells whether the event asked for a new frame
    Continue {
        /// The event requested a redraw
        redraw: bool,
    },
    /// Stop the loop without drawing
    Exit,
}

/// Event-driven render loop
///
/// Owns the view rotation. Arrow keys change it by `step` degrees, Escape
/// ends the loop, resizes update the viewport.
#[derive(Debug, Clone)]
pub struct EventLoop {
    rotation: ViewRotation,
    step: f32,
    policy: RedrawPolicy,
    state: LoopState,
    frames: u64,
}

impl EventLoop {
    /// Create a loop with rotation `(0, 0)`
    pub fn new(step: f32, policy: RedrawPolicy) -> Self {
        Self {
            rotation: ViewRotation::default(),
            step,
            policy,
            state: LoopState::Running,
            frames: 0,
        }
    }

    /// Current view rotation
    pub fn rotation(&self) -> ViewRotation {
        self.rotation
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Apply one event to the loop state
    pub fn handle_event<S: FrameSink>(&mut self, event: WindowEvent, sink: &mut S) -> LoopAction {
        match event {
            WindowEvent::Expose => LoopAction::Continue { redraw: true },
            WindowEvent::Configure { width, height } => {
                sink.set_viewport(width, height);
                LoopAction::Continue { redraw: false }
            }
            WindowEvent::KeyPressed(key) => {
                match key {
                    KeyCode::Left => self.rotation.yaw += self.step,
                    KeyCode::Right => self.rotation.yaw -= self.step,
                    KeyCode::Up => self.rotation.pitch += self.step,
                    KeyCode::Down => self.rotation.pitch -= self.step,
                    KeyCode::Escape => {
                        self.state = LoopState::Terminated;
                        return LoopAction::Exit;
                    }
                    KeyCode::Other(_) => {}
                }
                LoopAction::Continue { redraw: true }
            }
            WindowEvent::Other(_) => LoopAction::Continue { redraw: false },
        }
    }

    fn should_draw(&self, redraw: bool) -> bool {
        match self.policy {
            RedrawPolicy::Always => true,
            RedrawPolicy::OnDemand => redraw,
        }
    }

    /// Pump events from `backend` until Escape.
    ///
    /// After every event that does not end the loop, `draw` is called with
    /// the current rotation and the frame is presented, subject to the
    /// redraw policy.
    pub fn run<B, F>(&mut self, backend: &mut B, mut draw: F) -> EngineResult<()>
    where
        B: EventSource + FrameSink,
        F: FnMut(&B, ViewRotation) -> EngineResult<()>,
    {
        self.state = LoopState::Running;

        loop {
            let event = backend.next_event()?;
            log::trace!("{event:?}");

            match self.handle_event(event, backend) {
                LoopAction::Exit => {
                    log::info!("Escape pressed after {} frames", self.frames);
                    return Ok(());
                }
                LoopAction::Continue { redraw } => {
                    if self.should_draw(redraw) {
                        draw(&*backend, self.rotation)?;
                        backend.present()?;
                        self.frames += 1;
                    }
                }
            }
        }
    }
}

/// Main engine struct
///
/// Holds the rendering context for the lifetime of the application. Dropping
/// the engine tears the context down.
#[derive(Debug)]
pub struct Engine {
    context: RenderContext,
    config: AppConfig,
}

impl Engine {
    /// Bootstrap the rendering context described by `config`
    pub fn new(config: AppConfig) -> EngineResult<Self> {
        log::info!("Initializing engine...");
        config.validate()?;

        let context = RenderContext::create(&config.window, &config.renderer)?;
        let (major, minor) = context.egl_version();
        log::info!("Rendering context ready (EGL {major}.{minor})");

        Ok(Self { context, config })
    }

    /// Run `app` until Escape is pressed
    pub fn run<T: Application>(config: AppConfig, app: &mut T) -> EngineResult<()> {
        let mut engine = Self::new(config)?;

        if engine.config.renderer.print_info {
            println!("{}", engine.context.gl_info());
        }

        let (width, height) = engine.context.size();
        app.on_init(&InitContext {
            gl: engine.context.gl(),
            width,
            height,
            config: &engine.config,
        })?;
        engine.context.set_viewport(width, height);

        log::info!("Starting main loop...");
        let mut event_loop = EventLoop::new(
            engine.config.input.rotation_step,
            engine.config.renderer.redraw,
        );
        event_loop.run(&mut engine.context, |context, rotation| {
            app.on_frame(context.gl(), rotation)?;
            Ok(())
        })?;

        log::info!("Engine shutdown complete");
        Ok(())
    }
}
