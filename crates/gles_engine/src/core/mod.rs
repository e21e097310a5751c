//! # Core Engine Module
//!
//! Shared configuration types used by the bootstrap, the render loop and the
//! example programs.

pub mod config;

pub use config::{
    AppConfig,
    WindowConfig,
    RendererConfig,
    InputConfig,
    ShaderConfig,
    ExampleConfig,
    RedrawPolicy,
    Config,
    ConfigError,
};
