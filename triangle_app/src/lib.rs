//! # Triangle examples
//!
//! Two small programs on top of `gles_engine`: a triangle generated entirely
//! in the vertex shader ([`NoVaoTriangle`]) and one drawn from a vertex
//! buffer ([`VaoBufferTriangle`]). Both rotate with the Up/Down arrows and
//! quit on Escape.

pub mod cli;
pub mod no_vao;
pub mod vao_buf;

pub use cli::{CliOptions, UsageError, USAGE};
pub use no_vao::NoVaoTriangle;
pub use vao_buf::VaoBufferTriangle;

use gles_engine::config::ConfigError;
use gles_engine::foundation::math::{make_rotate_z, make_scale, multiply, Mat4};
use gles_engine::{Application, Engine, EngineError, ViewRotation};
use thiserror::Error;

/// Background color of both examples
pub const CLEAR_COLOR: [f32; 4] = [0.4, 0.4, 0.4, 0.0];

/// Uniform scale applied to the triangle
pub const TRIANGLE_SCALE: f32 = 0.5;

/// Model-view-projection for the current rotation
///
/// Rotates around Z by the pitch angle, after scaling the triangle by half.
pub fn triangle_transform(rotation: ViewRotation) -> Mat4 {
    let rotate = make_rotate_z(rotation.pitch);
    let scale = make_scale(TRIANGLE_SCALE, TRIANGLE_SCALE, TRIANGLE_SCALE);
    multiply(&rotate, &scale)
}

/// Top-level failures of an example binary
#[derive(Error, Debug)]
pub enum LaunchError {
    /// Bad command line
    #[error("{0}")]
    Usage(#[from] UsageError),

    /// Configuration file could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Bootstrap, shader or event loop failure
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl LaunchError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => -1,
            Self::Config(_) => 1,
            Self::Engine(err) => err.exit_code(),
        }
    }
}

/// Parse the command line and run `app` until Escape is pressed
pub fn run<A, I>(args: I, app: &mut A) -> Result<(), LaunchError>
where
    A: Application,
    I: IntoIterator<Item = String>,
{
    let options = CliOptions::parse(args)?;
    let config = options.into_config()?;
    Engine::run(config, app)?;
    Ok(())
}

/// Entry point shared by the example binaries
///
/// Returns the process exit code.
pub fn launch<A: Application>(name: &str, app: &mut A) -> i32 {
    gles_engine::foundation::logging::init();
    log::info!("Starting {name}");

    match run(std::env::args().skip(1), app) {
        Ok(()) => {
            log::info!("{name} exited cleanly");
            0
        }
        Err(LaunchError::Usage(err)) => {
            log::error!("{err}");
            println!("{USAGE}");
            -1
        }
        Err(err) => {
            log::error!("{err}");
            err.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gles_engine::foundation::math::as_column_major;

    #[test]
    fn test_transform_at_rest_is_half_scale() {
        let mvp = triangle_transform(ViewRotation::default());
        assert_relative_eq!(mvp, make_scale(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_transform_ignores_yaw() {
        let a = triangle_transform(ViewRotation::new(15.0, 0.0));
        let b = triangle_transform(ViewRotation::new(15.0, 90.0));
        assert_relative_eq!(a, b);
    }

    #[test]
    fn test_transform_quarter_turn() {
        let mvp = triangle_transform(ViewRotation::new(90.0, 0.0));
        let m = as_column_major(&mvp);

        // column 0 = (cos, sin) * 0.5, column 1 = (-sin, cos) * 0.5
        assert_relative_eq!(m[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(m[1], 0.5, epsilon = 1e-6);
        assert_relative_eq!(m[4], -0.5, epsilon = 1e-6);
        assert_relative_eq!(m[5], 0.0, epsilon = 1e-6);
        assert_relative_eq!(m[10], 0.5);
        assert_relative_eq!(m[15], 1.0);
    }

    #[test]
    fn test_usage_exit_code() {
        let usage = CliOptions::parse(["-x"]).unwrap_err();
        let err = LaunchError::from(usage);
        assert_eq!(err.exit_code(), -1);
    }

    #[test]
    fn test_run_rejects_unknown_argument() {
        let mut app = NoVaoTriangle::new();
        let err = run(vec!["-bogus".to_string()], &mut app).unwrap_err();
        match err {
            LaunchError::Usage(usage) => assert_eq!(usage.kind(), clap::error::ErrorKind::UnknownArgument),
            other => panic!("expected a usage error, got {other:?}"),
        }
    }
}
