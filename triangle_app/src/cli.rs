//! Command line parsing
//!
//! Flags use the single-dash X11 style (`-display`, `-info`), with
//! `--` spellings accepted as well. A repeated flag overrides the earlier
//! value.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use gles_engine::core::AppConfig;
use gles_engine::config::{Config, ConfigError};
use thiserror::Error;

/// Printed to stdout when the arguments cannot be parsed
pub const USAGE: &str = "Usage:
  -display <displayname>  set the display to run on
  -info                   display OpenGL renderer info
  -config <file>          load settings from a .toml or .ron file";

/// Long flags that are also accepted with a single dash
const X11_FLAGS: [&str; 3] = ["display", "info", "config"];

/// Arguments that could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct UsageError {
    kind: ErrorKind,
    message: String,
}

impl UsageError {
    /// What went wrong, as classified by the parser
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<clap::Error> for UsageError {
    fn from(err: clap::Error) -> Self {
        let rendered = err.render().to_string();
        let message = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string();
        Self { kind: err.kind(), message }
    }
}

/// Parsed command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// X display to connect to, `$DISPLAY` when unset
    pub display: Option<String>,
    /// Print GL renderer strings after context creation
    pub print_info: bool,
    /// Configuration file to load before applying the flags
    pub config_path: Option<String>,
}

fn command() -> Command {
    Command::new("triangle")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("display")
                .long("display")
                .value_name("DISPLAYNAME")
                .help("Set the display to run on")
                .num_args(1)
                .overrides_with("display"),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .help("Display OpenGL renderer info")
                .action(ArgAction::SetTrue)
                .overrides_with("info"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Load settings from a .toml or .ron file")
                .num_args(1)
                .overrides_with("config"),
        )
}

/// Rewrite `-display` style flags to their `--display` form
fn normalize(arg: String) -> String {
    match arg.strip_prefix('-') {
        Some(name) if X11_FLAGS.contains(&name) => format!("--{name}"),
        _ => arg,
    }
}

impl CliOptions {
    /// Parse arguments, not including the program name
    pub fn parse<I, S>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = args.into_iter().map(|arg| normalize(arg.into()));
        let matches = command().try_get_matches_from(args)?;

        Ok(Self {
            display: matches.get_one::<String>("display").cloned(),
            print_info: matches.get_flag("info"),
            config_path: matches.get_one::<String>("config").cloned(),
        })
    }

    /// Build the runtime configuration
    ///
    /// Starts from defaults or the `-config` file, then applies the flags
    /// given on the command line.
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config_path {
            Some(path) => {
                log::info!("Loading configuration from {path}");
                AppConfig::load_from_file(path)?
            }
            None => AppConfig::default(),
        };

        if self.display.is_some() {
            config.renderer.display = self.display;
        }
        if self.print_info {
            config.renderer.print_info = true;
        }

        Ok(config)
    }
}
