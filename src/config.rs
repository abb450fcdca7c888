//! Runtime configuration tags.
//!
//! The orchestrator itself is configuration-free; what it consumes from the
//! embedding process is a resolved [`Environment`] and a resolved
//! [`LogOutput`], both drawn from fixed enumerated sets. Parsing either from
//! a string fails with a [`ConfigError`] on anything outside the set, and the
//! embedding process is expected to treat that as fatal at startup.

use std::fmt;
use std::str::FromStr;

use tracing::Level;

use crate::error::ConfigError;

/// Deployment environment tag.
///
/// Parsed case-insensitively; unrecognized names are rejected rather than
/// defaulted, so a typo in `PIPELINE_ENV` aborts startup instead of silently
/// running in debug mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local development. Default log level: `DEBUG`.
    #[default]
    Debug,
    /// Integration testing. Default log level: `INFO`.
    Integration,
    /// Production. Default log level: `INFO`.
    Production,
}

impl Environment {
    /// Default logging level for this environment, used when `RUST_LOG` is
    /// not set.
    pub fn default_level(&self) -> Level {
        match self {
            Environment::Debug => Level::DEBUG,
            Environment::Integration | Environment::Production => Level::INFO,
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Environment::Debug),
            "INTEGRATION" => Ok(Environment::Integration),
            "PRODUCTION" => Ok(Environment::Production),
            _ => Err(ConfigError::UnknownEnvironment(name.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Debug => "DEBUG",
            Environment::Integration => "INTEGRATION",
            Environment::Production => "PRODUCTION",
        };
        f.write_str(name)
    }
}

/// Destination for the logging sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogOutput {
    /// Human-readable lines on standard output.
    #[default]
    Stdout,
    /// The local syslog daemon (daemon facility).
    Syslog,
}

impl FromStr for LogOutput {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "stdout" => Ok(LogOutput::Stdout),
            "syslog" => Ok(LogOutput::Syslog),
            _ => Err(ConfigError::UnknownLogOutput(name.to_string())),
        }
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogOutput::Stdout => "stdout",
            LogOutput::Syslog => "syslog",
        };
        f.write_str(name)
    }
}

/// Resolved configuration handed to [`telemetry::init`](crate::telemetry::init).
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Deployment environment; selects the default log level.
    pub environment: Environment,
    /// Where log lines go.
    pub log_output: LogOutput,
}
