//! Error types used by the orchestration runtime and the event bridge.
//!
//! Three failure domains, three enums:
//!
//! - [`TaskError`] — errors raised by task run bodies.
//! - [`BridgeError`] — errors raised by the filesystem-event bridge.
//! - [`ConfigError`] / [`TelemetryError`] — errors raised while resolving
//!   configuration tags and constructing the logging sink.
//!
//! Programmer errors (empty task name, completion reported without a matching
//! admission, starting the bridge loop twice) are not represented here; they
//! abort via panic.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by task run bodies.
///
/// The orchestrator never retries a failed task; the result is logged and the
/// task is expected to have torn itself down on the way out.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// The work body failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The work body exited because the shared cancellation context was
    /// triggered. Not a failure; logged at debug level.
    #[error("cancelled")]
    Canceled,
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`] from any message-like value.
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }
}

/// Errors produced by the filesystem-event bridge.
///
/// All variants are reported to the immediate caller and never retried by the
/// bridge itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The path handed to `add_path` does not exist. No watch was registered.
    #[error("{} does not exist", path.display())]
    PathNotFound {
        /// The offending path.
        path: PathBuf,
    },

    /// The OS-level watch registration failed.
    #[error("failed to watch {}", path.display())]
    Watch {
        /// The path that could not be watched.
        path: PathBuf,
        /// The underlying watcher error, verbatim.
        #[source]
        source: notify::Error,
    },

    /// The watch backend itself could not be constructed.
    #[error("failed to initialize watch backend")]
    Backend(#[from] notify::Error),

    /// The bridge was already stopped; its OS watcher is gone.
    #[error("file watch already stopped")]
    Stopped,
}

/// Errors from parsing configuration tags.
///
/// The embedding process treats these as fatal at startup.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The environment tag is not one of the recognized set.
    #[error("not a valid environment: {0}")]
    UnknownEnvironment(String),

    /// The log-output tag is not one of the recognized set.
    #[error("not a valid logging output: {0}")]
    UnknownLogOutput(String),
}

/// Errors from constructing the logging sink.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The syslog connection could not be established.
    #[error("failed to connect to syslog")]
    Syslog(#[from] syslog::Error),
}
