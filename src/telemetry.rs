//! Logging sink construction.
//!
//! The sink is built explicitly by the embedding process from a resolved
//! [`Config`] and installed once, before the orchestrator is created. There
//! is no load-time global initialization; a process that skips [`init`] simply
//! runs without log output.
//!
//! Two outputs are recognized:
//! - [`LogOutput::Stdout`]: `tracing-subscriber`'s fmt layer with timestamps.
//! - [`LogOutput::Syslog`]: message-only lines forwarded to the local syslog
//!   daemon (RFC 3164, daemon facility, process tag from the crate name).
//!
//! `RUST_LOG` overrides the environment-derived default level.

use std::io::{self, Write};
use std::process;
use std::sync::{Arc, Mutex};

use syslog::{Facility, Formatter3164, LoggerBackend};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogOutput};
use crate::error::TelemetryError;

/// Installs the global logging sink described by `config`.
///
/// Call once at startup. A second call will panic inside `tracing` because
/// the global dispatcher is already set.
pub fn init(config: &Config) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.environment.default_level().to_string()));

    match config.log_output {
        LogOutput::Stdout => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
        }
        LogOutput::Syslog => {
            let writer = SyslogWriter::connect(env!("CARGO_PKG_NAME"))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .without_time()
                .with_target(false)
                .init();
        }
    }
    Ok(())
}

/// `io::Write` adapter that forwards formatted log lines to syslog.
///
/// The syslog daemon stamps its own timestamps, so the fmt layer is expected
/// to be configured with `without_time()` when using this writer.
#[derive(Clone)]
pub struct SyslogWriter {
    logger: Arc<Mutex<syslog::Logger<LoggerBackend, Formatter3164>>>,
}

impl SyslogWriter {
    /// Connects to the local syslog daemon with the given process tag.
    pub fn connect(process: &str) -> Result<Self, TelemetryError> {
        let formatter = Formatter3164 {
            facility: Facility::LOG_DAEMON,
            hostname: None,
            process: process.to_string(),
            pid: process::id(),
        };
        let logger = syslog::unix(formatter)?;
        Ok(Self {
            logger: Arc::new(Mutex::new(logger)),
        })
    }
}

impl Write for SyslogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let message = String::from_utf8_lossy(buf);
        let message = message.trim_end();
        if !message.is_empty() {
            if let Ok(mut logger) = self.logger.lock() {
                let _ = logger.info(message);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SyslogWriter {
    type Writer = SyslogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
