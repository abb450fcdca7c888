//! OS termination-signal handling.
//!
//! [`wait_for_termination`] completes when the process receives an interrupt
//! or termination signal.
//!
//! **Unix**: `SIGINT` (Ctrl-C) and `SIGTERM` (default kill signal, used by
//! systemd and Kubernetes). **Other platforms**: Ctrl-C via
//! [`tokio::signal::ctrl_c`].

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners. Returns `Ok(())` when a
/// signal is received, or `Err` if listener registration fails.
#[cfg(unix)]
pub(crate) async fn wait_for_termination() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners. Returns `Ok(())` when a
/// signal is received, or `Err` if listener registration fails.
#[cfg(not(unix))]
pub(crate) async fn wait_for_termination() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
