//! # EventBridge: OS file-creation notifications → bounded path channel.
//!
//! The bridge owns one OS watcher whose callback pushes creation events into
//! an unbounded raw subscription channel, and a forwarding loop that drains
//! that subscription into a bounded output channel of path strings.
//!
//! ```text
//! OS watcher thread ──► raw subscription (unbounded) ──► forwarding loop
//!                                                             │
//!                                            select: raw event | cancellation
//!                                                             │
//!                                                             ▼
//!                                              output channel (bounded, FIFO)
//! ```
//!
//! The output channel is the backpressure buffer: when it is full the loop
//! blocks on the send, so slow consumers stall new-event delivery rather than
//! lose events. FIFO order of the raw subscription is preserved. The loop
//! exits on cancellation or when the subscription closes (after [`stop`]),
//! and closes the output channel exactly once by dropping its sender.
//!
//! [`stop`]: EventBridge::stop

use std::path::Path;
use std::sync::Mutex;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::BridgeError;

/// Default capacity of the output path channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Converts raw filesystem-creation notifications into a bounded,
/// consumer-paced channel of path strings.
pub struct EventBridge {
    watcher: Mutex<Option<RecommendedWatcher>>,
    raw_rx: Mutex<Option<mpsc::UnboundedReceiver<notify::Event>>>,
    capacity: usize,
}

impl EventBridge {
    /// Creates a bridge with the default output capacity.
    pub fn new() -> Result<Self, BridgeError> {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a bridge whose output channel holds up to `capacity` paths
    /// (clamped to at least 1).
    ///
    /// Constructs the OS watcher; backend failure is surfaced verbatim.
    pub fn with_capacity(capacity: usize) -> Result<Self, BridgeError> {
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();

        // The callback runs on the watcher's own thread. Only creation
        // events cross into the subscription channel; a send to a closed
        // channel just means the forwarding loop is gone.
        let watcher = notify::recommended_watcher(
            move |res: Result<notify::Event, notify::Error>| match res {
                Ok(event) if event.kind.is_create() => {
                    let _ = raw_tx.send(event);
                }
                Ok(_) => {}
                Err(err) => warn!(error = %err, "watch backend reported an error"),
            },
        )?;

        Ok(Self {
            watcher: Mutex::new(Some(watcher)),
            raw_rx: Mutex::new(Some(raw_rx)),
            capacity: capacity.max(1),
        })
    }

    /// Registers a non-recursive creation watch on `path`.
    ///
    /// The path must exist ([`BridgeError::PathNotFound`] otherwise); watch
    /// registration errors are surfaced verbatim with the path attached, and
    /// never retried. Paths may be added before or after [`start`], but not
    /// after [`stop`].
    ///
    /// [`start`]: EventBridge::start
    /// [`stop`]: EventBridge::stop
    pub fn add_path(&self, path: impl AsRef<Path>) -> Result<(), BridgeError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BridgeError::PathNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut guard = self.watcher.lock().expect("watcher lock poisoned");
        let watcher = guard.as_mut().ok_or(BridgeError::Stopped)?;
        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|source| BridgeError::Watch {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), "watching path for creation events");
        Ok(())
    }

    /// Launches the forwarding loop and returns the output channel.
    ///
    /// The loop runs on its own tokio task until `token` is cancelled or the
    /// raw subscription closes, whichever comes first; either way the output
    /// channel is closed exactly once on exit. A send into a full output
    /// channel blocks the loop; that backpressure is deliberate.
    ///
    /// # Panics
    ///
    /// Panics if called twice; the bridge owns a single subscription.
    pub fn start(&self, token: CancellationToken) -> mpsc::Receiver<String> {
        let mut raw_rx = self
            .raw_rx
            .lock()
            .expect("subscription lock poisoned")
            .take()
            .expect("event bridge already started");
        let (tx, rx) = mpsc::channel(self.capacity);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    event = raw_rx.recv() => {
                        // A closed subscription (stop() dropped the watcher)
                        // ends the loop the same way cancellation does.
                        let Some(event) = event else { break };
                        for path in event.paths {
                            let path = path.to_string_lossy().into_owned();
                            if tx.send(path).await.is_err() {
                                // All consumers dropped the output channel.
                                return;
                            }
                        }
                    }
                }
            }
            info!("stopping event forwarding");
        });

        rx
    }

    /// Releases the OS-level watches and closes the raw subscription.
    ///
    /// Dropping the watcher tears down its callback, which owns the
    /// subscription sender; the forwarding loop then observes a closed
    /// subscription and exits. Safe to call while the loop is running; a
    /// second call is a no-op.
    pub fn stop(&self) {
        info!("stopping file watch");
        self.watcher.lock().expect("watcher lock poisoned").take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    use tempfile::tempdir;
    use tokio::time::timeout;

    const RECV_TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn add_path_rejects_missing_directory() {
        let bridge = EventBridge::new().unwrap();
        let err = bridge.add_path("/definitely/not/a/real/path").unwrap_err();
        assert!(matches!(err, BridgeError::PathNotFound { .. }));
    }

    #[tokio::test]
    async fn created_file_reaches_the_output_channel_once() {
        let dir = tempdir().unwrap();
        let bridge = EventBridge::new().unwrap();
        bridge.add_path(dir.path()).unwrap();

        let token = CancellationToken::new();
        let mut created = bridge.start(token.clone());

        let file = dir.path().join("x");
        File::create(&file).unwrap();

        let path = timeout(RECV_TIMEOUT, created.recv())
            .await
            .expect("creation event should arrive")
            .unwrap();
        assert_eq!(path, file.to_string_lossy());

        // Exactly once: after cancellation drains the loop, nothing else
        // shows up for the single creation.
        token.cancel();
        assert!(timeout(RECV_TIMEOUT, created.recv()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn full_output_channel_blocks_without_loss_or_reorder() {
        let dir = tempdir().unwrap();
        let bridge = EventBridge::with_capacity(2).unwrap();
        bridge.add_path(dir.path()).unwrap();
        let mut created = bridge.start(CancellationToken::new());

        let files: Vec<_> = (0..5).map(|i| dir.path().join(format!("f{i}"))).collect();
        for file in &files {
            File::create(file).unwrap();
        }

        // Let the watcher deliver while the loop is stalled on the full
        // output channel.
        tokio::time::sleep(Duration::from_millis(500)).await;

        let mut received = Vec::new();
        for _ in 0..files.len() {
            let path = timeout(RECV_TIMEOUT, created.recv())
                .await
                .expect("no event may be dropped under backpressure")
                .unwrap();
            received.push(path);
        }

        let expected: Vec<_> = files
            .iter()
            .map(|f| f.to_string_lossy().into_owned())
            .collect();
        assert_eq!(received, expected);
    }

    #[tokio::test]
    async fn stop_closes_the_output_channel() {
        let dir = tempdir().unwrap();
        let bridge = EventBridge::new().unwrap();
        bridge.add_path(dir.path()).unwrap();
        let mut created = bridge.start(CancellationToken::new());

        bridge.stop();
        assert!(timeout(RECV_TIMEOUT, created.recv()).await.unwrap().is_none());
        assert!(matches!(
            bridge.add_path(dir.path()),
            Err(BridgeError::Stopped)
        ));
    }

    #[tokio::test]
    async fn failed_add_path_registers_no_watch() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent");

        let bridge = EventBridge::new().unwrap();
        assert!(bridge.add_path(&missing).is_err());

        let mut created = bridge.start(CancellationToken::new());
        std::fs::create_dir(&missing).unwrap();
        File::create(missing.join("x")).unwrap();

        // No watch was registered, so nothing may arrive.
        assert!(timeout(Duration::from_millis(300), created.recv())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn cancellation_ends_the_forwarding_loop() {
        let dir = tempdir().unwrap();
        let bridge = EventBridge::new().unwrap();
        bridge.add_path(dir.path()).unwrap();

        let token = CancellationToken::new();
        let mut created = bridge.start(token.clone());

        token.cancel();
        assert!(timeout(RECV_TIMEOUT, created.recv()).await.unwrap().is_none());
    }
}
