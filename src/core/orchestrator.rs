//! # Orchestrator: task admission, shared cancellation, graceful shutdown.
//!
//! The [`Orchestrator`] owns the root [`CancellationToken`], the completion
//! barrier, and a diagnostic registry of admitted tasks. It launches each
//! admitted task on its own tokio task and, on shutdown, triggers the token
//! and blocks until every admitted task has reported completion.
//!
//! ## Lifecycle
//! ```text
//! created ──► running ──► stopping ──► stopped
//!    │           │            │            │
//!    │           │            │            └─ stop() returned: barrier at zero
//!    │           │            └─ token cancelled, barrier draining
//!    │           └─ run() blocks on SIGINT/SIGTERM; add_task admits freely
//!    └─ new(): token and barrier ready immediately
//! ```
//!
//! ## Shutdown ordering
//! ```text
//! stop()
//!   ├─► token.cancel()            (idempotent, level-triggered broadcast)
//!   ├─► every task observes cancellation at its next poll
//!   │       └─► run body exits → ctx.tear_down() → barrier -1
//!   └─► barrier.wait()            (returns only when admissions == teardowns)
//! ```
//!
//! The orchestrator never forcibly interrupts a running task: a run body that
//! ignores cancellation, or exits without tearing down, hangs `stop()`
//! indefinitely. Teardown-on-every-exit-path is the load-bearing contract for
//! task implementors.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::core::registry::{Registry, TaskMeta};
use crate::core::signals;
use crate::core::waitgroup::WaitGroup;
use crate::error::TaskError;
use crate::tasks::{TaskContext, TaskId, TaskRef};

/// State shared between the orchestrator and the contexts it hands to tasks.
///
/// Task contexts hold this behind a `Weak`: the relation is a plain back
/// reference, never ownership, so an orchestrator that has been dropped makes
/// late teardowns silent no-ops instead of extending its lifetime.
pub(crate) struct Shared {
    token: CancellationToken,
    wait: WaitGroup,
    registry: Registry,
}

impl Shared {
    pub(crate) fn tear_down(&self, name: &str, id: TaskId) {
        match self.registry.remove(name) {
            Some(meta) => {
                info!(task = %name, id = %id, uptime = ?meta.admitted_at.elapsed(), "task torn down")
            }
            None => info!(task = %name, id = %id, "task torn down"),
        }
        self.wait.done();
    }
}

/// Admits tasks, distributes the shared cancellation token, and performs the
/// blocking graceful shutdown.
///
/// Construction is cheap and infallible; one orchestrator per process is the
/// expected shape. All methods take `&self`, so the orchestrator can be
/// shared by reference or cloned into an `Arc` by the embedding application.
pub struct Orchestrator {
    shared: Arc<Shared>,
}

impl Orchestrator {
    /// Creates the orchestrator with a fresh cancellation token and an empty
    /// completion barrier. The orchestrator is immediately `running`.
    pub fn new() -> Self {
        info!("initializing orchestrator");
        Self {
            shared: Arc::new(Shared {
                token: CancellationToken::new(),
                wait: WaitGroup::new(),
                registry: Registry::default(),
            }),
        }
    }

    /// Returns an observation handle for the shared cancellation signal.
    ///
    /// The handle is level-triggered and non-consuming: any number of
    /// holders, existing or future, observe cancellation once [`stop`] has
    /// triggered it.
    ///
    /// [`stop`]: Orchestrator::stop
    pub fn cancellation(&self) -> CancellationToken {
        self.shared.token.clone()
    }

    /// Admits a task and launches its run body on its own tokio task.
    ///
    /// Assigns a fresh [`TaskId`], registers one pending completion on the
    /// barrier, and returns immediately without waiting for the task to
    /// start or finish. Admission order implies nothing about run or
    /// completion order.
    ///
    /// The run body receives a [`TaskContext`] and **must** call
    /// [`TaskContext::tear_down`] exactly once on every exit path; a task
    /// that never does hangs [`stop`](Orchestrator::stop) forever.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty: a programmer error, not a recoverable
    /// condition. Must be called from within a tokio runtime.
    pub fn add_task(&self, task: TaskRef, name: impl Into<String>) {
        let name = name.into();
        if name.is_empty() {
            error!("task name must be non-empty");
            panic!("task name must be non-empty");
        }

        let id = TaskId::new();
        self.shared.wait.add(1);
        self.shared.registry.insert(
            &name,
            TaskMeta {
                id,
                admitted_at: Instant::now(),
            },
        );
        info!(task = %name, id = %id, "admitted task");

        let ctx = TaskContext::new(
            id,
            name.clone(),
            self.shared.token.clone(),
            Arc::downgrade(&self.shared),
        );
        tokio::spawn(async move {
            match task.run(ctx).await {
                Ok(()) => debug!(task = %name, "task finished"),
                Err(TaskError::Canceled) => {
                    debug!(task = %name, "task exited on cancellation")
                }
                Err(err) => error!(task = %name, error = %err, "task failed"),
            }
        });
    }

    /// Reports completion of the task admitted under `name` with `id`.
    ///
    /// Decrements the completion barrier by exactly one and drops the
    /// registry entry. Callable only on behalf of a task that was admitted
    /// with that exact identity; run bodies reach it through
    /// [`TaskContext::tear_down`].
    ///
    /// # Panics
    ///
    /// Panics if called more times than tasks were admitted.
    pub fn tear_down(&self, name: &str, id: TaskId) {
        self.shared.tear_down(name, id);
    }

    /// Blocks until the process receives an interrupt or termination signal.
    ///
    /// This is the process's main blocking point; on return the caller is
    /// expected to drive shutdown via [`stop`](Orchestrator::stop). Signal
    /// listener registration failure is surfaced as an error.
    pub async fn run(&self) -> std::io::Result<()> {
        info!("orchestrator running");
        signals::wait_for_termination().await
    }

    /// Triggers cancellation and blocks until every admitted task has torn
    /// down.
    ///
    /// Idempotent: triggering is a no-op after the first call and the
    /// barrier wait is level-triggered, so repeated or concurrent calls
    /// block until the same barrier drains and then return.
    pub async fn stop(&self) {
        info!(pending = self.shared.wait.pending(), "stopping orchestrator");
        self.shared.token.cancel();
        self.shared.wait.wait().await;
        info!("orchestrator stopped");
    }

    /// Sorted names of tasks admitted but not yet torn down. Diagnostics
    /// only; name collisions make this an undercount.
    pub fn active_tasks(&self) -> Vec<String> {
        self.shared.registry.names()
    }

    /// Whether a task admitted under `name` has not yet torn down.
    pub fn is_active(&self, name: &str) -> bool {
        self.shared.registry.contains(name)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::time::timeout;

    use crate::tasks::TaskFn;

    const STOP_TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn stop_waits_for_every_admitted_task() {
        let orchestrator = Orchestrator::new();
        let ids: Arc<Mutex<Vec<TaskId>>> = Arc::new(Mutex::new(Vec::new()));

        for name in ["a", "b", "c"] {
            let ids = Arc::clone(&ids);
            let task: TaskRef = TaskFn::arc(move |ctx: TaskContext| {
                let ids = Arc::clone(&ids);
                async move {
                    ids.lock().unwrap().push(ctx.id());
                    ctx.cancelled().await;
                    ctx.tear_down();
                    Ok::<_, TaskError>(())
                }
            });
            orchestrator.add_task(task, name);
        }

        assert_eq!(orchestrator.active_tasks(), vec!["a", "b", "c"]);

        timeout(STOP_TIMEOUT, orchestrator.stop())
            .await
            .expect("stop should return once all tasks tear down");

        assert!(orchestrator.active_tasks().is_empty());

        let ids = ids.lock().unwrap();
        assert_eq!(ids.len(), 3);
        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 3, "task identities must not be reused");
    }

    #[tokio::test]
    async fn stop_with_no_tasks_returns_immediately() {
        let orchestrator = Orchestrator::new();
        timeout(STOP_TIMEOUT, orchestrator.stop()).await.unwrap();
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let orchestrator = Orchestrator::new();
        orchestrator.stop().await;
        // Second trigger must not panic, deadlock, or change observable state.
        timeout(STOP_TIMEOUT, orchestrator.stop()).await.unwrap();
        assert!(orchestrator.cancellation().is_cancelled());
    }

    #[tokio::test]
    async fn cancellation_is_visible_to_existing_and_future_observers() {
        let orchestrator = Orchestrator::new();
        let before = orchestrator.cancellation();
        assert!(!before.is_cancelled());

        orchestrator.stop().await;

        assert!(before.is_cancelled());
        let after = orchestrator.cancellation();
        assert!(after.is_cancelled());
        // Level-triggered: observation does not consume the signal.
        after.cancelled().await;
        after.cancelled().await;
    }

    #[tokio::test]
    async fn task_can_finish_before_shutdown() {
        let orchestrator = Orchestrator::new();
        let task: TaskRef = TaskFn::arc(|ctx: TaskContext| async move {
            ctx.tear_down();
            Ok::<_, TaskError>(())
        });
        orchestrator.add_task(task, "one-shot");

        timeout(STOP_TIMEOUT, orchestrator.stop()).await.unwrap();
        assert!(!orchestrator.is_active("one-shot"));
    }

    #[tokio::test]
    #[should_panic(expected = "non-empty")]
    async fn empty_task_name_is_fatal() {
        let orchestrator = Orchestrator::new();
        let task: TaskRef = TaskFn::arc(|ctx: TaskContext| async move {
            ctx.tear_down();
            Ok::<_, TaskError>(())
        });
        orchestrator.add_task(task, "");
    }
}
