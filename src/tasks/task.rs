//! The task capability contract.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::TaskContext;

/// An independently scheduled, cooperatively-cancelled unit of work.
///
/// Implementations are supplied entirely by the embedding application; the
/// orchestrator never enumerates concrete task kinds. The run body is invoked
/// exactly once, concurrently with all other tasks, on its own tokio task.
///
/// Two obligations fall on the implementor:
/// - observe cancellation (`ctx.is_cancelled()` / `ctx.cancelled().await`)
///   and exit promptly during shutdown; the orchestrator never forcibly
///   interrupts a running task;
/// - call [`TaskContext::tear_down`] exactly once on every exit path. A task
///   that skips it hangs shutdown forever.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use conveyor::{Task, TaskContext, TaskError};
///
/// struct Drain;
///
/// #[async_trait]
/// impl Task for Drain {
///     async fn run(&self, ctx: TaskContext) -> Result<(), TaskError> {
///         ctx.cancelled().await;
///         ctx.tear_down();
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Executes the task until completion or observed cancellation.
    async fn run(&self, ctx: TaskContext) -> Result<(), TaskError>;
}

/// Shared handle to a task (`Arc<dyn Task>`).
pub type TaskRef = Arc<dyn Task>;
