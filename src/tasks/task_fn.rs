//! Function-backed task implementation.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::{Task, TaskContext};

/// Wraps a closure `F: Fn(TaskContext) -> Fut` as a [`Task`].
///
/// The closure produces a fresh future per invocation and owns no hidden
/// mutable state; share state across tasks with an explicit `Arc` inside the
/// closure.
///
/// # Example
/// ```
/// use conveyor::{TaskContext, TaskError, TaskFn, TaskRef};
///
/// let drain: TaskRef = TaskFn::arc(|ctx: TaskContext| async move {
///     ctx.cancelled().await;
///     ctx.tear_down();
///     Ok::<_, TaskError>(())
/// });
/// ```
#[derive(Debug)]
pub struct TaskFn<F> {
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Task for TaskFn<F>
where
    F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    async fn run(&self, ctx: TaskContext) -> Result<(), TaskError> {
        (self.f)(ctx).await
    }
}
