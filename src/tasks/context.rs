//! Per-admission task identity and cancellation access.

use std::fmt;
use std::sync::{Arc, Weak};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::core::Shared;

/// Unique identity of an admitted task.
///
/// Generated by the orchestrator at admission, immutable thereafter, and
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Handle given to a task's run body at admission.
///
/// Carries the task's identity and name, a clone of the orchestrator's
/// cancellation token, and a weak back-reference to the orchestrator used
/// only to report completion. Cloning the context is cheap; clones share the
/// same identity.
#[derive(Clone)]
pub struct TaskContext {
    id: TaskId,
    name: Arc<str>,
    token: CancellationToken,
    orchestrator: Weak<Shared>,
}

impl TaskContext {
    pub(crate) fn new(
        id: TaskId,
        name: String,
        token: CancellationToken,
        orchestrator: Weak<Shared>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            token,
            orchestrator,
        }
    }

    /// Identity assigned at admission.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Caller-supplied name from admission. Not guaranteed unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Polls the shared cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the shared cancellation signal is triggered, immediately
    /// if it already was. Safe to await repeatedly and from clones.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Returns the cancellation token itself, for `select!`-style waiting
    /// alongside other sources.
    pub fn cancellation(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Reports this task's completion to the orchestrator.
    ///
    /// Run bodies must call this exactly once on every exit path: success,
    /// early return, or cancellation-triggered exit. If the orchestrator has
    /// already been dropped, this is a silent no-op.
    pub fn tear_down(&self) {
        if let Some(orchestrator) = self.orchestrator.upgrade() {
            orchestrator.tear_down(&self.name, self.id);
        }
    }
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}
