//! Task abstractions.
//!
//! - [`Task`] — trait for implementing async, cooperatively-cancelled tasks
//! - [`TaskFn`] — function-backed task implementation
//! - [`TaskRef`] — shared handle to a task (`Arc<dyn Task>`)
//! - [`TaskContext`] — per-admission identity and cancellation handle
//! - [`TaskId`] — unique identity assigned at admission

mod context;
mod task;
mod task_fn;

pub use context::{TaskContext, TaskId};
pub use task::{Task, TaskRef};
pub use task_fn::TaskFn;
