//! # conveyor
//!
//! **Conveyor** is a small task-orchestration library for Rust: a central
//! [`Orchestrator`] admits independently running tasks, gives each a unique
//! identity and a shared cancellation signal, tracks their completion, and
//! performs an orderly, blocking shutdown that waits for every admitted task
//! to acknowledge termination. A companion [`EventBridge`] converts unbounded
//! OS file-creation notifications into a bounded, consumer-paced channel of
//! paths, honoring the same cancellation signal.
//!
//! ## Architecture
//! ```text
//!     ┌────────────┐   ┌────────────┐   ┌────────────┐
//!     │  Task #1   │   │  Task #2   │   │  Task #N   │   (caller-defined)
//!     └─────┬──────┘   └─────┬──────┘   └─────┬──────┘
//!           ▼                ▼                ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Orchestrator                                               │
//! │  - CancellationToken (root, level-triggered broadcast)      │
//! │  - WaitGroup (completion barrier: admissions vs teardowns)  │
//! │  - Registry (name → id, diagnostics only)                   │
//! │  - run(): blocks on SIGINT/SIGTERM                          │
//! └───────────────────────────┬─────────────────────────────────┘
//!                             │ shared token
//!                             ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  EventBridge                                                │
//! │  OS watcher ─► raw subscription ─► forwarding loop          │
//! │                                      │ (select: event |     │
//! │                                      │  cancellation)       │
//! │                                      ▼                      │
//! │                      bounded channel of path strings        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tasks stop cooperatively: the orchestrator triggers the token on shutdown
//! and every run body is responsible for observing it and calling
//! [`TaskContext::tear_down`] on the way out. [`Orchestrator::stop`] returns
//! only when every admitted task has done so.
//!
//! ## Example
//! ```no_run
//! use conveyor::{Config, EventBridge, Orchestrator, TaskContext, TaskFn, TaskRef};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     conveyor::telemetry::init(&Config::default())?;
//!
//!     let orchestrator = Orchestrator::new();
//!
//!     let bridge = EventBridge::new()?;
//!     bridge.add_path("/tmp/watchdir")?;
//!     let mut created = bridge.start(orchestrator.cancellation());
//!     tokio::spawn(async move {
//!         while let Some(path) = created.recv().await {
//!             println!("created: {path}");
//!         }
//!     });
//!
//!     let worker: TaskRef = TaskFn::arc(|ctx: TaskContext| async move {
//!         ctx.cancelled().await;
//!         ctx.tear_down();
//!         Ok::<_, conveyor::TaskError>(())
//!     });
//!     orchestrator.add_task(worker, "worker");
//!
//!     orchestrator.run().await?; // blocks until SIGINT/SIGTERM
//!     orchestrator.stop().await; // cancels and waits for every teardown
//!     bridge.stop();
//!     Ok(())
//! }
//! ```

mod bridge;
mod config;
mod core;
mod error;
mod tasks;

pub mod telemetry;

pub use bridge::{EventBridge, DEFAULT_EVENT_CAPACITY};
pub use config::{Config, Environment, LogOutput};
pub use core::Orchestrator;
pub use error::{BridgeError, ConfigError, TaskError, TelemetryError};
pub use tasks::{Task, TaskContext, TaskFn, TaskId, TaskRef};
