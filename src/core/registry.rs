//! Diagnostic registry of admitted tasks.
//!
//! The registry maps task names to admission metadata. It exists for logging
//! and introspection only; control flow never routes through it. Name
//! collisions are permitted (a later admission under the same name replaces
//! the entry), so the map may undercount when callers reuse names.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use crate::tasks::TaskId;

/// Metadata recorded when a task is admitted.
#[derive(Debug, Clone)]
pub(crate) struct TaskMeta {
    pub(crate) id: TaskId,
    pub(crate) admitted_at: Instant,
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    tasks: RwLock<HashMap<String, TaskMeta>>,
}

impl Registry {
    pub(crate) fn insert(&self, name: &str, meta: TaskMeta) {
        self.tasks
            .write()
            .expect("registry lock poisoned")
            .insert(name.to_string(), meta);
    }

    pub(crate) fn remove(&self, name: &str) -> Option<TaskMeta> {
        self.tasks
            .write()
            .expect("registry lock poisoned")
            .remove(name)
    }

    /// Sorted names of tasks admitted but not yet torn down.
    pub(crate) fn names(&self) -> Vec<String> {
        let tasks = self.tasks.read().expect("registry lock poisoned");
        let mut names: Vec<String> = tasks.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.tasks
            .read()
            .expect("registry lock poisoned")
            .contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_roundtrip() {
        let registry = Registry::default();
        let meta = TaskMeta {
            id: TaskId::new(),
            admitted_at: Instant::now(),
        };

        registry.insert("ingest", meta.clone());
        assert!(registry.contains("ingest"));
        assert_eq!(registry.names(), vec!["ingest".to_string()]);

        let removed = registry.remove("ingest").unwrap();
        assert_eq!(removed.id, meta.id);
        assert!(!registry.contains("ingest"));
        assert!(registry.names().is_empty());
    }

    #[test]
    fn names_are_sorted() {
        let registry = Registry::default();
        for name in ["c", "a", "b"] {
            registry.insert(
                name,
                TaskMeta {
                    id: TaskId::new(),
                    admitted_at: Instant::now(),
                },
            );
        }
        assert_eq!(registry.names(), vec!["a", "b", "c"]);
    }
}
