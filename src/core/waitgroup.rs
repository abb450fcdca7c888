//! Completion barrier counting admitted-but-unfinished tasks.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

/// Atomic counter with an async wait for the zero transition.
///
/// `add` registers pending completions, `done` reports one, and `wait`
/// resolves once the count reaches zero. The wait is level-triggered: waiting
/// on an already-drained group returns immediately, and any number of waiters
/// may observe the same zero.
#[derive(Debug)]
pub(crate) struct WaitGroup {
    count: AtomicUsize,
    zero: Notify,
}

impl WaitGroup {
    pub(crate) fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
            zero: Notify::new(),
        }
    }

    /// Registers `n` pending completions.
    pub(crate) fn add(&self, n: usize) {
        self.count.fetch_add(n, Ordering::AcqRel);
    }

    /// Reports one completion.
    ///
    /// Panics if called more times than `add` registered; that is a
    /// programmer error on the caller's side, not a recoverable condition.
    pub(crate) fn done(&self) {
        let prev = self.count.fetch_sub(1, Ordering::AcqRel);
        assert!(prev != 0, "completion reported without a matching admission");
        if prev == 1 {
            self.zero.notify_waiters();
        }
    }

    /// Resolves once the count reaches zero.
    pub(crate) async fn wait(&self) {
        loop {
            // Register for the notification before checking the count, so a
            // concurrent `done` cannot slip between the check and the await.
            let zero = self.zero.notified();
            if self.count.load(Ordering::Acquire) == 0 {
                return;
            }
            zero.await;
        }
    }

    /// Current number of unfinished completions.
    pub(crate) fn pending(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn wait_returns_immediately_at_zero() {
        let wg = WaitGroup::new();
        wg.wait().await;
    }

    #[tokio::test]
    async fn wait_blocks_until_every_completion_is_reported() {
        let wg = Arc::new(WaitGroup::new());
        wg.add(2);

        let waiter = {
            let wg = Arc::clone(&wg);
            tokio::spawn(async move { wg.wait().await })
        };

        wg.done();
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());
        assert_eq!(wg.pending(), 1);

        wg.done();
        waiter.await.unwrap();
        assert_eq!(wg.pending(), 0);
    }

    #[tokio::test]
    async fn multiple_waiters_all_observe_zero() {
        let wg = Arc::new(WaitGroup::new());
        wg.add(1);

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let wg = Arc::clone(&wg);
                tokio::spawn(async move { wg.wait().await })
            })
            .collect();

        tokio::task::yield_now().await;
        wg.done();
        for waiter in waiters {
            waiter.await.unwrap();
        }
    }

    #[tokio::test]
    #[should_panic(expected = "matching admission")]
    async fn done_without_add_panics() {
        let wg = WaitGroup::new();
        wg.done();
    }
}
