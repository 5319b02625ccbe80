//! Ownership of live subscription tasks.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Holds at most one live subscription task.
///
/// Starting a task aborts the one before it, and dropping the slot aborts
/// whatever is still running. Because abort only takes effect at the task's
/// next await, every write goes through a [`Lease`], which refuses to publish
/// once a newer task has been started.
pub struct LiveSlot {
    task: Mutex<Option<JoinHandle<()>>>,
    generation: Arc<AtomicU64>,
}

impl LiveSlot {
    pub fn new() -> Self {
        Self {
            task: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Abort the running task, then spawn the future built by `task`.
    ///
    /// `task` runs synchronously under the slot lock, so anything it publishes
    /// before returning its future lands after the previous task lost its lease.
    pub fn start<F, Fut>(&self, task: F)
    where
        F: FnOnce(Lease) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut current = self.task.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = current.take() {
            previous.abort();
        }

        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let lease = Lease {
            generation: self.generation.clone(),
            mine,
        };
        *current = Some(tokio::spawn(task(lease)));
    }

    /// Whether a task has been started and has not finished yet.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Default for LiveSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LiveSlot {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let task = self.task.get_mut().unwrap_or_else(|p| p.into_inner());
        if let Some(task) = task.take() {
            task.abort();
        }
    }
}

/// Write permission of one slot task.
#[derive(Clone)]
pub struct Lease {
    generation: Arc<AtomicU64>,
    mine: u64,
}

impl Lease {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.mine
    }

    /// Replace the value of `state` unless the lease has been superseded.
    ///
    /// The check runs under the channel's write lock. Returns whether the
    /// value was written.
    pub fn publish<T>(&self, state: &watch::Sender<T>, value: T) -> bool {
        let mut value = Some(value);
        state.send_if_modified(|current| match value.take() {
            Some(next) if self.is_current() => {
                *current = next;
                true
            }
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn test_superseded_lease_cannot_publish() {
        let slot = LiveSlot::new();
        let (state, _rx) = watch::channel(0);

        let mut first = None;
        slot.start(|lease| {
            first = Some(lease);
            async {}
        });
        let first = first.unwrap();
        assert!(first.publish(&state, 1));

        slot.start(|_| async {});

        assert!(!first.is_current());
        assert!(!first.publish(&state, 2));
        assert_eq!(*state.borrow(), 1);
    }

    #[tokio::test]
    async fn test_restart_aborts_previous_task() {
        let slot = LiveSlot::new();
        let (keepalive, released) = oneshot::channel::<()>();

        slot.start(move |_| async move {
            let _keepalive = keepalive;
            std::future::pending::<()>().await;
        });
        slot.start(|_| async {});

        let outcome = tokio::time::timeout(Duration::from_secs(1), released).await;
        assert!(matches!(outcome, Ok(Err(_))));
    }

    #[tokio::test]
    async fn test_drop_aborts_task() {
        let slot = LiveSlot::new();
        let (keepalive, released) = oneshot::channel::<()>();

        slot.start(move |_| async move {
            let _keepalive = keepalive;
            std::future::pending::<()>().await;
        });
        assert!(slot.is_running());
        drop(slot);

        let outcome = tokio::time::timeout(Duration::from_secs(1), released).await;
        assert!(matches!(outcome, Ok(Err(_))));
    }
}
