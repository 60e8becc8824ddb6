use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;
use tracing::debug;

/// Counts outstanding units of work across a dynamically growing task tree.
///
/// Every spawned task holds a [`WorkGuard`]. A parent registers each child
/// (obtaining its guard) before the parent's own guard is dropped, so the
/// count cannot reach zero while any descendant is still unregistered.
#[derive(Debug, Clone, Default)]
pub struct WorkTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Debug, Default)]
struct TrackerInner {
    outstanding: AtomicUsize,
    idle: Notify,
}

/// One registered unit of work. Dropping it marks the unit finished, whether
/// the task returned normally, bailed out early or panicked.
#[derive(Debug)]
#[must_use = "dropping the guard immediately marks the work finished"]
pub struct WorkGuard {
    inner: Arc<TrackerInner>,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> WorkGuard {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        WorkGuard {
            inner: self.inner.clone(),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Resolve once the outstanding count is zero.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register interest before reading the count so a wake-up between
            // the load and the await is not lost.
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            debug!("All outstanding work finished");
            self.inner.idle.notify_waiters();
        }
    }
}
