use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounded pool of fetch permits, fixed at construction.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

/// A held permit. Dropping it returns the permit to the gate, so every exit
/// path of a task releases exactly once.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionGate {
    /// Largest capacity the gate can be built with.
    pub const MAX_CAPACITY: usize = Semaphore::MAX_PERMITS;

    /// Panics if `capacity` exceeds [`AdmissionGate::MAX_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait until a permit is free. There is no timeout.
    pub async fn acquire(&self) -> GatePermit {
        // The semaphore is private to the gate and never closed.
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("admission gate semaphore is never closed");
        GatePermit { _permit: permit }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}
