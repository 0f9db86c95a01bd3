//! SingleSlot - at most one pending delayed task.
//!
//! Scheduling replaces whatever is pending. Each schedule bumps a
//! generation counter; a sleeping task only runs if its generation is
//! still current when the delay elapses, so a replaced or cancelled task
//! never fires even though its sleep is not torn down.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

/// A cancel-and-replace timer slot.
pub struct SingleSlot {
    /// Slot name, for logs.
    name: &'static str,

    /// Latest issued generation.
    generation: Arc<AtomicU64>,

    /// Generation of the task still waiting to fire, 0 when idle.
    armed: Arc<AtomicU64>,

    /// Fire count.
    fire_count: Arc<AtomicU64>,
}

impl SingleSlot {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: Arc::new(AtomicU64::new(0)),
            armed: Arc::new(AtomicU64::new(0)),
            fire_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run `task` after `delay`, replacing any pending task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, delay: Duration, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.armed.store(generation, Ordering::SeqCst);
        debug!("Slot {} armed (gen {}, {:?})", self.name, generation, delay);

        let current = self.generation.clone();
        let armed = self.armed.clone();
        let fire_count = self.fire_count.clone();
        let name = self.name;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            let _ = armed.compare_exchange(generation, 0, Ordering::SeqCst, Ordering::SeqCst);
            fire_count.fetch_add(1, Ordering::Relaxed);
            debug!("Slot {} fired (gen {})", name, generation);
            task().await;
        });
    }

    /// Drop the pending task, if any.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if self.armed.swap(0, Ordering::SeqCst) != 0 {
            debug!("Slot {} cancelled", self.name);
        }
    }

    /// Whether a task is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.armed.load(Ordering::SeqCst) != 0
    }

    /// Number of tasks that actually fired.
    pub fn fire_count(&self) -> u64 {
        self.fire_count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[path = "slot_tests.rs"]
mod tests;
