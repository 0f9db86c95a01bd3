//! Debounced batching of passive tab signals.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use forgor_protocols::TabSnapshot;

use crate::poller::RelevancePoller;
use crate::slot::SingleSlot;

/// Separator between signal keys in a coalesced query.
pub const QUERY_SEPARATOR: &str = " || ";

/// Insertion-ordered set of pending signal keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ActionBuffer {
    keys: Vec<String>,
}

impl ActionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key. Empty keys and keys already present are ignored.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if key.is_empty() || self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Take every key, joined in insertion order, leaving the buffer empty.
    pub fn drain_coalesced(&mut self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        let keys = std::mem::take(&mut self.keys);
        Some(keys.join(QUERY_SEPARATOR))
    }
}

/// Collects tab signals and flushes them to the poller after a quiet window.
pub struct ActionBatcher {
    poller: Arc<RelevancePoller>,
    flush_slot: SingleSlot,
    quiet_window: Duration,
}

impl ActionBatcher {
    pub fn new(poller: Arc<RelevancePoller>, quiet_window: Duration) -> Self {
        Self {
            poller,
            flush_slot: SingleSlot::new("flush"),
            quiet_window,
        }
    }

    pub fn quiet_window(&self) -> Duration {
        self.quiet_window
    }

    /// Whether a flush is scheduled.
    pub fn flush_pending(&self) -> bool {
        self.flush_slot.is_pending()
    }

    /// Record a tab signal and restart the quiet window.
    ///
    /// Returns `false` without touching the timer when the tab yields no key.
    pub fn queue_user_action(&self, tab: &TabSnapshot) -> bool {
        let Some(key) = tab.signal_key() else {
            return false;
        };

        let added = self.poller.buffer().lock().insert(key.clone());
        debug!("Queued '{}' (new: {})", key, added);

        let poller = self.poller.clone();
        self.flush_slot.schedule(self.quiet_window, move || async move {
            poller.flush().await;
        });
        true
    }

    /// Drop the pending flush.
    pub fn cancel(&self) {
        self.flush_slot.cancel();
    }
}

#[cfg(test)]
#[path = "batcher_tests.rs"]
mod tests;
