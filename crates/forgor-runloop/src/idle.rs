//! Idle re-evaluation of the last stable tab.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use forgor_protocols::TabSnapshot;

use crate::poller::RelevancePoller;
use crate::slot::SingleSlot;

/// Re-checks the most recent tab once browsing has gone quiet.
///
/// Runs independently of the debounce flush and ignores the last-query
/// suppression, so a long stay on one page refreshes its badge.
pub struct IdleWatcher {
    poller: Arc<RelevancePoller>,
    last_stable: Arc<Mutex<Option<TabSnapshot>>>,
    slot: SingleSlot,
    idle_delay: Duration,
}

impl IdleWatcher {
    pub fn new(poller: Arc<RelevancePoller>, idle_delay: Duration) -> Self {
        Self {
            poller,
            last_stable: Arc::new(Mutex::new(None)),
            slot: SingleSlot::new("idle"),
            idle_delay,
        }
    }

    pub fn last_stable(&self) -> Option<TabSnapshot> {
        self.last_stable.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_pending()
    }

    /// Record `tab` as the last stable tab and restart the idle timer.
    pub fn touch(&self, tab: &TabSnapshot) {
        *self.last_stable.lock() = Some(tab.clone());

        let poller = self.poller.clone();
        let last_stable = self.last_stable.clone();
        self.slot.schedule(self.idle_delay, move || async move {
            let key = last_stable.lock().as_ref().and_then(TabSnapshot::signal_key);
            match key {
                Some(key) => {
                    debug!("Idle re-evaluation of '{}'", key);
                    poller.evaluate(&key).await;
                }
                None => debug!("Idle timer fired without a usable tab"),
            }
        });
    }

    pub fn reset(&self) {
        self.slot.cancel();
        *self.last_stable.lock() = None;
    }
}
