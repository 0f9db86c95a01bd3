//! Badge state transitions with auto-revert for transient states.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use forgor_protocols::{BadgeSink, BadgeState};

use crate::slot::SingleSlot;

struct BadgeInner {
    sink: Arc<dyn BadgeSink>,
    state: Mutex<BadgeState>,
    auto_clear: SingleSlot,
    clear_delay: Duration,
}

/// Drives the toolbar badge.
///
/// Sink failures never propagate; they are logged at debug level. Every
/// transition cancels a pending auto-clear, and transient states install a
/// new one that reverts the badge to [`BadgeState::Idle`].
#[derive(Clone)]
pub struct BadgeController {
    inner: Arc<BadgeInner>,
}

impl BadgeController {
    pub fn new(sink: Arc<dyn BadgeSink>, clear_delay: Duration) -> Self {
        Self {
            inner: Arc::new(BadgeInner {
                sink,
                state: Mutex::new(BadgeState::Idle),
                auto_clear: SingleSlot::new("badge-clear"),
                clear_delay,
            }),
        }
    }

    /// Last state set through [`set_state`](Self::set_state) or [`clear_badge`](Self::clear_badge).
    pub fn state(&self) -> BadgeState {
        *self.inner.state.lock()
    }

    /// Whether an auto-clear is waiting to fire.
    pub fn auto_clear_pending(&self) -> bool {
        self.inner.auto_clear.is_pending()
    }

    /// Write raw text and color to the sink.
    pub async fn set_badge(&self, text: &str, color: Option<&str>) {
        self.inner.auto_clear.cancel();
        if let Err(e) = self.inner.sink.set_badge(text, color).await {
            debug!("Badge update ignored: {}", e);
        }
    }

    /// Reset the badge to empty.
    pub async fn clear_badge(&self) {
        self.inner.auto_clear.cancel();
        *self.inner.state.lock() = BadgeState::Idle;
        if let Err(e) = self.inner.sink.clear_badge().await {
            debug!("Badge clear ignored: {}", e);
        }
    }

    /// Transition to `state`.
    pub async fn set_state(&self, state: BadgeState) {
        if state == BadgeState::Idle {
            self.clear_badge().await;
            return;
        }

        *self.inner.state.lock() = state;
        self.set_badge(state.glyph(), state.color()).await;

        if state.is_transient() {
            let this = self.clone();
            self.inner
                .auto_clear
                .schedule(self.inner.clear_delay, move || async move {
                    this.revert_if(state).await;
                });
        }
    }

    async fn revert_if(&self, expected: BadgeState) {
        if self.state() != expected {
            return;
        }
        *self.inner.state.lock() = BadgeState::Idle;
        if let Err(e) = self.inner.sink.clear_badge().await {
            debug!("Badge clear ignored: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "badge_tests.rs"]
mod tests;
