//! Relevance polling: coalesced queries, threshold filtering, badge policy.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use forgor_protocols::{BadgeState, QueryResult, RelevanceBackend};

use crate::badge::BadgeController;
use crate::batcher::ActionBuffer;
use crate::cache::QueryCache;

/// What a flush did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was buffered.
    Empty,
    /// Same coalesced query as last time; no request sent.
    Duplicate(String),
    /// A relevance check ran.
    Queried { query: String, has: bool },
}

/// Result of a relevance check. Failures collapse to `has: false, data: None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelevanceOutcome {
    pub has: bool,
    pub data: Option<QueryResult>,
}

impl RelevanceOutcome {
    fn none() -> Self {
        Self::default()
    }
}

/// Turns buffered tab signals into relevance checks.
pub struct RelevancePoller {
    backend: Arc<dyn RelevanceBackend>,
    cache: Arc<QueryCache>,
    badge: BadgeController,
    buffer: Mutex<ActionBuffer>,
    last_query: Mutex<Option<String>>,
    threshold: f64,
}

impl RelevancePoller {
    pub fn new(
        backend: Arc<dyn RelevanceBackend>,
        cache: Arc<QueryCache>,
        badge: BadgeController,
        threshold: f64,
    ) -> Self {
        Self {
            backend,
            cache,
            badge,
            buffer: Mutex::new(ActionBuffer::new()),
            last_query: Mutex::new(None),
            threshold,
        }
    }

    pub fn buffer(&self) -> &Mutex<ActionBuffer> {
        &self.buffer
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().clone()
    }

    /// Drain the buffer and check the coalesced query.
    ///
    /// The buffer is emptied before any await, so signals queued while the
    /// request is in flight wait for the next flush.
    pub async fn flush(&self) -> FlushOutcome {
        let Some(query) = self.buffer.lock().drain_coalesced() else {
            return FlushOutcome::Empty;
        };

        {
            let mut last = self.last_query.lock();
            if last.as_deref() == Some(query.as_str()) {
                debug!("Skipping repeated query '{}'", query);
                return FlushOutcome::Duplicate(query);
            }
            *last = Some(query.clone());
        }

        info!("Flushing relevance query '{}'", query);
        let has = self.evaluate(&query).await;
        FlushOutcome::Queried { query, has }
    }

    /// Check `search_text` and apply the passive badge policy.
    ///
    /// Match on hits, Idle otherwise; background failures never show Error.
    pub async fn evaluate(&self, search_text: &str) -> bool {
        let outcome = self.has_results_for(search_text).await;
        if outcome.has {
            self.badge.set_state(BadgeState::Match).await;
        } else {
            self.badge.clear_badge().await;
        }
        outcome.has
    }

    /// Query the backend, filter by threshold and cache the filtered result.
    pub async fn has_results_for(&self, search_text: &str) -> RelevanceOutcome {
        if !self.backend.ensure_session().await {
            debug!("No session, skipping relevance check");
            return RelevanceOutcome::none();
        }

        let raw = match self.backend.check_text(search_text).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Relevance check failed: {}", e);
                return RelevanceOutcome::none();
            }
        };
        if !raw.is_success() {
            debug!("Relevance check returned {}", raw.status);
            return RelevanceOutcome::none();
        }

        let result = match QueryResult::from_body(&raw.body) {
            Ok(result) => result,
            Err(e) => {
                debug!("Unusable relevance body: {}", e);
                return RelevanceOutcome::none();
            }
        };

        let filtered = result.filter_by_score(self.threshold);
        self.cache.put(search_text, filtered.clone());
        debug!(
            "'{}' has {} result(s) above {}",
            search_text,
            filtered.len(),
            self.threshold
        );
        RelevanceOutcome {
            has: !filtered.is_empty(),
            data: Some(filtered),
        }
    }

    /// Forget buffered signals and the last query.
    pub fn reset(&self) {
        self.buffer.lock().clear();
        *self.last_query.lock() = None;
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
