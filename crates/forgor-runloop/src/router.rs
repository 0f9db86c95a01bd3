//! Request/response handling for messages from the UI surfaces.

use std::sync::Arc;

use tracing::debug;

use forgor_client::TokenStore;
use forgor_protocols::{BackgroundMessage, BackgroundResponse, QueryResult, RelevanceBackend, TokenPair};

use crate::cache::QueryCache;
use crate::login::LoginPrompter;
use crate::tier::TierTracker;

/// Answers [`BackgroundMessage`]s.
pub struct MessageRouter {
    backend: Arc<dyn RelevanceBackend>,
    cache: Arc<QueryCache>,
    store: Arc<dyn TokenStore>,
    login: Arc<LoginPrompter>,
    tier: Arc<TierTracker>,
    threshold: f64,
}

impl MessageRouter {
    pub fn new(
        backend: Arc<dyn RelevanceBackend>,
        cache: Arc<QueryCache>,
        store: Arc<dyn TokenStore>,
        login: Arc<LoginPrompter>,
        tier: Arc<TierTracker>,
        threshold: f64,
    ) -> Self {
        Self {
            backend,
            cache,
            store,
            login,
            tier,
            threshold,
        }
    }

    pub async fn handle(&self, message: BackgroundMessage) -> BackgroundResponse {
        match message {
            BackgroundMessage::GetTokens => {
                let pair = match self.store.load().await {
                    Ok(pair) => pair,
                    Err(e) => {
                        debug!("Token store unreadable: {}", e);
                        TokenPair::default()
                    }
                };
                BackgroundResponse::tokens(&pair)
            }
            BackgroundMessage::QueryCachedOrFetch { search_text } => {
                if let Some(cached) = self.cache.get(&search_text) {
                    return BackgroundResponse::Query {
                        ok: true,
                        body: cached.to_json_string(),
                        from_cache: Some(true),
                    };
                }
                self.fetch(&search_text, Some(false)).await
            }
            BackgroundMessage::Query { search_text } => self.fetch(&search_text, None).await,
            BackgroundMessage::PromptLogin => {
                self.login.prompt();
                BackgroundResponse::ack()
            }
            BackgroundMessage::GetTierInfo => BackgroundResponse::TierInfo(self.tier.get_or_fetch().await),
        }
    }

    /// Live fetch that populates the cache when the body is usable.
    async fn fetch(&self, search_text: &str, from_cache: Option<bool>) -> BackgroundResponse {
        match self.backend.check_text(search_text).await {
            Ok(raw) => {
                if raw.is_success() {
                    match QueryResult::from_body(&raw.body) {
                        Ok(result) => self
                            .cache
                            .put(search_text, result.filter_by_score(self.threshold)),
                        Err(e) => debug!("Not caching '{}': {}", search_text, e),
                    }
                }
                BackgroundResponse::Query {
                    ok: raw.is_success(),
                    body: raw.body,
                    from_cache,
                }
            }
            Err(e) => {
                debug!("Query for '{}' failed: {}", search_text, e);
                BackgroundResponse::Query {
                    ok: false,
                    body: e.to_string(),
                    from_cache,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
