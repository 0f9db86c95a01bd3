//! TTL memoization of relevance results.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use forgor_protocols::QueryResult;

/// Normalize search text into a cache key.
pub fn make_query_key(search_text: &str) -> String {
    search_text.trim().to_lowercase()
}

/// A cached result and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub stored_at: Instant,
    pub payload: QueryResult,
}

/// In-memory result cache with lazy expiry.
///
/// Entries older than the TTL are treated as absent and evicted on read.
/// Nothing bounds the number of entries.
pub struct QueryCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `payload` under the normalized form of `search_text`.
    pub fn put(&self, search_text: &str, payload: QueryResult) {
        let key = make_query_key(search_text);
        self.entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                payload,
            },
        );
    }

    /// Fetch a live entry, evicting it if it has expired.
    pub fn get(&self, search_text: &str) -> Option<QueryResult> {
        let key = make_query_key(search_text);
        match self.entries.get(&key) {
            None => return None,
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => {
                debug!("Cache hit for '{}'", key);
                return Some(entry.payload.clone());
            }
            Some(_) => {}
        }

        let ttl = self.ttl;
        self.entries
            .remove_if(&key, |_, entry| entry.stored_at.elapsed() > ttl);
        debug!("Cache entry for '{}' expired", key);
        None
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgor_protocols::ResultField;
    use serde_json::json;

    fn payload() -> QueryResult {
        QueryResult::new(ResultField::Images, vec![json!({"name": "a.png"})])
    }

    #[test]
    fn test_make_query_key() {
        assert_eq!(make_query_key("  Rust Book x.com "), "rust book x.com");
        assert_eq!(make_query_key(""), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_normalization_on_lookup() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.put("Rust X.com", payload());
        assert_eq!(cache.get("  rust x.com"), Some(payload()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_just_before_ttl() {
        let cache = QueryCache::new(Duration::from_millis(5000));
        cache.put("q", payload());

        tokio::time::advance(Duration::from_millis(4999)).await;
        assert!(cache.get("q").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_miss_and_evict_after_ttl() {
        let cache = QueryCache::new(Duration::from_millis(5000));
        cache.put("q", payload());

        tokio::time::advance(Duration::from_millis(5001)).await;
        assert!(cache.get("q").is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_refreshes_timestamp() {
        let cache = QueryCache::new(Duration::from_millis(1000));
        cache.put("q", payload());
        tokio::time::advance(Duration::from_millis(800)).await;
        cache.put("q", payload());
        tokio::time::advance(Duration::from_millis(800)).await;
        assert!(cache.get("q").is_some());
    }

    #[test]
    fn test_clear() {
        let cache = QueryCache::new(Duration::from_secs(1));
        cache.put("a", payload());
        cache.put("b", payload());
        cache.clear();
        assert!(cache.is_empty());
    }
}
