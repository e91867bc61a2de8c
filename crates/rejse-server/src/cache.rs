use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct Entry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

/// In-process cache with per-entry time-to-live.
///
/// Expiry is checked on read; there is no background eviction and no cap on
/// key cardinality, which is acceptable only for small bounded key spaces
/// (here: currency codes). A lost race between two writers costs one
/// duplicate upstream fetch, nothing more.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value unless it has outlived its TTL.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() < entry.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub async fn put(&self, key: &str, value: V, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache: TtlCache<String> = TtlCache::new();
        assert!(cache.get("KRW").await.is_none());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = TtlCache::new();
        cache
            .put("KRW", "rates".to_string(), Duration::from_secs(3600))
            .await;
        assert_eq!(cache.get("KRW").await.as_deref(), Some("rates"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = TtlCache::new();
        cache
            .put("KRW", "rates".to_string(), Duration::from_secs(3600))
            .await;

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert!(cache.get("KRW").await.is_some(), "still inside TTL");

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("KRW").await.is_none(), "stale after TTL");
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_refreshes_ttl() {
        let cache = TtlCache::new();
        cache
            .put("USD", "old".to_string(), Duration::from_secs(10))
            .await;
        tokio::time::advance(Duration::from_secs(8)).await;
        cache
            .put("USD", "new".to_string(), Duration::from_secs(10))
            .await;
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get("USD").await.as_deref(), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_expire_independently() {
        let cache = TtlCache::new();
        cache
            .put("KRW", "krw".to_string(), Duration::from_secs(10))
            .await;
        cache
            .put("USD", "usd".to_string(), Duration::from_secs(100))
            .await;

        tokio::time::advance(Duration::from_secs(50)).await;
        assert!(cache.get("KRW").await.is_none());
        assert_eq!(cache.get("USD").await.as_deref(), Some("usd"));
    }
}
