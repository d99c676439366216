//! Result cache: raw key-value stores plus the typed pair adapter
//!
//! [`CacheStore`] is the get/set-with-expiry capability of an external store.
//! [`PairCache`] sits on top of it and owns the value encoding, so a store only
//! ever sees opaque strings.

use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use twosum_core_pairs::{decode_pair, encode_pair, CacheKey, PairMatch};

/// Key-value store with per-entry expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

/// How often writes sweep every expired entry out of a [`MemoryCacheStore`]
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// In-process cache store
///
/// An expired entry is evicted when its key is read. Writes also sweep all
/// expired entries, at most once per sweep interval, so keys that are never
/// read again do not accumulate.
#[derive(Debug)]
pub struct MemoryCacheStore {
    entries: DashMap<String, MemoryEntry>,
    sweep_interval: Duration,
    next_sweep: Mutex<Instant>,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sweep_interval(sweep_interval: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            sweep_interval,
            next_sweep: Mutex::new(Instant::now() + sweep_interval),
        }
    }

    /// Drop every expired entry and return how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    fn sweep_if_due(&self, now: Instant) {
        {
            let mut next_sweep = self.next_sweep.lock().unwrap_or_else(|e| e.into_inner());
            if now < *next_sweep {
                return;
            }
            *next_sweep = now + self.sweep_interval;
        }

        let removed = self.purge_expired();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.entries.len(), "swept expired cache entries");
        }
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();

        match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => {}
            None => return Ok(None),
        }

        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
        let now = Instant::now();
        self.sweep_if_due(now);

        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}

#[cfg(feature = "redis-cache")]
pub use self::redis_store::RedisCacheStore;

#[cfg(feature = "redis-cache")]
mod redis_store {
    use super::CacheStore;
    use crate::error::StoreError;
    use async_trait::async_trait;
    use redis::aio::ConnectionManager;
    use redis::AsyncCommands;
    use std::time::Duration;

    /// Cache store backed by a Redis server
    #[derive(Clone)]
    pub struct RedisCacheStore {
        connection: ConnectionManager,
    }

    impl RedisCacheStore {
        pub async fn connect(host: &str, port: u16, db: i64) -> Result<Self, StoreError> {
            let url = format!("redis://{}:{}/{}", host, port, db);
            let client = redis::Client::open(url)?;
            let connection = ConnectionManager::new(client).await?;
            tracing::info!(host, port, db, "connected to redis cache");
            Ok(Self { connection })
        }
    }

    #[async_trait]
    impl CacheStore for RedisCacheStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            let mut connection = self.connection.clone();
            let value: Option<String> = connection.get(key).await?;
            Ok(value)
        }

        async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
            let mut connection = self.connection.clone();
            // SETEX rejects a zero expiry
            let seconds = ttl.as_secs().max(1);
            let _: () = connection.set_ex(key, value, seconds).await?;
            Ok(())
        }
    }
}

/// Typed cache of computed pairs
#[derive(Clone)]
pub struct PairCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl PairCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch and decode the pair cached under `key`
    pub async fn lookup(&self, key: &CacheKey) -> Result<Option<PairMatch>, StoreError> {
        match self.store.get(key.as_str()).await? {
            Some(raw) => Ok(Some(decode_pair(&raw)?)),
            None => Ok(None),
        }
    }

    /// Cache `pair` under `key` for the configured TTL
    pub async fn fill(&self, key: &CacheKey, pair: &PairMatch) -> Result<(), StoreError> {
        let raw = encode_pair(pair)?;
        self.store.set(key.as_str(), raw, self.ttl).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> PairMatch {
        PairMatch {
            first_index: 0,
            second_index: 1,
            first_value: 2,
            second_value: 7,
        }
    }

    #[tokio::test]
    async fn test_memory_store_expires_entries() {
        tokio::time::pause();
        let store = MemoryCacheStore::new();

        store
            .set("k", "v".to_string(), Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert!(store.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(store.get("k").await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unread_expired_entries_are_swept_on_write() {
        tokio::time::pause();
        let store = MemoryCacheStore::new();

        for i in 0..10_000 {
            let key = format!("two_sum:{},1:9", i);
            store
                .set(&key, "[0,1,8,1]".to_string(), Duration::from_secs(1))
                .await
                .unwrap();
        }
        assert_eq!(store.len(), 10_000);

        tokio::time::advance(Duration::from_secs(3600)).await;
        store
            .set("two_sum:2,7:9", "[0,1,2,7]".to_string(), Duration::from_secs(3600))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get("two_sum:2,7:9").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sweep_keeps_live_entries_and_waits_for_interval() {
        tokio::time::pause();
        let store = MemoryCacheStore::with_sweep_interval(Duration::from_secs(10));

        store.set("short", "a".to_string(), Duration::from_secs(1)).await.unwrap();
        store.set("long", "b".to_string(), Duration::from_secs(600)).await.unwrap();

        // expired but the interval has not elapsed, so nothing is swept yet
        tokio::time::advance(Duration::from_secs(5)).await;
        store.set("other", "c".to_string(), Duration::from_secs(600)).await.unwrap();
        assert_eq!(store.len(), 3);

        tokio::time::advance(Duration::from_secs(5)).await;
        store.set("another", "d".to_string(), Duration::from_secs(600)).await.unwrap();
        assert_eq!(store.len(), 3);
        assert!(store.get("long").await.unwrap().is_some());
        assert!(store.get("short").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_purge_expired_reports_removed_count() {
        tokio::time::pause();
        let store = MemoryCacheStore::new();
        store.set("a", "1".to_string(), Duration::from_secs(1)).await.unwrap();
        store.set("b", "2".to_string(), Duration::from_secs(1)).await.unwrap();
        store.set("c", "3".to_string(), Duration::from_secs(120)).await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(store.purge_expired(), 2);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_pair_cache_round_trip() {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = PairCache::new(store.clone(), Duration::from_secs(60));
        let key = CacheKey::new(&[2, 7, 11, 15], 9);

        assert!(cache.lookup(&key).await.unwrap().is_none());

        cache.fill(&key, &pair()).await.unwrap();
        assert_eq!(cache.lookup(&key).await.unwrap(), Some(pair()));
        assert_eq!(store.get(key.as_str()).await.unwrap().as_deref(), Some("[0,1,2,7]"));
    }

    #[tokio::test]
    async fn test_pair_cache_rejects_corrupt_value() {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = PairCache::new(store.clone(), Duration::from_secs(60));
        let key = CacheKey::new(&[2, 7], 9);

        store
            .set(key.as_str(), "[0, 1, 7, 2]; DROP".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(matches!(
            cache.lookup(&key).await,
            Err(StoreError::Codec(_))
        ));
    }
}
