use anyhow::Result;
use async_trait::async_trait;
use lru::LruCache;
use serde::{Serialize, de::DeserializeOwned};
use std::num::NonZeroUsize;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use super::keys::{CacheKey, KeyClass};
use crate::constants::QUERY_CACHE_CAPACITY;

/// Injected query-cache capability. Controllers depend on this interface,
/// never on a module-level singleton, so hosts can share an existing cache.
#[async_trait]
pub trait QueryCache: Send + Sync {
    async fn get_value(&self, key: &CacheKey) -> Option<serde_json::Value>;

    async fn put_value(&self, key: CacheKey, value: serde_json::Value);

    /// Drop a single entry.
    async fn invalidate(&self, key: &CacheKey);

    /// Drop every entry of a key family (all `page-data:*` at once).
    async fn invalidate_class(&self, class: KeyClass);
}

/// Typed convenience wrappers over the JSON-value trait surface.
pub async fn get_typed<T: DeserializeOwned>(cache: &dyn QueryCache, key: &CacheKey) -> Option<T> {
    let value = cache.get_value(key).await?;
    match serde_json::from_value(value) {
        Ok(typed) => Some(typed),
        Err(e) => {
            debug!("Discarding cache entry {} with stale shape: {}", key, e);
            cache.invalidate(key).await;
            None
        }
    }
}

pub async fn put_typed<T: Serialize>(cache: &dyn QueryCache, key: CacheKey, value: &T) -> Result<()> {
    let json = serde_json::to_value(value)?;
    cache.put_value(key, json).await;
    Ok(())
}

/// In-memory LRU query cache. Values are stored as JSON so heterogeneous
/// query results share one store.
pub struct MemoryCache {
    entries: RwLock<LruCache<CacheKey, serde_json::Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(QUERY_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryCache for MemoryCache {
    async fn get_value(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let mut entries = self.entries.write().await;
        let hit = entries.get(key).cloned();
        trace!("Cache {} for {}", if hit.is_some() { "hit" } else { "miss" }, key);
        hit
    }

    async fn put_value(&self, key: CacheKey, value: serde_json::Value) {
        let mut entries = self.entries.write().await;
        entries.put(key, value);
    }

    async fn invalidate(&self, key: &CacheKey) {
        let mut entries = self.entries.write().await;
        if entries.pop(key).is_some() {
            debug!("Invalidated cache entry {}", key);
        }
    }

    async fn invalidate_class(&self, class: KeyClass) {
        let mut entries = self.entries.write().await;
        let stale: Vec<CacheKey> = entries
            .iter()
            .filter(|(key, _)| key.class() == class)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            entries.pop(key);
        }
        if !stale.is_empty() {
            debug!("Invalidated {} entries in class {:?}", stale.len(), class);
        }
    }
}
