//! Process-local snapshot cache.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use postline_core::cache::{Cache, Result};

/// A cached value and the instant it stops being served.
#[derive(Debug, Clone)]
struct Slot {
    value: Vec<u8>,
    deadline: Option<Instant>,
}

impl Slot {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let deadline = ttl.map(|d| Instant::now() + d);
        Self { value, deadline }
    }

    fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// In-memory cache with LRU eviction.
///
/// Expired entries are dropped lazily on access. When `max_entries` is
/// reached the least recently used entry is evicted.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    slots: Arc<RwLock<LruCache<String, Slot>>>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` values (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            slots: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of entries currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // LRU bookkeeping mutates on read.
        let mut slots = self.slots.write().await;

        let hit = slots
            .get(key)
            .filter(|slot| !slot.is_expired())
            .map(|slot| slot.value.clone());
        if hit.is_none() {
            // Drop a lapsed slot so it stops counting against capacity.
            slots.pop(key);
        }
        Ok(hit)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut slots = self.slots.write().await;
        slots.put(key.to_string(), Slot::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut slots = self.slots.write().await;
        Ok(slots.pop(key).is_some_and(|slot| !slot.is_expired()))
    }
}
