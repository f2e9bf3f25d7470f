//! Process-lifetime in-memory store.

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use tracing::debug;

use super::{Cache, CacheKey, CachedValue};

/// The memory store as registered for [`CacheKind::Memory`](super::CacheKind::Memory).
pub type GlobalMemoryCache = MemoryCache<CacheKey, CachedValue>;

/// Unbounded map-backed cache.
///
/// This cache is:
/// - Thread-safe (`DashMap` shards internally)
/// - Never evicted; entries leave only through [`Cache::clear`]
/// - Clone-friendly (cloning shares the same underlying map)
pub struct MemoryCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<DashMap<K, V>>,
    name: Arc<str>,
    logging: Arc<AtomicBool>,
}

// Manual Clone implementation that doesn't require K: Clone
impl<K, V> Clone for MemoryCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            name: Arc::clone(&self.name),
            logging: Arc::clone(&self.logging),
        }
    }
}

impl<K, V> MemoryCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty cache with the given name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            name: name.into(),
            logging: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enable or disable debug logging of writes and clears.
    #[must_use]
    pub fn with_logging(self, enabled: bool) -> Self {
        self.set_logging(enabled);
        self
    }

    /// Enable or disable debug logging on this cache and all its clones.
    pub fn set_logging(&self, enabled: bool) {
        self.logging.store(enabled, Ordering::Relaxed);
    }

    /// Whether debug logging is enabled.
    pub fn is_logging_enabled(&self) -> bool {
        self.logging.load(Ordering::Relaxed)
    }

    /// Get the name of this cache.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if a key exists in the cache.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Check if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get_cached_value(&self, key: &K) -> Option<V> {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    fn set_cached_value(&self, key: K, value: V) -> V {
        self.inner.insert(key, value.clone());
        if self.is_logging_enabled() {
            debug!("[{}] stored entry, size is now {}", self.name, self.inner.len());
        }
        value
    }

    fn clear(&self) {
        let count = self.inner.len();
        self.inner.clear();
        if self.is_logging_enabled() {
            debug!("[{}] cleared {} entries", self.name, count);
        }
    }

    fn size(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> std::fmt::Debug for MemoryCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("name", &self.name)
            .field("entry_count", &self.inner.len())
            .finish()
    }
}
