//! The contract every backing store satisfies.

use std::any::Any;
use std::sync::Arc;

/// Cache key type used by memoization.
pub type CacheKey = String;

/// Type-erased value held by registry stores.
///
/// One store serves every memoized computation, so values are stored behind
/// `Any` and downcast by the reader.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

/// A store shared through the registry.
pub type SharedCache = Arc<dyn Cache<CacheKey, CachedValue>>;

/// Minimal cache interface.
///
/// `get_cached_value` returns `None` only for absent keys. A present entry is
/// always `Some`, whatever the value, so a cached "empty" result such as
/// `Option::<T>::None` is still a hit.
pub trait Cache<K, V>: Send + Sync {
    /// Look up `key`.
    fn get_cached_value(&self, key: &K) -> Option<V>;

    /// Store `value` under `key`, returning the stored value.
    fn set_cached_value(&self, key: K, value: V) -> V;

    /// Remove every entry.
    fn clear(&self);

    /// Number of entries currently held.
    fn size(&self) -> usize;
}
