//! Cache registry - one active store per cache kind.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::{CacheKind, SharedCache};
use crate::error::{CacheError, Result};

static GLOBAL: Lazy<CacheRegistry> = Lazy::new(CacheRegistry::new);

/// Slots holding the active store for each [`CacheKind`].
///
/// A slot stays empty until a store is registered for it, and holds at
/// most one store. Memoization against an empty slot recomputes every call.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use memocache::{CacheKind, CacheRegistry, GlobalMemoryCache};
///
/// let registry = CacheRegistry::new();
/// registry
///     .register(CacheKind::Memory, Arc::new(GlobalMemoryCache::new("memory")))
///     .unwrap();
///
/// assert!(registry.get(CacheKind::Memory).is_some());
/// assert!(registry.get(CacheKind::Zone).is_none());
/// ```
#[derive(Clone)]
pub struct CacheRegistry {
    slots: Arc<RwLock<HashMap<CacheKind, SharedCache>>>,
}

impl CacheRegistry {
    /// Create a new empty cache registry.
    pub fn new() -> Self {
        info!("Cache registry initialized");
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Process-wide registry for composition roots that want one.
    pub fn global() -> &'static CacheRegistry {
        &GLOBAL
    }

    /// Put `store` into the slot for `kind`.
    ///
    /// Fails with [`CacheError::AlreadyRegistered`] if the slot is taken;
    /// call [`unregister`](Self::unregister) first to swap stores.
    pub fn register(&self, kind: CacheKind, store: SharedCache) -> Result<()> {
        let mut slots = self.slots.write();

        if slots.contains_key(&kind) {
            return Err(CacheError::AlreadyRegistered { kind });
        }

        info!("Registered {} cache", kind);
        slots.insert(kind, store);
        Ok(())
    }

    /// Empty the slot for `kind`, returning the store it held.
    pub fn unregister(&self, kind: CacheKind) -> Option<SharedCache> {
        let removed = self.slots.write().remove(&kind);
        if removed.is_some() {
            debug!("Unregistered {} cache", kind);
        }
        removed
    }

    /// Current store for `kind`, if any.
    pub fn get(&self, kind: CacheKind) -> Option<SharedCache> {
        self.slots.read().get(&kind).cloned()
    }

    /// Check if a store is registered for `kind`.
    pub fn contains(&self, kind: CacheKind) -> bool {
        self.slots.read().contains_key(&kind)
    }

    /// Get the number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Check if every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Kinds with a registered store.
    pub fn kinds(&self) -> Vec<CacheKind> {
        let slots = self.slots.read();
        CacheKind::ALL
            .into_iter()
            .filter(|kind| slots.contains_key(kind))
            .collect()
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, CachedValue, MemoryCache};

    fn store(name: &str) -> SharedCache {
        Arc::new(MemoryCache::<String, CachedValue>::new(name))
    }

    #[test]
    fn test_register_and_get() {
        let registry = CacheRegistry::new();
        assert!(registry.is_empty());

        registry.register(CacheKind::Memory, store("memory")).unwrap();

        assert!(registry.contains(CacheKind::Memory));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.kinds(), vec![CacheKind::Memory]);
    }

    #[test]
    fn test_slots_are_isolated() {
        let registry = CacheRegistry::new();
        registry.register(CacheKind::Memory, store("memory")).unwrap();
        assert!(registry.get(CacheKind::Zone).is_none());

        registry.register(CacheKind::Zone, store("zone")).unwrap();

        let memory = registry.get(CacheKind::Memory).unwrap();
        let zone = registry.get(CacheKind::Zone).unwrap();
        memory.set_cached_value("k".to_string(), Arc::new(1u8));

        assert_eq!(memory.size(), 1);
        assert_eq!(zone.size(), 0);
        assert!(zone.get_cached_value(&"k".to_string()).is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = CacheRegistry::new();
        registry.register(CacheKind::Zone, store("first")).unwrap();

        let err = registry.register(CacheKind::Zone, store("second")).unwrap_err();
        assert_eq!(err, CacheError::AlreadyRegistered { kind: CacheKind::Zone });
    }

    #[test]
    fn test_unregister_frees_slot() {
        let registry = CacheRegistry::new();
        registry.register(CacheKind::Memory, store("first")).unwrap();

        assert!(registry.unregister(CacheKind::Memory).is_some());
        assert!(registry.unregister(CacheKind::Memory).is_none());
        assert!(registry.register(CacheKind::Memory, store("second")).is_ok());
    }

    #[test]
    fn test_clones_share_slots() {
        let registry = CacheRegistry::new();
        let other = registry.clone();

        other.register(CacheKind::Memory, store("memory")).unwrap();
        assert!(registry.contains(CacheKind::Memory));
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(CacheRegistry::global(), CacheRegistry::global()));
    }
}
