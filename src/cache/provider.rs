//! Providers resolve the current store for a cache kind.

use super::{CacheKind, CacheRegistry, SharedCache};

/// Indirection between a memoized computation and its store.
///
/// Resolved on every call, so a store registered after the wrapper was
/// installed is still picked up.
pub trait CacheProvider: Send + Sync {
    /// The store currently registered for this provider's kind.
    fn provide_cache(&self) -> Option<SharedCache>;
}

/// Provider reading a single registry slot.
#[derive(Debug, Clone)]
pub struct SlotProvider {
    kind: CacheKind,
    registry: CacheRegistry,
}

impl SlotProvider {
    fn new(kind: CacheKind, registry: &CacheRegistry) -> Self {
        Self {
            kind,
            registry: registry.clone(),
        }
    }

    /// Kind this provider reads.
    pub fn kind(&self) -> CacheKind {
        self.kind
    }
}

impl CacheProvider for SlotProvider {
    fn provide_cache(&self) -> Option<SharedCache> {
        self.registry.get(self.kind)
    }
}

/// Provider for `kind`, or `None` for kinds without one.
///
/// Only [`CacheKind::Zone`] and [`CacheKind::Memory`] have providers; the
/// other kinds disable caching.
pub fn provider_by_kind(kind: CacheKind, registry: &CacheRegistry) -> Option<Box<dyn CacheProvider>> {
    match kind {
        CacheKind::Zone | CacheKind::Memory => Some(Box::new(SlotProvider::new(kind, registry))),
        CacheKind::Session | CacheKind::Storage | CacheKind::File => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::{CachedValue, MemoryCache};

    #[test]
    fn test_placeholder_kinds_have_no_provider() {
        let registry = CacheRegistry::new();
        assert!(provider_by_kind(CacheKind::Session, &registry).is_none());
        assert!(provider_by_kind(CacheKind::Storage, &registry).is_none());
        assert!(provider_by_kind(CacheKind::File, &registry).is_none());
    }

    #[test]
    fn test_provider_sees_late_registration() {
        let registry = CacheRegistry::new();
        let provider = provider_by_kind(CacheKind::Memory, &registry).unwrap();
        assert!(provider.provide_cache().is_none());

        registry
            .register(
                CacheKind::Memory,
                Arc::new(MemoryCache::<String, CachedValue>::new("memory")),
            )
            .unwrap();
        assert!(provider.provide_cache().is_some());

        registry.unregister(CacheKind::Memory);
        assert!(provider.provide_cache().is_none());
    }

    #[test]
    fn test_provider_reads_own_slot() {
        let registry = CacheRegistry::new();
        registry
            .register(
                CacheKind::Zone,
                Arc::new(MemoryCache::<String, CachedValue>::new("zone")),
            )
            .unwrap();

        let zone = provider_by_kind(CacheKind::Zone, &registry).unwrap();
        let memory = provider_by_kind(CacheKind::Memory, &registry).unwrap();
        assert!(zone.provide_cache().is_some());
        assert!(memory.provide_cache().is_none());
    }
}
