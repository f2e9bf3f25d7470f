//! Composition root for the built-in stores.

use std::sync::Arc;

use tracing::{debug, info};

use super::{CacheKind, CacheRegistry, GlobalMemoryCache};
use crate::config::Config;
use crate::error::Result;
use crate::zone::{TurnNotifier, ZoneCache};

/// Stores built and registered by [`CacheModule::install`].
#[derive(Debug, Default, Clone)]
pub struct CacheModule {
    /// Turn-scoped store, when enabled.
    pub zone: Option<Arc<ZoneCache>>,

    /// Process-lifetime store, when enabled.
    pub memory: Option<Arc<GlobalMemoryCache>>,
}

impl CacheModule {
    /// Build the stores enabled in `config` and register them.
    ///
    /// The zone store subscribes to `notifier`. Fails if a slot is already
    /// taken; stores registered before the failure stay registered.
    pub fn install(
        config: &Config,
        registry: &CacheRegistry,
        notifier: Arc<dyn TurnNotifier>,
    ) -> Result<Self> {
        let mut module = Self::default();

        for kind in &config.kinds {
            match kind {
                CacheKind::Zone => {
                    let zone = Arc::new(ZoneCache::with_logging(notifier.clone(), config.logging));
                    registry.register(CacheKind::Zone, zone.clone())?;
                    module.zone = Some(zone);
                }
                CacheKind::Memory => {
                    let memory =
                        Arc::new(GlobalMemoryCache::new("memory").with_logging(config.logging));
                    registry.register(CacheKind::Memory, memory.clone())?;
                    module.memory = Some(memory);
                }
                other => debug!("No store available for {} caches, skipping", other),
            }
        }

        info!("Cache module installed: {:?}", registry);
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use crate::error::CacheError;
    use crate::zone::TurnZone;

    #[test]
    fn test_install_defaults() {
        let registry = CacheRegistry::new();
        let module = CacheModule::install(&Config::default(), &registry, Arc::new(TurnZone::new()))
            .unwrap();

        assert!(module.zone.is_some());
        assert!(module.memory.is_some());
        assert_eq!(registry.kinds(), vec![CacheKind::Zone, CacheKind::Memory]);
    }

    #[test]
    fn test_placeholder_kinds_build_nothing() {
        let registry = CacheRegistry::new();
        let config = Config::default().kinds([CacheKind::Memory, CacheKind::File]);
        let module = CacheModule::install(&config, &registry, Arc::new(TurnZone::new())).unwrap();

        assert!(module.zone.is_none());
        assert_eq!(registry.kinds(), vec![CacheKind::Memory]);
    }

    #[test]
    fn test_installed_zone_follows_notifier() {
        let registry = CacheRegistry::new();
        let zone = TurnZone::new();
        let config = Config::default().kinds([CacheKind::Zone]);
        CacheModule::install(&config, &registry, Arc::new(zone.clone())).unwrap();

        let store = registry.get(CacheKind::Zone).unwrap();
        zone.run(|| {
            store.set_cached_value("k".to_string(), Arc::new(1u8));
        });
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_second_install_conflicts() {
        let registry = CacheRegistry::new();
        let notifier: Arc<dyn TurnNotifier> = Arc::new(TurnZone::new());
        CacheModule::install(&Config::default(), &registry, notifier.clone()).unwrap();

        let err = CacheModule::install(&Config::default(), &registry, notifier).unwrap_err();
        assert_eq!(err, CacheError::AlreadyRegistered { kind: CacheKind::Zone });
    }

    #[test]
    fn test_failed_install_leaves_no_listeners() {
        let registry = CacheRegistry::new();
        let zone = TurnZone::new();
        CacheModule::install(&Config::default(), &registry, Arc::new(zone.clone())).unwrap();
        let attached = format!("{:?}", zone);

        for _ in 0..3 {
            assert!(CacheModule::install(&Config::default(), &registry, Arc::new(zone.clone())).is_err());
        }

        assert_eq!(format!("{:?}", zone), attached);
        assert!(attached.contains("start_listeners: 1, idle_listeners: 1"));
    }
}
