//! Turn-scoped cache.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::{SubscriptionId, TurnNotifier};
use crate::cache::{Cache, CacheKey, CachedValue, GlobalMemoryCache};

/// In-memory store cleared at every turn boundary.
///
/// Both "turn starts" and "turn idle" clear the cache, so a value written
/// during a turn is visible only within that turn. The subscriptions stay
/// attached until [`dispose`](Self::dispose) is called or the cache is
/// dropped.
///
/// ```
/// use std::sync::Arc;
/// use memocache::{Cache, TurnZone, ZoneCache};
///
/// let zone = TurnZone::new();
/// let cache = ZoneCache::new(Arc::new(zone.clone()));
///
/// zone.run(|| {
///     cache.set_cached_value("k".to_string(), Arc::new(1u32));
///     assert_eq!(cache.size(), 1);
/// });
/// assert_eq!(cache.size(), 0);
/// ```
pub struct ZoneCache {
    store: GlobalMemoryCache,
    notifier: Arc<dyn TurnNotifier>,
    subscriptions: Mutex<Option<(SubscriptionId, SubscriptionId)>>,
}

impl ZoneCache {
    /// Create a cache subscribed to `notifier`.
    pub fn new(notifier: Arc<dyn TurnNotifier>) -> Self {
        Self::with_logging(notifier, false)
    }

    /// Create a cache subscribed to `notifier`, logging each clear when
    /// `logging` is set.
    pub fn with_logging(notifier: Arc<dyn TurnNotifier>, logging: bool) -> Self {
        let store = GlobalMemoryCache::new("zone").with_logging(logging);

        let on_start = store.clone();
        let start = notifier.on_turn_start(Arc::new(move || {
            if on_start.is_logging_enabled() {
                debug!("[ZoneCache][turn start] Initialize the cache context zone");
            }
            on_start.clear();
        }));

        let on_idle = store.clone();
        let idle = notifier.on_turn_idle(Arc::new(move || {
            if on_idle.is_logging_enabled() {
                debug!(
                    "[ZoneCache][turn idle] Destruction of the cache context zone, {} entries will be cleared",
                    on_idle.size()
                );
            }
            on_idle.clear();
        }));

        Self {
            store,
            notifier,
            subscriptions: Mutex::new(Some((start, idle))),
        }
    }

    /// Detach from the notifier. Idempotent.
    ///
    /// Entries already stored stay until cleared explicitly.
    pub fn dispose(&self) {
        if let Some((start, idle)) = self.subscriptions.lock().take() {
            self.notifier.unsubscribe(start);
            self.notifier.unsubscribe(idle);
            debug!("ZoneCache detached from turn notifications");
        }
    }

    /// Whether the turn subscriptions are still attached.
    pub fn is_attached(&self) -> bool {
        self.subscriptions.lock().is_some()
    }

    /// Enable or disable debug logging.
    pub fn set_logging(&self, enabled: bool) {
        self.store.set_logging(enabled);
    }
}

impl Cache<CacheKey, CachedValue> for ZoneCache {
    fn get_cached_value(&self, key: &CacheKey) -> Option<CachedValue> {
        self.store.get_cached_value(key)
    }

    fn set_cached_value(&self, key: CacheKey, value: CachedValue) -> CachedValue {
        self.store.set_cached_value(key, value)
    }

    fn clear(&self) {
        self.store.clear();
    }

    fn size(&self) -> usize {
        self.store.size()
    }
}

impl Drop for ZoneCache {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ZoneCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneCache")
            .field("entry_count", &self.store.size())
            .field("attached", &self.is_attached())
            .finish()
    }
}
