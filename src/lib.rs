//! memocache - transparent memoization with scoped caches.
//!
//! Wraps computations so repeated calls with an equivalent receiver and
//! arguments return a cached result instead of recomputing.
//!
//! ## Architecture
//!
//! - `key` - Deterministic cache keys from receivers and arguments
//! - `cache` - Store contract, in-memory store, registry and providers
//! - `zone` - Turn notifications and the turn-scoped store
//! - `memo` - Memoizer and the `memoize` combinator
//! - `config` - Environment configuration
//! - `error` - Setup errors
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use memocache::{memoize, CacheKind, CacheModule, CacheRegistry, Config, TurnZone};
//!
//! let registry = CacheRegistry::new();
//! let zone = TurnZone::new();
//! CacheModule::install(&Config::default(), &registry, Arc::new(zone.clone())).unwrap();
//!
//! let label = memoize(CacheKind::Zone, &registry, |_: &(), id: &u32| format!("item-{}", id));
//!
//! zone.run(|| {
//!     assert_eq!(label.call(&(), 7), "item-7");
//!     assert_eq!(label.call(&(), 7), "item-7"); // served from the zone cache
//! });
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod memo;
pub mod zone;

pub use cache::{
    provider_by_kind, Cache, CacheKey, CacheKind, CacheModule, CacheProvider, CacheRegistry,
    CachedValue, GlobalMemoryCache, MemoryCache, SharedCache,
};
pub use config::Config;
pub use error::{CacheError, Result};
pub use key::{CacheKeyBuilder, KeyPart, KeySource, Undefined};
pub use memo::{memoize, Memoized, Memoizer};
pub use zone::{SubscriptionId, TurnGuard, TurnNotifier, TurnZone, ZoneCache};
