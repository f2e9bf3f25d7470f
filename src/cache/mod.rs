//! Cache module - the store contract, built-in stores and the registry.
//!
//! ## Architecture
//!
//! The cache system follows a registry pattern:
//! - `Cache` - Contract every backing store implements
//! - `CacheRegistry` - One slot per `CacheKind`, holding the active store
//! - `CacheProvider` - Resolves the current store for a kind at call time
//! - `MemoryCache` - Unbounded map-backed store
//! - `CacheModule` - Builds and registers the stores enabled in `Config`
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use memocache::{Cache, CacheKind, CacheModule, CacheRegistry, Config, TurnZone};
//!
//! let registry = CacheRegistry::new();
//! let zone = TurnZone::new();
//! CacheModule::install(&Config::default(), &registry, Arc::new(zone.clone())).unwrap();
//!
//! let memory = registry.get(CacheKind::Memory).unwrap();
//! memory.set_cached_value("answer".to_string(), Arc::new(42u32));
//! assert_eq!(memory.size(), 1);
//! ```

mod contract;
mod kind;
mod memory;
mod module;
mod provider;
mod registry;

pub use contract::{Cache, CacheKey, CachedValue, SharedCache};
pub use kind::CacheKind;
pub use memory::{GlobalMemoryCache, MemoryCache};
pub use module::CacheModule;
pub use provider::{provider_by_kind, CacheProvider, SlotProvider};
pub use registry::CacheRegistry;
