//! Error types for cache setup.
//!
//! Cache lookups themselves never fail: a missing provider or an empty
//! registry slot simply disables caching for that call. Errors only come
//! from wiring the registry and from configuration.

use thiserror::Error;

use crate::cache::CacheKind;

/// Errors raised while configuring or registering caches.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The registry slot for this kind already holds a store.
    #[error("a {kind} cache is already registered")]
    AlreadyRegistered { kind: CacheKind },

    /// A cache kind name could not be parsed.
    #[error("unknown cache kind: {0}")]
    UnknownKind(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias for cache setup operations.
pub type Result<T> = std::result::Result<T, CacheError>;
