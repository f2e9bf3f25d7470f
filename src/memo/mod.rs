//! Memoization of computations against registry stores.
//!
//! A [`Memoizer`] is installed once per wrapped computation. It owns a unique
//! token and a provider for its cache kind; each call keys the store with
//! `token.receiver.args` and computes only on a miss.
//!
//! ```
//! use std::sync::Arc;
//! use memocache::{memoize, CacheKind, CacheRegistry, GlobalMemoryCache, KeySource};
//!
//! struct Calculator;
//! impl KeySource for Calculator {}
//!
//! let registry = CacheRegistry::new();
//! registry
//!     .register(CacheKind::Memory, Arc::new(GlobalMemoryCache::new("memory")))
//!     .unwrap();
//!
//! let add = memoize(CacheKind::Memory, &registry, |_: &Calculator, (a, b): &(i64, i64)| a + b);
//! assert_eq!(add.call(&Calculator, (2, 3)), 5);
//! assert_eq!(add.call(&Calculator, (2, 3)), 5);
//! ```

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, trace};
use uuid::Uuid;

use crate::cache::{provider_by_kind, CacheKey, CacheKind, CacheProvider, CacheRegistry, SharedCache};
use crate::key::{CacheKeyBuilder, KeySource};

/// Memoization state for one wrapped computation.
pub struct Memoizer {
    token: String,
    kind: CacheKind,
    provider: Option<Box<dyn CacheProvider>>,
}

impl Memoizer {
    /// Generate a token and resolve the provider for `kind`.
    ///
    /// Kinds without a provider produce a memoizer that always recomputes.
    pub fn install(kind: CacheKind, registry: &CacheRegistry) -> Self {
        let token = Uuid::new_v4().to_string();
        let provider = provider_by_kind(kind, registry);
        debug!(
            "Installed {} memoizer {} (provider: {})",
            kind,
            token,
            provider.is_some()
        );
        Self {
            token,
            kind,
            provider,
        }
    }

    /// Memoizer backed by the turn-scoped store.
    pub fn zone(registry: &CacheRegistry) -> Self {
        Self::install(CacheKind::Zone, registry)
    }

    /// Memoizer backed by the process-lifetime store.
    pub fn memory(registry: &CacheRegistry) -> Self {
        Self::install(CacheKind::Memory, registry)
    }

    /// Token prefixed to every key.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Kind this memoizer was installed for.
    pub fn kind(&self) -> CacheKind {
        self.kind
    }

    /// Store for this call, if caching is currently possible.
    pub fn current_cache(&self) -> Option<SharedCache> {
        self.provider.as_ref()?.provide_cache()
    }

    /// Key for a call on `receiver` with `args`.
    pub fn key_for<R, A>(&self, receiver: &R, args: &A) -> CacheKey
    where
        R: KeySource + ?Sized,
        A: KeySource + ?Sized,
    {
        CacheKeyBuilder::new()
            .append_one(self.token.as_str())
            .append_one(receiver)
            .append_one(args)
            .build()
    }

    /// Return the cached result for this call, or compute and store it.
    pub fn get_or_compute<R, A, T, F>(&self, receiver: &R, args: &A, compute: F) -> T
    where
        R: KeySource + ?Sized,
        A: KeySource + ?Sized,
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        let Some(cache) = self.current_cache() else {
            return compute();
        };

        let key = self.key_for(receiver, args);
        if let Some(value) = lookup::<T>(&cache, &key) {
            return value;
        }

        store(&cache, key, compute())
    }

    /// Like [`get_or_compute`](Self::get_or_compute) for fallible work.
    ///
    /// Only `Ok` values are stored; an `Err` is returned as is.
    pub fn try_get_or_compute<R, A, T, E, F>(&self, receiver: &R, args: &A, compute: F) -> Result<T, E>
    where
        R: KeySource + ?Sized,
        A: KeySource + ?Sized,
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let Some(cache) = self.current_cache() else {
            return compute();
        };

        let key = self.key_for(receiver, args);
        if let Some(value) = lookup::<T>(&cache, &key) {
            return Ok(value);
        }

        Ok(store(&cache, key, compute()?))
    }

    /// Async [`get_or_compute`](Self::get_or_compute).
    ///
    /// Identical calls that miss while the first is still pending compute
    /// again; the last to finish wins.
    pub async fn get_or_compute_async<R, A, T, F, Fut>(&self, receiver: &R, args: &A, compute: F) -> T
    where
        R: KeySource + ?Sized,
        A: KeySource + ?Sized,
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let Some(cache) = self.current_cache() else {
            return compute().await;
        };

        let key = self.key_for(receiver, args);
        if let Some(value) = lookup::<T>(&cache, &key) {
            return value;
        }

        let value = compute().await;
        store(&cache, key, value)
    }

    /// Async [`try_get_or_compute`](Self::try_get_or_compute).
    pub async fn try_get_or_compute_async<R, A, T, E, F, Fut>(
        &self,
        receiver: &R,
        args: &A,
        compute: F,
    ) -> Result<T, E>
    where
        R: KeySource + ?Sized,
        A: KeySource + ?Sized,
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(cache) = self.current_cache() else {
            return compute().await;
        };

        let key = self.key_for(receiver, args);
        if let Some(value) = lookup::<T>(&cache, &key) {
            return Ok(value);
        }

        let value = compute().await?;
        Ok(store(&cache, key, value))
    }
}

impl std::fmt::Debug for Memoizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoizer")
            .field("token", &self.token)
            .field("kind", &self.kind)
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

fn lookup<T: Clone + 'static>(cache: &SharedCache, key: &CacheKey) -> Option<T> {
    let Some(value) = cache.get_cached_value(key) else {
        trace!("Memo miss: {}", key);
        return None;
    };
    match (*value).downcast_ref::<T>() {
        Some(hit) => {
            trace!("Memo hit: {}", key);
            Some(hit.clone())
        }
        None => {
            trace!("Memo entry for {} holds another type, recomputing", key);
            None
        }
    }
}

fn store<T: Clone + Send + Sync + 'static>(cache: &SharedCache, key: CacheKey, value: T) -> T {
    cache.set_cached_value(key, Arc::new(value.clone()));
    value
}

/// A function wrapped with a [`Memoizer`].
///
/// The receiver and arguments are passed explicitly; both take part in the
/// key. Use `()` as the receiver for free functions.
pub struct Memoized<F> {
    memoizer: Memoizer,
    f: F,
}

/// Wrap `f` so calls are memoized in the `kind` store of `registry`.
pub fn memoize<F>(kind: CacheKind, registry: &CacheRegistry, f: F) -> Memoized<F> {
    Memoized {
        memoizer: Memoizer::install(kind, registry),
        f,
    }
}

impl<F> Memoized<F> {
    /// Call through the cache.
    pub fn call<R, A, T>(&self, receiver: &R, args: A) -> T
    where
        F: Fn(&R, &A) -> T,
        R: KeySource + ?Sized,
        A: KeySource,
        T: Clone + Send + Sync + 'static,
    {
        self.memoizer
            .get_or_compute(receiver, &args, || (self.f)(receiver, &args))
    }

    /// Call through the cache, storing only successful results.
    pub fn try_call<R, A, T, E>(&self, receiver: &R, args: A) -> Result<T, E>
    where
        F: Fn(&R, &A) -> Result<T, E>,
        R: KeySource + ?Sized,
        A: KeySource,
        T: Clone + Send + Sync + 'static,
    {
        self.memoizer
            .try_get_or_compute(receiver, &args, || (self.f)(receiver, &args))
    }

    /// The underlying memoizer.
    pub fn memoizer(&self) -> &Memoizer {
        &self.memoizer
    }
}

impl<F> std::fmt::Debug for Memoized<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("memoizer", &self.memoizer)
            .finish()
    }
}
