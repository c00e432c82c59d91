//! Caching Loader Module
//!
//! Composes a [`CacheBackend`] and a [`Fetcher`]: cache lookup first, fetch on
//! a miss, store on success.
//!
//! # Per-call flow
//! - lookup hit: return the cached value, the fetcher is not called
//! - lookup miss: call the fetcher with no cache lock held
//!   - success: store under the identifier, return the value
//!   - failure: store nothing, return [`LoaderError::LoadingFailed`]
//!
//! No retries happen here.
//!
//! # Concurrent cold loads
//! In-flight requests are not coalesced. Two concurrent loads of the same
//! missing identifier both call the fetcher and both store; the later store
//! wins.

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::cache::{Cache, CacheBackend, Weigher};
use crate::config::{CacheConfig, Config};
use crate::error::{FetchError, LoaderError, Result};
use crate::events::{Event, EventHook, TracingHook};
use crate::fetch::{Fetcher, HttpFetcher};

/// Default cache type owned by a loader built without an explicit backend.
pub type DefaultCache<K, V> = Arc<Cache<K, V>>;

// == Caching Loader ==
/// Cache-then-remote loader.
pub struct CachingLoader<K, F, C = DefaultCache<K, <F as Fetcher<K>>::Output>>
where
    K: Sync,
    F: Fetcher<K>,
{
    cache: C,
    fetcher: F,
    hook: Arc<dyn EventHook<K>>,
    _key: PhantomData<fn(&K)>,
}

impl<K, F> CachingLoader<K, F>
where
    K: Hash + Eq + Clone + Debug + Send + Sync + 'static,
    F: Fetcher<K>,
    F::Output: Clone,
{
    /// Builds a loader owning a fresh default [`Cache`].
    pub fn with_fetcher(fetcher: F) -> Self {
        Self::with_cache_config(fetcher, CacheConfig::default())
    }

    /// Builds a loader owning a fresh [`Cache`] with the given parameters.
    pub fn with_cache_config(fetcher: F, config: CacheConfig) -> Self {
        Self::new(Arc::new(Cache::new(config)), fetcher)
    }

    /// The loader's own cache, for inspection or sharing.
    pub fn cache(&self) -> &Arc<Cache<K, F::Output>> {
        &self.cache
    }
}

impl<K> CachingLoader<K, HttpFetcher>
where
    K: AsRef<str> + Hash + Eq + Clone + Debug + Send + Sync + 'static,
{
    /// Default wiring: an HTTP fetcher and an internal cache, both from `config`.
    ///
    /// Entries are weighed by their byte length, so `max_total_cost` caps the
    /// cached payload size.
    pub fn from_config(config: &Config) -> std::result::Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(config.fetch_timeout)?;
        let weigher: Weigher<Vec<u8>> = Arc::new(|bytes: &Vec<u8>| bytes.len());
        let cache = Cache::with_weigher(config.cache.clone(), weigher);
        Ok(Self::new(Arc::new(cache), fetcher))
    }
}

impl<K, F, C> CachingLoader<K, F, C>
where
    K: Clone + Debug + Send + Sync + 'static,
    F: Fetcher<K>,
    F::Output: Clone,
    C: CacheBackend<K, F::Output>,
{
    /// Builds a loader over an injected cache backend and fetcher.
    pub fn new(cache: C, fetcher: F) -> Self {
        Self::with_hook(cache, fetcher, Arc::new(TracingHook))
    }
}

impl<K, F, C> CachingLoader<K, F, C>
where
    K: Clone + Send + Sync,
    F: Fetcher<K>,
    F::Output: Clone,
    C: CacheBackend<K, F::Output>,
{
    /// Builds a loader that reports fetch events to `hook`.
    pub fn with_hook(cache: C, fetcher: F, hook: Arc<dyn EventHook<K>>) -> Self {
        Self {
            cache,
            fetcher,
            hook,
            _key: PhantomData,
        }
    }

    // == Load ==
    /// Returns the cached value for `identifier`, or fetches and caches it.
    ///
    /// Dropping the returned future before it completes cancels the load; the
    /// cache is written only after a successful fetch has fully completed.
    pub async fn load(&self, identifier: &K) -> Result<F::Output> {
        if let Some(value) = self.cache.read(identifier) {
            return Ok(value);
        }

        self.hook.on_event(&Event::FetchStarted { key: identifier });

        match self.fetcher.load(identifier).await {
            Ok(value) => {
                self.hook.on_event(&Event::FetchSucceeded { key: identifier });
                self.cache.write(identifier.clone(), value.clone());
                Ok(value)
            }
            Err(err) => {
                let reason = err.to_string();
                self.hook.on_event(&Event::FetchFailed {
                    key: identifier,
                    reason: &reason,
                });
                Err(LoaderError::LoadingFailed(reason))
            }
        }
    }

    // == Load Or Cancel ==
    /// Like [`load`](Self::load), but gives up with [`LoaderError::Cancelled`]
    /// as soon as `cancel` completes. A cancelled load writes nothing.
    pub async fn load_or_cancel<S>(&self, identifier: &K, cancel: S) -> Result<F::Output>
    where
        S: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                self.hook.on_event(&Event::Cancelled { key: identifier });
                Err(LoaderError::Cancelled)
            }
            result = self.load(identifier) => result,
        }
    }

    /// The fetcher this loader calls on a miss.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
