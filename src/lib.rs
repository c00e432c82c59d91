//! Image Cache - a time-aware LRU cache with a caching loader
//!
//! Provides a bounded in-process cache with lazy expiration, read-refresh and
//! LRU eviction, plus a loader that serves from the cache and falls back to a
//! pluggable remote fetcher on a miss.

pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod loader;

pub use cache::{Cache, CacheBackend, CacheStats};
pub use config::{CacheConfig, Config};
pub use error::{FetchError, LoaderError};
pub use events::{Event, EventHook, NoopHook, TracingHook};
pub use fetch::{Fetcher, HttpFetcher};
pub use loader::CachingLoader;
