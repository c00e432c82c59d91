//! Configuration Module
//!
//! Handles cache and fetcher configuration, loadable from environment variables.

use std::env;
use std::time::Duration;

/// Default maximum number of cache entries
pub const DEFAULT_CAPACITY: usize = 100;

/// Default entry lifetime (12 hours)
pub const DEFAULT_ENTRY_LIFETIME: Duration = Duration::from_secs(12 * 60 * 60);

/// Default request timeout for the HTTP fetcher
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// == Cache Config ==
/// Construction-time parameters of a [`Cache`](crate::cache::Cache).
///
/// ```
/// # use image_cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .capacity(500)
///     .entry_lifetime(Duration::from_secs(600));
/// assert_eq!(config.capacity, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub capacity: usize,
    /// Time-to-live applied to new and refreshed entries
    pub entry_lifetime: Duration,
    /// Optional soft ceiling on the summed entry cost (needs a weigher)
    pub max_total_cost: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            entry_lifetime: DEFAULT_ENTRY_LIFETIME,
            max_total_cost: None,
        }
    }
}

impl CacheConfig {
    /// Creates a config with the default capacity and lifetime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of entries. Zero is clamped to one.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Sets the lifetime of new and refreshed entries.
    pub fn entry_lifetime(mut self, lifetime: Duration) -> Self {
        self.entry_lifetime = lifetime;
        self
    }

    /// Sets the soft ceiling on the total cost of cached entries.
    pub fn max_total_cost(mut self, max_cost: usize) -> Self {
        self.max_total_cost = Some(max_cost);
        self
    }
}

// == Config ==
/// Full configuration of the default loader wiring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Cache parameters
    pub cache: CacheConfig,
    /// Per-request timeout of the HTTP fetcher
    pub fetch_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 100)
    /// - `CACHE_ENTRY_LIFETIME_SECS` - Entry lifetime in seconds (default: 43200)
    /// - `CACHE_MAX_COST_BYTES` - Soft byte ceiling (default: unset)
    /// - `FETCH_TIMEOUT_SECS` - HTTP request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let mut cache = CacheConfig::new();
        if let Some(capacity) = env_parse::<usize>("CACHE_CAPACITY") {
            cache = cache.capacity(capacity);
        }
        if let Some(secs) = env_parse::<u64>("CACHE_ENTRY_LIFETIME_SECS") {
            cache = cache.entry_lifetime(Duration::from_secs(secs));
        }
        if let Some(max_cost) = env_parse::<usize>("CACHE_MAX_COST_BYTES") {
            cache = cache.max_total_cost(max_cost);
        }

        Self {
            cache,
            fetch_timeout: env_parse::<u64>("FETCH_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_FETCH_TIMEOUT),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache.capacity, 100);
        assert_eq!(config.cache.entry_lifetime, Duration::from_secs(43_200));
        assert_eq!(config.cache.max_total_cost, None);
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_capacity_zero_is_clamped() {
        let config = CacheConfig::new().capacity(0);
        assert_eq!(config.capacity, 1);
    }

    #[test]
    fn test_config_from_env() {
        // Only this test reads or writes these variables
        env::remove_var("CACHE_MAX_COST_BYTES");
        env::remove_var("FETCH_TIMEOUT_SECS");
        env::set_var("CACHE_CAPACITY", "250");
        env::set_var("CACHE_ENTRY_LIFETIME_SECS", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.cache.capacity, 250);
        assert_eq!(config.cache.entry_lifetime, DEFAULT_ENTRY_LIFETIME);
        assert_eq!(config.cache.max_total_cost, None);
        assert_eq!(config.fetch_timeout, DEFAULT_FETCH_TIMEOUT);

        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_ENTRY_LIFETIME_SECS");
    }
}
