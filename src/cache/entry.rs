//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with expiration support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Time of the insert or last refreshing read
    pub created_at: Instant,
    /// Absolute time after which the entry is stale
    pub expires_at: Instant,
    /// Weight counted against the cost ceiling (0 without a weigher)
    pub cost: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `lifetime` from now.
    pub fn new(value: V, lifetime: Duration, cost: usize) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: expiry_from(now, lifetime),
            cost,
        }
    }

    // == Is Stale ==
    /// Checks if the entry is stale.
    ///
    /// Boundary condition: an entry is stale only once the current time is
    /// strictly past `expires_at`.
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Instant::now())
    }

    /// Staleness relative to a given instant.
    pub fn is_stale_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    // == Refresh ==
    /// Restarts the entry's lifetime as if it had just been inserted.
    pub fn refresh(&mut self, lifetime: Duration) {
        let now = Instant::now();
        self.created_at = now;
        self.expires_at = expiry_from(now, lifetime);
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, zero once stale.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// `now + lifetime`, saturating far in the future for huge lifetimes.
fn expiry_from(now: Instant, lifetime: Duration) -> Instant {
    now.checked_add(lifetime)
        .unwrap_or_else(|| now + Duration::from_secs(100 * 365 * 24 * 60 * 60))
}
