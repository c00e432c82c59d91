//! Observability hooks
//!
//! The cache and the loader report what they do as [`Event`]s handed to an
//! injected [`EventHook`]. [`TracingHook`] forwards them to `tracing`; any
//! `Fn(&Event<K>) + Send + Sync` closure works as a hook too.

use std::fmt::Debug;

use tracing::{debug, warn};

// == Event ==
/// A single cache or loader occurrence.
#[derive(Debug)]
pub enum Event<'a, K> {
    /// A read returned a fresh value
    Hit { key: &'a K },
    /// A read found no entry
    Miss { key: &'a K },
    /// A read found a stale entry and removed it
    Expired { key: &'a K },
    /// A value was stored
    Inserted { key: &'a K, replaced: bool },
    /// An entry was evicted by the capacity or cost limit
    Evicted { key: &'a K },
    /// A reset removed `removed` entries
    Purged { removed: usize, stale_only: bool },
    /// The loader is calling the fetcher after a cache miss
    FetchStarted { key: &'a K },
    /// The fetcher returned a value
    FetchSucceeded { key: &'a K },
    /// The fetcher failed; nothing was cached
    FetchFailed { key: &'a K, reason: &'a str },
    /// The caller cancelled the load
    Cancelled { key: &'a K },
}

impl<K> Event<'_, K> {
    /// Short stable name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Hit { .. } => "hit",
            Event::Miss { .. } => "miss",
            Event::Expired { .. } => "expired",
            Event::Inserted { .. } => "inserted",
            Event::Evicted { .. } => "evicted",
            Event::Purged { .. } => "purged",
            Event::FetchStarted { .. } => "fetch_started",
            Event::FetchSucceeded { .. } => "fetch_succeeded",
            Event::FetchFailed { .. } => "fetch_failed",
            Event::Cancelled { .. } => "cancelled",
        }
    }
}

// == Event Hook ==
/// Receives events from a cache or loader.
///
/// Hooks run on the caller's thread, never while the cache lock is held.
pub trait EventHook<K>: Send + Sync {
    fn on_event(&self, event: &Event<'_, K>);
}

impl<K, F> EventHook<K> for F
where
    F: Fn(&Event<'_, K>) + Send + Sync,
{
    fn on_event(&self, event: &Event<'_, K>) {
        self(event)
    }
}

// == Tracing Hook ==
/// Default hook: emits every event as a `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHook;

impl<K: Debug> EventHook<K> for TracingHook {
    fn on_event(&self, event: &Event<'_, K>) {
        match event {
            Event::Hit { key } => debug!(?key, "cache hit"),
            Event::Miss { key } => debug!(?key, "cache miss"),
            Event::Expired { key } => debug!(?key, "stale entry removed"),
            Event::Inserted { key, replaced } => debug!(?key, replaced, "cache insert"),
            Event::Evicted { key } => debug!(?key, "entry evicted"),
            Event::Purged {
                removed,
                stale_only,
            } => debug!(removed, stale_only, "cache reset"),
            Event::FetchStarted { key } => debug!(?key, "fetching"),
            Event::FetchSucceeded { key } => debug!(?key, "fetch succeeded"),
            Event::FetchFailed { key, reason } => warn!(?key, %reason, "fetch failed"),
            Event::Cancelled { key } => debug!(?key, "load cancelled"),
        }
    }
}

// == Noop Hook ==
/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl<K> EventHook<K> for NoopHook {
    fn on_event(&self, _event: &Event<'_, K>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_closure_is_a_hook() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let hook = move |event: &Event<'_, String>| {
            sink.lock().unwrap().push(event.kind());
        };

        let key = "a".to_string();
        hook.on_event(&Event::Hit { key: &key });
        hook.on_event(&Event::Purged {
            removed: 2,
            stale_only: true,
        });

        assert_eq!(*seen.lock().unwrap(), vec!["hit", "purged"]);
    }

    #[test]
    fn test_builtin_hooks_accept_every_event() {
        let key = 7u32;
        let events = [
            Event::Hit { key: &key },
            Event::Miss { key: &key },
            Event::Expired { key: &key },
            Event::Inserted {
                key: &key,
                replaced: false,
            },
            Event::Evicted { key: &key },
            Event::FetchStarted { key: &key },
            Event::FetchSucceeded { key: &key },
            Event::FetchFailed {
                key: &key,
                reason: "boom",
            },
            Event::Cancelled { key: &key },
        ];

        for event in &events {
            TracingHook.on_event(event);
            NoopHook.on_event(event);
        }
    }
}
