//! Fetch Module
//!
//! Abstraction over "get the payload for an identifier from a remote source".
//! Fetchers are stateless from the cache's point of view; retries and
//! timeouts are their own business.

mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;

pub use http::HttpFetcher;

// == Fetcher Trait ==
/// Loads the payload for an identifier, possibly suspending for a long time.
#[async_trait]
pub trait Fetcher<K: Sync + ?Sized>: Send + Sync {
    /// Payload produced on success
    type Output: Send;

    /// Fetches the payload for `identifier`.
    async fn load(&self, identifier: &K) -> Result<Self::Output, FetchError>;
}

#[async_trait]
impl<K, F> Fetcher<K> for Arc<F>
where
    K: Sync + ?Sized,
    F: Fetcher<K> + ?Sized,
{
    type Output = F::Output;

    async fn load(&self, identifier: &K) -> Result<Self::Output, FetchError> {
        (**self).load(identifier).await
    }
}
