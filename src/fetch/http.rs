//! HTTP fetcher
//!
//! Default [`Fetcher`] wiring: treats the identifier as a URL and returns the
//! response body. Any non-2xx status is a failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::Fetcher;
use crate::config::DEFAULT_FETCH_TIMEOUT;
use crate::error::FetchError;

// == HTTP Fetcher ==
/// Fetches bytes with a GET request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::LoadFailed(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client))
    }

    /// Wraps an existing client, keeping its timeout and TLS settings.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Check response status and map to the appropriate error.
    fn check_status(response: &reqwest::Response, url: &str) -> Result<(), FetchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        // Client::new() applies no timeout; keep the crate default instead
        Self::new(DEFAULT_FETCH_TIMEOUT).unwrap_or_else(|_| Self::with_client(Client::new()))
    }
}

#[async_trait]
impl<K> Fetcher<K> for HttpFetcher
where
    K: AsRef<str> + Sync + ?Sized,
{
    type Output = Vec<u8>;

    async fn load(&self, identifier: &K) -> Result<Vec<u8>, FetchError> {
        let url = identifier.as_ref();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Self::check_status(&response, url)?;

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}
