//! Error types for fetchers and the caching loader
//!
//! Provides unified error handling using thiserror. Cache operations have no
//! error type: a miss or an expired entry is `None`.

use thiserror::Error;

// == Fetch Error Enum ==
/// Failure reported by a [`Fetcher`](crate::fetch::Fetcher).
#[derive(Error, Debug)]
pub enum FetchError {
    /// Generic load failure with a description of the cause
    #[error("Load failed: {0}")]
    LoadFailed(String),

    /// Connection, IO or body-read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote answered with a non-success status
    #[error("Unexpected status {status} for {url}")]
    Status { status: u16, url: String },
}

// == Loader Error Enum ==
/// The only failure kind returned by [`CachingLoader`](crate::loader::CachingLoader).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    /// The fetcher failed; carries its description
    #[error("Loading failed: {0}")]
    LoadingFailed(String),

    /// The caller's cancellation signal fired before the load finished
    #[error("Loading cancelled")]
    Cancelled,
}

impl From<FetchError> for LoaderError {
    fn from(err: FetchError) -> Self {
        LoaderError::LoadingFailed(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for loader calls.
pub type Result<T> = std::result::Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_normalizes_to_loading_failed() {
        let err: LoaderError = FetchError::Transport("connection refused".to_string()).into();
        assert_eq!(
            err,
            LoaderError::LoadingFailed("Transport error: connection refused".to_string())
        );
    }

    #[test]
    fn test_status_error_description() {
        let err = FetchError::Status {
            status: 404,
            url: "http://example.com/a.png".to_string(),
        };
        let loader_err = LoaderError::from(err);
        match loader_err {
            LoaderError::LoadingFailed(msg) => {
                assert!(msg.contains("404"));
                assert!(msg.contains("http://example.com/a.png"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cancelled_display() {
        assert_eq!(LoaderError::Cancelled.to_string(), "Loading cancelled");
    }
}
