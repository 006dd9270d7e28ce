// Search backend access: the trait the controller drives and its HTTP implementation

mod http;

pub use http::HttpSearchBackend;

use crate::models::{SearchRequest, SearchStatus};
use std::future::Future;
use thiserror::Error;

/// Failures talking to the search backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backend answered with an `error` field
    #[error("{0}")]
    Remote(String),

    #[error("Invalid backend URL {0}")]
    InvalidUrl(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// The two calls of the search job protocol.
///
/// Implementations must be cheap to share; the controller keeps one behind
/// an `Arc` and calls it from its polling task.
pub trait SearchBackend: Send + Sync + 'static {
    /// Create a search job and return its session id
    fn create_search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Fetch the current status of a search job
    fn fetch_status(
        &self,
        search_id: &str,
    ) -> impl Future<Output = Result<SearchStatus, BackendError>> + Send;
}
