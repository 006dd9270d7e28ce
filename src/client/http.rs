// HTTP/JSON client for the search job API

use super::{BackendError, SearchBackend};
use crate::models::{SearchRequest, SearchStatus};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

/// Search backend reached over HTTP.
///
/// Endpoints:
/// - `POST {base}/api/search` -> `{search_id}` or `{error}`
/// - `GET {base}/api/search/{id}/status` -> status payload or `{error}`
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSearchBackend {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("'{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(format!(
                "'{}' cannot carry a path",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("socket-finder/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new(), so this always succeeds
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Decode a response body as JSON whatever its HTTP status.
///
/// The backend reports validation and lookup failures as `{error}` bodies on
/// 4xx responses, so the status code alone says little.
async fn read_json(response: reqwest::Response) -> Result<Value, BackendError> {
    let status = response.status();
    let body = response.bytes().await?;

    serde_json::from_slice(&body).map_err(|e| {
        if status.is_success() {
            BackendError::Decode(e)
        } else {
            BackendError::InvalidResponse(format!("HTTP {} with non-JSON body", status))
        }
    })
}

fn error_field(value: &Value) -> Option<&str> {
    value
        .get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
}

impl SearchBackend for HttpSearchBackend {
    async fn create_search(&self, request: &SearchRequest) -> Result<String, BackendError> {
        let url = self.endpoint(&["api", "search"]);
        log::debug!(
            "Submitting search for '{}' on {} website(s) to {}",
            request.part_number,
            request.websites.len(),
            url
        );

        let response = self.client.post(url).json(request).send().await?;
        let value = read_json(response).await?;

        if let Some(message) = error_field(&value) {
            return Err(BackendError::Remote(message.to_string()));
        }

        value
            .get("search_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string())
            .ok_or_else(|| BackendError::InvalidResponse("missing search_id".to_string()))
    }

    async fn fetch_status(&self, search_id: &str) -> Result<SearchStatus, BackendError> {
        let url = self.endpoint(&["api", "search", search_id, "status"]);
        log::trace!("Checking search status at {}", url);

        let response = self.client.get(url).send().await?;
        let value = read_json(response).await?;

        let has_status = value.get("status").map(|s| !s.is_null()).unwrap_or(false);
        if !has_status {
            return Err(match error_field(&value) {
                Some(message) => BackendError::Remote(message.to_string()),
                None => BackendError::InvalidResponse("missing status".to_string()),
            });
        }

        Ok(serde_json::from_value(value)?)
    }
}
