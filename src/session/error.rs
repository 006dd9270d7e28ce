// Error kinds that end a search session

use crate::models::ValidationError;
use thiserror::Error;

/// Why a search session ended without results.
///
/// The `Display` text of each variant is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Form rejected before any request was made
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The create-session call failed or was refused
    #[error("Failed to start search: {0}")]
    Submission(String),

    /// A status call failed at the transport or decoding level
    #[error("Failed to check search status")]
    PollTransport(String),

    /// The backend reported the job itself as failed
    #[error("Search failed: {}", .0.as_deref().unwrap_or("Unknown error"))]
    RemoteJob(Option<String>),

    /// A newer search replaced this one before it finished
    #[error("Search was superseded by a newer search")]
    Superseded,
}
