// Data models matching the search backend's JSON payloads

pub mod state_machine;

pub use state_machine::{SessionPhase, StateTransitionError};

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Longest part number the search form accepts, in characters
pub const MAX_PART_NUMBER_LEN: usize = 255;

/// Target websites that can be searched for a part number.
///
/// Declaration order is the order selected websites are submitted in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Website {
    #[serde(rename = "systemgeneral")]
    SystemGeneral,
    #[serde(rename = "dataio")]
    DataIo,
    #[serde(rename = "bpmicro")]
    BpMicro,
}

impl Website {
    /// Returns all searchable websites
    pub fn all() -> &'static [Website] {
        &[Website::SystemGeneral, Website::DataIo, Website::BpMicro]
    }

    /// Returns the identifier sent to the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Website::SystemGeneral => "systemgeneral",
            Website::DataIo => "dataio",
            Website::BpMicro => "bpmicro",
        }
    }
}

impl std::fmt::Display for Website {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Website {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "systemgeneral" | "system-general" => Ok(Website::SystemGeneral),
            "dataio" | "data-io" => Ok(Website::DataIo),
            "bpmicro" | "bp-micro" => Ok(Website::BpMicro),
            _ => Err(format!(
                "Unknown website: '{}'. Expected one of: systemgeneral, dataio, bpmicro",
                s
            )),
        }
    }
}

/// Reasons a search form is rejected before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a part number")]
    EmptyPartNumber,

    #[error("Please select at least one website")]
    NoWebsiteSelected,
}

/// Raw form contents as read from the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub part_number: String,
    pub websites: BTreeSet<Website>,
}

impl FormInput {
    pub fn new(part_number: impl Into<String>, websites: impl IntoIterator<Item = Website>) -> Self {
        Self {
            part_number: part_number.into(),
            websites: websites.into_iter().collect(),
        }
    }

    /// Validate the form and build the request to submit.
    ///
    /// The part number is cut to [`MAX_PART_NUMBER_LEN`] characters and then
    /// trimmed, mirroring what the input field allows.
    pub fn validate(&self) -> Result<SearchRequest, ValidationError> {
        let truncated: String = self.part_number.chars().take(MAX_PART_NUMBER_LEN).collect();
        let part_number = truncated.trim();

        if part_number.is_empty() {
            return Err(ValidationError::EmptyPartNumber);
        }

        if self.websites.is_empty() {
            return Err(ValidationError::NoWebsiteSelected);
        }

        Ok(SearchRequest {
            part_number: part_number.to_string(),
            websites: self.websites.iter().copied().collect(),
        })
    }
}

/// Body of the create-session request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub part_number: String,
    pub websites: Vec<Website>,
}

/// Overall state of a backend search job
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Error,
    #[serde(other)]
    Other,
}

impl JobStatus {
    /// Completed and error end polling; everything else keeps it going
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// Outcome of the search on a single website
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Found,
    NotFound,
    Error,
    #[serde(other)]
    Unknown,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Found => "found",
            ResultStatus::NotFound => "not_found",
            ResultStatus::Error => "error",
            ResultStatus::Unknown => "unknown",
        }
    }
}

/// A single website's result inside a completed search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub website: String,
    pub status: ResultStatus,
    #[serde(default)]
    pub part_used: String,
    #[serde(default)]
    pub socket_info: Option<String>,
    #[serde(default)]
    pub modified: bool,
    #[serde(default)]
    pub chars_removed: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Aggregate counts attached to a completed search
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchSummary {
    #[serde(default)]
    pub total_searched: Option<u32>,
    #[serde(default)]
    pub found_count: Option<u32>,
    #[serde(default)]
    pub has_results: Option<bool>,
}

/// Reads `null` like a missing list
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Status payload returned by the job-status endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchStatus {
    pub status: JobStatus,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub current_search: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub summary: Option<SearchSummary>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SearchStatus {
    /// Progress in percent, clamped to 0..=100; missing means 0
    pub fn progress_percent(&self) -> f64 {
        match self.progress {
            Some(p) if p.is_finite() => p.clamp(0.0, 100.0),
            _ => 0.0,
        }
    }

    /// Status line to show next to the progress bar
    pub fn progress_message(&self) -> &str {
        match self.current_search.as_deref() {
            Some(message) if !message.is_empty() => message,
            _ => "Searching...",
        }
    }
}
