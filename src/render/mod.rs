//! Result rendering
//!
//! A terminal status payload is first mapped to a [`ResultsView`], a typed
//! view model with no markup in it. [`HtmlRenderer`] and [`render_text`] turn
//! that view into something a presenter can display.

mod html;
mod text;

pub use html::HtmlRenderer;
pub use text::render_text;

use crate::models::{ResultStatus, SearchResult, SearchStatus};
use serde::Serialize;

/// Placeholder shown before any search has run
pub const IDLE_PROMPT: &str = "Enter a part number and select websites to begin searching.";

/// Placeholder shown when a completed search carries no results
pub const NO_SEARCH_PERFORMED: &str = "No search was performed.";

/// Body of the synthesized block appended when nothing was found
pub const NO_RESULTS_MESSAGE: &str =
    "No results found on any selected website. Try modifying the part number or selecting different websites.";

/// What the results area should show
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub blocks: Vec<ViewBlock>,
}

/// One visual block of the results area
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewBlock {
    /// Plain message with no result data behind it
    Notice { message: String },
    Summary(SummaryBlock),
    Result(ResultBlock),
    /// Final block added when no website found the part
    NoResults { message: String },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryBlock {
    pub total_searched: u32,
    pub found_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBlock {
    pub website: String,
    pub status: ResultStatus,
    /// Status string used for styling, e.g. `not_found`
    pub status_class: &'static str,
    pub icon: &'static str,
    pub label: &'static str,
    pub details: Vec<DetailLine>,
}

/// A line of per-result detail text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailLine {
    PartUsed { part: String },
    SocketInfo { info: String },
    Modified { chars_removed: i64 },
    Error { message: String },
    NoMatch,
}

impl DetailLine {
    /// Plain text form of the line
    pub fn text(&self) -> String {
        match self {
            DetailLine::PartUsed { part } => format!("Part Number Used: {}", part),
            DetailLine::SocketInfo { info } => format!("Socket/Adapter Info: {}", info),
            DetailLine::Modified { chars_removed } => format!(
                "⚠️ Original part number modified (removed {} characters)",
                chars_removed
            ),
            DetailLine::Error { message } => format!("Error: {}", message),
            DetailLine::NoMatch => "No matching device found".to_string(),
        }
    }
}

impl ResultsView {
    /// View shown before a search and after clearing
    pub fn idle() -> Self {
        Self::notice(IDLE_PROMPT)
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            blocks: vec![ViewBlock::Notice {
                message: message.into(),
            }],
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            blocks: vec![ViewBlock::Error {
                message: message.into(),
            }],
        }
    }

    /// Number of per-website result blocks
    pub fn result_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, ViewBlock::Result(_)))
            .count()
    }

    pub fn summary(&self) -> Option<&SummaryBlock> {
        self.blocks.iter().find_map(|b| match b {
            ViewBlock::Summary(summary) => Some(summary),
            _ => None,
        })
    }
}

pub fn status_icon(status: ResultStatus) -> &'static str {
    match status {
        ResultStatus::Found => "✅",
        ResultStatus::NotFound => "❌",
        ResultStatus::Error => "⚠️",
        ResultStatus::Unknown => "❓",
    }
}

pub fn status_label(status: ResultStatus) -> &'static str {
    match status {
        ResultStatus::Found => "Found",
        ResultStatus::NotFound => "Not Found",
        ResultStatus::Error => "Error",
        ResultStatus::Unknown => "Unknown",
    }
}

fn result_details(result: &SearchResult) -> Vec<DetailLine> {
    let mut details = vec![DetailLine::PartUsed {
        part: result.part_used.clone(),
    }];

    match result.status {
        ResultStatus::Found => {
            details.push(DetailLine::SocketInfo {
                info: result
                    .socket_info
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
            });
            if result.modified {
                details.push(DetailLine::Modified {
                    chars_removed: result.chars_removed.unwrap_or(0),
                });
            }
        }
        ResultStatus::Error => details.push(DetailLine::Error {
            message: result
                .error
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "Unknown error occurred".to_string()),
        }),
        _ => details.push(DetailLine::NoMatch),
    }

    details
}

fn result_block(result: &SearchResult) -> ResultBlock {
    ResultBlock {
        website: result.website.clone(),
        status: result.status,
        status_class: result.status.as_str(),
        icon: status_icon(result.status),
        label: status_label(result.status),
        details: result_details(result),
    }
}

/// Build the view for a completed search
pub fn build_view(status: &SearchStatus) -> ResultsView {
    if status.results.is_empty() {
        return ResultsView::notice(NO_SEARCH_PERFORMED);
    }

    let summary = status.summary.clone().unwrap_or_default();
    let mut blocks = Vec::with_capacity(status.results.len() + 2);

    blocks.push(ViewBlock::Summary(SummaryBlock {
        total_searched: summary.total_searched.unwrap_or(0),
        found_count: summary.found_count.unwrap_or(0),
    }));
    blocks.extend(status.results.iter().map(|r| ViewBlock::Result(result_block(r))));

    // Only an explicit zero counts; a missing summary adds nothing
    if summary.found_count == Some(0) {
        blocks.push(ViewBlock::NoResults {
            message: NO_RESULTS_MESSAGE.to_string(),
        });
    }

    ResultsView { blocks }
}
