// Plain-text search report, written with --save

use crate::render::{ResultsView, ViewBlock};
use crate::utils::ResultExt;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::path::Path;

/// File written by `--save` when no path is given
pub const DEFAULT_REPORT_FILE: &str = "search_results.txt";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn report_status(view: &ResultsView) -> &'static str {
    if view.blocks.iter().any(|b| matches!(b, ViewBlock::Error { .. })) {
        "FAILED"
    } else if view.summary().map(|s| s.found_count > 0).unwrap_or(false) {
        "FOUND"
    } else {
        "NO RESULTS FOUND"
    }
}

/// Format the report for a finished search.
///
/// `searched_at` is the time stamped as the search date.
pub fn format_report(part_number: &str, view: &ResultsView, searched_at: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Part Number: {}", part_number);
    let _ = writeln!(out, "Status: {}", report_status(view));

    for block in &view.blocks {
        match block {
            ViewBlock::Summary(summary) => {
                let _ = writeln!(
                    out,
                    "Websites Searched: {} (found on {})",
                    summary.total_searched, summary.found_count
                );
            }
            ViewBlock::Result(result) => {
                let _ = writeln!(out);
                let _ = writeln!(out, "Website: {}", result.website);
                let _ = writeln!(out, "Result: {}", result.label);
                for detail in &result.details {
                    let _ = writeln!(out, "{}", detail.text());
                }
            }
            ViewBlock::Error { message } => {
                let _ = writeln!(out, "Error: {}", message);
            }
            ViewBlock::Notice { message } | ViewBlock::NoResults { message } => {
                let _ = writeln!(out, "{}", message);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Search Date: {}", searched_at.format(DATE_FORMAT));
    out
}

/// Write the report to `path`, replacing any previous one
pub fn save_report(path: &Path, part_number: &str, view: &ResultsView) -> Result<()> {
    let content = format_report(part_number, view, Local::now());
    std::fs::write(path, content).with_context("Failed to write search report")?;
    log::info!("Result saved to {}", path.display());
    Ok(())
}
