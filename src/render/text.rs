// Plain-text rendering for terminals and reports

use super::{ResultsView, ViewBlock};
use std::fmt::Write;

/// Render a view as indented plain text, one block per paragraph
pub fn render_text(view: &ResultsView) -> String {
    let mut out = String::new();

    for block in &view.blocks {
        if !out.is_empty() {
            out.push('\n');
        }
        // Writing into a String cannot fail
        let _ = write_block(&mut out, block);
    }

    out
}

fn write_block(out: &mut String, block: &ViewBlock) -> std::fmt::Result {
    match block {
        ViewBlock::Notice { message } => writeln!(out, "{}", message),
        ViewBlock::Summary(summary) => writeln!(
            out,
            "🎯 Search Complete!\n  Websites Searched: {}\n  Results Found: {}",
            summary.total_searched, summary.found_count
        ),
        ViewBlock::Result(result) => {
            writeln!(out, "{} {} [{}]", result.icon, result.website, result.label)?;
            for line in &result.details {
                writeln!(out, "  {}", line.text())?;
            }
            Ok(())
        }
        ViewBlock::NoResults { message } => {
            writeln!(out, "😞 Final Result [No Results]\n  {}", message)
        }
        ViewBlock::Error { message } => writeln!(out, "⚠️ Error: {}", message),
    }
}
