//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl run:
//! timing, page counts, file-type breakdown, skipped responses and errors.

use crate::output::stats::CrawlStatistics;
use crate::output::traits::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of a crawl
///
/// # Arguments
///
/// * `stats` - The final crawl statistics
/// * `report_path` - Where the report itself was written, if anywhere
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(
    stats: &CrawlStatistics,
    report_path: Option<&Path>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats, report_path);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats crawl statistics as markdown
pub fn format_markdown_summary(stats: &CrawlStatistics, report_path: Option<&Path>) -> String {
    let mut md = String::new();

    md.push_str("# Pagemap Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", stats.seed));
    md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
    if let Some(finished) = &stats.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    let seconds = stats.duration().num_milliseconds() as f64 / 1000.0;
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds ({:.2} minutes)\n",
        seconds,
        seconds / 60.0
    ));
    let status = if stats.interrupted {
        "interrupted (partial results)"
    } else {
        "completed"
    };
    md.push_str(&format!("- **Status**: {}\n", status));
    if let Some(path) = report_path {
        md.push_str(&format!("- **Report**: {}\n", path.display()));
    }
    md.push('\n');

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", stats.visited));
    md.push_str(&format!("- **Pages Recorded**: {}\n", stats.recorded));
    md.push_str(&format!("- **Links Enqueued**: {}\n", stats.links_enqueued));
    md.push_str(&format!(
        "- **Links Out of Scope**: {}\n",
        stats.links_out_of_scope
    ));
    md.push_str(&format!("- **Skipped Responses**: {}\n", stats.total_skipped()));
    md.push_str(&format!("- **Fetch Errors**: {}\n\n", stats.total_errors()));

    if !stats.file_types.is_empty() {
        md.push_str("## File Types\n\n");
        md.push_str("| File Type | Pages |\n");
        md.push_str("|-----------|-------|\n");
        for (file_type, count) in &stats.file_types {
            md.push_str(&format!("| {} | {} |\n", file_type, count));
        }
        md.push('\n');
    }

    if !stats.skipped_by_status.is_empty() {
        md.push_str("## Skipped Responses\n\n");
        md.push_str("| Status | Count |\n");
        md.push_str("|--------|-------|\n");
        for (status, count) in &stats.skipped_by_status {
            md.push_str(&format!("| {} | {} |\n", status, count));
        }
        md.push('\n');
    }

    if !stats.fetch_errors.is_empty() {
        md.push_str("## Fetch Errors\n\n");
        md.push_str("| Error Type | Count |\n");
        md.push_str("|------------|-------|\n");
        for (kind, count) in &stats.fetch_errors {
            md.push_str(&format!("| {} | {} |\n", kind, count));
        }
        md.push('\n');
    }

    md
}
