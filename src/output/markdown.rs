//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of a mirror run:
//! run metadata, outcome counts and the URLs that could not be mirrored.

use crate::output::traits::{CrawlSummary, OutputResult, ReportWriter};
use crate::state::PageState;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Failed URLs listed before the report truncates
const MAX_LISTED_FAILURES: usize = 50;

/// Writes the markdown report to a fixed path
#[derive(Debug, Clone)]
pub struct MarkdownReport {
    path: PathBuf,
}

impl MarkdownReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for MarkdownReport {
    fn write_report(&self, summary: &CrawlSummary) -> OutputResult<()> {
        generate_markdown_summary(summary, &self.path)
    }
}

/// Generates a markdown summary file
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Site-Mirror Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site Root**: {}\n", summary.site_root));
    md.push_str(&format!("- **Destination**: {}\n", summary.destination));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at));
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        summary.duration_seconds,
        summary.duration_seconds as f64 / 60.0
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total URLs**: {}\n", summary.total_pages));
    md.push_str(&format!("- **Written**: {}\n", summary.pages_written));
    md.push_str(&format!("- **Failed**: {}\n", summary.total_failed()));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        summary.success_rate()
    ));

    // State breakdown
    md.push_str("## Outcome Breakdown\n\n");
    md.push_str("| State | Count |\n");
    md.push_str("|-------|-------|\n");
    md.push_str(&format!("| Written | {} |\n", summary.pages_written));
    md.push_str(&format!(
        "| Fetch Failed | {} |\n",
        summary.pages_fetch_failed
    ));
    md.push_str(&format!("| Vetoed | {} |\n", summary.pages_vetoed));
    md.push_str(&format!(
        "| Write Failed | {} |\n\n",
        summary.pages_write_failed
    ));

    // Failures
    let failed: Vec<_> = summary.failed_pages().collect();
    if !failed.is_empty() {
        md.push_str("## Failed URLs\n\n");
        md.push_str("| URL | State |\n");
        md.push_str("|-----|-------|\n");

        for page in failed.iter().take(MAX_LISTED_FAILURES) {
            md.push_str(&format!("| {} | {} |\n", page.url, page.state));
        }
        if failed.len() > MAX_LISTED_FAILURES {
            md.push_str(&format!(
                "\n... and {} more\n",
                failed.len() - MAX_LISTED_FAILURES
            ));
        }
        md.push('\n');
    }

    let vetoed: Vec<_> = summary
        .pages
        .iter()
        .filter(|page| page.state == PageState::Vetoed)
        .collect();
    if !vetoed.is_empty() {
        md.push_str("## Vetoed URLs\n\n");
        for page in vetoed {
            md.push_str(&format!("- {}\n", page.url));
        }
        md.push('\n');
    }

    md
}
