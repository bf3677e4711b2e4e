//! Crawler module for mirroring a site
//!
//! This module contains the core mirroring logic, including:
//! - Fetching resources through a pluggable collaborator
//! - Scanning text bodies for references
//! - Rewriting references to point at the local copy
//! - The crawl driver tying queue, ledger and hooks together

mod coordinator;
mod fetcher;
mod hooks;
mod rewriter;
mod scanner;

pub use coordinator::{FilterHook, ItemHook, Mirror};
pub use fetcher::{build_http_client, Fetch, FetchResult, HttpFetcher};
pub use hooks::{exclude_filter, regex_rewrite};
pub use rewriter::{relative_prefix, rewrite_document, RewrittenDocument};
pub use scanner::{is_skippable_reference, is_text_like, scan_links, LinkMatch};

use crate::config::Config;
use crate::output::{
    generate_summary, CrawlStatistics, CrawlSummary, MarkdownReport, ReportWriter, SqliteManifest,
};
use crate::storage::{copy_dir, empty_dir};
use crate::Result;
use chrono::Utc;
use std::path::Path;

/// Switches for a complete mirror run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Wipe the destination before crawling
    pub clean: bool,
}

/// What a complete mirror run produced
#[derive(Debug, Clone)]
pub struct MirrorReport {
    pub summary: CrawlSummary,
    pub statistics: CrawlStatistics,
}

/// Builds a mirror session from configuration
///
/// Excludes become filters, rewrites become rewrite hooks and every seed is
/// added after the site root.
pub fn build_mirror(config: &Config) -> Result<Mirror> {
    let mirror = Mirror::new(&config.site.root, &config.user_agent)?;
    configure(mirror, config)
}

/// Like [`build_mirror`], with a custom fetch collaborator
pub fn build_mirror_with(config: &Config, fetcher: impl Fetch + 'static) -> Result<Mirror> {
    let mirror = Mirror::with_fetcher(&config.site.root, fetcher)?;
    configure(mirror, config)
}

fn configure(mut mirror: Mirror, config: &Config) -> Result<Mirror> {
    for entry in &config.excludes {
        mirror.filter(exclude_filter(&entry.pattern)?);
    }
    for entry in &config.rewrites {
        mirror.rewrite(regex_rewrite(&entry.pattern, &entry.replacement)?);
    }
    for seed in &config.seeds {
        mirror.add(&seed.url);
    }
    Ok(mirror)
}

/// Runs a complete mirror operation
///
/// This is the main entry point behind the binary. It will:
/// 1. Wipe the destination when asked to
/// 2. Crawl the site into the destination
/// 3. Copy the overlay directory over the mirror
/// 4. Write the configured reports
pub async fn run_mirror(
    config: &Config,
    options: RunOptions,
    config_hash: &str,
) -> Result<MirrorReport> {
    let mirror = build_mirror(config)?;
    run_mirror_with(mirror, config, options, config_hash).await
}

/// Runs a complete mirror operation with an already built session
pub async fn run_mirror_with(
    mut mirror: Mirror,
    config: &Config,
    options: RunOptions,
    config_hash: &str,
) -> Result<MirrorReport> {
    let destination = Path::new(&config.output.destination);

    if options.clean && destination.is_dir() {
        tracing::info!("Cleaning {}", destination.display());
        empty_dir(destination, false)?;
    }

    let started_at = Utc::now();
    mirror
        .download(destination, config.output.remote_prefix.as_deref())
        .await;
    let finished_at = Utc::now();

    if let Some(overlay) = &config.output.overlay_dir {
        let copied = copy_dir(
            Path::new(overlay),
            destination,
            &config.output.overlay_skip_extension,
        )?;
        tracing::info!("Copied {} overlay files from {}", copied, overlay);
    }

    let summary = generate_summary(&mirror, destination, started_at, finished_at, config_hash);

    if let Some(path) = &config.output.summary_path {
        MarkdownReport::new(path).write_report(&summary)?;
        tracing::info!("Summary written to {}", path);
    }

    if let Some(path) = &config.output.database_path {
        SqliteManifest::new(path).write_report(&summary)?;
        tracing::info!("Manifest written to {}", path);
    }

    Ok(MirrorReport {
        statistics: CrawlStatistics::from_ledger(mirror.ledger()),
        summary,
    })
}
