//! Site-Mirror main entry point
//!
//! This is the command-line interface for the Site-Mirror website mirroring tool.

use clap::Parser;
use site_mirror::config::{load_config_with_hash, Config};
use site_mirror::crawler::{run_mirror, RunOptions};
use site_mirror::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Mirror: an offline website mirroring tool
///
/// Site-Mirror fetches a site starting from its root URL, rewrites the links
/// inside pages and stylesheets so the copy works offline, and keeps going
/// until every in-scope resource has been mirrored.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version)]
#[command(about = "An offline website mirroring tool", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Empty the destination directory before mirroring
    #[arg(long)]
    clean: bool,

    /// Validate config and show what would be mirrored without fetching anything
    #[arg(long, conflicts_with = "clean")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_mirror(&config, cli.clean, &config_hash, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mirror=info,warn"),
            1 => EnvFilter::new("site_mirror=debug,info"),
            2 => EnvFilter::new("site_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Site-Mirror Dry Run ===\n");

    println!("Site:");
    println!("  Root: {}", config.site.root);

    println!("\nOutput:");
    println!("  Destination: {}", config.output.destination);
    match &config.output.remote_prefix {
        Some(prefix) => println!("  References: prefixed with {}", prefix),
        None => println!("  References: relative"),
    }
    if let Some(path) = &config.output.summary_path {
        println!("  Summary: {}", path);
    }
    if let Some(path) = &config.output.database_path {
        println!("  Manifest: {}", path);
    }
    if let Some(dir) = &config.output.overlay_dir {
        println!(
            "  Overlay: {} (skipping .{} files)",
            dir, config.output.overlay_skip_extension
        );
    }

    println!("\nUser Agent: {}", config.user_agent.user_agent_string());

    println!("\nExtra Seeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed.url);
    }

    println!("\nExcludes ({}):", config.excludes.len());
    for entry in &config.excludes {
        println!("  - {}", entry.pattern);
    }

    println!("\nRewrites ({}):", config.rewrites.len());
    for entry in &config.rewrites {
        println!("  - {} -> {}", entry.pattern, entry.replacement);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start mirroring with {} seed URLs",
        config.seeds.len() + 1
    );
}

/// Handles the main mirror operation
async fn handle_mirror(
    config: &Config,
    clean: bool,
    config_hash: &str,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Mirroring {} into {}",
        config.site.root,
        config.output.destination
    );
    tracing::info!(
        "Extra seeds: {}, Excludes: {}, Rewrites: {}",
        config.seeds.len(),
        config.excludes.len(),
        config.rewrites.len()
    );

    match run_mirror(config, RunOptions { clean }, config_hash).await {
        Ok(report) => {
            tracing::info!(
                "Mirror completed: {} of {} URLs written",
                report.summary.pages_written,
                report.summary.total_pages
            );
            if !quiet {
                print_statistics(&report.statistics);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Mirror failed: {}", e);
            Err(e.into())
        }
    }
}
