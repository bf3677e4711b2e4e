//! Configuration module for Site-Mirror
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Mirroring {} into {}", config.site.root, config.output.destination);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExcludeEntry, OutputConfig, RewriteEntry, SeedEntry, SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
