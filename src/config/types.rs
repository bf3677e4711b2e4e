use serde::Deserialize;

/// Main configuration structure for Site-Mirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub output: OutputConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(rename = "seed", default)]
    pub seeds: Vec<SeedEntry>,
    #[serde(rename = "exclude", default)]
    pub excludes: Vec<ExcludeEntry>,
    #[serde(rename = "rewrite", default)]
    pub rewrites: Vec<RewriteEntry>,
}

/// The site being mirrored
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root URL; everything under it is in scope
    pub root: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the mirror is written into
    pub destination: String,

    /// Fixed prefix for rewritten references; relative references when absent
    #[serde(rename = "remote-prefix", default)]
    pub remote_prefix: Option<String>,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,

    /// Path to the SQLite ledger manifest
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,

    /// Directory of local files laid over the finished mirror
    #[serde(rename = "overlay-dir", default)]
    pub overlay_dir: Option<String>,

    /// Extension of overlay files that are never copied
    #[serde(rename = "overlay-skip-extension", default = "default_skip_extension")]
    pub overlay_skip_extension: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// `name/version`, as sent in the `User-Agent` header
    pub fn user_agent_string(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SiteMirror".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Extra starting point besides the site root
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    pub url: String,
}

/// Discovered URLs matching `pattern` are not downloaded
#[derive(Debug, Clone, Deserialize)]
pub struct ExcludeEntry {
    /// Regular expression matched against the canonical URL
    pub pattern: String,
}

/// Regex replacement applied to URLs before path mapping
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteEntry {
    pub pattern: String,

    /// Replacement, `$1` style group references allowed
    pub replacement: String,
}

fn default_skip_extension() -> String {
    "php".to_string()
}
