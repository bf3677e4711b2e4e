//! URL handling module for Site-Mirror
//!
//! This module provides the site root (scope boundary), reference
//! normalization and the URL to filesystem path mapping.

mod normalize;
mod path;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use normalize::{normalize_reference, PASSTHROUGH_REFERENCE};
pub use path::{confined_path, decode_path, path_to_url, PathMapper, RewriteHook};

/// The immutable URL a crawl is anchored to
///
/// Scheme and authority are derived once from the root and used to resolve
/// protocol-relative and root-relative references. A URL is in scope when its
/// text starts with the root, after trimming the root's trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoot {
    raw: String,
    trimmed: String,
    scheme: String,
    authority: String,
}

impl SiteRoot {
    /// Parses a site root URL
    ///
    /// Only `http` and `https` roots with a host are accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_mirror::url::SiteRoot;
    ///
    /// let root = SiteRoot::parse("https://example.com/docs/").unwrap();
    /// assert_eq!(root.trimmed(), "https://example.com/docs");
    /// assert!(root.contains("https://example.com/docs/intro.html"));
    /// assert!(!root.contains("https://example.com/blog"));
    /// ```
    pub fn parse(root: &str) -> UrlResult<Self> {
        let parsed = Url::parse(root).map_err(|e| UrlError::Parse(e.to_string()))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
        }

        let host = parsed.host_str().ok_or(UrlError::MissingHost)?;
        let authority = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self {
            raw: root.to_string(),
            trimmed: root.trim_end_matches('/').to_string(),
            scheme: parsed.scheme().to_string(),
            authority,
        })
    }

    /// The root exactly as it was supplied
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The root without its trailing slash; the scope prefix
    pub fn trimmed(&self) -> &str {
        &self.trimmed
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host plus a non-default port, e.g. `127.0.0.1:8080`
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Returns true if `url` lies inside the mirrored site
    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(&self.trimmed)
    }

    /// Returns the part of `url` that follows the scope prefix
    pub fn relative_part<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.trimmed.as_str())
    }
}

/// Treats a host-only URL as the root directory of that host
///
/// `https://example.com` becomes `https://example.com/` and
/// `https://example.com?x=1` becomes `https://example.com/?x=1`. Anything with
/// a path, and anything without `//`, is returned unchanged.
pub fn with_directory_root(url: String) -> String {
    let Some((_, rest)) = url.split_once("//") else {
        return url;
    };
    if rest.contains('/') {
        return url;
    }

    match url.find('?') {
        Some(query_start) => format!("{}/{}", &url[..query_start], &url[query_start..]),
        None => url + "/",
    }
}
