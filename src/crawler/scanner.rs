//! Link scanner for fetched text bodies
//!
//! References are found with a deliberately narrow pattern over three forms:
//! `src=`, `href=` and `url(`. There is no markup parser involved, so the same
//! scanner covers HTML and CSS alike.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// `(src=|href=|url\()`, optional quote, the reference, closing quote or `)`
fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)(src=|href=|url\()(['"])?([^ '")]+)(['")])"#)
            .expect("hardcoded link pattern is valid")
    })
}

/// Reference prefixes that never point at a fetchable resource
const SKIPPED_PREFIXES: &[&str] = &["#", "tel:", "data:", "mailto:", "javascript:"];

/// Extensions of resources that get scanned for references
const TEXT_EXTENSIONS: &[&str] = &["htm", "html", "css"];

/// Path marker of Cloudflare's injected endpoints
pub const CDN_CGI_MARKER: &str = "cdn-cgi/";

/// One reference found in a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch<'a> {
    /// Byte range of the whole match in the scanned body
    pub range: Range<usize>,

    /// `src=`, `href=` or `url(` exactly as written
    pub attribute: &'a str,

    /// Opening quote, empty when unquoted
    pub quote: &'a str,

    /// The raw reference
    pub reference: &'a str,

    /// Closing quote or `)`
    pub close: &'a str,
}

impl LinkMatch<'_> {
    /// Returns true if the reference uses a scheme that is never fetched
    pub fn is_skippable(&self) -> bool {
        is_skippable_reference(self.reference)
    }
}

/// Scans `body` for references, in document order
///
/// # Example
///
/// ```
/// use site_mirror::crawler::scan_links;
///
/// let links = scan_links(r#"<img src="/logo.png"> body { background: url(bg.jpg) }"#);
/// let references: Vec<_> = links.iter().map(|l| l.reference).collect();
/// assert_eq!(references, vec!["/logo.png", "bg.jpg"]);
/// ```
pub fn scan_links(body: &str) -> Vec<LinkMatch<'_>> {
    link_pattern()
        .captures_iter(body)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            Some(LinkMatch {
                range: whole.range(),
                attribute: captures.get(1)?.as_str(),
                quote: captures.get(2).map_or("", |m| m.as_str()),
                reference: captures.get(3)?.as_str(),
                close: captures.get(4)?.as_str(),
            })
        })
        .collect()
}

/// Returns true for `#…`, `tel:`, `data:`, `mailto:` and `javascript:`
pub fn is_skippable_reference(reference: &str) -> bool {
    SKIPPED_PREFIXES
        .iter()
        .any(|prefix| reference.starts_with(prefix))
}

/// Decides from the URL alone whether a fetched body should be scanned
///
/// `htm`, `html`, `css` and extensionless resources are text-like; anything
/// under `cdn-cgi/` never is.
pub fn is_text_like(url: &str) -> bool {
    if url.contains(CDN_CGI_MARKER) {
        return false;
    }

    let location = url.split('?').next().unwrap_or_default();
    let file_name = location.rsplit('/').next().unwrap_or_default();

    match file_name.rsplit_once('.') {
        None => true,
        Some((_, extension)) => TEXT_EXTENSIONS
            .iter()
            .any(|text| extension.eq_ignore_ascii_case(text)),
    }
}
