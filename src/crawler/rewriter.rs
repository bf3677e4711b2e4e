//! Reference rewriting for mirrored documents
//!
//! Every in-scope reference found by the scanner is replaced with the local
//! path of its target, wrapped in the original delimiters. The rewritten body
//! is rebuilt in a single pass over the matches, so a replacement can never be
//! matched again.

use crate::crawler::scanner::scan_links;
use crate::url::{normalize_reference, with_directory_root, PathMapper};
use std::path::MAIN_SEPARATOR;

/// A document after its references were pointed at the mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenDocument {
    /// The body with in-scope references replaced
    pub body: String,

    /// Every fetchable reference, canonicalized, in document order
    ///
    /// Out-of-scope and repeated URLs are included; deciding what to enqueue
    /// is up to the caller.
    pub references: Vec<String>,
}

/// Computes the prefix leading from a document back up to the mirror root
///
/// `path` is the document's mirror-relative path. A document at the mirror
/// root gets `./`, every directory level below adds one `../`.
///
/// # Examples
///
/// ```
/// use site_mirror::crawler::relative_prefix;
///
/// assert_eq!(relative_prefix("index.html"), "./");
/// assert_eq!(relative_prefix(&["blog", "post.html"].join(std::path::MAIN_SEPARATOR_STR)), "./../");
/// ```
pub fn relative_prefix(path: &str) -> String {
    let depth = path
        .split(MAIN_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .count();

    format!("./{}", "../".repeat(depth.saturating_sub(1)))
}

/// Rewrites the references of `body`, found in the document at `document_url`
///
/// Skippable references (`#`, `tel:`, `data:`, `mailto:`, `javascript:`) are
/// left untouched and not reported. In-scope references become
/// `prefix + local path`, keeping their attribute and delimiters.
pub fn rewrite_document(
    body: &str,
    document_url: &str,
    prefix: &str,
    mapper: &PathMapper,
) -> RewrittenDocument {
    let root = mapper.root();
    let mut rewritten = String::with_capacity(body.len());
    let mut references = Vec::new();
    let mut last = 0;

    for link in scan_links(body) {
        if link.is_skippable() {
            continue;
        }

        let url = with_directory_root(normalize_reference(
            root,
            link.reference,
            Some(document_url),
        ));

        if root.contains(&url) {
            rewritten.push_str(&body[last..link.range.start]);
            rewritten.push_str(link.attribute);
            rewritten.push_str(link.quote);
            rewritten.push_str(prefix);
            rewritten.push_str(&mapper.local_url(&url));
            rewritten.push_str(link.close);
            last = link.range.end;
        }

        references.push(url);
    }

    rewritten.push_str(&body[last..]);

    RewrittenDocument {
        body: rewritten,
        references,
    }
}
