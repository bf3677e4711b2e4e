use crate::url::SiteRoot;
use html_escape::decode_html_entities;

/// A site-specific escape that is never resolved
pub const PASSTHROUGH_REFERENCE: &str = "p+";

/// Resolves a textual reference into a canonical absolute URL
///
/// # Resolution Rules (first match wins)
///
/// 1. Drop everything from the first `#` and decode HTML entities
/// 2. `p+` is returned untouched
/// 3. `?query` keeps the current document's path and swaps its query
/// 4. `//host/path` takes the site root's scheme
/// 5. `/path` takes the site root's scheme and authority
/// 6. Anything without `//` is resolved against the current document's
///    directory, under the site root
/// 7. Everything else is already absolute and returned as is
///
/// Protocol-relative and root-relative forms must be checked before the
/// document-relative branch, which would otherwise swallow them.
///
/// A document-relative reference with more `..` segments than the document
/// has directories is returned unresolved.
///
/// # Examples
///
/// ```
/// use site_mirror::url::{normalize_reference, SiteRoot};
///
/// let root = SiteRoot::parse("https://example.com").unwrap();
/// let current = Some("https://example.com/a/b.html?old=1");
///
/// assert_eq!(
///     normalize_reference(&root, "?new=2", current),
///     "https://example.com/a/b.html?new=2"
/// );
/// assert_eq!(
///     normalize_reference(&root, "../c.css#top", current),
///     "https://example.com/c.css"
/// );
/// ```
pub fn normalize_reference(root: &SiteRoot, reference: &str, current: Option<&str>) -> String {
    let reference = reference.split('#').next().unwrap_or_default();
    let reference = decode_html_entities(reference);

    if reference == PASSTHROUGH_REFERENCE {
        return reference.into_owned();
    }

    if reference.starts_with('?') {
        let document = current.map(strip_query).unwrap_or_default();
        return format!("{}{}", document, reference);
    }

    if reference.starts_with("//") {
        return format!("{}:{}", root.scheme(), reference);
    }

    if reference.starts_with('/') {
        return format!("{}://{}{}", root.scheme(), root.authority(), reference);
    }

    if !reference.contains("//") {
        if let Some(current) = current {
            return resolve_document_relative(root, &reference, current);
        }
    }

    reference.into_owned()
}

/// Resolves `reference` against the directory of `current`
fn resolve_document_relative(root: &SiteRoot, reference: &str, current: &str) -> String {
    let within_site = root.relative_part(strip_query(current)).unwrap_or_default();

    // The document's own file name is the last segment
    let mut segments: Vec<&str> = within_site.split('/').collect();
    segments.pop();
    segments.retain(|segment| !segment.is_empty());

    let cleaned = reference.strip_prefix("./").unwrap_or(reference);
    let cleaned = cleaned.trim_start_matches('/');

    for segment in cleaned.split('/') {
        match segment {
            ".." => {
                if segments.pop().is_none() {
                    return reference.to_string();
                }
            }
            "." | "" => {}
            _ => segments.push(segment),
        }
    }

    let names_directory = cleaned.is_empty()
        || cleaned.ends_with('/')
        || cleaned.ends_with("/.")
        || cleaned.ends_with("/..")
        || cleaned == "."
        || cleaned == "..";

    let mut resolved = format!("{}/{}", root.trimmed(), segments.join("/"));
    if names_directory && !segments.is_empty() {
        resolved.push('/');
    }
    resolved
}

/// Drops the query string, if any
fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or_default()
}
