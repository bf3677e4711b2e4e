use crate::url::SiteRoot;
use sha2::{Digest, Sha256};
use std::path::{Component, PathBuf, MAIN_SEPARATOR};

/// Rewrite hook applied to a URL's path portion before mapping
///
/// Returning `None` leaves the URL unchanged.
pub type RewriteHook = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// File name used for directory-like URLs
const DIRECTORY_INDEX: &str = "index.html";

/// Extension given to extensionless resources (server-side routes)
const INFERRED_EXTENSION: &str = ".html";

/// Number of hex digits of the query digest kept in file names
const QUERY_HASH_LEN: usize = 32;

/// Deterministic mapping from canonical URLs to mirror-relative paths
///
/// The mapping is a pure function of the URL and the registered rewrite
/// hooks, so a URL met once as a link target and once as a queued page always
/// lands on the same file.
pub struct PathMapper {
    root: SiteRoot,
    rewrites: Vec<RewriteHook>,
}

impl PathMapper {
    pub fn new(root: SiteRoot) -> Self {
        Self {
            root,
            rewrites: Vec::new(),
        }
    }

    /// Appends a rewrite hook; hooks run in registration order
    pub fn add_rewrite(&mut self, hook: RewriteHook) {
        self.rewrites.push(hook);
    }

    pub fn root(&self) -> &SiteRoot {
        &self.root
    }

    /// Maps a canonical URL to a path relative to the mirror root
    ///
    /// # Mapping Steps
    ///
    /// 1. Split off the query string
    /// 2. Run the rewrite hooks over the remaining URL
    /// 3. Strip the site root, resolve `.` and `..` segments without leaving
    ///    the mirror root, use platform separators
    /// 4. Directory-like URLs (trailing `/` or the root itself) get `index.html`
    /// 5. A final segment without `.` gets `.html`
    /// 6. A query string adds `_<hash>` before the extension
    ///
    /// # Examples
    ///
    /// ```
    /// use site_mirror::url::{PathMapper, SiteRoot};
    ///
    /// let mapper = PathMapper::new(SiteRoot::parse("https://example.com").unwrap());
    /// assert_eq!(mapper.url_to_path("https://example.com/"), "index.html");
    /// assert_eq!(mapper.url_to_path("https://example.com/about"), "about.html");
    /// ```
    pub fn url_to_path(&self, url: &str) -> String {
        let (location, query) = match url.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (url, None),
        };

        let mut location = location.to_string();
        for rewrite in &self.rewrites {
            if let Some(rewritten) = rewrite(&location) {
                location = rewritten;
            }
        }

        let mut is_directory = location.ends_with('/');
        let relative = match self.root.relative_part(&location) {
            Some(relative) => relative,
            None => off_site_location(&location),
        };

        let mut path = resolve_dot_segments(relative).replace('/', &MAIN_SEPARATOR.to_string());
        if path.is_empty() {
            is_directory = true;
        }

        if is_directory {
            path.push(MAIN_SEPARATOR);
            path.push_str(DIRECTORY_INDEX);
        } else {
            let file_name = path.rsplit(MAIN_SEPARATOR).next().unwrap_or_default();
            if !file_name.contains('.') {
                path.push_str(INFERRED_EXTENSION);
            }
        }

        if let Some(query) = query.filter(|query| !query.is_empty()) {
            path = with_query_hash(&path, query);
        }

        path.trim_start_matches(MAIN_SEPARATOR).to_string()
    }

    /// The mirror-relative URL a reference should be rewritten to
    pub fn local_url(&self, url: &str) -> String {
        path_to_url(&self.url_to_path(url))
    }
}

impl std::fmt::Debug for PathMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathMapper")
            .field("root", &self.root)
            .field("rewrites", &self.rewrites.len())
            .finish()
    }
}

/// Converts a mirror-relative path back to a `/`-separated URL fragment
pub fn path_to_url(path: &str) -> String {
    path.replace(MAIN_SEPARATOR, "/").trim_matches('/').to_string()
}

/// Percent-decodes a mapped path for use on disk
///
/// Rewritten references keep their escapes, which the browser decodes when
/// resolving them, so the file itself has to carry the decoded name. `+` is
/// left alone since browsers never decode it in paths.
pub fn decode_path(path: &str) -> String {
    urlencoding::decode(path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Decodes a mapped path and keeps it below the mirror root
///
/// Returns `None` when the decoded path would climb out of the destination
/// or replace it, as `%2e%2e` and `%2F` escapes do once decoded.
pub fn confined_path(path: &str) -> Option<PathBuf> {
    let decoded = PathBuf::from(decode_path(path));
    let escapes = decoded.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if escapes || decoded.as_os_str().is_empty() {
        None
    } else {
        Some(decoded)
    }
}

/// Drops empty and `.` segments and lets `..` pop, clamped at the root
fn resolve_dot_segments(relative: &str) -> String {
    let mut segments = Vec::new();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    segments.join("/")
}

/// `host/path` for URLs that a rewrite hook moved off the site
fn off_site_location(location: &str) -> &str {
    location
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(location)
}

/// Inserts `_<hash of query>` before the final extension of `path`
fn with_query_hash(path: &str, query: &str) -> String {
    let digest = hex::encode(Sha256::digest(query.as_bytes()));
    let hash = &digest[..QUERY_HASH_LEN];

    let file_start = path.rfind(MAIN_SEPARATOR).map_or(0, |i| i + 1);
    let extension_start = path[file_start..]
        .rfind('.')
        .map(|i| file_start + i)
        .filter(|&dot| {
            let extension = &path[dot + 1..];
            !extension.is_empty() && extension.chars().all(|c| c.is_ascii_alphanumeric())
        });

    match extension_start {
        Some(dot) => format!("{}_{}{}", &path[..dot], hash, &path[dot..]),
        None => format!("{}_{}", path, hash),
    }
}
