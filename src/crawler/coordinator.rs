//! Crawl driver - the mirroring session and its main loop
//!
//! A `Mirror` owns one crawl session: the FIFO queue with its dedup ledger,
//! the path mapper and every registered hook. The loop in `download`:
//! - Dequeues one canonical URL and fetches it
//! - Scans and rewrites text-like bodies, enqueuing new in-scope discoveries
//! - Gives the item hook a chance to veto the write
//! - Writes the body under the destination and records the outcome

use crate::config::UserAgentConfig;
use crate::crawler::fetcher::{Fetch, FetchResult, HttpFetcher};
use crate::crawler::rewriter::{relative_prefix, rewrite_document};
use crate::crawler::scanner::{is_text_like, CDN_CGI_MARKER};
use crate::state::{CrawlLedger, PageState};
use crate::storage::{FsStorage, Storage};
use crate::url::{confined_path, normalize_reference, with_directory_root, PathMapper, SiteRoot};
use crate::{Result, UrlResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Predicate over `(url, destination path)`; every filter must accept a
/// discovered URL before it is enqueued
pub type FilterHook = Box<dyn Fn(&str, &Path) -> bool + Send + Sync>;

/// Called with `(url, body)` before a write; `false` vetoes the write
pub type ItemHook = Box<dyn Fn(&str, &[u8]) -> bool + Send + Sync>;

/// Pages between two progress lines
const PROGRESS_INTERVAL: usize = 10;

/// A website mirroring session
///
/// Sessions are cumulative. URLs added after a `download` are crawled by the
/// next `download`, and a URL the ledger has already seen is never fetched
/// again.
///
/// # Example
///
/// ```no_run
/// use site_mirror::crawler::Mirror;
/// use site_mirror::config::UserAgentConfig;
/// use std::path::Path;
///
/// # async fn run() -> site_mirror::Result<()> {
/// let mut mirror = Mirror::new("https://example.com", &UserAgentConfig::default())?;
/// mirror.filter(|url, _| !url.ends_with(".zip"));
///
/// let outcomes = mirror.download(Path::new("./mirror"), None).await;
/// println!("{} resources", outcomes.len());
/// # Ok(())
/// # }
/// ```
pub struct Mirror {
    fetcher: Box<dyn Fetch>,
    storage: Box<dyn Storage>,
    item: Option<ItemHook>,
    filters: Vec<FilterHook>,
    mapper: PathMapper,
    ledger: CrawlLedger,
}

impl Mirror {
    /// Creates a session fetching over HTTP
    pub fn new(root: &str, user_agent: &UserAgentConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(user_agent)?;
        Ok(Self::with_fetcher(root, fetcher)?)
    }

    /// Creates a session with a custom fetch collaborator
    ///
    /// The canonical site root is queued immediately.
    pub fn with_fetcher(root: &str, fetcher: impl Fetch + 'static) -> UrlResult<Self> {
        let root = SiteRoot::parse(root)?;
        let seed = with_directory_root(root.as_str().to_string());

        let mut ledger = CrawlLedger::new();
        ledger.enqueue(seed);

        Ok(Self {
            fetcher: Box::new(fetcher),
            storage: Box::new(FsStorage::new()),
            item: None,
            filters: Vec::new(),
            mapper: PathMapper::new(root),
            ledger,
        })
    }

    /// Replaces the write collaborator
    pub fn with_storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    /// Sets the per-item hook; returning `false` suppresses the write
    pub fn on_item<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&str, &[u8]) -> bool + Send + Sync + 'static,
    {
        self.item = Some(Box::new(hook));
        self
    }

    /// Appends a filter for discovered URLs
    pub fn filter<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&str, &Path) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Box::new(hook));
        self
    }

    /// Appends a rewrite hook applied during path mapping
    pub fn rewrite<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.mapper.add_rewrite(Box::new(hook));
        self
    }

    /// Seeds an extra starting point
    ///
    /// The URL is canonicalized and queued unless the ledger already knows
    /// it. Scope and filters are not consulted.
    pub fn add(&mut self, url: &str) -> &mut Self {
        let canonical = with_directory_root(normalize_reference(self.mapper.root(), url, None));
        if self.ledger.enqueue(canonical.clone()) {
            tracing::debug!("Seeded {}", canonical);
        }
        self
    }

    pub fn root(&self) -> &SiteRoot {
        self.mapper.root()
    }

    pub fn ledger(&self) -> &CrawlLedger {
        &self.ledger
    }

    /// Mirror-relative path a URL is written to
    pub fn local_path(&self, url: &str) -> String {
        self.mapper.url_to_path(url)
    }

    /// Crawls until the queue is empty
    ///
    /// Rewritten references are relative to each document, or start with
    /// `remote_prefix` when one is given. Fetch and write failures are
    /// recorded in the ledger and never abort the crawl.
    ///
    /// # Returns
    ///
    /// Every URL of the session mapped to whether it was written
    pub async fn download(
        &mut self,
        destination: &Path,
        remote_prefix: Option<&str>,
    ) -> BTreeMap<String, bool> {
        tracing::info!(
            "Mirroring {} into {} ({} queued)",
            self.mapper.root().as_str(),
            destination.display(),
            self.ledger.queue_len()
        );

        let start_time = Instant::now();
        let mut processed = 0;

        while let Some(url) = self.ledger.dequeue() {
            tracing::debug!("Processing URL: {}", url);
            self.process_url(&url, destination, remote_prefix).await;
            processed += 1;

            if processed % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} pages processed, {} queued, {} written",
                    processed,
                    self.ledger.queue_len(),
                    self.ledger.count(PageState::Written)
                );
            }
        }

        tracing::info!(
            "Mirror completed: {} pages processed in {:?}, {} written in total",
            processed,
            start_time.elapsed(),
            self.ledger.count(PageState::Written)
        );

        self.ledger.outcomes()
    }

    async fn process_url(&mut self, url: &str, destination: &Path, remote_prefix: Option<&str>) {
        let body = match self.fetcher.fetch(url).await {
            FetchResult::Success { body } => body,
            FetchResult::Failed { error } => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                self.ledger.mark(url, PageState::FetchFailed);
                return;
            }
        };

        let path = self.mapper.url_to_path(url);
        let Some(local) = confined_path(&path) else {
            tracing::warn!("Not writing {}: {} leaves the destination", url, path);
            self.ledger.mark(url, PageState::WriteFailed);
            return;
        };
        let target = destination.join(&local);

        let body = if is_text_like(url) {
            match String::from_utf8(body) {
                Ok(text) => {
                    let prefix = match remote_prefix {
                        Some(prefix) => prefix.to_string(),
                        None => relative_prefix(&local.to_string_lossy()),
                    };
                    let document = rewrite_document(&text, url, &prefix, &self.mapper);
                    self.enqueue_discovered(&document.references, destination);
                    document.body.into_bytes()
                }
                Err(e) => {
                    tracing::debug!("Not scanning {}: body is not UTF-8", url);
                    e.into_bytes()
                }
            }
        } else {
            body
        };

        self.ledger.mark(url, PageState::Fetched);

        if let Some(item) = &self.item {
            if !item(url, &body) {
                tracing::debug!("Write of {} vetoed", url);
                self.ledger.mark(url, PageState::Vetoed);
                return;
            }
        }

        match self.storage.write(&target, &body) {
            Ok(()) => self.ledger.mark(url, PageState::Written),
            Err(e) => {
                tracing::warn!("Failed to write {}: {}", url, e);
                self.ledger.mark(url, PageState::WriteFailed);
            }
        }
    }

    fn enqueue_discovered(&mut self, references: &[String], destination: &Path) {
        for url in references {
            if self.ledger.contains(url) || !self.should_download(url, destination) {
                continue;
            }

            tracing::debug!("Discovered {}", url);
            self.ledger.enqueue(url.clone());
        }
    }

    fn should_download(&self, url: &str, destination: &Path) -> bool {
        if url.contains(CDN_CGI_MARKER) || !self.mapper.root().contains(url) {
            return false;
        }

        // Unsafe paths are left to the driver, which records them as not written
        match self.destination_path(url, destination) {
            Some(target) => self.filters.iter().all(|filter| filter(url, &target)),
            None => true,
        }
    }

    fn destination_path(&self, url: &str, destination: &Path) -> Option<PathBuf> {
        confined_path(&self.mapper.url_to_path(url)).map(|local| destination.join(local))
    }
}

impl std::fmt::Debug for Mirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mirror")
            .field("mapper", &self.mapper)
            .field("filters", &self.filters.len())
            .field("item", &self.item.is_some())
            .field("ledger", &self.ledger)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StorageError, StorageResult};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    type FetchLog = Arc<Mutex<Vec<String>>>;

    /// In-memory site; unknown URLs fail like a 404
    fn site(pages: &[(&str, &[u8])]) -> (impl Fetch + 'static, FetchLog) {
        let pages: HashMap<String, Vec<u8>> = pages
            .iter()
            .map(|(url, body)| (url.to_string(), body.to_vec()))
            .collect();
        let log = FetchLog::default();
        let fetched = Arc::clone(&log);

        let fetcher = move |url: &str| {
            fetched.lock().unwrap().push(url.to_string());
            match pages.get(url) {
                Some(body) => FetchResult::success(body.clone()),
                None => FetchResult::failed("HTTP 404"),
            }
        };

        (fetcher, log)
    }

    fn fetched(log: &FetchLog) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn write(&self, path: &Path, _data: &[u8]) -> StorageResult<()> {
            Err(StorageError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[tokio::test]
    async fn test_mirror_single_page_with_links() {
        let dir = TempDir::new().unwrap();
        let (fetcher, _) = site(&[
            (
                "https://ex.com/",
                br#"<a href="/about">About</a> <a href="https://other.com/x">Out</a>"#,
            ),
            ("https://ex.com/about", b"<p>About us</p>"),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        let outcomes = mirror.download(dir.path(), None).await;

        let expected: BTreeMap<String, bool> = [
            ("https://ex.com/".to_string(), true),
            ("https://ex.com/about".to_string(), true),
        ]
        .into_iter()
        .collect();
        assert_eq!(outcomes, expected);

        let index = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains(r#"href="./about.html""#));
        assert!(index.contains(r#"href="https://other.com/x""#));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("about.html")).unwrap(),
            "<p>About us</p>"
        );
    }

    #[tokio::test]
    async fn test_repeated_link_is_fetched_once() {
        let dir = TempDir::new().unwrap();
        let (fetcher, log) = site(&[
            (
                "https://ex.com/",
                br#"<a href="/x">1</a><a href="/x">2</a><a href="https://ex.com/x#top">3</a>"#,
            ),
            ("https://ex.com/x", br#"<a href="/">home</a>"#),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        let outcomes = mirror.download(dir.path(), None).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            fetched(&log),
            vec!["https://ex.com/".to_string(), "https://ex.com/x".to_string()]
        );
    }

    #[tokio::test]
    async fn test_out_of_scope_links_are_never_fetched() {
        let dir = TempDir::new().unwrap();
        let (fetcher, log) = site(&[(
            "https://ex.com/docs/",
            br#"<a href="/blog/">b</a><a href="//cdn.ex.com/a.js">c</a><a href="intro">i</a>"#,
        )]);

        let mut mirror = Mirror::with_fetcher("https://ex.com/docs/", fetcher).unwrap();
        mirror.download(dir.path(), None).await;

        assert_eq!(
            fetched(&log),
            vec![
                "https://ex.com/docs/".to_string(),
                "https://ex.com/docs/intro".to_string()
            ]
        );
        let index = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains(r#"href="/blog/""#));
        assert!(index.contains(r#"href="./intro.html""#));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recorded_and_crawl_continues() {
        let dir = TempDir::new().unwrap();
        let (fetcher, _) = site(&[
            ("https://ex.com/", br#"<a href="/gone">g</a><a href="/ok">o</a>"#),
            ("https://ex.com/ok", b"ok"),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        let outcomes = mirror.download(dir.path(), None).await;

        assert_eq!(outcomes.get("https://ex.com/gone"), Some(&false));
        assert_eq!(outcomes.get("https://ex.com/ok"), Some(&true));
        assert_eq!(
            mirror.ledger().state("https://ex.com/gone"),
            Some(PageState::FetchFailed)
        );
        assert!(!dir.path().join("gone.html").exists());
    }

    #[tokio::test]
    async fn test_item_hook_vetoes_write() {
        let dir = TempDir::new().unwrap();
        let (fetcher, _) = site(&[
            ("https://ex.com/", br#"<a href="/secret">s</a>"#),
            ("https://ex.com/secret", b"classified"),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        mirror.on_item(|url, body| !(url.ends_with("/secret") && body == b"classified"));
        let outcomes = mirror.download(dir.path(), None).await;

        assert_eq!(outcomes.get("https://ex.com/"), Some(&true));
        assert_eq!(outcomes.get("https://ex.com/secret"), Some(&false));
        assert_eq!(
            mirror.ledger().state("https://ex.com/secret"),
            Some(PageState::Vetoed)
        );
        assert!(!dir.path().join("secret.html").exists());
    }

    #[tokio::test]
    async fn test_writes_stay_inside_destination() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("a").join("b").join("mirror");
        let (fetcher, _) = site(&[
            (
                "https://ex.com/",
                br#"<a href="https://ex.com/x/../../../dotdot">d</a>
                <a href="/%2e%2e/%2e%2e/encoded">e</a>
                <a href="/%2Ftmp%2Fabs_escape">a</a>"#,
            ),
            ("https://ex.com/x/../../../dotdot", b"dotdot"),
            ("https://ex.com/%2e%2e/%2e%2e/encoded", b"encoded"),
            ("https://ex.com/%2Ftmp%2Fabs_escape", b"absolute"),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        let outcomes = mirror.download(&destination, None).await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(
            outcomes.get("https://ex.com/x/../../../dotdot"),
            Some(&true)
        );
        assert_eq!(
            std::fs::read(destination.join("dotdot.html")).unwrap(),
            b"dotdot"
        );
        assert!(!dir.path().join("a").join("dotdot.html").exists());

        for url in [
            "https://ex.com/%2e%2e/%2e%2e/encoded",
            "https://ex.com/%2Ftmp%2Fabs_escape",
        ] {
            assert_eq!(mirror.ledger().state(url), Some(PageState::WriteFailed));
        }
        assert!(!dir.path().join("a").join("encoded.html").exists());
    }

    #[tokio::test]
    async fn test_prefix_depth_follows_decoded_path() {
        let dir = TempDir::new().unwrap();
        let (fetcher, _) = site(&[
            ("https://ex.com/", br#"<a href="/a%2Fb">b</a>"#),
            ("https://ex.com/a%2Fb", br#"<a href="/">home</a>"#),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        mirror.download(dir.path(), None).await;

        let nested = std::fs::read_to_string(dir.path().join("a").join("b.html")).unwrap();
        assert_eq!(nested, r#"<a href="./../index.html">home</a>"#);
    }

    #[tokio::test]
    async fn test_write_failure_is_recorded() {
        let dir = TempDir::new().unwrap();
        let (fetcher, _) = site(&[("https://ex.com/", b"<p>hi</p>")]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher)
            .unwrap()
            .with_storage(FailingStorage);
        let outcomes = mirror.download(dir.path(), None).await;

        assert_eq!(outcomes.get("https://ex.com/"), Some(&false));
        assert_eq!(
            mirror.ledger().state("https://ex.com/"),
            Some(PageState::WriteFailed)
        );
    }

    #[tokio::test]
    async fn test_filters_gate_enqueue_but_not_rewriting() {
        let dir = TempDir::new().unwrap();
        let (fetcher, log) = site(&[
            (
                "https://ex.com/",
                br#"<img src="/big.png"><a href="/page">p</a>"#,
            ),
            ("https://ex.com/page", b"page"),
            ("https://ex.com/big.png", b"png"),
        ]);

        let destination = dir.path().to_path_buf();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&seen);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        mirror
            .filter(move |_, path| {
                recorded.lock().unwrap().push(path.to_path_buf());
                true
            })
            .filter(|url, _| !url.ends_with(".png"));
        mirror.download(&destination, None).await;

        assert!(!fetched(&log).contains(&"https://ex.com/big.png".to_string()));
        let index = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains(r#"src="./big.png""#));

        let seen = seen.lock().unwrap();
        assert!(seen.contains(&destination.join("big.png")));
        assert!(seen.contains(&destination.join("page.html")));
    }

    #[tokio::test]
    async fn test_add_after_download_is_cumulative() {
        let dir = TempDir::new().unwrap();
        let (fetcher, log) = site(&[
            ("https://ex.com/", b"<p>home</p>"),
            ("https://ex.com/extra", b"<p>extra</p>"),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        mirror.download(dir.path(), None).await;

        mirror.add("https://ex.com/extra").add("https://ex.com");
        let outcomes = mirror.download(dir.path(), None).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.values().all(|written| *written));
        assert_eq!(
            fetched(&log),
            vec![
                "https://ex.com/".to_string(),
                "https://ex.com/extra".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_add_skips_scope_check() {
        let dir = TempDir::new().unwrap();
        let (fetcher, log) = site(&[
            ("https://ex.com/", b"home"),
            ("https://other.com/feed.xml", b"<rss/>"),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        mirror.add("https://other.com/feed.xml");
        let outcomes = mirror.download(dir.path(), None).await;

        assert_eq!(outcomes.get("https://other.com/feed.xml"), Some(&true));
        assert_eq!(fetched(&log).len(), 2);
        assert!(dir.path().join("other.com").join("feed.xml").is_file());
    }

    #[tokio::test]
    async fn test_remote_prefix_mode() {
        let dir = TempDir::new().unwrap();
        let (fetcher, _) = site(&[
            ("https://ex.com/", br#"<a href="/blog/post">p</a>"#),
            ("https://ex.com/blog/post", br#"<link href="../css/site.css">"#),
            ("https://ex.com/css/site.css", b"body{}"),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        mirror
            .download(dir.path(), Some("https://static.ex.net/"))
            .await;

        let post =
            std::fs::read_to_string(dir.path().join("blog").join("post.html")).unwrap();
        assert_eq!(post, r#"<link href="https://static.ex.net/css/site.css">"#);
    }

    #[tokio::test]
    async fn test_nested_documents_rewrite_relative_to_themselves() {
        let dir = TempDir::new().unwrap();
        let (fetcher, _) = site(&[
            ("https://ex.com/", br#"<a href="/blog/post">p</a>"#),
            (
                "https://ex.com/blog/post",
                br#"<a href="/">home</a><img src="img/a.png">"#,
            ),
            ("https://ex.com/blog/img/a.png", b"\x89PNG"),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        let outcomes = mirror.download(dir.path(), None).await;

        assert_eq!(outcomes.len(), 3);
        let post =
            std::fs::read_to_string(dir.path().join("blog").join("post.html")).unwrap();
        assert_eq!(
            post,
            r#"<a href="./../index.html">home</a><img src="./../blog/img/a.png">"#
        );
        assert_eq!(
            std::fs::read(dir.path().join("blog").join("img").join("a.png")).unwrap(),
            b"\x89PNG"
        );
    }

    #[tokio::test]
    async fn test_binary_bodies_are_not_scanned() {
        let dir = TempDir::new().unwrap();
        let (fetcher, log) = site(&[
            ("https://ex.com/", br#"<img src="/logo.png">"#),
            ("https://ex.com/logo.png", br#"src="/hidden""#),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        mirror.download(dir.path(), None).await;

        assert!(!fetched(&log).contains(&"https://ex.com/hidden".to_string()));
    }

    #[tokio::test]
    async fn test_non_utf8_text_body_is_written_unmodified() {
        let dir = TempDir::new().unwrap();
        let body: &[u8] = b"<a href=\"/next\">\xff\xfe</a>";
        let (fetcher, log) = site(&[("https://ex.com/", body)]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        let outcomes = mirror.download(dir.path(), None).await;

        assert_eq!(outcomes.get("https://ex.com/"), Some(&true));
        assert_eq!(fetched(&log).len(), 1);
        assert_eq!(std::fs::read(dir.path().join("index.html")).unwrap(), body);
    }

    #[tokio::test]
    async fn test_cdn_cgi_links_are_not_enqueued() {
        let dir = TempDir::new().unwrap();
        let (fetcher, log) = site(&[(
            "https://ex.com/",
            br#"<a href="/cdn-cgi/l/email-protection">mail</a>"#,
        )]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        mirror.download(dir.path(), None).await;

        assert_eq!(fetched(&log), vec!["https://ex.com/".to_string()]);
    }

    #[tokio::test]
    async fn test_rewrite_hook_moves_files_and_references() {
        let dir = TempDir::new().unwrap();
        let (fetcher, _) = site(&[
            ("https://ex.com/", br#"<a href="/old/page">p</a>"#),
            ("https://ex.com/old/page", b"moved"),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        mirror.rewrite(|url| {
            url.contains("/old/")
                .then(|| url.replace("/old/", "/new/"))
        });
        mirror.download(dir.path(), None).await;

        let index = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains(r#"href="./new/page.html""#));
        assert!(dir.path().join("new").join("page.html").is_file());
        assert_eq!(
            mirror.local_path("https://ex.com/old/page"),
            ["new", "page.html"].join(std::path::MAIN_SEPARATOR_STR)
        );
    }

    #[tokio::test]
    async fn test_query_variants_are_written_separately() {
        let dir = TempDir::new().unwrap();
        let (fetcher, _) = site(&[
            ("https://ex.com/", br#"<a href="/list?page=1">1</a><a href="/list?page=2">2</a>"#),
            ("https://ex.com/list?page=1", b"one"),
            ("https://ex.com/list?page=2", b"two"),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        let outcomes = mirror.download(dir.path(), None).await;

        assert_eq!(outcomes.len(), 3);
        let first = mirror.local_path("https://ex.com/list?page=1");
        let second = mirror.local_path("https://ex.com/list?page=2");
        assert_ne!(first, second);
        assert_eq!(std::fs::read(dir.path().join(&first)).unwrap(), b"one");
        assert_eq!(std::fs::read(dir.path().join(&second)).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_percent_encoded_path_is_decoded_on_disk() {
        let dir = TempDir::new().unwrap();
        let (fetcher, _) = site(&[
            ("https://ex.com/", br#"<a href="/my%20page">p</a>"#),
            ("https://ex.com/my%20page", b"spaced"),
        ]);

        let mut mirror = Mirror::with_fetcher("https://ex.com", fetcher).unwrap();
        mirror.download(dir.path(), None).await;

        let index = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains(r#"href="./my%20page.html""#));
        assert!(dir.path().join("my page.html").is_file());
    }
}
