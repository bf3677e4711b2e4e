//! Integration tests for the mirror
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, rewrite and write cycle end-to-end into a temporary directory.

use site_mirror::config::{
    Config, ExcludeEntry, OutputConfig, SiteConfig, UserAgentConfig,
};
use site_mirror::crawler::{run_mirror, Mirror, RunOptions};
use site_mirror::output::SqliteManifest;
use site_mirror::state::PageState;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration mirroring `root` into `dir`
fn create_test_config(root: &str, dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            root: root.to_string(),
        },
        output: OutputConfig {
            destination: dir.join("mirror").display().to_string(),
            remote_prefix: None,
            summary_path: Some(dir.join("report.md").display().to_string()),
            database_path: Some(dir.join("mirror.db").display().to_string()),
            overlay_dir: None,
            overlay_skip_extension: "php".to_string(),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestMirror".to_string(),
            crawler_version: "1.0.0".to_string(),
        },
        seeds: vec![],
        excludes: vec![],
        rewrites: vec![],
    }
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).expect("mirrored file should exist")
}

#[tokio::test]
async fn test_full_mirror_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><link rel="stylesheet" href="/css/site.css"></head><body>
        <img src="/img/logo.png">
        <a href="/about">About</a>
        <a href="https://other.example.org/">Elsewhere</a>
        <a href="mailto:me@example.org">Mail</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/about",
        r#"<a href="/">Home</a> <a href="team/">Team</a> <a href="/about">Self</a>"#,
    )
    .await;
    mount_page(&mock_server, "/team/", r#"<a href="../about">Back</a>"#).await;
    mount_page(
        &mock_server,
        "/css/site.css",
        "body { background: url(../img/bg.png) }",
    )
    .await;

    for image in ["/img/logo.png", "/img/bg.png"] {
        Mock::given(method("GET"))
            .and(path(image))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let mut mirror = Mirror::new(&base_url, &UserAgentConfig::default()).unwrap();
    let outcomes = mirror.download(dir.path(), None).await;

    assert_eq!(outcomes.len(), 6);
    assert!(outcomes.values().all(|written| *written));
    assert!(!outcomes.keys().any(|url| url.contains("other.example.org")));

    let index = read(dir.path().join("index.html"));
    assert!(index.contains(r#"href="./css/site.css""#));
    assert!(index.contains(r#"src="./img/logo.png""#));
    assert!(index.contains(r#"href="./about.html""#));
    assert!(index.contains(r#"href="https://other.example.org/""#));
    assert!(index.contains(r#"href="mailto:me@example.org""#));

    let about = read(dir.path().join("about.html"));
    assert!(about.contains(r#"href="./index.html""#));
    assert!(about.contains(r#"href="./team/index.html""#));

    let team = read(dir.path().join("team").join("index.html"));
    assert_eq!(team, r#"<a href="./../about.html">Back</a>"#);

    let css = read(dir.path().join("css").join("site.css"));
    assert_eq!(css, "body { background: url(./../img/bg.png) }");

    assert_eq!(
        std::fs::read(dir.path().join("img").join("bg.png")).unwrap(),
        vec![0x89, b'P', b'N', b'G']
    );
}

#[tokio::test]
async fn test_http_errors_are_fetch_failures() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Missing</a><a href="/broken">Broken</a><a href="/fine">Fine</a>"#,
    )
    .await;
    mount_page(&mock_server, "/fine", "fine").await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut mirror = Mirror::new(&base_url, &UserAgentConfig::default()).unwrap();
    let outcomes = mirror.download(dir.path(), None).await;

    let missing = format!("{}/missing", base_url);
    let broken = format!("{}/broken", base_url);
    assert_eq!(outcomes.get(&missing), Some(&false));
    assert_eq!(outcomes.get(&broken), Some(&false));
    assert_eq!(outcomes.get(&format!("{}/fine", base_url)), Some(&true));
    assert_eq!(mirror.ledger().state(&missing), Some(PageState::FetchFailed));
    assert!(!dir.path().join("missing.html").exists());
}

#[tokio::test]
async fn test_query_variants_do_not_collide() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/list?page=1">1</a> <a href="/list?page=2">2</a> <a href="/list?page=1">again</a>"#,
    )
    .await;

    for page in ["1", "2"] {
        Mock::given(method("GET"))
            .and(path("/list"))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("page {}", page)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let mut mirror = Mirror::new(&base_url, &UserAgentConfig::default()).unwrap();
    let outcomes = mirror.download(dir.path(), None).await;

    assert_eq!(outcomes.len(), 3);

    let first = mirror.local_path(&format!("{}/list?page=1", base_url));
    let second = mirror.local_path(&format!("{}/list?page=2", base_url));
    assert_ne!(first, second);
    assert!(first.starts_with("list_") && first.ends_with(".html"));
    assert_eq!(read(dir.path().join(&first)), "page 1");
    assert_eq!(read(dir.path().join(&second)), "page 2");

    let index = read(dir.path().join("index.html"));
    assert!(index.contains(&format!(r#"href="./{}""#, first)));
}

#[tokio::test]
async fn test_remote_prefix_rewriting() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/blog/post">Post</a>"#).await;
    mount_page(&mock_server, "/blog/post", r#"<img src="../img/a.png">"#).await;
    Mock::given(method("GET"))
        .and(path("/img/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut mirror = Mirror::new(&base_url, &UserAgentConfig::default()).unwrap();
    mirror
        .download(dir.path(), Some("https://static.example.net/"))
        .await;

    assert_eq!(
        read(dir.path().join("index.html")),
        r#"<a href="https://static.example.net/blog/post.html">Post</a>"#
    );
    assert_eq!(
        read(dir.path().join("blog").join("post.html")),
        r#"<img src="https://static.example.net/img/a.png">"#
    );
}

#[tokio::test]
async fn test_subdirectory_root_limits_scope() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/docs/", mock_server.uri());

    mount_page(
        &mock_server,
        "/docs/",
        r#"<a href="/blog/">Blog</a><a href="intro">Intro</a>"#,
    )
    .await;
    mount_page(&mock_server, "/docs/intro", r#"<a href="../blog/">Blog</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut mirror = Mirror::new(&root, &UserAgentConfig::default()).unwrap();
    let outcomes = mirror.download(dir.path(), None).await;

    assert_eq!(outcomes.len(), 2);
    assert!(read(dir.path().join("index.html")).contains(r#"href="/blog/""#));
    assert!(dir.path().join("intro.html").is_file());
}

#[tokio::test]
async fn test_run_mirror_with_configuration() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/page">Page</a><a href="/archive.zip">Zip</a>"#,
    )
    .await;
    mount_page(&mock_server, "/page", "page").await;
    mount_page(&mock_server, "/extra", "extra").await;

    Mock::given(method("GET"))
        .and(path("/archive.zip"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base_url, dir.path());
    config.excludes.push(ExcludeEntry {
        pattern: r"\.zip$".to_string(),
    });
    config.seeds.push(site_mirror::config::SeedEntry {
        url: format!("{}/extra", base_url),
    });

    let report = run_mirror(&config, RunOptions::default(), "test-hash")
        .await
        .unwrap();

    assert_eq!(report.summary.total_pages, 3);
    assert_eq!(report.summary.pages_written, 3);
    assert_eq!(report.statistics.count(PageState::Written), 3);

    let mirror_dir = dir.path().join("mirror");
    assert!(mirror_dir.join("index.html").is_file());
    assert!(mirror_dir.join("page.html").is_file());
    assert!(mirror_dir.join("extra.html").is_file());

    let markdown = read(dir.path().join("report.md"));
    assert!(markdown.contains("- **Config Hash**: test-hash"));
    assert!(markdown.contains("| Written | 3 |"));

    let states = SqliteManifest::new(dir.path().join("mirror.db"))
        .load_states()
        .unwrap();
    assert_eq!(states.len(), 3);
    assert!(states.iter().all(|(_, state)| *state == PageState::Written));
}
