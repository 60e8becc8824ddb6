// Tests for crawl orchestration

use hostcrawl_core::crawl::{CrawlOptions, execute_crawl, extract_url_path};
use hostcrawl_scanner::{PermitScope, ScanError};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
}

#[test]
fn test_extract_url_path_empty_path() {
    assert_eq!(extract_url_path("http://example.com"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(extract_url_path("http://example.com/api/v1/users"), "/api/v1/users");
}

#[test]
fn test_extract_url_path_with_query_and_fragment() {
    assert_eq!(extract_url_path("http://example.com/api?key=value#top"), "/api");
}

#[test]
fn test_extract_url_path_with_port() {
    assert_eq!(extract_url_path("http://localhost:3000/api/test"), "/api/test");
}

#[test]
fn test_extract_url_path_invalid_url() {
    let url = "not a valid url";
    // Should return original string for invalid URLs
    assert_eq!(extract_url_path(url), url);
}

// ============================================================================
// Options Tests
// ============================================================================

#[test]
fn test_options_defaults() {
    let options = CrawlOptions::new("https://example.com");
    assert_eq!(options.seed, "https://example.com");
    assert_eq!(options.output_dir, std::path::PathBuf::from("crawl_output"));
    assert_eq!(options.max_depth, 2);
    assert_eq!(options.max_concurrency, 10);
    assert_eq!(options.permit_scope, PermitScope::Fetch);
    assert!(!options.show_progress_bars);
}

// ============================================================================
// execute_crawl Tests
// ============================================================================

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
}

#[tokio::test]
async fn test_execute_crawl_writes_host_directory() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/docs/intro">intro</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/intro"))
        .respond_with(html(r#"<a href="/">home</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();

    let mut options = CrawlOptions::new(server.uri());
    options.output_dir = output.path().to_path_buf();
    options.max_concurrency = 2;

    let summary = execute_crawl(
        options,
        Some(Arc::new(move |msg: String| {
            messages_clone.lock().unwrap().push(msg);
        })),
    )
    .await
    .unwrap();

    let host = Url::parse(&server.uri()).unwrap().host_str().unwrap().to_string();
    let dir = output.path().join(host);
    assert!(dir.join("index.html").exists());
    assert!(dir.join("_docs_intro.html").exists());
    assert_eq!(summary.pages_saved(), 2);
    assert_eq!(summary.output_dir, Some(dir));

    let messages = messages.lock().unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().any(|m| m.starts_with("[depth 1]") && m.ends_with("/docs/intro")));
}

#[tokio::test]
async fn test_execute_crawl_holding_permits_for_the_whole_task() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/a">a</a><a href="/b">b</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html("a"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html("b"))
        .mount(&server)
        .await;

    let mut options = CrawlOptions::new(server.uri());
    options.output_dir = output.path().to_path_buf();
    options.max_concurrency = 1;
    options.permit_scope = PermitScope::Task;

    let summary = execute_crawl(options, None).await.unwrap();
    assert_eq!(summary.pages_saved(), 3);
}

#[tokio::test]
async fn test_execute_crawl_rejects_bad_seed_without_touching_disk() {
    let output = TempDir::new().unwrap();
    let mut options = CrawlOptions::new("not a url");
    options.output_dir = output.path().join("out");

    let err = execute_crawl(options, None).await.unwrap_err();

    assert!(matches!(err, ScanError::InvalidUrl(_)));
    assert!(!output.path().join("out").exists());
}

#[tokio::test]
async fn test_execute_crawl_rejects_zero_concurrency() {
    let output = TempDir::new().unwrap();
    let mut options = CrawlOptions::new("https://example.com/");
    options.output_dir = output.path().to_path_buf();
    options.max_concurrency = 0;

    let err = execute_crawl(options, None).await.unwrap_err();
    assert!(matches!(err, ScanError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_execute_crawl_rejects_unusable_output_dir() {
    let output = TempDir::new().unwrap();
    let blocker = output.path().join("blocker");
    std::fs::write(&blocker, b"a file, not a directory").unwrap();

    let mut options = CrawlOptions::new("https://example.com/");
    options.output_dir = blocker.join("out");

    let err = execute_crawl(options, None).await.unwrap_err();

    assert!(matches!(err, ScanError::IoError(_)));
    assert!(err.to_string().contains("not usable"));
}
