// Tests for mirror session wiring

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use webmirror_core::crawl::{MirrorOptions, execute_mirror};
use webmirror_scanner::PageSource;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn mount_html(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_bytes(html.as_bytes()),
        )
        .mount(server)
        .await;
}

// ============================================================================
// Option Tests
// ============================================================================

#[test]
fn test_mirror_options_defaults() {
    let options = MirrorOptions::new("https://example.com", "./data");
    assert_eq!(options.url, "https://example.com");
    assert_eq!(options.dir, std::path::PathBuf::from("./data"));
    assert!(options.max_concurrency.is_none());
    assert!(options.timeout.is_none());
    assert!(!options.show_progress_bars);
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_execute_mirror_rejects_invalid_seed() {
    let dir = TempDir::new().unwrap();
    let options = MirrorOptions::new("github.com/features", dir.path());

    let err = execute_mirror(options, None).await.unwrap_err();
    assert!(err.to_string().contains("Invalid seed URL"));
}

#[tokio::test]
async fn test_execute_mirror_end_to_end() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/docs",
        r#"<a href="/docs/a">A</a><a href="/blog">Blog</a>"#,
    )
    .await;
    mount_html(&mock_server, "/docs/a", "<p>A</p>").await;

    let mut options = MirrorOptions::new(format!("{}/docs/", mock_server.uri()), dir.path());
    options.max_concurrency = Some(4);
    options.timeout = Some(Duration::from_secs(5));

    let outcome = execute_mirror(options, None).await.unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert!(outcome.results.iter().all(|r| r.source == PageSource::Network));
    assert!(dir.path().join("docs/docs.html").exists());
    assert!(dir.path().join("docs/a/a.html").exists());
    assert!(!dir.path().join("blog").exists());
}

#[tokio::test]
async fn test_execute_mirror_reports_failures() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_html(&mock_server, "/docs", r#"<a href="/docs/broken">broken</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/docs/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let messages = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();
    let callback = Arc::new(move |msg: String| {
        messages_clone.lock().unwrap().push(msg);
    });

    let options = MirrorOptions::new(format!("{}/docs", mock_server.uri()), dir.path());
    let outcome = execute_mirror(options, Some(callback)).await.unwrap();

    assert_eq!(outcome.stats.fetch_failures, 1);
    let messages = messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Failed to download /docs/broken"));
}
