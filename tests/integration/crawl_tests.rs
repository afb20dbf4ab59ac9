//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and tempfile directories to
//! test the full crawl cycle end-to-end over both transports.

use docscrape::config::{load_config, TransportConfig, TransportKind, UserAgentConfig};
use docscrape::instrument::StatsInstrumentation;
use docscrape::{CrawlConfig, Crawler, FileTransport, HttpTransport, ResultRecord};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an HTML page with a title and links
fn page(title: &str, links: &[&str]) -> String {
    let anchors: Vec<String> = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><main><h1>{}</h1>{}</main>\
         <script>track()</script></body></html>",
        title,
        title,
        anchors.join("\n")
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

/// Mounts a page that must be fetched exactly once
async fn mount_once(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

fn http_transport(server: &MockServer) -> HttpTransport {
    let transport = TransportConfig {
        max_concurrent_requests: 4,
        ..TransportConfig::default()
    };
    HttpTransport::new(&transport, &UserAgentConfig::default(), &server.uri())
        .expect("Failed to build transport")
}

async fn collect<T: docscrape::Transport>(crawler: &Crawler<T>) -> Vec<ResultRecord> {
    let mut records = Vec::new();
    crawler
        .build_pages(|record| records.push(record))
        .await
        .expect("Crawl failed");
    records
}

fn headings(records: &[ResultRecord]) -> Vec<String> {
    let mut headings: Vec<String> = records
        .iter()
        .filter_map(|record| record.text("text"))
        .filter_map(|text| text.split_whitespace().next())
        .map(str::to_string)
        .collect();
    headings.sort();
    headings
}

#[tokio::test]
async fn test_http_crawl_visits_each_page_once() {
    let server = MockServer::start().await;

    // Root links to a and b; both link to c; c links back to everything
    mount_once(&server, "/", page("Root", &["/a", "/b", "/#top"])).await;
    mount_once(&server, "/a", page("A", &["/c", "/", "b"])).await;
    mount_once(&server, "/b", page("B", &["/c", "/A"])).await;
    mount_once(&server, "/c", page("C", &["/", "/a", "/b", "/c#section"])).await;

    let config = CrawlConfig::builder("mock", server.uri()).build();
    let stats = Arc::new(StatsInstrumentation::new());
    let crawler = Crawler::new(&config, http_transport(&server))
        .expect("Failed to build crawler")
        .with_instrumentation(stats.clone());

    let records = collect(&crawler).await;

    assert_eq!(headings(&records), vec!["A", "B", "C", "Root"]);
    for record in &records {
        assert!(!record.text("html").unwrap_or_default().contains("track()"));
    }

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.pages_processed, 4);
    assert_eq!(snapshot.urls_queued, 3);
}

#[tokio::test]
async fn test_http_crawl_root_path_scoping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(page("Home", &["/docs"])))
        .expect(0)
        .mount(&server)
        .await;
    mount_once(&server, "/docs", page("Docs", &["/", "/docs/intro"])).await;
    mount_once(&server, "/docs/intro", page("Intro", &["/docs", "/"])).await;

    let config = CrawlConfig::builder("mock", server.uri())
        .root_path("/docs")
        .build();
    let crawler = Crawler::new(&config, http_transport(&server)).expect("Failed to build crawler");

    let records = collect(&crawler).await;

    assert_eq!(headings(&records), vec!["Docs", "Intro"]);
}

#[tokio::test]
async fn test_http_crawl_skips_failed_and_empty_pages() {
    let server = MockServer::start().await;

    mount_once(&server, "/", page("Root", &["/gone", "/empty", "/ok"])).await;
    mount_once(&server, "/ok", page("Ok", &[])).await;
    mount_once(&server, "/empty", String::new()).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config = CrawlConfig::builder("mock", server.uri()).build();
    let stats = Arc::new(StatsInstrumentation::new());
    let crawler = Crawler::new(&config, http_transport(&server))
        .expect("Failed to build crawler")
        .with_instrumentation(stats.clone());

    let records = collect(&crawler).await;

    assert_eq!(headings(&records), vec!["Ok", "Root"]);
    assert_eq!(stats.snapshot().pages_ignored, 1);
}

#[tokio::test]
async fn test_http_build_page_does_not_traverse() {
    let server = MockServer::start().await;

    mount_once(&server, "/guide", page("Guide", &["/next"])).await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html(page("Next", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = CrawlConfig::builder("mock", server.uri())
        .options(|o| o.attribution = Some("Docs authors".to_string()))
        .build();
    let crawler = Crawler::new(&config, http_transport(&server)).expect("Failed to build crawler");

    let record = crawler
        .build_page("guide")
        .await
        .expect("Failed to build page")
        .expect("Page was ignored");

    assert_eq!(record.text("attribution"), Some("Docs authors"));
    assert_eq!(
        record.internal_urls(),
        Some(&[format!("{}/next", server.uri())][..])
    );
}

#[tokio::test]
async fn test_http_crawl_ignores_non_html_links() {
    let server = MockServer::start().await;

    mount_once(&server, "/", page("Root", &["/manual.pdf", "/b"])).await;
    mount_once(&server, "/b", page("B", &[])).await;
    Mock::given(method("GET"))
        .and(path("/manual.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(vec![0x25_u8, 0x50, 0x44, 0x46, 0xe2, 0xff, 0xfe], "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = CrawlConfig::builder("mock", server.uri()).build();
    let stats = Arc::new(StatsInstrumentation::new());
    let crawler = Crawler::new(&config, http_transport(&server))
        .expect("Failed to build crawler")
        .with_instrumentation(stats.clone());

    let records = collect(&crawler).await;

    assert_eq!(headings(&records), vec!["B", "Root"]);
    assert_eq!(stats.snapshot().pages_ignored, 1);
}

#[tokio::test]
async fn test_http_crawl_ignores_redirects_off_site() {
    let server = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    mount_once(&server, "/", page("Root", &["/login", "/ok"])).await;
    mount_once(&server, "/ok", page("Ok", &[])).await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/external", elsewhere.uri()).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_once(&elsewhere, "/external", page("External", &["/secret"])).await;
    Mock::given(method("GET"))
        .and(path("/secret"))
        .respond_with(html(page("Secret", &[])))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let config = CrawlConfig::builder("mock", server.uri()).build();
    let stats = Arc::new(StatsInstrumentation::new());
    let crawler = Crawler::new(&config, http_transport(&server))
        .expect("Failed to build crawler")
        .with_instrumentation(stats.clone());

    let records = collect(&crawler).await;

    assert_eq!(headings(&records), vec!["Ok", "Root"]);
    assert_eq!(stats.snapshot().pages_ignored, 1);
}

/// Writes a small documentation site to a temporary directory
fn write_site() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let root = dir.path();

    std::fs::create_dir_all(root.join("guide")).unwrap();
    std::fs::write(root.join("index.html"), page("Home", &["guide/", "api.html"])).unwrap();
    std::fs::write(
        root.join("guide").join("index.html"),
        page("Guide", &["install.html", "../api.html", "missing.html"]),
    )
    .unwrap();
    std::fs::write(
        root.join("guide").join("install.html"),
        page("Install", &["/guide/", "https://elsewhere.org/"]),
    )
    .unwrap();
    std::fs::write(root.join("api.html"), page("Api", &["/"])).unwrap();

    dir
}

#[tokio::test]
async fn test_file_crawl() {
    let site = write_site();
    let base = "http://docs.local/";
    let config = CrawlConfig::builder("local", base).build();
    let transport = FileTransport::new(site.path(), base).unwrap();
    let stats = Arc::new(StatsInstrumentation::new());
    let crawler = Crawler::new(&config, transport)
        .unwrap()
        .with_instrumentation(stats.clone());

    let records = collect(&crawler).await;

    assert_eq!(headings(&records), vec!["Api", "Guide", "Home", "Install"]);
    // missing.html reads as an empty body
    assert_eq!(stats.snapshot().pages_ignored, 1);
}

#[tokio::test]
async fn test_file_crawl_ignores_binary_assets() {
    let site = TempDir::new().expect("Failed to create temp dir");
    let root = site.path();

    std::fs::write(root.join("index.html"), page("Home", &["logo.png", "b.html"])).unwrap();
    std::fs::write(
        root.join("logo.png"),
        [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0xff],
    )
    .unwrap();
    std::fs::write(root.join("b.html"), page("B", &["/"])).unwrap();

    let base = "http://docs.local/";
    let config = CrawlConfig::builder("local", base).build();
    let transport = FileTransport::new(root, base).unwrap();
    let stats = Arc::new(StatsInstrumentation::new());
    let crawler = Crawler::new(&config, transport)
        .unwrap()
        .with_instrumentation(stats.clone());

    let records = collect(&crawler).await;

    assert_eq!(headings(&records), vec!["B", "Home"]);
    assert_eq!(stats.snapshot().pages_ignored, 1);
}

#[tokio::test]
async fn test_crawl_from_config_file() {
    let site = write_site();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("docscrape.toml");

    std::fs::write(
        &config_path,
        format!(
            r#"
[scraper]
name = "local"
base-url = "http://docs.local/"

[scraper.options]
container = "main"
skip = ["/api.html"]

[transport]
kind = "file"
dir = "{}"
"#,
            site.path().display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    let config = load_config(&config_path).expect("Failed to load config");
    assert_eq!(config.transport.kind, TransportKind::File);

    let dir = config.transport.dir.clone().unwrap();
    let transport = FileTransport::new(dir, config.scraper.base_url()).unwrap();
    let crawler = Crawler::new(&config.scraper, transport).unwrap();

    let records = collect(&crawler).await;

    assert_eq!(headings(&records), vec!["Guide", "Home", "Install"]);
}
