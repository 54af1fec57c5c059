//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run complete
//! crawls against them.

use std::collections::BTreeMap;
use std::time::Duration;
use sumi_harvest::crawler::{crawl, CrawlDriver, CrawlRequest, CrawlSettings};
use sumi_harvest::{HarvestError, PageErrorKind, ValidationError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves `body` as HTML at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// A page with a title and links to each of `hrefs`
fn page_with_links(title: &str, hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!("<a href=\"{}\">{}</a>", href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, links
    )
}

fn test_settings() -> CrawlSettings {
    CrawlSettings {
        request_timeout: Duration::from_secs(5),
        ..CrawlSettings::default()
    }
}

#[tokio::test]
async fn test_two_page_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/p1", &page_with_links("Page One", &["/p2"])).await;
    mount_page(&server, "/p2", &page_with_links("Page Two", &[])).await;

    let request = CrawlRequest::new(format!("{}/p1", base))
        .max_depth(1)
        .max_pages(5);
    let result = crawl(&request, &test_settings()).await.unwrap();

    assert!(result.success);
    assert_eq!(result.pages_scraped, 2);
    assert_eq!(
        result.urls_visited,
        vec![format!("{}/p1", base), format!("{}/p2", base)]
    );
    assert_eq!(result.data[0].depth, 0);
    assert_eq!(result.data[1].depth, 1);
    assert_eq!(result.data[1].extracted["title"], vec!["Page Two"]);
    assert!(result.failures.is_empty());
}

#[tokio::test]
async fn test_default_selectors_extract_title_and_paragraphs() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "<html><head><title>Foo</title></head><body><p> Hello </p><p>World</p></body></html>",
    )
    .await;

    let request = CrawlRequest::new(format!("{}/", server.uri())).max_depth(0);
    let result = crawl(&request, &test_settings()).await.unwrap();

    let extracted = &result.data[0].extracted;
    assert_eq!(extracted["title"], vec!["Foo"]);
    assert_eq!(extracted["content"], vec!["Hello", "World"]);
}

#[tokio::test]
async fn test_custom_selectors_with_no_matches() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<html><body><h1>Heading</h1></body></html>").await;

    let selectors = BTreeMap::from([
        ("heading".to_string(), "h1".to_string()),
        ("price".to_string(), ".price".to_string()),
    ]);
    let request = CrawlRequest::new(format!("{}/", server.uri()))
        .max_depth(0)
        .selectors(selectors);
    let result = crawl(&request, &test_settings()).await.unwrap();

    let extracted = &result.data[0].extracted;
    assert_eq!(extracted["heading"], vec!["Heading"]);
    assert!(extracted["price"].is_empty());
    assert!(!extracted.contains_key("title"));
}

#[tokio::test]
async fn test_depth_zero_never_follows_links() {
    let server = MockServer::start().await;
    mount_page(&server, "/p1", &page_with_links("Seed", &["/p2"])).await;

    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = CrawlRequest::new(format!("{}/p1", server.uri()))
        .max_depth(0)
        .max_pages(5);
    let result = crawl(&request, &test_settings()).await.unwrap();

    assert_eq!(result.pages_scraped, 1);
    assert_eq!(result.urls_visited.len(), 1);
}

#[tokio::test]
async fn test_budget_stops_crawl_with_frontier_non_empty() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Seed", &["/a", "/b", "/c"])).await;

    let request = CrawlRequest::new(format!("{}/", server.uri()))
        .max_depth(1)
        .max_pages(1);
    let mut driver = CrawlDriver::new(&request, &test_settings()).unwrap();
    let result = driver.run().await;

    assert_eq!(result.pages_scraped, 1);
    assert_eq!(result.urls_visited.len(), 1);
    assert_eq!(driver.frontier().len(), 3);
}

#[tokio::test]
async fn test_failed_page_does_not_abort_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &page_with_links("Seed", &["/missing", "/ok"])).await;
    mount_page(&server, "/ok", &page_with_links("Fine", &[])).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let request = CrawlRequest::new(format!("{}/", base)).max_depth(1);
    let result = crawl(&request, &test_settings()).await.unwrap();

    assert!(result.success);
    assert_eq!(result.pages_scraped, 2);
    assert_eq!(result.urls_visited.len(), 3);
    assert_eq!(result.urls_visited[1], format!("{}/missing", base));
    assert!(result.data.iter().all(|page| page.url != format!("{}/missing", base)));

    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].kind, PageErrorKind::FetchError);
    assert_eq!(result.failures[0].error, "HTTP status 404");
}

#[tokio::test]
async fn test_undecodable_body_is_parse_error() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &page_with_links("Seed", &["/garbled", "/ok"])).await;
    mount_page(&server, "/ok", &page_with_links("Fine", &[])).await;
    Mock::given(method("GET"))
        .and(path("/garbled"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .insert_header("content-encoding", "gzip")
                .set_body_bytes(b"this is not gzip at all".to_vec()),
        )
        .mount(&server)
        .await;

    let request = CrawlRequest::new(format!("{}/", base)).max_depth(1);
    let result = crawl(&request, &test_settings()).await.unwrap();

    let garbled = format!("{}/garbled", base);
    assert!(result.urls_visited.contains(&garbled));
    assert!(result.data.iter().all(|page| page.url != garbled));
    assert_eq!(result.pages_scraped, 2);
    assert!(result.data.iter().any(|page| page.url == format!("{}/ok", base)));

    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].url, garbled);
    assert_eq!(result.failures[0].kind, PageErrorKind::ParseError);
}

#[tokio::test]
async fn test_cycles_are_visited_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/p1", &page_with_links("One", &["/p2", "/p1"])).await;
    mount_page(&server, "/p2", &page_with_links("Two", &["/p1"])).await;

    let request = CrawlRequest::new(format!("{}/p1", base))
        .max_depth(5)
        .max_pages(10);
    let result = crawl(&request, &test_settings()).await.unwrap();

    assert_eq!(
        result.urls_visited,
        vec![format!("{}/p1", base), format!("{}/p2", base)]
    );
    assert_eq!(result.pages_scraped, 2);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &page_with_links("Root", &["/a", "/b"])).await;
    mount_page(&server, "/a", &page_with_links("A", &["/c"])).await;
    mount_page(&server, "/b", &page_with_links("B", &["/d"])).await;
    mount_page(&server, "/c", &page_with_links("C", &[])).await;
    mount_page(&server, "/d", &page_with_links("D", &[])).await;

    let request = CrawlRequest::new(format!("{}/", base))
        .max_depth(2)
        .max_pages(10);
    let result = crawl(&request, &test_settings()).await.unwrap();

    let expected: Vec<String> = ["/", "/a", "/b", "/c", "/d"]
        .iter()
        .map(|p| format!("{}{}", base, p))
        .collect();
    assert_eq!(result.urls_visited, expected);

    let depths: Vec<u32> = result.data.iter().map(|page| page.depth).collect();
    assert_eq!(depths, vec![0, 1, 1, 2, 2]);
}

#[tokio::test]
async fn test_level_parallel_matches_sequential_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &page_with_links("Root", &["/a", "/b", "/c"])).await;
    mount_page(&server, "/a", &page_with_links("A", &["/d"])).await;
    mount_page(&server, "/b", &page_with_links("B", &[])).await;
    mount_page(&server, "/c", &page_with_links("C", &[])).await;
    mount_page(&server, "/d", &page_with_links("D", &[])).await;

    let request = CrawlRequest::new(format!("{}/", base))
        .max_depth(2)
        .max_pages(10);

    let sequential = crawl(&request, &test_settings()).await.unwrap();
    let parallel_settings = CrawlSettings {
        concurrency: 4,
        ..test_settings()
    };
    let parallel = crawl(&request, &parallel_settings).await.unwrap();

    assert_eq!(parallel.urls_visited, sequential.urls_visited);
    assert_eq!(parallel.data, sequential.data);
    assert_eq!(parallel.pages_scraped, 5);
}

#[tokio::test]
async fn test_level_parallel_respects_budget() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Root", &["/a", "/b", "/c"])).await;
    mount_page(&server, "/a", &page_with_links("A", &[])).await;
    mount_page(&server, "/b", &page_with_links("B", &[])).await;
    mount_page(&server, "/c", &page_with_links("C", &[])).await;

    let request = CrawlRequest::new(format!("{}/", server.uri()))
        .max_depth(1)
        .max_pages(2);
    let settings = CrawlSettings {
        concurrency: 4,
        ..test_settings()
    };
    let result = crawl(&request, &settings).await.unwrap();

    assert_eq!(result.pages_scraped, 2);
    assert_eq!(result.urls_visited.len(), 2);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html></html>", "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let request = CrawlRequest::new(format!("{}/slow", server.uri()));
    let settings = CrawlSettings {
        request_timeout: Duration::from_millis(300),
        ..CrawlSettings::default()
    };
    let result = crawl(&request, &settings).await.unwrap();

    assert!(result.success);
    assert_eq!(result.pages_scraped, 0);
    assert!(result.data.is_empty());
    assert_eq!(result.urls_visited.len(), 1);
    assert_eq!(result.failures[0].kind, PageErrorKind::FetchError);
    assert_eq!(result.failures[0].error, "Request timed out after 300ms");
}

#[tokio::test]
async fn test_invalid_requests_make_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = crawl(&CrawlRequest::new("not-a-url"), &test_settings()).await;
    assert!(matches!(
        result,
        Err(HarvestError::Validation(ValidationError::InvalidSeedUrl { .. }))
    ));

    let request = CrawlRequest::new(format!("{}/", server.uri())).max_pages(0);
    let result = crawl(&request, &test_settings()).await;
    assert!(matches!(
        result,
        Err(HarvestError::Validation(ValidationError::ZeroMaxPages))
    ));
}
