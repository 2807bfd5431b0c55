//! Integration tests for the crawler
//!
//! These tests use wiremock to serve small sites and run the real fetch
//! engine against them end-to-end.

use sitemap_weaver::config::Config;
use sitemap_weaver::crawler::{build_sitemap, crawl, Coordinator, FetchEngine, LinkFetcher};
use sitemap_weaver::output::{render, OutputFormat};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Wraps anchors in a minimal HTML document
fn html_page(hrefs: &[&str]) -> ResponseTemplate {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", anchors),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, route: &str, hrefs: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(hrefs))
        .mount(server)
        .await;
}

fn test_config(seed: &str, max_depth: usize) -> Config {
    let mut config = Config::for_seed(seed, max_depth);
    config.crawler.fetch_timeout_ms = 2_000;
    config
}

fn children_of(sitemap: &sitemap_weaver::Sitemap, address: &str) -> Vec<String> {
    let node = sitemap
        .get(address)
        .unwrap_or_else(|| panic!("{} is not in the sitemap", address));
    sitemap
        .children(node)
        .map(|child| child.address().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &["/page1", "page2", "https://other.org/", "/page1?ref=home"],
    )
    .await;
    mount_page(&mock_server, "/page1", &["/page2#top", "/page3"]).await;
    mount_page(&mock_server, "/page2", &["/"]).await;
    mount_page(&mock_server, "/page3", &["/page4"]).await;

    let seed = format!("{}/", base_url);
    let sitemap = crawl(&test_config(&seed, 2)).await.expect("Crawl failed");

    assert_eq!(sitemap.registrable_domain(), Some("127.0.0.1"));
    assert_eq!(
        children_of(&sitemap, &seed),
        vec![format!("{}/page1", base_url), format!("{}/page2", base_url)]
    );
    assert_eq!(
        children_of(&sitemap, &format!("{}/page1", base_url)),
        vec![format!("{}/page3", base_url)]
    );
    // The depth bound stops the crawl before page3 is fetched
    assert!(!sitemap.contains(&format!("{}/page4", base_url)));
    assert!(!sitemap.contains("https://other.org/"));
    assert_eq!(sitemap.len(), 4);
    assert_eq!(sitemap.achieved_depth(), 2);

    let expected = format!(
        "{base}/\n  {base}/page1\n    {base}/page3\n  {base}/page2\n",
        base = base_url
    );
    assert_eq!(sitemap.to_string(), expected);
}

#[tokio::test]
async fn test_failed_pages_contribute_no_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", &["/broken", "/slow", "/pdf", "/ok"]).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page(&["/from-slow"]).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<a href="/from-pdf">not really html</a>"#,
            "application/pdf",
        ))
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/ok", &["/from-ok"]).await;

    let seed = format!("{}/", base_url);
    let mut config = test_config(&seed, 3);
    config.crawler.fetch_timeout_ms = 300;

    let sitemap = crawl(&config).await.expect("Crawl failed");

    assert_eq!(children_of(&sitemap, &seed).len(), 4);
    assert!(children_of(&sitemap, &format!("{}/broken", base_url)).is_empty());
    assert!(children_of(&sitemap, &format!("{}/slow", base_url)).is_empty());
    assert!(children_of(&sitemap, &format!("{}/pdf", base_url)).is_empty());
    assert_eq!(
        children_of(&sitemap, &format!("{}/ok", base_url)),
        vec![format!("{}/from-ok", base_url)]
    );
    // Level 2 (/from-ok is unmocked, 404) adds nothing, so the crawl stops there
    assert_eq!(sitemap.achieved_depth(), 2);
}

#[tokio::test]
async fn test_crawl_stops_when_nothing_new_is_found() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", &["/a"]).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(&["/", "/a"]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let sitemap = crawl(&test_config(&seed, 5)).await.expect("Crawl failed");

    assert_eq!(sitemap.achieved_depth(), 1);
    assert_eq!(sitemap.max_depth(), 5);
    assert_eq!(sitemap.len(), 2);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_engine_returns_one_result_per_url_in_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/first"))
        .respond_with(html_page(&["/x"]).set_delay(Duration::from_millis(300)))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/second", &["/y", "/z"]).await;

    let engine = FetchEngine::new(reqwest::Client::new(), Duration::from_secs(2));
    let urls = vec![
        Url::parse(&format!("{}/first", base_url)).unwrap(),
        Url::parse(&format!("{}/missing", base_url)).unwrap(),
        Url::parse(&format!("{}/second", base_url)).unwrap(),
    ];

    let results = engine.fetch_links(urls.clone()).await;

    assert_eq!(results.len(), 3);
    for (result, url) in results.iter().zip(&urls) {
        assert_eq!(&result.source, url);
    }
    assert_eq!(results[0].links.len(), 1);
    assert!(results[1].links.is_empty());
    assert_eq!(
        results[2].links,
        vec![
            Url::parse(&format!("{}/y", base_url)).unwrap(),
            Url::parse(&format!("{}/z", base_url)).unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_fetches_run_concurrently() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let pages = ["/p1", "/p2", "/p3", "/p4"];
    mount_page(&mock_server, "/", &pages).await;
    for page in pages {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(&[]).set_delay(Duration::from_millis(400)))
            .mount(&mock_server)
            .await;
    }

    let seed = format!("{}/", base_url);
    let started = std::time::Instant::now();
    let sitemap = crawl(&test_config(&seed, 2)).await.expect("Crawl failed");
    let elapsed = started.elapsed();

    assert_eq!(sitemap.len(), 5);
    // Four 400ms pages fetched one after another would take at least 1.6s
    assert!(elapsed < Duration::from_millis(1_400), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_concurrency_cap_still_completes_level() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", &["/p1", "/p2", "/p3"]).await;
    mount_page(&mock_server, "/p1", &["/q1"]).await;
    mount_page(&mock_server, "/p2", &["/q2"]).await;
    mount_page(&mock_server, "/p3", &["/q3"]).await;

    let seed = format!("{}/", base_url);
    let mut config = test_config(&seed, 2);
    config.crawler.max_concurrent_fetches = Some(1);

    let sitemap = crawl(&config).await.expect("Crawl failed");

    assert_eq!(sitemap.len(), 7);
    assert_eq!(sitemap.nodes_at_depth(2).len(), 3);
}

#[tokio::test]
async fn test_json_rendering_of_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", &["/about"]).await;
    mount_page(&mock_server, "/about", &[]).await;

    let seed = format!("{}/", base_url);
    let sitemap = crawl(&test_config(&seed, 1)).await.expect("Crawl failed");

    let json = render(&sitemap, OutputFormat::Json, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["root"]["address"], seed.as_str());
    assert_eq!(
        value["root"]["children"][0]["address"],
        format!("{}/about", base_url).as_str()
    );
    assert_eq!(value["registrable_domain"], "127.0.0.1");
    assert_eq!(value["max_depth"], 1);
    assert_eq!(value["achieved_depth"], 1);
    assert!(value["finished_at"].is_string());
}

#[tokio::test]
async fn test_malformed_seed_returns_rootless_sitemap() {
    let sitemap = build_sitemap("::not a url::", 3, Duration::from_secs(1))
        .await
        .expect("Client should build");

    assert!(sitemap.root().is_none());
    assert_eq!(sitemap.to_string(), "");
    assert!(sitemap.finished_at().is_some());
}

#[tokio::test]
async fn test_coordinator_with_engine_directly() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", &["/only"]).await;
    mount_page(&mock_server, "/only", &[]).await;

    let engine = FetchEngine::new(reqwest::Client::new(), Duration::from_secs(2));
    let coordinator = Coordinator::new(engine, 4);
    let sitemap = coordinator.run(&format!("{}/", base_url)).await;

    assert_eq!(sitemap.len(), 2);
    assert_eq!(sitemap.achieved_depth(), 1);
}
