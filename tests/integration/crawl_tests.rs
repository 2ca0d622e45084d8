//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full harvest cycle end-to-end.

use seed_harvest::config::{load_targets, CrawlTarget};
use seed_harvest::crawler::{rebuild_corpus, CrawlOptions, ExtractionRules, RetryPolicy};
use seed_harvest::output::{
    CorpusManifest, CorpusSink, DocumentMetadata, JsonCorpusWriter, MemorySink,
};
use seed_harvest::{Corpus, HarvestError};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Body text of exactly `n` distinct words
fn body_words(n: usize) -> String {
    (0..n)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A page whose `<main>` holds `words` words and whose nav links to `links`
fn page(title: &str, words: usize, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();

    format!(
        r#"<html><head><title>{}</title></head><body>
        <nav>{}</nav>
        <main><p>{}</p></main>
        </body></html>"#,
        title,
        anchors,
        body_words(words)
    )
}

fn html_response(html: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(html, "text/html")
}

/// Mounts a page that may be fetched any number of times
async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_response(html))
        .mount(server)
        .await;
}

/// Mounts a page that must be fetched exactly `times` times
async fn mount_page_expect(server: &MockServer, route: &str, html: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_response(html))
        .expect(times)
        .mount(server)
        .await;
}

/// A target that reads its body from `<main>` and follows every link
fn target(label: &str, start_url: String, max_depth: u32) -> CrawlTarget {
    CrawlTarget::new(label, start_url)
        .with_max_depth(max_depth)
        .with_follow_patterns(&[".*"])
        .with_extraction(ExtractionRules::compile::<&str>(&["main"], &[], &[], &[]))
}

fn options() -> CrawlOptions {
    CrawlOptions::default().with_retry_policy(RetryPolicy::default().with_backoff_factor(0.0))
}

fn titles(corpus: &Corpus) -> Vec<String> {
    corpus
        .metadata()
        .iter()
        .map(|m| m.title.clone())
        .collect()
}

#[tokio::test]
async fn test_breadth_first_order() {
    let server = MockServer::start().await;

    mount_page(&server, "/", page("Start", 60, &["/a", "/b"])).await;
    mount_page(&server, "/a", page("A", 60, &["/c"])).await;
    mount_page(&server, "/b", page("B", 60, &[])).await;
    mount_page(&server, "/c", page("C", 60, &[])).await;

    let targets = vec![target("site", format!("{}/", server.uri()), 2)];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(titles(&harvest.corpus), vec!["Start", "A", "B", "C"]);
    assert_eq!(harvest.stats.totals.harvested, 4);
    assert_eq!(harvest.stats.totals.links_enqueued, 3);
}

#[tokio::test]
async fn test_depth_zero_fetches_only_start_url() {
    let server = MockServer::start().await;

    mount_page_expect(&server, "/", page("Start", 60, &["/a", "/b"]), 1).await;
    mount_page_expect(&server, "/a", page("A", 60, &[]), 0).await;
    mount_page_expect(&server, "/b", page("B", 60, &[]), 0).await;

    let targets = vec![target("site", format!("{}/", server.uri()), 0)];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(harvest.corpus.len(), 1);
    assert_eq!(harvest.stats.totals.fetched, 1);
}

#[tokio::test]
async fn test_page_linked_twice_is_fetched_once() {
    let server = MockServer::start().await;

    mount_page_expect(&server, "/", page("Start", 60, &["/a", "/b"]), 1).await;
    mount_page_expect(&server, "/a", page("A", 60, &["/shared", "/"]), 1).await;
    mount_page_expect(&server, "/b", page("B", 60, &["/shared", "/shared#top"]), 1).await;
    mount_page_expect(&server, "/shared", page("Shared", 60, &[]), 1).await;

    let targets = vec![target("site", format!("{}/", server.uri()), 3)];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(titles(&harvest.corpus), vec!["Start", "A", "B", "Shared"]);
    assert_eq!(harvest.stats.totals.links_enqueued, 3);
    assert_eq!(harvest.stats.totals.skipped_visited, 0);
}

#[tokio::test]
async fn test_minimum_body_length() {
    let server = MockServer::start().await;

    mount_page(&server, "/", page("Start", 60, &["/thin", "/enough"])).await;
    mount_page(&server, "/thin", page("Thin", 49, &["/hidden"])).await;
    mount_page(&server, "/enough", page("Enough", 50, &[])).await;
    mount_page_expect(&server, "/hidden", page("Hidden", 60, &[]), 0).await;

    let targets = vec![target("site", format!("{}/", server.uri()), 2)];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(titles(&harvest.corpus), vec!["Start", "Enough"]);
    assert_eq!(harvest.stats.totals.skipped_thin, 1);
    assert_eq!(harvest.stats.totals.fetched, 3);
}

#[tokio::test]
async fn test_higher_priority_target_comes_first() {
    let server = MockServer::start().await;

    mount_page(&server, "/alpha", page("Alpha", 60, &[])).await;
    mount_page(&server, "/bravo", page("Bravo", 60, &[])).await;

    let targets = vec![
        target("A", format!("{}/alpha", server.uri()), 0).with_priority(5),
        target("B", format!("{}/bravo", server.uri()), 0).with_priority(10),
    ];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    let labels: Vec<_> = harvest
        .corpus
        .metadata()
        .iter()
        .map(|m| m.label.clone())
        .collect();
    assert_eq!(labels, vec!["B", "A"]);
}

#[tokio::test]
async fn test_parallel_mode_keeps_priority_order() {
    let server = MockServer::start().await;

    mount_page(&server, "/one", page("One", 60, &["/one/more"])).await;
    mount_page(&server, "/one/more", page("One More", 60, &[])).await;
    mount_page(&server, "/two", page("Two", 60, &[])).await;
    mount_page(&server, "/three", page("Three", 60, &[])).await;

    let targets = vec![
        target("one", format!("{}/one", server.uri()), 1).with_priority(1),
        target("two", format!("{}/two", server.uri()), 0).with_priority(3),
        target("three", format!("{}/three", server.uri()), 0),
    ];
    let harvest = rebuild_corpus(targets, options().parallel(true))
        .await
        .unwrap();

    assert_eq!(
        titles(&harvest.corpus),
        vec!["Two", "One", "One More", "Three"]
    );
}

#[tokio::test]
async fn test_failing_start_url_yields_empty_corpus() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let targets = vec![target("down", format!("{}/", server.uri()), 2)];
    let result = rebuild_corpus(targets, options()).await;

    assert!(matches!(result, Err(HarvestError::EmptyCorpus)));
}

#[tokio::test]
async fn test_not_found_is_skipped_and_crawl_continues() {
    let server = MockServer::start().await;

    mount_page(&server, "/", page("Start", 60, &["/gone", "/b"])).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/b", page("B", 60, &[])).await;

    let targets = vec![target("site", format!("{}/", server.uri()), 1)];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(titles(&harvest.corpus), vec!["Start", "B"]);
    assert_eq!(harvest.stats.totals.failed, 1);
}

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    mount_page_expect(&server, "/", page("Recovered", 60, &[]), 1).await;

    let targets = vec![target("flaky", format!("{}/", server.uri()), 0)];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(titles(&harvest.corpus), vec!["Recovered"]);
}

#[tokio::test]
async fn test_exclude_patterns_block_fetch() {
    let server = MockServer::start().await;

    mount_page(&server, "/", page("Start", 60, &["/public", "/private/x"])).await;
    mount_page(&server, "/public", page("Public", 60, &[])).await;
    mount_page_expect(&server, "/private/x", page("Private", 60, &[]), 0).await;

    let targets = vec![
        target("site", format!("{}/", server.uri()), 1).with_exclude_patterns(&["/private/"]),
    ];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(titles(&harvest.corpus), vec!["Start", "Public"]);
}

#[tokio::test]
async fn test_follow_patterns_limit_expansion() {
    let server = MockServer::start().await;

    mount_page(&server, "/", page("Start", 60, &["/news/1", "/shop/1"])).await;
    mount_page(&server, "/news/1", page("News", 60, &[])).await;
    mount_page_expect(&server, "/shop/1", page("Shop", 60, &[]), 0).await;

    let targets = vec![CrawlTarget::new("site", format!("{}/", server.uri()))
        .with_max_depth(1)
        .with_follow_patterns(&["/news/"])
        .with_extraction(ExtractionRules::compile::<&str>(&["main"], &[], &[], &[]))];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(titles(&harvest.corpus), vec!["Start", "News"]);
}

#[tokio::test]
async fn test_no_follow_patterns_means_no_expansion() {
    let server = MockServer::start().await;

    mount_page(&server, "/", page("Start", 60, &["/a"])).await;
    mount_page_expect(&server, "/a", page("A", 60, &[]), 0).await;

    let targets = vec![CrawlTarget::new("site", format!("{}/", server.uri()))
        .with_max_depth(3)
        .with_extraction(ExtractionRules::compile::<&str>(&["main"], &[], &[], &[]))];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(harvest.corpus.len(), 1);
}

#[tokio::test]
async fn test_links_outside_allowed_domains_not_fetched() {
    let server = MockServer::start().await;
    let port = url::Url::parse(&server.uri()).unwrap().port().unwrap();
    let offsite = format!("http://localhost:{}/offsite", port);

    mount_page(&server, "/", page("Start", 60, &["/inside", offsite.as_str()])).await;
    mount_page(&server, "/inside", page("Inside", 60, &[])).await;
    mount_page_expect(&server, "/offsite", page("Offsite", 60, &[]), 0).await;

    let targets = vec![
        target("site", format!("{}/", server.uri()), 1).with_allowed_domains(&["127.0.0.1"]),
    ];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(titles(&harvest.corpus), vec!["Start", "Inside"]);
}

#[tokio::test]
async fn test_document_metadata() {
    let server = MockServer::start().await;

    let html = r#"<html><head><title>Fallback Title</title></head><body>
        <header class="banner">Skip this banner entirely</header>
        <h1 class="headline">Welcome Center</h1>
        <time datetime="2024-03-01">March 1</time>
        <article>ARTICLE_BODY</article>
        </body></html>"#
        .replace("ARTICLE_BODY", &body_words(55));
    mount_page(&server, "/welcome", html).await;

    let targets = vec![
        CrawlTarget::new("Benning", format!("{}/welcome#top", server.uri()))
            .with_category("installation")
            .with_extraction(ExtractionRules::compile(
                &["article"],
                &["h1.headline"],
                &["header.banner"],
                &["time"],
            )),
    ];
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    let doc = &harvest.corpus.documents()[0];
    assert!(doc.text.starts_with("Welcome Center\n\nword0 word1"));
    assert!(!doc.text.contains("banner"));

    let meta: &DocumentMetadata = &doc.metadata;
    assert_eq!(meta.source, format!("{}/welcome", server.uri()));
    assert_eq!(meta.label, "Benning");
    assert_eq!(meta.category, "installation");
    assert_eq!(meta.title, "Welcome Center");
    assert_eq!(meta.published.as_deref(), Some("2024-03-01"));
}

#[tokio::test]
async fn test_rate_limit_applies_between_fetches() {
    let server = MockServer::start().await;

    mount_page(&server, "/", page("Start", 60, &["/a"])).await;
    mount_page(&server, "/a", page("A", 60, &[])).await;

    let targets = vec![target("slow", format!("{}/", server.uri()), 1).with_rate_limit(0.1)];

    let started = Instant::now();
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(harvest.corpus.len(), 2);
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_rate_limit_applies_after_thin_page() {
    let server = MockServer::start().await;
    mount_page_expect(&server, "/", page("Thin", 49, &[]), 1).await;

    let targets = vec![target("thin", format!("{}/", server.uri()), 0).with_rate_limit(0.2)];

    let started = Instant::now();
    let result = rebuild_corpus(targets, options()).await;

    assert!(matches!(result, Err(HarvestError::EmptyCorpus)));
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_rate_limit_applies_after_leaf_page() {
    let server = MockServer::start().await;
    mount_page_expect(&server, "/", page("Leaf", 60, &["/next"]), 1).await;
    mount_page_expect(&server, "/next", page("Next", 60, &[]), 0).await;

    let targets = vec![target("leaf", format!("{}/", server.uri()), 0).with_rate_limit(0.2)];

    let started = Instant::now();
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    assert_eq!(titles(&harvest.corpus), vec!["Leaf"]);
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_failed_fetch_skips_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let targets = vec![target("gone", format!("{}/", server.uri()), 0).with_rate_limit(30.0)];

    let started = Instant::now();
    let result = rebuild_corpus(targets, options()).await;

    assert!(matches!(result, Err(HarvestError::EmptyCorpus)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_config_file_to_corpus_files() {
    let server = MockServer::start().await;
    mount_page(&server, "/", page("Home", 60, &["/about"])).await;
    mount_page(&server, "/about", page("About", 60, &[])).await;

    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("seed_config.json");
    let config = serde_json::json!({
        "defaults": {
            "max_depth": 1,
            "rate_limit_seconds": 0,
            "follow_patterns": ["/about"],
            "content_selectors": ["main"],
            "category": "general"
        },
        "seeds": [
            { "label": "Home", "url": format!("{}/", server.uri()), "priority": 2 }
        ]
    });
    std::fs::write(&config_path, config.to_string()).unwrap();

    let targets = load_targets(&config_path).unwrap();
    let harvest = rebuild_corpus(targets, options()).await.unwrap();

    let manifest = CorpusManifest::new("hash", &harvest.corpus, &harvest.stats);
    let out = dir.path().join("corpus");
    let mut writer = JsonCorpusWriter::new(&out);
    writer.write(&harvest.corpus, &manifest).unwrap();

    let mut memory = MemorySink::default();
    memory.write(&harvest.corpus, &manifest).unwrap();

    let docs: Vec<String> =
        serde_json::from_str(&std::fs::read_to_string(out.join("docs.json")).unwrap()).unwrap();
    let metas: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(out.join("metas.json")).unwrap()).unwrap();

    assert_eq!(docs, memory.documents);
    assert_eq!(docs.len(), 2);
    assert_eq!(metas.len(), 2);
    assert_eq!(metas[0]["label"], "Home");
    assert_eq!(metas[1]["title"], "About");
    assert_eq!(metas[1]["category"], "general");
    assert!(metas[0]["fetched_at"].is_string());
    assert!(out.join("manifest.json").exists());
}
