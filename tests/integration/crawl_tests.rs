//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use news_cluster_crawler::config::Config;
use news_cluster_crawler::crawler::{crawl_blocking, Crawler, FailurePolicy};
use news_cluster_crawler::CrawlError;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from the given seed
fn create_test_config(seed: &str, policy: FailurePolicy) -> Config {
    let mut config = Config::default();
    config.crawler.seed_url = Some(seed.to_string());
    config.crawler.request_timeout_secs = 5;
    config.crawler.failure_policy = policy;
    config
}

/// Front page with a navigation bar, a list of `count` article teasers and a footer
fn front_page(count: usize) -> String {
    let teasers: String = (0..count)
        .map(|i| {
            format!(
                r#"<li class="teaser"><div class="card"><a href="/uutiset/{i}"><h3>Story {i}</h3></a></div></li>"#
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Front</title></head><body>
        <header><nav>
            <a href="/">Etusivu</a>
            <a href="/urheilu">Urheilu</a>
            <a href="javascript:void(0)">Menu</a>
        </nav></header>
        <main><ul class="latest">{teasers}</ul></main>
        <footer><p><a href="mailto:news@example.com">Contact</a></p></footer>
        </body></html>"#
    )
}

fn article_page(i: usize) -> String {
    format!(
        r#"<html><body><article>
        <h1 class="yle__article__heading yle__article__heading--h1">Headline {i}</h1>
        <span class="yle__article__date--published">{i}.3.2024</span>
        <section class="yle__article__content"><p>Paragraph {i}</p></section>
        </article></body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts a front page at /front and articles at /uutiset/{i}, skipping `missing`
async fn mount_site(server: &MockServer, count: usize, missing: &[usize]) {
    mount_page(server, "/front", front_page(count)).await;

    for i in 0..count {
        if missing.contains(&i) {
            Mock::given(method("GET"))
                .and(path(format!("/uutiset/{i}")))
                .respond_with(ResponseTemplate::new(500))
                .mount(server)
                .await;
        } else {
            mount_page(server, &format!("/uutiset/{i}"), article_page(i)).await;
        }
    }
}

#[tokio::test]
async fn test_full_crawl_extracts_cluster_articles() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server, 10, &[]).await;

    let seed = format!("{}/front", base_url);
    let config = create_test_config(&seed, FailurePolicy::Drop);
    let crawler = Crawler::from_config(&config).expect("Failed to create crawler");

    let report = crawler.crawl_report(&seed).await.expect("Crawl failed");

    assert_eq!(report.base_url, base_url);
    assert_eq!(report.links_discovered, 10);
    assert_eq!(report.articles.len(), 10);
    assert!(report.failures.is_empty());

    for (i, article) in report.articles.iter().enumerate() {
        assert_eq!(article.url, format!("{}/uutiset/{}", base_url, i));
        assert_eq!(article.headline, format!("Headline {}", i));
        assert_eq!(article.content, format!("Paragraph {}", i));
        assert_eq!(article.published, format!("{}.3.2024", i));
    }

    // Seed plus one request per article, nothing from the nav or footer
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 11);
}

#[tokio::test]
async fn test_failed_articles_are_dropped() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, 6, &[0, 4]).await;

    let seed = format!("{}/front", mock_server.uri());
    let config = create_test_config(&seed, FailurePolicy::Drop);
    let report = Crawler::from_config(&config)
        .unwrap()
        .crawl_report(&seed)
        .await
        .expect("Crawl failed");

    let headlines: Vec<_> = report.articles.iter().map(|a| a.headline.as_str()).collect();
    assert_eq!(
        headlines,
        vec!["Headline 1", "Headline 2", "Headline 3", "Headline 5"]
    );

    assert_eq!(report.failures.len(), 2);
    assert!(report.failures[0].url.ends_with("/uutiset/0"));
    assert!(report.failures[0].error.contains("500"));
    assert!(report.failures[1].url.ends_with("/uutiset/4"));
}

#[tokio::test]
async fn test_failed_article_aborts_under_abort_policy() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, 4, &[2]).await;

    let seed = format!("{}/front", mock_server.uri());
    let config = create_test_config(&seed, FailurePolicy::Abort);
    let result = Crawler::from_config(&config).unwrap().crawl(&seed).await;

    match result {
        Err(CrawlError::ArticleFetch { url, .. }) => assert!(url.ends_with("/uutiset/2")),
        other => panic!("expected ArticleFetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_seed_fetch_failure_aborts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/front"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let seed = format!("{}/front", mock_server.uri());
    let config = create_test_config(&seed, FailurePolicy::Drop);
    let result = Crawler::from_config(&config).unwrap().crawl(&seed).await;

    assert!(matches!(result, Err(CrawlError::SeedFetch { .. })));
}

#[tokio::test]
async fn test_seed_without_link_cluster() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/front",
        r#"<html><body><p>Maintenance. <a href="/status">Status</a></p></body></html>"#.to_string(),
    )
    .await;

    let seed = format!("{}/front", mock_server.uri());
    let config = create_test_config(&seed, FailurePolicy::Drop);
    let result = Crawler::from_config(&config).unwrap().crawl(&seed).await;

    assert!(matches!(result, Err(CrawlError::NoClusterFound)));
}

#[tokio::test]
async fn test_crawl_deadline() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/front", front_page(3)).await;
    Mock::given(method("GET"))
        .and(path_regex("^/uutiset/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_page(0))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let seed = format!("{}/front", mock_server.uri());
    let mut config = create_test_config(&seed, FailurePolicy::Drop);
    config.crawler.crawl_timeout_secs = Some(1);

    let result = Crawler::from_config(&config).unwrap().crawl(&seed).await;
    assert!(matches!(result, Err(CrawlError::Timeout(_))));
}

#[test]
fn test_crawl_blocking() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mock_server = runtime.block_on(async {
        let server = MockServer::start().await;
        mount_site(&server, 3, &[]).await;
        server
    });

    let seed = format!("{}/front", mock_server.uri());
    let config = create_test_config(&seed, FailurePolicy::Drop);
    let articles = crawl_blocking(&config, &seed).expect("Crawl failed");

    assert_eq!(articles.len(), 3);
    assert_eq!(articles[2].headline, "Headline 2");
}
