//! Crawler module for fetching and processing news pages
//!
//! This module contains the core crawling logic, including:
//! - Pluggable transports (plain HTTP, headless browser)
//! - Bounded-concurrency fetching of URL batches
//! - Article field extraction
//! - The seed-to-articles crawl pipeline

#[cfg(feature = "browser")]
mod browser;
mod extractor;
mod fetcher;
mod orchestrator;
mod pipeline;

#[cfg(feature = "browser")]
pub use browser::BrowserTransport;
pub use extractor::{extract_article, Article, ClassMatch, ClassRule, ExtractionRules};
pub use fetcher::{
    build_http_client, build_transport, user_agent_string, Fetcher, HttpTransport, Transport,
    TransportKind,
};
pub use orchestrator::{fetch_all, fetch_one, FetchResult, DEFAULT_CONCURRENCY};
pub use pipeline::{
    crawl_blocking, CrawlReport, CrawlSettings, Crawler, FailedArticle, FailurePolicy,
};
