//! Seed-to-articles crawl pipeline
//!
//! Fetches the seed page, locates its main link cluster, resolves the links
//! and fetches every article through the orchestrator. Per-article failures
//! are either dropped into the report or abort the crawl, depending on the
//! configured [`FailurePolicy`].

use super::extractor::{extract_article, Article, ExtractionRules};
use super::fetcher::{build_transport, Transport};
use super::orchestrator::{fetch_all, fetch_one, FetchResult, DEFAULT_CONCURRENCY};
use crate::config::Config;
use crate::dom::Document;
use crate::links::{find_interesting_links, normalize_links, site_origin};
use crate::CrawlError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// What to do when a single article fails to fetch or parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Skip the article and record the failure in the report
    #[default]
    Drop,
    /// Fail the whole crawl with the first failure (in link order)
    Abort,
}

/// Tunables for one [`Crawler`]
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Maximum number of requests in flight
    pub concurrency: usize,

    /// Base for root-relative links; the seed's origin when `None`
    pub base_url: Option<String>,

    pub failure_policy: FailurePolicy,

    /// Deadline for the whole crawl
    pub crawl_timeout: Option<Duration>,

    pub rules: ExtractionRules,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            base_url: None,
            failure_policy: FailurePolicy::default(),
            crawl_timeout: None,
            rules: ExtractionRules::default(),
        }
    }
}

impl CrawlSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency: config.crawler.max_concurrent_requests as usize,
            base_url: config.crawler.base_url.clone(),
            failure_policy: config.crawler.failure_policy,
            crawl_timeout: config.crawler.crawl_timeout_secs.map(Duration::from_secs),
            rules: ExtractionRules::from(&config.extract),
        }
    }
}

/// An article that was dropped from the results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedArticle {
    pub url: String,
    pub error: String,
}

/// Everything one crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed_url: String,
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// Raw hrefs found in the selected link cluster
    pub links_discovered: usize,
    /// Links left after normalization (one fetch each)
    pub links_normalized: usize,
    /// Extracted articles, in link order
    pub articles: Vec<Article>,
    /// Articles dropped under [`FailurePolicy::Drop`]
    pub failures: Vec<FailedArticle>,
}

/// Crawls a news front page and extracts its articles
///
/// The crawler holds no network state of its own: every fetch batch opens
/// and closes its own transport session, so one `Crawler` can run several
/// crawls concurrently.
pub struct Crawler {
    settings: CrawlSettings,
    transport: Arc<dyn Transport>,
}

impl Crawler {
    pub fn new(settings: CrawlSettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// Builds a crawler with the transport selected in `config`
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let transport = build_transport(
            config.crawler.transport,
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        Ok(Self::new(CrawlSettings::from_config(config), transport))
    }

    /// Crawls `seed_url` and returns the extracted articles
    pub async fn crawl(&self, seed_url: &str) -> Result<Vec<Article>, CrawlError> {
        Ok(self.crawl_report(seed_url).await?.articles)
    }

    /// Crawls `seed_url` and returns the articles with crawl metadata
    ///
    /// # Pipeline
    ///
    /// 1. Fetch the seed page (failure aborts the crawl)
    /// 2. Parse it and locate the main link cluster
    /// 3. Normalize the cluster's links against the base URL
    /// 4. Fetch every article under the concurrency gate
    /// 5. Extract each fetched article, applying the failure policy
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Articles in link order plus dropped failures
    /// * `Err(CrawlError)` - Seed fetch, parse or clustering failed, the
    ///   deadline passed, or an article failed under [`FailurePolicy::Abort`]
    pub async fn crawl_report(&self, seed_url: &str) -> Result<CrawlReport, CrawlError> {
        match self.settings.crawl_timeout {
            Some(deadline) => tokio::time::timeout(deadline, self.run(seed_url))
                .await
                .map_err(|_| CrawlError::Timeout(deadline))?,
            None => self.run(seed_url).await,
        }
    }

    async fn run(&self, seed_url: &str) -> Result<CrawlReport, CrawlError> {
        let started_at = Utc::now();
        let start = Instant::now();

        let seed = Url::parse(seed_url)
            .map_err(|e| CrawlError::InvalidSeed(format!("{}: {}", seed_url, e)))?;
        let base_url = match &self.settings.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => site_origin(&seed).ok_or_else(|| {
                CrawlError::InvalidSeed(format!("{} has no usable origin", seed_url))
            })?,
        };

        tracing::info!("Fetching seed page {}", seed_url);
        let body = match fetch_one(self.transport.as_ref(), seed_url).await {
            FetchResult::Success { body, .. } => body,
            FetchResult::Failed { url, error } => {
                return Err(CrawlError::SeedFetch { url, source: error });
            }
        };

        let raw_links = {
            let doc = Document::parse(&body)?;
            find_interesting_links(&doc)?
        };
        let links = normalize_links(&base_url, &raw_links);
        tracing::info!(
            discovered = raw_links.len(),
            normalized = links.len(),
            "Resolved article links against {}",
            base_url
        );

        let results = fetch_all(self.transport.as_ref(), &links, self.settings.concurrency).await;

        let mut articles = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for result in results {
            let outcome = match result {
                FetchResult::Success { url, body } => {
                    match extract_article(&url, &body, &self.settings.rules) {
                        Ok(article) => Ok(article),
                        Err(e) => Err((url, CrawlError::Parse(e))),
                    }
                }
                FetchResult::Failed { url, error } => Err((
                    url.clone(),
                    CrawlError::ArticleFetch { url, source: error },
                )),
            };

            match outcome {
                Ok(article) => articles.push(article),
                Err((url, error)) => match self.settings.failure_policy {
                    FailurePolicy::Abort => return Err(error),
                    FailurePolicy::Drop => {
                        tracing::warn!("Dropping article {}: {}", url, error);
                        failures.push(FailedArticle {
                            url,
                            error: error.to_string(),
                        });
                    }
                },
            }
        }

        let elapsed = start.elapsed();
        tracing::info!(
            articles = articles.len(),
            dropped = failures.len(),
            "Crawl of {} finished in {:?}",
            seed_url,
            elapsed
        );

        Ok(CrawlReport {
            seed_url: seed_url.to_string(),
            base_url,
            started_at,
            elapsed,
            links_discovered: raw_links.len(),
            links_normalized: links.len(),
            articles,
            failures,
        })
    }
}

/// Runs a crawl to completion from synchronous code
///
/// Builds a Tokio runtime for the duration of the call. Must not be called
/// from inside an async context.
pub fn crawl_blocking(config: &Config, seed_url: &str) -> Result<Vec<Article>, CrawlError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let crawler = Crawler::from_config(config)?;
    runtime.block_on(crawler.crawl(seed_url))
}
