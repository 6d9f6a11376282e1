use crate::crawler::{FailurePolicy, TransportKind};
use serde::Deserialize;

/// Main configuration structure
///
/// Every section is optional; missing sections and keys take the defaults
/// documented on each field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Front page to discover articles from
    #[serde(rename = "seed-url", default)]
    pub seed_url: Option<String>,

    /// Base prepended to root-relative links (defaults to the seed's origin)
    #[serde(rename = "base-url", default)]
    pub base_url: Option<String>,

    /// Maximum number of requests in flight at once
    #[serde(rename = "max-concurrent-requests", default = "default_concurrency")]
    pub max_concurrent_requests: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Deadline for the whole crawl (seconds)
    #[serde(rename = "crawl-timeout-secs", default)]
    pub crawl_timeout_secs: Option<u64>,

    /// Which transport fetches pages
    #[serde(default)]
    pub transport: TransportKind,

    /// What to do when a single article fails to fetch
    #[serde(rename = "failure-policy", default)]
    pub failure_policy: FailurePolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: None,
            base_url: None,
            max_concurrent_requests: default_concurrency(),
            request_timeout_secs: default_request_timeout(),
            crawl_timeout_secs: None,
            transport: TransportKind::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "NewsClusterCrawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

/// Class markers for the three article fields
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Class token contained in the headline `<h1>`
    #[serde(rename = "headline-class", default = "default_headline_class")]
    pub headline_class: String,

    /// Exact class of the body `<section>`
    #[serde(rename = "content-class", default = "default_content_class")]
    pub content_class: String,

    /// Exact class of the publish date `<span>`
    #[serde(rename = "published-class", default = "default_published_class")]
    pub published_class: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            headline_class: default_headline_class(),
            content_class: default_content_class(),
            published_class: default_published_class(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// JSON file to write articles to (stdout when unset)
    #[serde(default)]
    pub path: Option<String>,

    /// Pretty-print the JSON output
    #[serde(default)]
    pub pretty: bool,
}

fn default_concurrency() -> u32 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

fn default_headline_class() -> String {
    "yle__article__heading".to_string()
}

fn default_content_class() -> String {
    "yle__article__content".to_string()
}

fn default_published_class() -> String {
    "yle__article__date--published".to_string()
}
