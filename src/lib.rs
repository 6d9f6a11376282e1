//! News Cluster Crawler: structural article discovery for news front pages
//!
//! This crate fetches a news site's front page, finds the container that holds
//! the page's primary list of article links without any site-specific selector,
//! fetches those articles under a bounded concurrency gate and extracts a
//! headline, body and publish date from each.

pub mod config;
pub mod crawler;
pub mod dom;
pub mod links;
pub mod output;

use std::time::Duration;
use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTML parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("No convergent link container found on the page")]
    NoClusterFound,

    #[error("Failed to fetch seed page {url}: {source}")]
    SeedFetch { url: String, source: FetchError },

    #[error("Failed to fetch article {url}: {source}")]
    ArticleFetch { url: String, source: FetchError },

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    #[error("Crawl did not finish within {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Transport failure for a single URL
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Could not open fetch session: {0}")]
    Client(String),
}

/// The HTML parser could not produce any tree
#[derive(Debug, Clone, Error)]
#[error("document has no root element ({errors} parser errors)")]
pub struct ParseError {
    pub errors: usize,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl_blocking, Article, CrawlReport, Crawler, FailurePolicy};
pub use dom::{Document, NodeId};
pub use links::{find_interesting_links, normalize_links};
