//! Page transports
//!
//! A [`Transport`] opens one [`Fetcher`] session per fetch batch. The session
//! owns the network resources (HTTP connection pool or browser process) and
//! is released when the batch finishes, whichever way it finishes:
//! - [`HttpTransport`] issues plain GET requests through `reqwest`
//! - `BrowserTransport` (feature `browser`) loads pages in headless Chromium

use crate::config::UserAgentConfig;
use crate::{CrawlError, FetchError};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Which transport fetches pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Direct HTTP client
    #[default]
    Http,
    /// Headless browser page loads
    Browser,
}

/// One open fetch session
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns the fully read body
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Releases the session's resources
    async fn close(self: Box<Self>) {}
}

/// Opens fetch sessions
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens a session scoped to one fetch batch
    async fn open(&self) -> Result<Box<dyn Fetcher>, FetchError>;

    /// Transport name for logs
    fn name(&self) -> &'static str;
}

/// Formats the crawler's user agent
///
/// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout, including reading the body
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Transport backed by a fresh `reqwest` client per session
#[derive(Debug, Clone)]
pub struct HttpTransport {
    user_agent: UserAgentConfig,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(user_agent: UserAgentConfig, timeout: Duration) -> Self {
        Self {
            user_agent,
            timeout,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open(&self) -> Result<Box<dyn Fetcher>, FetchError> {
        let client = build_http_client(&self.user_agent, self.timeout)
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Box::new(HttpFetcher { client }))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Session over one `reqwest` connection pool
struct HttpFetcher {
    client: Client,
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

/// Maps a `reqwest` send error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    let url = url.to_string();
    if error.is_timeout() {
        FetchError::Timeout { url }
    } else if error.is_connect() {
        FetchError::Connect {
            url,
            message: error.to_string(),
        }
    } else {
        FetchError::Transport {
            url,
            message: error.to_string(),
        }
    }
}

/// Constructs the transport selected in configuration
///
/// # Returns
///
/// * `Ok(Arc<dyn Transport>)` - The transport
/// * `Err(CrawlError::Config)` - The browser transport was requested but the
///   crate was built without the `browser` feature
pub fn build_transport(
    kind: TransportKind,
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Arc<dyn Transport>, CrawlError> {
    match kind {
        TransportKind::Http => Ok(Arc::new(HttpTransport::new(user_agent.clone(), timeout))),
        #[cfg(feature = "browser")]
        TransportKind::Browser => Ok(Arc::new(super::browser::BrowserTransport::new(
            user_agent_string(user_agent),
            timeout,
        ))),
        #[cfg(not(feature = "browser"))]
        TransportKind::Browser => Err(crate::ConfigError::Validation(
            "the browser transport requires building with the `browser` feature".to_string(),
        )
        .into()),
    }
}
