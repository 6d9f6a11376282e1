//! Bounded-concurrency fetching
//!
//! Every URL in a batch is attempted exactly once. A counting semaphore caps
//! the number of requests in flight; a permit is taken right before the
//! request is issued and given back as soon as the body has been read, so no
//! parsing ever happens while holding a slot.

use super::fetcher::{Fetcher, Transport};
use crate::FetchError;
use futures::future::join_all;
use tokio::sync::Semaphore;

/// Default number of requests allowed in flight
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Result of fetching one URL
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// Body was fully read
    Success {
        /// The requested URL
        url: String,
        /// Page body content
        body: String,
    },

    /// Transport failure for this URL only
    Failed {
        /// The requested URL
        url: String,
        /// What went wrong
        error: FetchError,
    },
}

impl FetchResult {
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } | Self::Failed { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Converts into the body or the error
    pub fn into_result(self) -> Result<String, FetchError> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::Failed { error, .. } => Err(error),
        }
    }
}

/// Fetches all URLs with at most `limit` requests in flight
///
/// One session is opened from `transport` for the batch and closed once every
/// URL has an outcome. If the session cannot be opened, every URL is reported
/// as failed with that error.
///
/// # Arguments
///
/// * `transport` - Source of the batch's fetch session
/// * `urls` - URLs to fetch
/// * `limit` - Concurrency ceiling (values below 1 are treated as 1)
///
/// # Returns
///
/// One [`FetchResult`] per input URL, in input order
pub async fn fetch_all(
    transport: &dyn Transport,
    urls: &[String],
    limit: usize,
) -> Vec<FetchResult> {
    if urls.is_empty() {
        return Vec::new();
    }

    let fetcher = match transport.open().await {
        Ok(fetcher) => fetcher,
        Err(error) => {
            tracing::error!("Failed to open {} session: {}", transport.name(), error);
            return urls
                .iter()
                .map(|url| FetchResult::Failed {
                    url: url.clone(),
                    error: error.clone(),
                })
                .collect();
        }
    };

    let gate = Semaphore::new(limit.max(1));
    let results = join_all(urls.iter().map(|url| fetch_gated(fetcher.as_ref(), &gate, url))).await;

    fetcher.close().await;

    let failed = results.iter().filter(|r| !r.is_success()).count();
    tracing::info!(
        transport = transport.name(),
        requested = urls.len(),
        failed,
        "Fetch batch finished"
    );

    results
}

/// Fetches a single URL through the same gated path
pub async fn fetch_one(transport: &dyn Transport, url: &str) -> FetchResult {
    let urls = [url.to_string()];
    fetch_all(transport, &urls, 1)
        .await
        .pop()
        .unwrap_or_else(|| FetchResult::Failed {
            url: url.to_string(),
            error: FetchError::Client("fetch batch produced no result".to_string()),
        })
}

async fn fetch_gated(fetcher: &dyn Fetcher, gate: &Semaphore, url: &str) -> FetchResult {
    let outcome = match gate.acquire().await {
        Ok(_permit) => fetcher.fetch(url).await,
        Err(_) => Err(FetchError::Client("concurrency gate closed".to_string())),
    };

    match outcome {
        Ok(body) => FetchResult::Success {
            url: url.to_string(),
            body,
        },
        Err(error) => {
            tracing::debug!("Fetch failed for {}: {}", url, error);
            FetchResult::Failed {
                url: url.to_string(),
                error,
            }
        }
    }
}
