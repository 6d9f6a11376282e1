//! Headless-browser transport
//!
//! Each session launches its own Chromium process, so one crawl's browser
//! never serves (or tears down) another crawl's page loads.

use super::fetcher::{Fetcher, Transport};
use crate::FetchError;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Transport that renders pages in headless Chromium
#[derive(Debug, Clone)]
pub struct BrowserTransport {
    user_agent: String,
    timeout: Duration,
}

impl BrowserTransport {
    pub fn new(user_agent: String, timeout: Duration) -> Self {
        Self {
            user_agent,
            timeout,
        }
    }
}

#[async_trait]
impl Transport for BrowserTransport {
    async fn open(&self) -> Result<Box<dyn Fetcher>, FetchError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", self.user_agent))
            .build()
            .map_err(FetchError::Client)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Client(format!("Failed to launch browser: {}", e)))?;

        // The CDP event loop must be polled for any page call to make progress
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::debug!("Launched headless browser session");

        Ok(Box::new(BrowserFetcher {
            browser,
            handler_task,
            timeout: self.timeout,
        }))
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

/// Session over one browser process
struct BrowserFetcher {
    browser: Browser,
    handler_task: JoinHandle<()>,
    timeout: Duration,
}

impl BrowserFetcher {
    async fn load(&self, url: &str) -> Result<String, FetchError> {
        let transport_error = |e: chromiumoxide::error::CdpError| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let page = self.browser.new_page(url).await.map_err(transport_error)?;
        let content = match page.wait_for_navigation().await {
            Ok(page) => page.content().await.map_err(transport_error),
            Err(e) => Err(transport_error(e)),
        };

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close page for {}: {}", url, e);
        }

        content
    }
}

#[async_trait]
impl Fetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Requesting {} (browser)", url);

        tokio::time::timeout(self.timeout, self.load(url))
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
            })?
    }

    async fn close(self: Box<Self>) {
        let mut session = *self;
        if let Err(e) = session.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = session.browser.wait().await {
            tracing::debug!("Failed to wait for browser process: {}", e);
        }
    }
}

impl Drop for BrowserFetcher {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
