//! Page fetching
//!
//! One shared `reqwest` client issues every GET of a run. Timeouts,
//! transport failures and non-success statuses all surface as
//! [`FetchError`]s; nothing is retried.

use crate::config::Config;
use crate::error::{Error, FetchError, Result};
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// HTTP page fetcher
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl PageFetcher {
    /// Build a fetcher from the run config
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(ref ua) = config.user_agent {
            builder = builder.user_agent(ua.as_str());
        }
        let client = builder
            .build()
            .map_err(|e| Error::generic(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Timeout applied to every request
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// GET `url` and return the response, failing on non-success status
    pub async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, self.timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        Ok(response)
    }

    /// Fetch a page body as text
    #[instrument(skip(self))]
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        info!("fetch page: {}", url);
        let body = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, self.timeout_secs, e))?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// Fetch a page and parse it into a DOM
    pub async fn fetch_document(&self, url: &str) -> Result<Html> {
        let body = self.fetch_html(url).await?;
        Ok(Html::parse_document(&body))
    }
}
