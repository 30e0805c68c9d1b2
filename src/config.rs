//! Run configuration
//!
//! Every constant of a run lives here: the index page to crawl, the fan-out
//! limit, the skip list and the output layout. A [`Config`] can be built in
//! code, loaded from a JSON file, or both (file first, then overrides).

use crate::error::{ConfigError, Result};
use crate::extraction::RuleTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Root page of the AWS FAQ index
pub const DEFAULT_BASE_URL: &str = "https://aws.amazon.com/faqs/";

/// Max simultaneous in-flight requests
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for one scrape run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Index page to crawl (default: the AWS FAQ index)
    pub base_url: String,
    /// Max simultaneous fetches, pages and images alike (default: 10)
    pub concurrency: usize,
    /// Short-names excluded from the book (default: `fps`, a different page format)
    pub skip: Vec<String>,
    /// Per-request timeout in seconds (default: 60)
    pub timeout_secs: u64,
    /// User agent string (None = reqwest default)
    pub user_agent: Option<String>,
    /// Output HTML file (default: `index.html`)
    pub output: PathBuf,
    /// Directory downloaded images land in (default: `images`)
    pub images_dir: PathBuf,
    /// Stylesheet href linked from the page shell (default: `style.css`)
    pub stylesheet: String,
    /// Pretty print the final document (default: true)
    pub pretty: bool,
    /// Per-service extraction rules (default: the AWS table)
    pub rules: RuleTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            skip: vec!["fps".to_string()],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            output: PathBuf::from("index.html"),
            images_dir: PathBuf::from("images"),
            stylesheet: "style.css".to_string(),
            pretty: true,
            rules: RuleTable::default(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load a config from a JSON file; absent keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: Config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Check the values and return the parsed base URL
    pub fn validate(&self) -> Result<Url> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency.into());
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()).into());
        }
        Ok(url)
    }

    /// Whether `name` is on the skip list
    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip.iter().any(|s| s == name)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from an existing config
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the index page URL
    pub fn base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the fan-out limit
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.config.concurrency = limit;
        self
    }

    /// Replace the skip list
    pub fn skip<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.skip = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn user_agent<S: Into<String>>(mut self, ua: S) -> Self {
        self.config.user_agent = Some(ua.into());
        self
    }

    /// Set the output file
    pub fn output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.output = path.into();
        self
    }

    /// Set the images directory
    pub fn images_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.images_dir = path.into();
        self
    }

    /// Set the stylesheet href
    pub fn stylesheet<S: Into<String>>(mut self, href: S) -> Self {
        self.config.stylesheet = href.into();
        self
    }

    /// Enable/disable pretty printing
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    /// Replace the extraction rules
    pub fn rules(mut self, rules: RuleTable) -> Self {
        self.config.rules = rules;
        self
    }

    /// Build the config
    pub fn build(self) -> Config {
        self.config
    }
}
