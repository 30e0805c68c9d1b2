//! Error types for faqbook
//!
//! This module provides the error hierarchy used across all stages of a run,
//! built with `thiserror`. Fetch and I/O errors abort a run; a content
//! selector that matches nothing is not an error at all (see
//! [`crate::extraction::Extraction::missed`]).

use thiserror::Error;

/// The main error type for faqbook operations
#[derive(Error, Debug)]
pub enum Error {
    /// Page or image fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Content extraction errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Network-level failures for a single URL
#[derive(Error, Debug)]
pub enum FetchError {
    /// URL could not be parsed or resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request exceeded the configured timeout
    #[error("Request to {url} timed out after {secs}s")]
    Timeout {
        /// Requested URL
        url: String,
        /// Timeout that elapsed
        secs: u64,
    },

    /// Connection, TLS or body read failure
    #[error("Network error for {url}: {message}")]
    Network {
        /// Requested URL
        url: String,
        /// Underlying error message
        message: String,
    },

    /// Server answered with a non-success status
    #[error("HTTP error {status} for {url}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },
}

/// Content extraction errors
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A CSS selector failed to parse
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Base URL is not an absolute http(s) URL
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Concurrency limit must allow at least one request
    #[error("Concurrency must be at least 1")]
    ZeroConcurrency,

    /// Config file could not be read
    #[error("Failed to read config file {path}: {message}")]
    Unreadable {
        /// Path of the config file
        path: String,
        /// Underlying error message
        message: String,
    },
}

/// Result type alias for faqbook operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }
}

impl FetchError {
    /// Classify a reqwest error for `url`
    pub fn from_reqwest(url: &str, timeout_secs: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Fetch(FetchError::InvalidUrl(err.to_string()))
    }
}
