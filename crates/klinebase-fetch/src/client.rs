//! HTTP client for archive downloads and symbol probes.

use bytes::Bytes;
use chrono::NaiveDate;
use klinebase_types::{Interval, KlinebaseError};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::retry::{RetryPolicy, Retryable, retry};
use crate::url::{BASE_URL, LISTING_URL, archive_url, symbol_url};

/// Configuration for the download client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Idle connections kept per host; also the default task concurrency.
    pub pool_size: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy applied to every request.
    pub retry: RetryPolicy,
    /// User agent string.
    pub user_agent: String,
    /// Archive root URL.
    pub base_url: String,
    /// Bucket listing URL used by symbol probes.
    pub listing_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            pool_size: 16,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            user_agent: format!("klinebase/{}", env!("CARGO_PKG_VERSION")),
            base_url: BASE_URL.to_string(),
            listing_url: LISTING_URL.to_string(),
        }
    }
}

/// Errors that can occur during downloads.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Request could not be sent or the body could not be read (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Server returned {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Server answered 2xx with an empty body.
    #[error("Empty response received from {url}")]
    EmptyResponse {
        /// Requested URL.
        url: String,
    },
}

impl Retryable for DownloadError {
    fn is_retryable(&self) -> bool {
        match self {
            // Builder errors are configuration issues
            Self::Http(e) => !e.is_builder(),
            Self::Status { .. } => true,
            Self::EmptyResponse { .. } => false,
        }
    }
}

impl From<DownloadError> for KlinebaseError {
    fn from(e: DownloadError) -> Self {
        match &e {
            DownloadError::EmptyResponse { .. } => Self::Format(e.to_string()),
            DownloadError::Http(_) | DownloadError::Status { .. } => Self::Network(e.to_string()),
        }
    }
}

/// HTTP client with connection pooling and retry logic.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct DownloadClient {
    client: Client,
    config: ClientConfig,
}

impl DownloadClient {
    /// Creates a new download client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_size)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Downloads one day's kline archive, returning the zip bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if every attempt fails, or if the body is empty.
    pub async fn download_archive(
        &self,
        symbol: &str,
        interval: Interval,
        date: NaiveDate,
    ) -> Result<Bytes, DownloadError> {
        let url = archive_url(&self.config.base_url, symbol, interval, date);
        self.download(&url).await
    }

    /// Downloads a URL with retries.
    ///
    /// # Errors
    ///
    /// Returns an error if every attempt fails, or if the body is empty.
    pub async fn download(&self, url: &str) -> Result<Bytes, DownloadError> {
        let body = retry(&self.config.retry, url, || self.get_once(url)).await?;
        debug!(url, bytes = body.len(), "Downloaded");
        Ok(body)
    }

    /// Returns whether the archive lists a directory for `symbol`.
    ///
    /// A 404 is a valid negative answer; other failures are retried and
    /// then returned as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe fails after all retries.
    pub async fn symbol_exists(&self, symbol: &str) -> Result<bool, DownloadError> {
        let url = symbol_url(&self.config.listing_url, symbol);
        retry(&self.config.retry, &url, || self.head_once(&url)).await
    }

    async fn get_once(&self, url: &str) -> Result<Bytes, DownloadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(DownloadError::EmptyResponse {
                url: url.to_string(),
            });
        }
        Ok(body)
    }

    async fn head_once(&self, url: &str) -> Result<bool, DownloadError> {
        let response = self.client.head(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(DownloadError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}
