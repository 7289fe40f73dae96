//! Results provider client.
//!
//! Fetches race results from the paginated REST API. Pages are always
//! drained completely before anything downstream sees the rows.

mod convert;
mod provider;

pub use convert::*;
pub use provider::*;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pagination did not finish within {max_pages} pages")]
    TooManyPages { max_pages: u32 },

    #[error("Row for season {found} returned while fetching season {expected}")]
    SeasonMismatch { expected: i32, found: i32 },
}

impl FetchError {
    /// Whether retrying the same request may succeed.
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            FetchError::HttpStatus { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            _ => false,
        }
    }
}

/// One page in the provider's pagination envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Endpoints answer either with a page envelope or, when pagination is
/// disabled server-side, with a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageBody<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> From<PageBody<T>> for Page<T> {
    fn from(body: PageBody<T>) -> Self {
        match body {
            PageBody::Paged(page) => page,
            PageBody::Plain(results) => Page {
                count: Some(results.len() as u64),
                next: None,
                previous: None,
                results,
            },
        }
    }
}

/// Source of raw JSON documents.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET a URL and return its JSON body.
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value, FetchError>;
}

/// Limits applied while draining a paginated endpoint.
#[derive(Debug, Clone)]
pub struct DrainOptions {
    /// Pause between consecutive page requests
    pub request_delay: Duration,

    /// Fail rather than follow more than this many pages
    pub max_pages: u32,
}

impl Default for DrainOptions {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_millis(250),
            max_pages: 500,
        }
    }
}

/// Follow `next` links from `first` until the last page, collecting every row.
pub async fn drain_pages<T: DeserializeOwned>(
    fetcher: &dyn PageFetcher,
    first: Url,
    options: &DrainOptions,
) -> Result<Vec<T>, FetchError> {
    let mut rows = Vec::new();
    let mut next = Some(first);
    let mut pages = 0u32;

    while let Some(url) = next.take() {
        if pages >= options.max_pages {
            return Err(FetchError::TooManyPages {
                max_pages: options.max_pages,
            });
        }
        if pages > 0 && !options.request_delay.is_zero() {
            tokio::time::sleep(options.request_delay).await;
        }

        let body: PageBody<T> = serde_json::from_value(fetcher.get_json(&url).await?)?;
        let page = Page::from(body);
        pages += 1;

        debug!(
            "Page {} from {}: {} rows (total reported: {:?})",
            pages,
            url,
            page.results.len(),
            page.count
        );
        rows.extend(page.results);

        next = match page.next {
            Some(link) => Some(
                url.join(&link)
                    .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", link, e)))?,
            ),
            None => None,
        };
    }

    info!("Drained {} rows over {} pages", rows.len(), pages);
    Ok(rows)
}

/// Backoff policy for failed page requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (0-based), doubling each time.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub retry: RetryConfig,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("f1-standings/", env!("CARGO_PKG_VERSION")).to_string(),
            retry: RetryConfig::default(),
        }
    }
}

/// `reqwest`-backed page fetcher with retries.
pub struct HttpFetcher {
    client: Client,
    retry: RetryConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: HttpFetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("f1-standings")),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            retry: config.retry,
        })
    }

    async fn get_once(&self, url: &Url) -> Result<serde_json::Value, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value, FetchError> {
        let mut attempt = 0;
        loop {
            match self.get_once(url).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.retry.max_retries && e.is_retryable() => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        "Request to {} failed (attempt {}/{}): {}. Retrying in {:?}",
                        url,
                        attempt + 1,
                        self.retry.max_retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
