
use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, warn};
use ureq::Agent;
use url::Url;

use super::html::{extract_text, extract_title};
use crate::similarity::Document;
use crate::{PlagiarismError, Result};

/// Settings for fetching comparison pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// User agent string to use for requests
    pub user_agent: String,
    /// Timeout for HTTP requests in seconds
    pub timeout_seconds: u64,
    /// Minimum delay between requests in milliseconds
    pub rate_limit_ms: u64,
    /// Maximum number of retry attempts for retryable errors
    pub max_retries: u32,
    /// Delay between retry attempts in seconds
    pub retry_delay_seconds: u64,
}

impl Default for WebConfig {
    #[inline]
    fn default() -> Self {
        Self {
            user_agent: concat!("plagiarism-check/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: 30,
            rate_limit_ms: 250,
            max_retries: 2,
            retry_delay_seconds: 2,
        }
    }
}

/// Why a single request attempt failed
#[derive(Debug)]
enum FetchError {
    Status(u16),
    Transport(ureq::Error),
}

impl FetchError {
    /// Timeouts, connection failures, 5xx and 429 are worth retrying
    fn is_retryable(&self) -> bool {
        match self {
            Self::Status(code) => *code == 429 || (500..600).contains(code),
            Self::Transport(
                ureq::Error::Timeout(_)
                | ureq::Error::ConnectionFailed
                | ureq::Error::HostNotFound
                | ureq::Error::Io(_),
            ) => true,
            Self::Transport(_) => false,
        }
    }
}

impl std::fmt::Display for FetchError {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP error {}", code),
            Self::Transport(e) => write!(f, "{}", e),
        }
    }
}

/// HTTP client wrapper with rate limiting and retry logic
#[derive(Debug)]
pub struct HttpClient {
    agent: Agent,
    config: WebConfig,
    last_request_time: Option<Instant>,
}

impl HttpClient {
    #[inline]
    pub fn new(config: WebConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .user_agent(&config.user_agent)
            .build()
            .into();

        Self {
            agent,
            config,
            last_request_time: None,
        }
    }

    /// Perform an HTTP GET request with rate limiting and retry logic
    #[inline]
    pub async fn get(&mut self, url: &str) -> anyhow::Result<String> {
        self.apply_rate_limit().await;

        let mut attempt = 0;
        loop {
            match self.try_get(url) {
                Ok(body) => {
                    debug!("Fetched {} ({} bytes, attempt {})", url, body.len(), attempt + 1);
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    warn!("Retryable error for {}: {}", url, e);
                    attempt += 1;
                    sleep(Duration::from_secs(self.config.retry_delay_seconds)).await;
                }
                Err(e) => {
                    error!("Request to {} failed: {}", url, e);
                    return Err(anyhow!("{}", e))
                        .with_context(|| format!("Failed to fetch {}", url));
                }
            }
        }
    }

    async fn apply_rate_limit(&mut self) {
        if let Some(last_time) = self.last_request_time {
            let elapsed = last_time.elapsed();
            let rate_limit_duration = Duration::from_millis(self.config.rate_limit_ms);

            if elapsed < rate_limit_duration {
                let sleep_duration = rate_limit_duration - elapsed;
                debug!("Rate limiting: sleeping for {:?}", sleep_duration);
                sleep(sleep_duration).await;
            }
        }

        self.last_request_time = Some(Instant::now());
    }

    fn try_get(&self, url: &str) -> std::result::Result<String, FetchError> {
        match self.agent.get(url).call() {
            Ok(mut response) => response
                .body_mut()
                .read_to_string()
                .map_err(FetchError::Transport),
            Err(ureq::Error::StatusCode(code)) => Err(FetchError::Status(code)),
            Err(e) => Err(FetchError::Transport(e)),
        }
    }
}

impl Default for HttpClient {
    #[inline]
    fn default() -> Self {
        Self::new(WebConfig::default())
    }
}

/// Validate that a URL is absolute http(s) with a host
#[inline]
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| PlagiarismError::InvalidInput(format!("Invalid URL {}: {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(PlagiarismError::InvalidInput(format!(
            "URL must use HTTP or HTTPS scheme: {}",
            url_str
        )));
    }

    if url.host_str().is_none() {
        return Err(PlagiarismError::InvalidInput(format!(
            "URL must have a valid host: {}",
            url_str
        )));
    }

    Ok(url)
}

/// Fetch a web page and turn its readable text into a comparison document.
///
/// The id is the URL; the filename is the page title, or host and path
/// when the page has none.
#[inline]
pub async fn fetch_document(client: &mut HttpClient, url: &str) -> Result<Document> {
    let parsed = validate_url(url)?;
    let html = client
        .get(parsed.as_str())
        .await
        .map_err(|e| PlagiarismError::Network(format!("{:#}", e)))?;

    let filename = extract_title(&html).unwrap_or_else(|| {
        format!(
            "{}{}",
            parsed.host_str().unwrap_or_default(),
            parsed.path()
        )
    });
    let text = extract_text(&html);
    debug!("Scraped {} chars of text from {}", text.len(), url);

    Ok(Document::new(url, filename, text))
}
