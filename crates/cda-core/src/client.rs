//! HTTP client for cda.pl
//!
//! One [`CdaClient`] is shared by every folder and video in a run. It owns the
//! connection pool, cookie store and default headers; nothing mutates it after
//! construction.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::{CdaError, Result};
use crate::url::SITE_ROOT;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Where site pages are requested from (default: `https://www.cda.pl`)
    pub base_url: String,
    /// Replaces the scheme and host of decoded media URLs when set
    pub media_base_url: Option<String>,
    /// Connect timeout in seconds (default: 30)
    pub connect_timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: SITE_ROOT.to_string(),
            media_base_url: None,
            connect_timeout_secs: 30,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Shared HTTP session for page fetches and media streaming
///
/// Only connecting is bounded by a timeout; media transfers run for as long
/// as the server keeps sending.
#[derive(Debug)]
pub struct CdaClient {
    client: reqwest::Client,
    base_url: String,
    media_base_url: Option<String>,
}

impl CdaClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("pl-PL,pl;q=0.9,en;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent)
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(CdaError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            media_base_url: config
                .media_base_url
                .map(|base| base.trim_end_matches('/').to_string()),
        })
    }

    /// Maps a canonical site URL onto the configured base URL
    ///
    /// URLs on other hosts are returned unchanged.
    pub fn page_url(&self, url: &str) -> String {
        let Ok(root) = Regex::new(r"(?i)^https?://(?:www\.)?cda\.pl") else {
            return url.to_string();
        };
        match root.find(url) {
            Some(m) => format!("{}{}", self.base_url, &url[m.end()..]),
            None => url.to_string(),
        }
    }

    /// Maps a media URL onto the configured media host, if any
    pub fn media_url(&self, url: &str) -> String {
        let Some(base) = &self.media_base_url else {
            return url.to_string();
        };
        let Ok(origin) = Regex::new(r"(?i)^https?://[^/]+") else {
            return url.to_string();
        };
        match origin.find(url) {
            Some(m) => format!("{}{}", base, &url[m.end()..]),
            None => url.to_string(),
        }
    }

    /// Fetch HTML content of a site page
    ///
    /// # Errors
    /// - `HttpError` - Network errors or non-success status
    /// - `NotFound` - Server returned 404
    /// - `RateLimited` - Server returned 429
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let target = self.page_url(url);
        tracing::debug!(url = %target, "fetching page");

        let response = self
            .client
            .get(&target)
            .send()
            .await
            .map_err(CdaError::Http)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CdaError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CdaError::NotFound(target));
        }

        response
            .error_for_status()
            .map_err(CdaError::Http)?
            .text()
            .await
            .map_err(CdaError::Http)
    }

    /// Stream a media URL into a file at `path`
    ///
    /// Creates or truncates the file. A failed transfer leaves the partial
    /// file in place.
    ///
    /// # Returns
    /// Number of bytes written
    pub async fn stream_to_file(&self, url: &str, path: &Path) -> Result<u64> {
        let source = self.media_url(url);
        tracing::debug!(url = %source, path = %path.display(), "streaming media");

        let response = self
            .client
            .get(&source)
            .send()
            .await
            .map_err(CdaError::Http)?
            .error_for_status()
            .map_err(CdaError::Http)?;

        let mut file = File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let data = chunk.map_err(CdaError::Http)?;
            file.write_all(&data).await?;
            written += data.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}
