//! Free Dictionary API client
//!
//! Issues the outbound lookup for a word and hands back the raw status and
//! body. Classifying and decoding the body is left to the caller so that the
//! exact upstream bytes can be cached.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

/// Base URL for the Free Dictionary API (English entries)
pub const DEFAULT_API_BASE: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

/// Default upper bound on a single upstream request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the dictionary API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL cannot have a word appended to it
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// Connection, timeout, or body read failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Status and body of an upstream response, before any decoding
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Whether the status code is in the 2xx class
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Client for the remote dictionary API
#[derive(Debug, Clone)]
pub struct DictionaryClient {
    client: Client,
    base_url: Url,
}

impl DictionaryClient {
    /// Creates a client for the public API with the default timeout
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_API_BASE, DEFAULT_TIMEOUT)
    }

    /// Creates a client for a custom API base URL
    ///
    /// # Arguments
    /// * `base_url` - Endpoint the word is appended to as a path segment
    /// * `timeout` - Total time allowed for one request, including the body
    ///
    /// # Returns
    /// * `Err(ClientError::InvalidBaseUrl)` if the URL is not an absolute
    ///   http(s) URL with a path
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Returns the configured base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the request URL for a word
    ///
    /// The word is pushed as a single path segment, so characters such as
    /// `/`, `?` or `#` are percent-encoded rather than changing the request.
    pub fn url_for(&self, word: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(word);
        }
        url
    }

    /// Fetches the raw API response for a word
    ///
    /// Any status code is returned as `Ok`; only transport-level failures
    /// (connect, timeout, reading the body) are errors.
    pub async fn fetch(&self, word: &str) -> Result<RawResponse, ClientError> {
        let url = self.url_for(word);
        tracing::debug!(%url, "fetching definition");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        tracing::info!(word, status = %status, "dictionary response");
        Ok(RawResponse { status, body })
    }
}

/// Parses and checks a dictionary API base URL
pub fn parse_base_url(base_url: &str) -> Result<Url, ClientError> {
    let url =
        Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
    }
    Ok(url)
}
