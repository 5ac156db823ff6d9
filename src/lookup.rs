//! Word resolution: cache first, then the dictionary API
//!
//! `Lookup::resolve` is the single entry point used by the search handler.
//! A cache hit never touches the network. A successful fetch that decodes
//! is written back to the cache verbatim. Upstream error responses are shown
//! to the user and never cached.

use thiserror::Error;

use crate::cache::{CacheStore, LookupKey};
use crate::data::{DictionaryClient, LookupError, WordEntry};
use crate::render::PresentationContext;

/// Failures that abort a single lookup
///
/// These map to a server error for the request that hit them; other
/// requests are unaffected.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A cached payload exists but is not a valid entry list
    #[error("Corrupt cache entry for '{key}': {source}")]
    CorruptCache {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered 2xx with a body that is not a valid entry list
    #[error("Malformed response for '{word}': {source}")]
    MalformedResponse {
        word: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered with an error status and an unparseable body
    #[error("Malformed error response for '{word}': {source}")]
    MalformedErrorBody {
        word: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolves words using an optional cache and the dictionary client
#[derive(Debug, Clone)]
pub struct Lookup {
    /// HTTP client for the dictionary API
    client: DictionaryClient,
    /// On-disk cache; `None` when caching is disabled
    cache: Option<CacheStore>,
}

impl Lookup {
    pub fn new(client: DictionaryClient, cache: Option<CacheStore>) -> Self {
        Self { client, cache }
    }

    /// Whether responses are being cached
    pub fn caching_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Looks up a word and builds the page context for it
    ///
    /// # Behavior
    /// - Blank words produce an empty context without any I/O
    /// - A cached entry is returned as-is without contacting the API
    /// - An unreadable cache entry is logged and treated as a miss
    /// - A transport failure yields an empty context (nothing found, no error)
    /// - A non-2xx response yields the API's error with the word appended to
    ///   its title
    /// - A 2xx response is decoded, then cached verbatim
    pub async fn resolve(&self, word: &str) -> Result<PresentationContext, ResolveError> {
        let word = word.trim();
        if word.is_empty() {
            return Ok(PresentationContext::initial());
        }
        tracing::info!(word, "asking");

        let cache = self.cache.as_ref().zip(LookupKey::new(word));

        if let Some((store, key)) = &cache {
            match store.get(key).await {
                Ok(Some(bytes)) => {
                    tracing::debug!(path = %store.path_for(key).display(), "cache hit");
                    let words = decode_words(&bytes).map_err(|source| {
                        ResolveError::CorruptCache {
                            key: key.to_string(),
                            source,
                        }
                    })?;
                    return Ok(PresentationContext::words(word, words));
                }
                Ok(None) => {
                    tracing::debug!(path = %store.path_for(key).display(), "cache miss");
                }
                Err(e) => {
                    tracing::warn!(
                        path = %store.path_for(key).display(),
                        error = %e,
                        "failed to read cache file"
                    );
                }
            }
        }

        let response = match self.client.fetch(word).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(word, error = %e, "dictionary lookup failed");
                return Ok(PresentationContext::empty(word));
            }
        };

        if !response.is_success() {
            let mut error: LookupError =
                serde_json::from_slice(&response.body).map_err(|source| {
                    ResolveError::MalformedErrorBody {
                        word: word.to_string(),
                        source,
                    }
                })?;
            error.title = format!("{} — {}", error.title, word);
            return Ok(PresentationContext::error(word, error));
        }

        let words =
            decode_words(&response.body).map_err(|source| ResolveError::MalformedResponse {
                word: word.to_string(),
                source,
            })?;

        if let Some((store, key)) = &cache {
            tracing::debug!(word, "caching");
            if let Err(e) = store.put(key, &response.body).await {
                tracing::warn!(
                    path = %store.path_for(key).display(),
                    error = %e,
                    "failed to write cache"
                );
            }
        }

        Ok(PresentationContext::words(word, words))
    }
}

fn decode_words(bytes: &[u8]) -> Result<Vec<WordEntry>, serde_json::Error> {
    serde_json::from_slice(bytes)
}
