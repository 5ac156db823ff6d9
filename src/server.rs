//! HTTP surface: routes, handlers, and request-scoped errors
//!
//! Every route is wrapped in the shared rate limiter under its own label.
//! Lookup and render failures become a 500 for the request that hit them.

use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{any, get};
use axum::Router;
use handlebars::{RenderError, TemplateError};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use url::form_urlencoded;

use crate::assets::StaticAsset;
use crate::cache::CacheStore;
use crate::cli::ServerConfig;
use crate::data::{ClientError, DictionaryClient};
use crate::limiter::{enforce, RateGate, RateLimiter};
use crate::lookup::{Lookup, ResolveError};
use crate::render::{PageRenderer, PresentationContext};

/// Errors that prevent the server from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to create dictionary client: {0}")]
    Client(#[from] ClientError),

    #[error("Failed to compile page template: {0}")]
    Template(#[from] TemplateError),
}

/// Errors that fail a single request
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Failed to render page: {0}")]
    Render(#[from] RenderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Oops").into_response()
    }
}

/// Shared, read-only state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub lookup: Arc<Lookup>,
    pub renderer: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(lookup: Lookup, renderer: PageRenderer) -> Self {
        Self {
            lookup: Arc::new(lookup),
            renderer: Arc::new(renderer),
        }
    }

    /// Builds the state for a configuration
    ///
    /// A cache root that cannot be created disables caching instead of
    /// failing startup.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, StartupError> {
        let client = DictionaryClient::with_base_url(&config.api_base, config.timeout)?;

        let cache = match &config.cache_root {
            Some(root) => match CacheStore::open(root).await {
                Ok(store) => {
                    tracing::info!(dir = %root.display(), "cache dir");
                    Some(store)
                }
                Err(e) => {
                    tracing::warn!(
                        dir = %root.display(),
                        error = %e,
                        "failed to create cache dir; caching disabled"
                    );
                    None
                }
            },
            None => {
                tracing::info!("caching disabled");
                None
            }
        };

        Ok(Self::new(Lookup::new(client, cache), PageRenderer::new()?))
    }
}

/// Query string of `/search`
#[derive(Debug, Default, PartialEq)]
pub struct SearchParams {
    pub word: Option<String>,
}

impl SearchParams {
    /// Parses a raw query string, keeping the first `word` when repeated
    pub fn from_query(query: Option<&str>) -> Self {
        let word = query.and_then(|q| {
            form_urlencoded::parse(q.as_bytes())
                .find(|(name, _)| name == "word")
                .map(|(_, value)| value.into_owned())
        });
        Self { word }
    }
}

/// Builds the application router
///
/// `limiter` is shared by all routes and the not-found fallback, so a burst
/// on one endpoint also throttles the others.
pub fn build_router(state: AppState, limiter: Arc<RateLimiter>) -> Router {
    let gate = |label: &'static str| {
        from_fn_with_state(RateGate::new(Arc::clone(&limiter), label), enforce)
    };

    Router::new()
        .route("/", get(index).layer(gate("index")))
        .route("/search", get(search).layer(gate("search")))
        .route("/static/*asset", get(static_asset).layer(gate("static")))
        .fallback(any(not_found).layer(gate("not_found")))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Serves the router until Ctrl-C
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn render_page(state: &AppState, context: &PresentationContext) -> Result<Response, AppError> {
    let html = state.renderer.render(context)?;
    Ok(Html(html).into_response())
}

async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    render_page(&state, &PresentationContext::initial())
}

async fn search(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let params = SearchParams::from_query(query.as_deref());
    let word = params.word.as_deref().map(str::trim).unwrap_or_default();
    tracing::info!(word, "handle search");
    if word.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }

    let context = state.lookup.resolve(word).await?;
    render_page(&state, &context)
}

async fn static_asset(Path(name): Path<String>) -> Response {
    tracing::debug!(name, "serving static file");
    match StaticAsset::from_name(&name) {
        Some(asset) => ([(header::CONTENT_TYPE, asset.content_type())], asset.body()).into_response(),
        None => {
            tracing::warn!(name, "static file not whitelisted");
            (StatusCode::NOT_FOUND, "Oops").into_response()
        }
    }
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn config(cache_root: Option<std::path::PathBuf>) -> ServerConfig {
        ServerConfig {
            listen: "127.0.0.1:0".parse().unwrap(),
            cache_root,
            api_base: "http://127.0.0.1:9/".to_string(),
            timeout: Duration::from_secs(1),
            rate_interval: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_from_config_creates_cache_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("webdict");

        let state = AppState::from_config(&config(Some(root.clone()))).await.unwrap();

        assert!(root.is_dir());
        assert!(state.lookup.caching_enabled());
    }

    #[tokio::test]
    async fn test_from_config_disables_cache_when_dir_unusable() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let state = AppState::from_config(&config(Some(blocker.join("webdict"))))
            .await
            .expect("Startup should not fail");

        assert!(!state.lookup.caching_enabled());
    }

    #[tokio::test]
    async fn test_from_config_without_cache_root() {
        let state = AppState::from_config(&config(None)).await.unwrap();
        assert!(!state.lookup.caching_enabled());
    }

    #[test]
    fn test_search_params_take_first_word() {
        let params = SearchParams::from_query(Some("word=hello&word=x"));
        assert_eq!(params.word.as_deref(), Some("hello"));
    }

    #[test]
    fn test_search_params_decode_value() {
        let params = SearchParams::from_query(Some("other=1&word=rock+%26+roll"));
        assert_eq!(params.word.as_deref(), Some("rock & roll"));

        assert_eq!(SearchParams::from_query(Some("other=1")), SearchParams::default());
        assert_eq!(SearchParams::from_query(None), SearchParams::default());
    }

    #[test]
    fn test_app_error_is_server_error() {
        let source = serde_json::from_str::<Vec<u8>>("nope").unwrap_err();
        let error = AppError::from(ResolveError::CorruptCache {
            key: "hello".to_string(),
            source,
        });

        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
