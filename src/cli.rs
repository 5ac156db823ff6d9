//! Command-line interface parsing for webdict
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a validated `ServerConfig`, including where the response cache lives.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use directories::ProjectDirs;
use thiserror::Error;

use crate::data::dictionary::{parse_base_url, ClientError, DEFAULT_API_BASE};

/// Name of the cache subdirectory under the user's cache home
pub const CACHE_DIR_NAME: &str = "webdict";

/// Error types for turning CLI arguments into a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--cache-dir` was given an empty path
    #[error("Invalid cache directory: path is empty")]
    EmptyCacheDir,

    /// `--api-base` is not usable as a dictionary endpoint
    #[error(transparent)]
    InvalidApiBase(#[from] ClientError),
}

/// webdict - look up English word definitions in the browser
#[derive(Parser, Debug)]
#[command(name = "webdict")]
#[command(about = "Dictionary web front-end with an on-disk response cache")]
#[command(version)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Directory for cached API responses
    ///
    /// Defaults to $XDG_CACHE_HOME/webdict, or ~/.cache/webdict.
    #[arg(long, value_name = "DIR", conflicts_with = "no_cache")]
    pub cache_dir: Option<PathBuf>,

    /// Do not read or write the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Dictionary API endpoint; the word is appended as a path segment
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Timeout for one dictionary request, in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Minimum time between admitted requests, in milliseconds (0 disables limiting)
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub rate_limit_ms: u64,
}

/// Settings the server is started with
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Socket address to bind
    pub listen: SocketAddr,
    /// Cache root; `None` disables caching
    pub cache_root: Option<PathBuf>,
    /// Validated dictionary API base URL
    pub api_base: String,
    /// Upper bound on a single upstream request
    pub timeout: Duration,
    /// Token replenishment interval for the rate limiter
    pub rate_interval: Duration,
}

impl ServerConfig {
    /// Creates a ServerConfig from parsed CLI arguments and the process environment
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::from_cli_with_env(cli, |name| std::env::var(name).ok())
    }

    /// Creates a ServerConfig reading environment variables through `env`
    ///
    /// # Returns
    /// * `Ok(ServerConfig)` with the cache root resolved
    /// * `Err(ConfigError)` if an argument is unusable
    pub fn from_cli_with_env<F>(cli: &Cli, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        parse_base_url(&cli.api_base)?;

        let cache_root = match (&cli.cache_dir, cli.no_cache) {
            (_, true) => None,
            (Some(dir), false) if dir.as_os_str().is_empty() => {
                return Err(ConfigError::EmptyCacheDir)
            }
            (Some(dir), false) => Some(dir.clone()),
            (None, false) => cache_root_from_env(env("XDG_CACHE_HOME"), env("HOME")),
        };

        Ok(ServerConfig {
            listen: cli.listen,
            cache_root,
            api_base: cli.api_base.clone(),
            timeout: Duration::from_secs(cli.timeout_secs),
            rate_interval: Duration::from_millis(cli.rate_limit_ms),
        })
    }
}

/// Resolves the default cache root
///
/// Uses `$XDG_CACHE_HOME/webdict`, then `$HOME/.cache/webdict`, then the
/// platform cache directory. Returns `None` when none can be determined,
/// which disables caching.
pub fn cache_root_from_env(xdg_cache_home: Option<String>, home: Option<String>) -> Option<PathBuf> {
    if let Some(xdg) = xdg_cache_home.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join(CACHE_DIR_NAME));
    }
    if let Some(home) = home.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(home).join(".cache").join(CACHE_DIR_NAME));
    }
    ProjectDirs::from("", "", CACHE_DIR_NAME).map(|dirs| dirs.cache_dir().to_path_buf())
}
