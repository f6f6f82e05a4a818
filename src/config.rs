//! Runtime configuration for board binaries.
//!
//! Settings come from environment variables. Tests supply their own lookup
//! function instead of mutating the process environment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Primary variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "TASKBOARD_DATABASE_URL";
/// Fallback connection URL variable shared with Diesel tooling.
pub const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Maximum number of pooled connections.
pub const POOL_SIZE_VAR: &str = "TASKBOARD_POOL_SIZE";
/// Log filter directive.
pub const LOG_FILTER_VAR: &str = "TASKBOARD_LOG";
/// Fallback log filter variable.
pub const FALLBACK_LOG_FILTER_VAR: &str = "RUST_LOG";

const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_LOG_FILTER: &str = "info";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No database URL is configured.
    #[error("missing database URL: set {DATABASE_URL_VAR} or {FALLBACK_DATABASE_URL_VAR}")]
    MissingDatabaseUrl,

    /// The pool size is not a positive integer.
    #[error("invalid {POOL_SIZE_VAR} value '{0}': expected a positive integer")]
    InvalidPoolSize(String),
}

/// Board runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_size")]
    pub max_pool_size: u32,
    /// `tracing` filter directive, e.g. `info` or `taskboard=debug`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

const fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

impl BoardConfig {
    /// Creates a configuration with default pool size and log filter.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_pool_size: DEFAULT_POOL_SIZE,
            log_filter: default_log_filter(),
        }
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the database URL is missing or the pool
    /// size is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps variable names to
    /// values. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the database URL is missing or the pool
    /// size is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = read(DATABASE_URL_VAR)
            .or_else(|| read(FALLBACK_DATABASE_URL_VAR))
            .ok_or(ConfigError::MissingDatabaseUrl)?;
        let max_pool_size = read(POOL_SIZE_VAR)
            .map(|raw| parse_pool_size(&raw))
            .transpose()?
            .unwrap_or(DEFAULT_POOL_SIZE);
        let log_filter = read(LOG_FILTER_VAR)
            .or_else(|| read(FALLBACK_LOG_FILTER_VAR))
            .unwrap_or_else(default_log_filter);

        Ok(Self {
            database_url,
            max_pool_size,
            log_filter,
        })
    }
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| ConfigError::InvalidPoolSize(raw.to_owned()))
}
