use crate::error::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub database_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // An unauthenticated client works against public data, just with
        // a lower rate limit.
        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "devfolio.db".to_string());

        Ok(Self {
            github_token,
            database_path,
        })
    }
}

/// Knobs for one aggregation run, supplied by the caller rather than
/// read from ambient globals.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Drop languages below this share of the total (percent).
    pub min_percentage: u32,
    /// Keep at most this many languages after filtering.
    pub max_languages: usize,
    pub enable_cache: bool,
    /// Cache entries older than this are treated as absent.
    pub cache_expiry_millis: i64,
    /// Query the authenticated owner-affiliated listing instead of the
    /// public one. Requires a token with repo scope to be useful.
    pub include_private: bool,
    /// Per-repository byte counts instead of primary-language counts.
    /// Slower (one request per repository) but more accurate.
    pub use_detailed_stats: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            min_percentage: 1,
            max_languages: 10,
            enable_cache: true,
            cache_expiry_millis: 60 * 60 * 1000,
            include_private: false,
            use_detailed_stats: false,
        }
    }
}
