//! Configuration loading and management

use std::time::Duration;

use anyhow::{Context, Result};

/// Default catalog API used by the storefront
pub const DEFAULT_API_URL: &str = "https://book-bug-server.onrender.com";

/// Component configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the book catalog REST API
    pub api_url: String,

    /// Upper bound on a catalog lookup before falling back to the listing
    pub lookup_timeout: Duration,

    /// Interval between hint rotations
    pub hint_interval: Duration,

    /// BCP 47 language tag passed to the speech recognizer
    pub language: String,

    /// Display name of a signed-in user, if any
    pub user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            lookup_timeout: Duration::from_millis(10_000),
            hint_interval: Duration::from_millis(3_000),
            language: "en-US".to_string(),
            user: None,
        }
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("BOOK_SEARCH_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_url);

        let lookup_timeout = match lookup("BOOK_SEARCH_LOOKUP_TIMEOUT_MS") {
            Some(raw) => parse_millis("BOOK_SEARCH_LOOKUP_TIMEOUT_MS", &raw)?,
            None => defaults.lookup_timeout,
        };

        let hint_interval = match lookup("BOOK_SEARCH_HINT_INTERVAL_MS") {
            Some(raw) => parse_millis("BOOK_SEARCH_HINT_INTERVAL_MS", &raw)?,
            None => defaults.hint_interval,
        };
        if hint_interval.is_zero() {
            anyhow::bail!("BOOK_SEARCH_HINT_INTERVAL_MS must be greater than zero");
        }

        let language = lookup("BOOK_SEARCH_LANG").unwrap_or(defaults.language);
        let user = lookup("BOOK_SEARCH_USER").filter(|name| !name.trim().is_empty());

        Ok(Self {
            api_url,
            lookup_timeout,
            hint_interval,
            language,
            user,
        })
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration> {
    let ms: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a whole number of milliseconds, got {raw:?}"))?;
    Ok(Duration::from_millis(ms))
}
