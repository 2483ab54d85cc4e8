use std::{env, time::Duration};

use log::*;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_FEED_URL: &str = "https://open.er-api.com/v6/latest";
const DEFAULT_FEED_SOURCE: &str = "ecb";
const DEFAULT_FEED_BASE: &str = "EUR";
const DEFAULT_TARGET_BASE: &str = "GBP";
const DEFAULT_SYMBOLS: &str = "GBP,USD,AUD,CAD,PLN,MXN";
const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Postgres connection string. When absent the snapshot is only kept in memory.
    pub database_url: Option<String>,
    pub feed: FeedConfig,
}

#[derive(Clone, Debug)]
pub struct FeedConfig {
    pub url: String,
    /// Value passed as the `source` query parameter.
    pub source: String,
    /// The currency the feed quotes its rates against.
    pub feed_base: String,
    /// The currency stored snapshots are re-based onto.
    pub target_base: String,
    pub symbols: Vec<String>,
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), port: DEFAULT_PORT, database_url: None, feed: FeedConfig::default() }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            source: DEFAULT_FEED_SOURCE.to_string(),
            feed_base: DEFAULT_FEED_BASE.to_string(),
            target_base: DEFAULT_TARGET_BASE.to_string(),
            symbols: parse_symbols(DEFAULT_SYMBOLS),
            timeout: DEFAULT_FEED_TIMEOUT,
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("VALUT_HOST").ok().unwrap_or_else(|| DEFAULT_HOST.into());
        let port = env::var("VALUT_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("{s} is not a valid port for VALUT_PORT. {e} Using the default, {DEFAULT_PORT}, instead.");
                    DEFAULT_PORT
                })
            })
            .unwrap_or(DEFAULT_PORT);
        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty());
        if database_url.is_none() {
            warn!("DATABASE_URL is not set. Rates will only be kept in memory and lost on restart.");
        }
        Self { host, port, database_url, feed: FeedConfig::from_env_or_default() }
    }
}

impl FeedConfig {
    pub fn new(url: &str) -> Self {
        Self { url: url.to_string(), ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let defaults = Self::default();
        let url = env::var("EXCHANGE_API_URL").unwrap_or(defaults.url);
        let source = env::var("VALUT_FEED_SOURCE").unwrap_or(defaults.source);
        let feed_base = env::var("VALUT_FEED_BASE").map(|s| s.trim().to_uppercase()).unwrap_or(defaults.feed_base);
        let target_base =
            env::var("VALUT_TARGET_BASE").map(|s| s.trim().to_uppercase()).unwrap_or(defaults.target_base);
        let symbols = env::var("VALUT_SYMBOLS")
            .ok()
            .map(|s| parse_symbols(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.symbols);
        let timeout = env::var("VALUT_FEED_TIMEOUT_SECS")
            .map(|s| {
                s.parse::<u64>().map(Duration::from_secs).unwrap_or_else(|e| {
                    error!(
                        "{s} is not a valid timeout for VALUT_FEED_TIMEOUT_SECS. {e} Using the default of {}s.",
                        DEFAULT_FEED_TIMEOUT.as_secs()
                    );
                    DEFAULT_FEED_TIMEOUT
                })
            })
            .unwrap_or(DEFAULT_FEED_TIMEOUT);
        Self { url, source, feed_base, target_base, symbols, timeout }
    }
}

fn parse_symbols(s: &str) -> Vec<String> {
    s.split(',').map(|c| c.trim().to_uppercase()).filter(|c| !c.is_empty()).collect()
}
