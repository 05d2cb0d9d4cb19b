//! Runtime configuration
//!
//! Defaults come from [`crate::constants`]. A few values can be overridden
//! through environment variables so the dashboard can point at a proxy or a
//! different quote currency without a rebuild:
//!
//! | Variable                        | Default                            |
//! |---------------------------------|------------------------------------|
//! | `MARKET_DASHBOARD_API_URL`      | `https://api.coingecko.com/api/v3` |
//! | `MARKET_DASHBOARD_CURRENCY`     | `inr`                              |
//! | `MARKET_DASHBOARD_REFRESH_SECS` | `60`                               |
//! | `MARKET_DASHBOARD_TIMEOUT_SECS` | `10`                               |
//! | `MARKET_DASHBOARD_LOG`          | unset (no logging)                 |

use crate::{
    constants::{
        COINGECKO_API_URL, DEFAULT_VS_CURRENCY, REFRESH_INTERVAL_SECS, REQUEST_TIMEOUT_SECS,
    },
    error::ConfigError,
    types::MarketsRequest,
};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "MARKET_DASHBOARD_API_URL";
pub const ENV_CURRENCY: &str = "MARKET_DASHBOARD_CURRENCY";
pub const ENV_REFRESH_SECS: &str = "MARKET_DASHBOARD_REFRESH_SECS";
pub const ENV_TIMEOUT_SECS: &str = "MARKET_DASHBOARD_TIMEOUT_SECS";
pub const ENV_LOG: &str = "MARKET_DASHBOARD_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub vs_currency: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    /// Where to write logs; stdout belongs to the terminal UI
    pub log_file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: COINGECKO_API_URL.to_string(),
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            refresh_interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            log_file: None,
        }
    }
}

impl DashboardConfig {
    /// Loads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration from any key lookup (the environment, or a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = non_empty(lookup(ENV_API_URL)) {
            config.api_base_url = url;
        }
        if let Some(currency) = non_empty(lookup(ENV_CURRENCY)) {
            config.vs_currency = currency.to_lowercase();
        }
        if let Some(raw) = non_empty(lookup(ENV_REFRESH_SECS)) {
            config.refresh_interval = parse_secs(ENV_REFRESH_SECS, &raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_TIMEOUT_SECS)) {
            config.request_timeout = parse_secs(ENV_TIMEOUT_SECS, &raw)?;
        }
        config.log_file = non_empty(lookup(ENV_LOG)).map(PathBuf::from);

        Ok(config)
    }

    /// The markets request issued on every poll
    pub fn markets_request(&self) -> MarketsRequest {
        MarketsRequest {
            vs_currency: self.vs_currency.clone(),
            ..MarketsRequest::default()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_secs(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::invalid(var, raw, e.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::invalid(var, raw, "must be at least 1"));
    }
    Ok(Duration::from_secs(secs))
}
