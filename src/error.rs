//! Error types for the market dashboard

use thiserror::Error;

/// Errors that can occur when fetching markets from a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (DNS, connect, TLS, reset)
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider is temporarily down (HTTP 503)
    #[error("Service unavailable")]
    ServiceUnavailable,

    /// Any other non-2xx response
    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Body was not JSON, or not the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A classified fetch failure, as surfaced to the user
///
/// Unlike [`ProviderError`] this is `Clone`, so the store can hold it and the
/// UI can render it. The `Display` output is the message shown on the error
/// screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    #[error("CoinGecko API is temporarily unavailable. Please try again later.")]
    ServiceUnavailable,

    #[error("Invalid data format received from API: {0}")]
    MalformedPayload(String),

    #[error("Network error: Please check your internet connection and try again. ({0})")]
    NetworkUnreachable(String),

    #[error("Failed to fetch data: {status} {reason}")]
    HttpFailure { status: u16, reason: String },
}

impl FetchError {
    /// Short machine-friendly label, used in log fields and events
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::RateLimited => "rate_limited",
            FetchError::ServiceUnavailable => "service_unavailable",
            FetchError::MalformedPayload(_) => "malformed_payload",
            FetchError::NetworkUnreachable(_) => "network_unreachable",
            FetchError::HttpFailure { .. } => "http_failure",
        }
    }
}

impl From<ProviderError> for FetchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::RateLimitExceeded => FetchError::RateLimited,
            ProviderError::ServiceUnavailable => FetchError::ServiceUnavailable,
            ProviderError::HttpStatus { status, reason } => {
                FetchError::HttpFailure { status, reason }
            }
            ProviderError::InvalidResponse(msg) => FetchError::MalformedPayload(msg),
            ProviderError::Timeout => FetchError::NetworkUnreachable("request timed out".into()),
            ProviderError::NetworkError(e) => FetchError::NetworkUnreachable(e.to_string()),
        }
    }
}

/// Errors raised while loading configuration overrides
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Creates an InvalidValue error
    pub fn invalid(var: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            var,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
