//! Provider error types and rate-limit classification.

/// Phrases that providers use to signal rate limiting in error bodies.
///
/// Matched case-insensitively when no definitive status code is available.
const RATE_LIMIT_PHRASES: [&str; 4] = [
    "rate limit",
    "too many requests",
    "quota",
    "resource exhausted",
];

/// Provider-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProviderErrorKind {
    /// The selected provider requires a credential that is not configured
    #[display("No API key configured for provider '{}'", _0)]
    MissingApiKey(String),
    /// API request failed with an HTTP status
    #[display("HTTP {} error: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body or message
        message: String,
    },
    /// Request could not be sent or the connection failed
    #[display("Request failed: {}", _0)]
    Request(String),
    /// Response body could not be decoded
    #[display("Failed to decode response: {}", _0)]
    Decode(String),
    /// The provider returned no usable image or text
    #[display("Provider returned an empty response")]
    EmptyResponse,
    /// Base64 payload could not be decoded
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
}

impl ProviderErrorKind {
    /// Check whether this error signals provider-side rate limiting.
    ///
    /// HTTP 429 and 503 are definitive; otherwise the message is scanned for
    /// recognizable rate-limit phrasing, since some providers bury the signal
    /// in a 200-wrapped error body or a connection-level message.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            ProviderErrorKind::Api { status, message } => {
                matches!(*status, 429 | 503) || contains_rate_limit_phrase(message)
            }
            ProviderErrorKind::Request(message) => contains_rate_limit_phrase(message),
            _ => false,
        }
    }
}

fn contains_rate_limit_phrase(message: &str) -> bool {
    let lower = message.to_lowercase();
    RATE_LIMIT_PHRASES.iter().any(|p| lower.contains(p))
}

/// Provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use vignette_error::{ProviderError, ProviderErrorKind, RateLimited};
///
/// let err = ProviderError::new(ProviderErrorKind::Api {
///     status: 429,
///     message: "slow down".to_string(),
/// });
/// assert!(err.is_rate_limit());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that may carry a rate-limit signal.
///
/// The rotating-credential retry wrapper uses this to decide whether to
/// apply backoff before the next attempt. Rate-limit failures back off;
/// everything else retries immediately on the next key.
pub trait RateLimited {
    /// Returns true if this error indicates provider-side rate limiting.
    fn is_rate_limit(&self) -> bool;
}

impl RateLimited for ProviderError {
    fn is_rate_limit(&self) -> bool {
        self.kind.is_rate_limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_429_is_rate_limit() {
        let kind = ProviderErrorKind::Api {
            status: 429,
            message: String::new(),
        };
        assert!(kind.is_rate_limit());
    }

    #[test]
    fn phrase_in_body_is_rate_limit() {
        let kind = ProviderErrorKind::Api {
            status: 400,
            message: "RESOURCE_EXHAUSTED: try again later".to_string(),
        };
        assert!(kind.is_rate_limit());
    }

    #[test]
    fn plain_failure_is_not_rate_limit() {
        let kind = ProviderErrorKind::Request("connection reset".to_string());
        assert!(!kind.is_rate_limit());
    }
}
