//! Routing error types

use domain::ProviderId;
use reqwest::StatusCode;
use thiserror::Error;

/// Longest provider error body echoed into an error message
const MAX_BODY_CHARS: usize = 200;

/// Errors that can occur while talking to a routing provider
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The provider lacks the credentials it needs
    #[error("{0} is not configured")]
    NotConfigured(ProviderId),

    /// Connection to the provider failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The provider rejected the credentials
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// The provider found no route between the points
    #[error("No route found: {0}")]
    NoRoute(String),

    /// Failed to parse response from the provider
    #[error("Parse error: {0}")]
    ParseError(String),

    /// HTTP request failed with an unexpected status or body
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The provider does not offer this capability
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl RoutingError {
    /// Whether the failure stems from missing credentials
    #[must_use]
    pub const fn is_unconfigured(&self) -> bool {
        matches!(self, Self::NotConfigured(_))
    }

    /// Whether the next provider in the chain should be tried
    ///
    /// Only client construction errors stop the chain; they never surface
    /// from a routing call.
    #[must_use]
    pub const fn should_fallback(&self) -> bool {
        !matches!(self, Self::ConfigurationError(_))
    }

    /// Returns true if this error is retryable against the same provider
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }

    /// Map a transport-level reqwest error
    ///
    /// The URL is stripped first since some providers carry the key in it.
    pub(crate) fn from_transport(error: reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            return Self::Timeout { timeout_secs };
        }
        if error.is_decode() {
            return Self::ParseError(error.without_url().to_string());
        }
        Self::ConnectionFailed(error.without_url().to_string())
    }

    /// Map a non-success HTTP status
    pub(crate) fn from_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> Self {
        let body = truncate(body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::AuthenticationFailed(format!("HTTP {status}: {body}"))
            },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded {
                retry_after_secs: retry_after,
            },
            _ => Self::RequestFailed(format!("HTTP {status}: {body}")),
        }
    }
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_BODY_CHARS {
        trimmed.to_string()
    } else {
        let mut cut: String = trimmed.chars().take(MAX_BODY_CHARS).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured() {
        assert!(RoutingError::NotConfigured(ProviderId::Mapbox).is_unconfigured());
        assert!(!RoutingError::NoRoute("none".to_string()).is_unconfigured());
    }

    #[test]
    fn test_runtime_errors_fall_back() {
        assert!(RoutingError::NotConfigured(ProviderId::Google).should_fallback());
        assert!(RoutingError::NoRoute("none".to_string()).should_fallback());
        assert!(RoutingError::CapabilityUnavailable("incidents".to_string()).should_fallback());
        assert!(RoutingError::ParseError("bad".to_string()).should_fallback());
        assert!(!RoutingError::ConfigurationError("bad".to_string()).should_fallback());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(RoutingError::ConnectionFailed("test".to_string()).is_retryable());
        assert!(RoutingError::Timeout { timeout_secs: 10 }.is_retryable());
        assert!(
            RoutingError::RateLimitExceeded {
                retry_after_secs: Some(60)
            }
            .is_retryable()
        );
        assert!(!RoutingError::NoRoute("test".to_string()).is_retryable());
        assert!(!RoutingError::AuthenticationFailed("test".to_string()).is_retryable());
        assert!(!RoutingError::NotConfigured(ProviderId::Google).is_retryable());
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            RoutingError::from_status(StatusCode::UNAUTHORIZED, None, ""),
            RoutingError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            RoutingError::from_status(StatusCode::FORBIDDEN, None, ""),
            RoutingError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            RoutingError::from_status(StatusCode::TOO_MANY_REQUESTS, Some(30), ""),
            RoutingError::RateLimitExceeded {
                retry_after_secs: Some(30)
            }
        ));
        assert!(matches!(
            RoutingError::from_status(StatusCode::BAD_GATEWAY, None, "upstream"),
            RoutingError::RequestFailed(_)
        ));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(1000);
        let err = RoutingError::from_status(StatusCode::INTERNAL_SERVER_ERROR, None, &body);
        assert!(err.to_string().len() < 300);
        assert!(err.to_string().ends_with("..."));
    }

    #[test]
    fn test_error_display() {
        let err = RoutingError::NotConfigured(ProviderId::MapMyIndia);
        assert_eq!(err.to_string(), "mapmyindia is not configured");

        let err = RoutingError::Timeout { timeout_secs: 10 };
        assert!(err.to_string().contains("10"));
    }
}
