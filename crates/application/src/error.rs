//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (invalid input)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// The backing service has no credentials
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// The backing service does not offer this capability
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ExternalService(_))
    }

    /// Whether the error means the capability simply is not there
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::NotConfigured(_) | Self::CapabilityUnavailable(_))
    }

    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Domain(DomainError::ValidationError(message.into()))
    }
}
