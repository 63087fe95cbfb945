//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinates: latitude {latitude} / longitude {longitude}")]
    InvalidCoordinates {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },

    /// Travel mode is not one of car, bike, walk, transit
    #[error("Unknown travel mode: {0}")]
    UnknownTravelMode(String),

    /// Routing provider name is not part of the supported set
    #[error("Unknown routing provider: {0}")]
    UnknownProvider(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
