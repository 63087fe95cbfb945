//! Application configuration
//!
//! Sources, later ones winning:
//! - optional `config.toml` in the working directory
//! - `WAYPOINT__<SECTION>__<KEY>` environment variables
//! - the plain provider variables (`MAPBOX_API_KEY`, `ROUTING_PROVIDER`, ...)

use application::GeoResolverConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use integration_routing::{MapboxGeocoderConfig, RoutingConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::telemetry::TelemetryConfig;

/// Prefix of the structured environment variables
pub const ENV_PREFIX: &str = "WAYPOINT";

/// Separator between prefix, section and key
pub const ENV_SEPARATOR: &str = "__";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A section holds invalid values
    #[error("Invalid {section} configuration: {message}")]
    Invalid {
        /// Section name
        section: &'static str,
        /// What is wrong
        message: String,
    },
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Routing providers
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Remote geocoder; the access token defaults to the Mapbox routing key
    #[serde(default)]
    pub geocoding: MapboxGeocoderConfig,

    /// Place resolution
    #[serde(default)]
    pub resolver: GeoResolverConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a section is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(File::with_name("config").required(false))
            // Override with environment variables (e.g., WAYPOINT__ROUTING__TIMEOUT_SECS)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );

        Self::from_builder(builder, |name| std::env::var(name).ok())
    }

    /// Build from prepared sources plus a lookup for the plain provider variables
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a section is invalid.
    pub fn from_builder(
        builder: ConfigBuilder<DefaultState>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_env_overrides(lookup);
        config.validate()?;

        info!(
            preferred_provider = %config.routing.preferred_provider,
            geocoder_configured = config.geocoding.is_configured(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Overlay the plain provider variables
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.routing.apply_env_overrides(lookup);

        if !self.geocoding.is_configured() && self.routing.mapbox_api_key.is_some() {
            debug!("Using the Mapbox routing key for geocoding");
            self.geocoding.api_key.clone_from(&self.routing.mapbox_api_key);
        }
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first invalid section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.routing
            .validate()
            .map_err(|message| ConfigError::Invalid {
                section: "routing",
                message,
            })?;
        self.geocoding
            .validate()
            .map_err(|message| ConfigError::Invalid {
                section: "geocoding",
                message,
            })?;
        Ok(())
    }
}
