//! Routing provider configuration
//!
//! Credentials decide which providers are usable. The fallback chain is
//! computed once from that state and never changes for the process lifetime.

use domain::ProviderId;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

/// Plain environment variable names read by [`RoutingConfig::from_env`]
pub mod env_vars {
    /// Mapbox access token
    pub const MAPBOX_API_KEY: &str = "MAPBOX_API_KEY";
    /// Google Maps API key
    pub const GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
    /// MapMyIndia REST key
    pub const MAPMYINDIA_API_KEY: &str = "MAPMYINDIA_API_KEY";
    /// MapMyIndia OAuth client id
    pub const MAPMYINDIA_CLIENT_ID: &str = "MAPMYINDIA_CLIENT_ID";
    /// MapMyIndia OAuth client secret
    pub const MAPMYINDIA_CLIENT_SECRET: &str = "MAPMYINDIA_CLIENT_SECRET";
    /// OSRM server override
    pub const OSRM_BASE_URL: &str = "OSRM_BASE_URL";
    /// Preferred provider selector
    pub const ROUTING_PROVIDER: &str = "ROUTING_PROVIDER";
}

/// Configuration for all routing providers
///
/// Secret fields are [`SecretString`]s: `Debug` output redacts them and no
/// accessor on this type returns them as plain strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Mapbox access token (enables Mapbox)
    #[serde(default)]
    pub mapbox_api_key: Option<SecretString>,

    /// Google Maps API key (enables Google)
    #[serde(default)]
    pub google_maps_api_key: Option<SecretString>,

    /// MapMyIndia REST key (enables MapMyIndia with key-in-path auth)
    #[serde(default)]
    pub mapmyindia_api_key: Option<SecretString>,

    /// MapMyIndia OAuth client id (with the secret, enables bearer auth)
    #[serde(default)]
    pub mapmyindia_client_id: Option<SecretString>,

    /// MapMyIndia OAuth client secret
    #[serde(default)]
    pub mapmyindia_client_secret: Option<SecretString>,

    /// Mapbox API base URL
    #[serde(default = "default_mapbox_base_url")]
    pub mapbox_base_url: String,

    /// Google Maps API base URL
    #[serde(default = "default_google_base_url")]
    pub google_base_url: String,

    /// MapMyIndia advanced maps base URL
    #[serde(default = "default_mapmyindia_base_url")]
    pub mapmyindia_base_url: String,

    /// MapMyIndia OAuth token endpoint
    #[serde(default = "default_mapmyindia_token_url")]
    pub mapmyindia_token_url: String,

    /// OSRM server base URL
    #[serde(default = "default_osrm_base_url")]
    pub osrm_base_url: String,

    /// Provider tried first when usable; unknown names fall back to OSRM
    #[serde(
        default = "default_preferred_provider",
        deserialize_with = "deserialize_preferred_provider"
    )]
    pub preferred_provider: ProviderId,

    /// Timeout for routing requests in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for OAuth token requests in seconds
    #[serde(default = "default_token_timeout_secs")]
    pub token_timeout_secs: u64,
}

fn default_mapbox_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

fn default_google_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_mapmyindia_base_url() -> String {
    "https://apis.mapmyindia.com/advancedmaps/v1".to_string()
}

fn default_mapmyindia_token_url() -> String {
    "https://outpost.mapmyindia.com/api/security/oauth/token".to_string()
}

fn default_osrm_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

const fn default_preferred_provider() -> ProviderId {
    ProviderId::NO_CREDENTIALS
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_token_timeout_secs() -> u64 {
    5
}

/// Parse a preferred-provider selector, defaulting to OSRM on unknown values
fn parse_preferred_provider(raw: &str) -> ProviderId {
    raw.parse().unwrap_or_else(|_| {
        warn!(value = %raw, "Invalid preferred routing provider, defaulting to osrm");
        ProviderId::NO_CREDENTIALS
    })
}

fn deserialize_preferred_provider<'de, D>(deserializer: D) -> Result<ProviderId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_preferred_provider(&raw))
}

fn has_secret(secret: Option<&SecretString>) -> bool {
    secret.is_some_and(|s| !s.expose_secret().trim().is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Compute a fallback chain from a usability predicate
///
/// The result holds no duplicates, lists `preferred` first iff it is usable,
/// then every other usable provider in enumeration order, and always ends with
/// the credential-free provider exactly once.
pub fn build_fallback_chain(
    preferred: ProviderId,
    is_usable: impl Fn(ProviderId) -> bool,
) -> Vec<ProviderId> {
    let mut chain = Vec::with_capacity(ProviderId::ALL.len());

    if preferred != ProviderId::NO_CREDENTIALS && is_usable(preferred) {
        chain.push(preferred);
    }

    for provider in ProviderId::ALL {
        if provider != preferred && provider != ProviderId::NO_CREDENTIALS && is_usable(provider) {
            chain.push(provider);
        }
    }

    chain.push(ProviderId::NO_CREDENTIALS);
    chain
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            mapbox_api_key: None,
            google_maps_api_key: None,
            mapmyindia_api_key: None,
            mapmyindia_client_id: None,
            mapmyindia_client_secret: None,
            mapbox_base_url: default_mapbox_base_url(),
            google_base_url: default_google_base_url(),
            mapmyindia_base_url: default_mapmyindia_base_url(),
            mapmyindia_token_url: default_mapmyindia_token_url(),
            osrm_base_url: default_osrm_base_url(),
            preferred_provider: default_preferred_provider(),
            timeout_secs: default_timeout_secs(),
            token_timeout_secs: default_token_timeout_secs(),
        }
    }
}

impl RoutingConfig {
    /// Create a configuration suitable for testing (no credentials, short timeouts)
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            token_timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Build a configuration from the process environment
    ///
    /// Reads the names in [`env_vars`]; everything else keeps its default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        config.apply_env_overrides(lookup);
        config
    }

    /// Overlay values found through `lookup` onto this configuration
    ///
    /// Empty values count as absent and leave the current value untouched.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let secret = |name: &str| non_empty(lookup(name)).map(SecretString::from);

        if let Some(key) = secret(env_vars::MAPBOX_API_KEY) {
            self.mapbox_api_key = Some(key);
        }
        if let Some(key) = secret(env_vars::GOOGLE_MAPS_API_KEY) {
            self.google_maps_api_key = Some(key);
        }
        if let Some(key) = secret(env_vars::MAPMYINDIA_API_KEY) {
            self.mapmyindia_api_key = Some(key);
        }
        if let Some(id) = secret(env_vars::MAPMYINDIA_CLIENT_ID) {
            self.mapmyindia_client_id = Some(id);
        }
        if let Some(client_secret) = secret(env_vars::MAPMYINDIA_CLIENT_SECRET) {
            self.mapmyindia_client_secret = Some(client_secret);
        }
        if let Some(url) = non_empty(lookup(env_vars::OSRM_BASE_URL)) {
            self.osrm_base_url = url;
        }
        if let Some(raw) = non_empty(lookup(env_vars::ROUTING_PROVIDER)) {
            self.preferred_provider = parse_preferred_provider(&raw);
        }
    }

    /// Whether MapMyIndia can authenticate through the OAuth client flow
    #[must_use]
    pub fn has_mapmyindia_oauth(&self) -> bool {
        has_secret(self.mapmyindia_client_id.as_ref())
            && has_secret(self.mapmyindia_client_secret.as_ref())
    }

    /// Check if a specific provider has the credentials it needs
    #[must_use]
    pub fn is_configured(&self, provider: ProviderId) -> bool {
        match provider {
            ProviderId::Mapbox => has_secret(self.mapbox_api_key.as_ref()),
            ProviderId::Google => has_secret(self.google_maps_api_key.as_ref()),
            ProviderId::MapMyIndia => {
                has_secret(self.mapmyindia_api_key.as_ref()) || self.has_mapmyindia_oauth()
            },
            ProviderId::Osrm => true,
        }
    }

    /// All usable providers in enumeration order
    #[must_use]
    pub fn available_providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|p| self.is_configured(*p))
            .collect()
    }

    /// The provider fallback chain for this configuration
    #[must_use]
    pub fn fallback_chain(&self) -> Vec<ProviderId> {
        build_fallback_chain(self.preferred_provider, |p| self.is_configured(p))
    }

    /// Log which providers are configured, never the credential values
    pub fn log_status(&self) {
        info!("Routing provider configuration:");
        for provider in ProviderId::ALL {
            let state = if !provider.requires_credentials() {
                "available (no key required)"
            } else if self.is_configured(provider) {
                "configured"
            } else {
                "no API key"
            };
            info!(provider = %provider.label(), %state, "Routing provider");
        }
        info!(preferred = %self.preferred_provider, "Preferred routing provider");
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.token_timeout_secs == 0 {
            return Err("token_timeout_secs must be greater than 0".to_string());
        }

        let urls = [
            ("mapbox_base_url", &self.mapbox_base_url),
            ("google_base_url", &self.google_base_url),
            ("mapmyindia_base_url", &self.mapmyindia_base_url),
            ("mapmyindia_token_url", &self.mapmyindia_token_url),
            ("osrm_base_url", &self.osrm_base_url),
        ];
        for (name, value) in urls {
            if url::Url::parse(value).is_err() {
                return Err(format!("{name} must be a valid URL"));
            }
        }

        Ok(())
    }
}
