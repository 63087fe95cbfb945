//! Routing provider identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Identity of a remote routing provider
///
/// The declaration order is the enumeration order used when building the
/// fallback chain. [`ProviderId::Osrm`] needs no credentials and is always
/// usable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Mapbox Directions API
    Mapbox,
    /// Google Maps Directions API
    Google,
    /// MapMyIndia (local traffic-aware provider)
    MapMyIndia,
    /// OSRM public server (no credentials)
    Osrm,
}

impl ProviderId {
    /// All providers in enumeration order
    pub const ALL: [Self; 4] = [Self::Mapbox, Self::Google, Self::MapMyIndia, Self::Osrm];

    /// The provider that is usable without credentials
    pub const NO_CREDENTIALS: Self = Self::Osrm;

    /// Wire name of the provider
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mapbox => "mapbox",
            Self::Google => "google",
            Self::MapMyIndia => "mapmyindia",
            Self::Osrm => "osrm",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mapbox => "Mapbox",
            Self::Google => "Google Maps",
            Self::MapMyIndia => "MapMyIndia",
            Self::Osrm => "OSRM",
        }
    }

    /// Whether the provider needs credentials to be usable
    #[must_use]
    pub const fn requires_credentials(&self) -> bool {
        !matches!(self, Self::Osrm)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or(DomainError::UnknownProvider(normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_order() {
        assert_eq!(
            ProviderId::ALL,
            [
                ProviderId::Mapbox,
                ProviderId::Google,
                ProviderId::MapMyIndia,
                ProviderId::Osrm
            ]
        );
        assert!(ProviderId::Mapbox < ProviderId::Osrm);
    }

    #[test]
    fn test_only_osrm_is_credential_free() {
        let free: Vec<_> = ProviderId::ALL
            .into_iter()
            .filter(|p| !p.requires_credentials())
            .collect();
        assert_eq!(free, vec![ProviderId::NO_CREDENTIALS]);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("MapMyIndia".parse::<ProviderId>().unwrap(), ProviderId::MapMyIndia);
        assert_eq!(" GOOGLE ".parse::<ProviderId>().unwrap(), ProviderId::Google);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "here".parse::<ProviderId>().unwrap_err();
        assert!(err.to_string().contains("here"));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ProviderId::MapMyIndia).unwrap();
        assert_eq!(json, "\"mapmyindia\"");
    }
}
