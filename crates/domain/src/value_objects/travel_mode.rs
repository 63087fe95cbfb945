//! Travel mode value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// How the traveller moves between origin and destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// Private car
    #[default]
    Car,
    /// Bicycle
    Bike,
    /// On foot
    Walk,
    /// Public transit
    Transit,
}

impl TravelMode {
    /// Wire name of the mode
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Bike => "bike",
            Self::Walk => "walk",
            Self::Transit => "transit",
        }
    }

    /// All modes in declaration order
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Car, Self::Bike, Self::Walk, Self::Transit]
    }

    /// Whether the mode is human-powered
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Bike | Self::Walk)
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = DomainError;

    /// Accepts the canonical names plus the provider-style aliases
    /// (`driving`, `cycling`, `walking`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "car" | "driving" => Ok(Self::Car),
            "bike" | "cycling" | "bicycle" => Ok(Self::Bike),
            "walk" | "walking" | "foot" => Ok(Self::Walk),
            "transit" => Ok(Self::Transit),
            other => Err(DomainError::UnknownTravelMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_car() {
        assert_eq!(TravelMode::default(), TravelMode::Car);
    }

    #[test]
    fn test_parse_canonical_and_aliases() {
        assert_eq!("car".parse::<TravelMode>().unwrap(), TravelMode::Car);
        assert_eq!("Driving".parse::<TravelMode>().unwrap(), TravelMode::Car);
        assert_eq!("cycling".parse::<TravelMode>().unwrap(), TravelMode::Bike);
        assert_eq!(" walk ".parse::<TravelMode>().unwrap(), TravelMode::Walk);
        assert_eq!("transit".parse::<TravelMode>().unwrap(), TravelMode::Transit);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            "hovercraft".parse::<TravelMode>(),
            Err(DomainError::UnknownTravelMode(_))
        ));
    }

    #[test]
    fn test_display_roundtrip() {
        for mode in TravelMode::all() {
            assert_eq!(mode.to_string().parse::<TravelMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_is_active() {
        assert!(TravelMode::Walk.is_active());
        assert!(TravelMode::Bike.is_active());
        assert!(!TravelMode::Car.is_active());
        assert!(!TravelMode::Transit.is_active());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TravelMode::Transit).unwrap();
        assert_eq!(json, "\"transit\"");
        let mode: TravelMode = serde_json::from_str("\"bike\"").unwrap();
        assert_eq!(mode, TravelMode::Bike);
    }
}
