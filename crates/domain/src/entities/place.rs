//! Place names resolved to coordinates

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoLocation;

/// Which resolution tier produced a place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceSource {
    /// Exact or partial match in the local gazetteer
    Gazetteer,
    /// Remote geocoding service
    Geocoder,
    /// Fixed default coordinate
    Default,
}

/// A free-text place name resolved to a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    /// Resolved coordinate
    #[serde(flatten)]
    pub location: GeoLocation,

    /// Short display name (e.g., "MG Road")
    pub display: String,

    /// Fully qualified name when the geocoder provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Tier that produced this place
    pub source: PlaceSource,
}

impl ResolvedPlace {
    /// Create a resolved place
    #[must_use]
    pub fn new(location: GeoLocation, display: impl Into<String>, source: PlaceSource) -> Self {
        Self {
            location,
            display: display.into(),
            full_name: None,
            source,
        }
    }

    /// Attach the fully qualified name
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }
}
