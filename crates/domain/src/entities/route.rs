//! Normalized route returned by every routing provider

use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoLocation, ProviderId};

/// A single turn instruction within a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Human-readable instruction (e.g., "Turn left onto Hosur Road")
    pub instruction: String,

    /// Distance covered by this step in meters
    pub distance_meters: f64,

    /// Time needed for this step in seconds
    pub duration_seconds: f64,

    /// Where the maneuver happens, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maneuver_location: Option<GeoLocation>,

    /// Name of the road the step follows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_name: Option<String>,
}

impl RouteStep {
    /// Create a step without location or road name
    #[must_use]
    pub fn new(
        instruction: impl Into<String>,
        distance_meters: f64,
        duration_seconds: f64,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            distance_meters: distance_meters.max(0.0),
            duration_seconds: duration_seconds.max(0.0),
            maneuver_location: None,
            road_name: None,
        }
    }

    /// Attach the maneuver location
    #[must_use]
    pub const fn with_location(mut self, location: GeoLocation) -> Self {
        self.maneuver_location = Some(location);
        self
    }

    /// Attach the road name (ignored when empty)
    #[must_use]
    pub fn with_road_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.road_name = Some(name);
        }
        self
    }
}

/// Provider-agnostic route
///
/// This is the only shape the routing layer hands to callers; provider
/// response schemas stay inside their clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Encoded polyline of the route path, empty when unknown
    pub geometry: String,

    /// Total distance in meters (never negative)
    pub distance_meters: f64,

    /// Total duration in seconds (never negative)
    pub duration_seconds: f64,

    /// Turn-by-turn steps across all legs, in order
    pub steps: Vec<RouteStep>,

    /// Provider that produced the route
    pub provider_used: ProviderId,
}

impl RouteResult {
    /// Create a route result, clamping negative figures to zero
    #[must_use]
    pub fn new(
        provider_used: ProviderId,
        geometry: String,
        distance_meters: f64,
        duration_seconds: f64,
        steps: Vec<RouteStep>,
    ) -> Self {
        Self {
            geometry,
            distance_meters: distance_meters.max(0.0),
            duration_seconds: duration_seconds.max(0.0),
            steps,
            provider_used,
        }
    }

    /// Whether the provider returned a path geometry
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        !self.geometry.is_empty()
    }

    /// Re-stamp the provider that satisfied the request
    #[must_use]
    pub const fn stamped(mut self, provider: ProviderId) -> Self {
        self.provider_used = provider;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_figures_are_clamped() {
        let route = RouteResult::new(ProviderId::Osrm, String::new(), -5.0, -1.0, vec![]);
        assert!(route.distance_meters.abs() < f64::EPSILON);
        assert!(route.duration_seconds.abs() < f64::EPSILON);
        assert!(!route.has_geometry());
    }

    #[test]
    fn test_stamped_overrides_provider() {
        let route = RouteResult::new(ProviderId::Osrm, "abc".to_string(), 10.0, 2.0, vec![])
            .stamped(ProviderId::Google);
        assert_eq!(route.provider_used, ProviderId::Google);
        assert!(route.has_geometry());
    }

    #[test]
    fn test_step_builder() {
        let loc = GeoLocation::new(12.95, 77.6).unwrap();
        let step = RouteStep::new("Turn right", 120.0, 14.0)
            .with_location(loc)
            .with_road_name("");
        assert_eq!(step.maneuver_location, Some(loc));
        assert!(step.road_name.is_none());

        let named = RouteStep::new("Continue", 1.0, 1.0).with_road_name("Hosur Road");
        assert_eq!(named.road_name.as_deref(), Some("Hosur Road"));
    }

    #[test]
    fn test_step_serialization_skips_missing_fields() {
        let step = RouteStep::new("Arrive", 0.0, 0.0);
        let json = serde_json::to_string(&step).unwrap();
        assert!(!json.contains("maneuver_location"));
        assert!(!json.contains("road_name"));
    }
}
