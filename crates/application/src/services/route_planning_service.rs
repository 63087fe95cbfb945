//! Route planning use cases
//!
//! Combines the remote routing port with local synthesis. Provider failures
//! never reach the caller; when no provider answers the service computes a
//! haversine estimate instead. The only errors returned are input validation
//! failures raised before any provider is contacted.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::{GeoLocation, ProviderId, ProviderStatus, ResolvedPlace, RouteStep, TravelMode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::ApplicationError;
use crate::ports::{RouteQuery, RoutingPort};
use crate::services::geo_resolver::GeoResolver;
use crate::services::route_synthesizer::{EventImpact, RouteSynthesizer, co2_kg, round_to};

/// Maximum length of a place name
pub const MAX_PLACE_NAME_LENGTH: usize = 200;

/// Maximum length of an event description
pub const MAX_EVENT_LENGTH: usize = 200;

const HAVERSINE_IMPLEMENTATION: &str = "haversine_estimate";
const MULTIPLIER_IMPLEMENTATION: &str = "event_type_multiplier";

/// Request for a single-leg plan between two coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Start point
    pub origin: GeoLocation,
    /// End point
    pub destination: GeoLocation,
    /// Travel mode
    #[serde(default)]
    pub mode: TravelMode,
    /// Intended departure, accepted for forward compatibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DateTime<Utc>>,
}

impl PlanRequest {
    /// Create a plan request
    #[must_use]
    pub const fn new(origin: GeoLocation, destination: GeoLocation, mode: TravelMode) -> Self {
        Self {
            origin,
            destination,
            mode,
            departure_time: None,
        }
    }
}

/// Request for a base plan plus an event-adjusted alternate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternatePlanRequest {
    /// The base plan
    #[serde(flatten)]
    pub plan: PlanRequest,
    /// Event type such as `road_closure`, `protest` or `concert`
    pub event_type: String,
}

/// One leg of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Start point
    pub start: GeoLocation,
    /// End point
    pub end: GeoLocation,
    /// Distance in meters (2 decimal places)
    pub distance_meters: f64,
    /// Duration in seconds (1 decimal place)
    pub duration_seconds: f64,
    /// Travel mode
    pub mode: TravelMode,
    /// Encoded polyline, empty for estimates
    #[serde(default)]
    pub geometry: String,
}

/// Totals of a plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Distance in meters
    pub distance_meters: f64,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Estimated CO₂ emissions in kg
    pub estimated_co2_kg: f64,
}

/// How a plan was computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDebug {
    /// Provider id, `haversine_estimate` or `event_type_multiplier`
    pub implementation: String,
    /// Free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Event type that shaped an alternate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Multiplier applied to an alternate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
}

/// A computed plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Origin and destination
    pub waypoints: Vec<GeoLocation>,
    /// Legs, currently always one
    pub legs: Vec<RouteLeg>,
    /// Totals
    pub summary: RouteSummary,
    /// Computation details
    pub debug: PlanDebug,
}

/// Base plan and its event-adjusted alternate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternatePlanResponse {
    /// Plan without the event
    pub base_route: PlanResponse,
    /// Plan stretched by the event impact
    pub alternate_route: PlanResponse,
    /// Explanation of the applied assumption
    pub reasoning: String,
}

/// Request for a route suggestion between two place names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestRequest {
    /// Start place name
    pub source: String,
    /// Destination place name
    pub destination: String,
    /// Event affecting the route, empty for none
    #[serde(default)]
    pub event: String,
    /// Travel mode
    #[serde(default)]
    pub mode: TravelMode,
    /// Provider to try first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_provider: Option<ProviderId>,
}

impl SuggestRequest {
    /// Create a suggestion request without event
    #[must_use]
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            event: String::new(),
            mode: TravelMode::default(),
            preferred_provider: None,
        }
    }

    /// Set the event
    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = event.into();
        self
    }

    /// Set the travel mode
    #[must_use]
    pub const fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        for (field, value) in [("source", &self.source), ("destination", &self.destination)] {
            if value.len() > MAX_PLACE_NAME_LENGTH {
                return Err(ApplicationError::validation(format!(
                    "{field} must be at most {MAX_PLACE_NAME_LENGTH} characters"
                )));
            }
        }
        if self.event.len() > MAX_EVENT_LENGTH {
            return Err(ApplicationError::validation(format!(
                "event must be at most {MAX_EVENT_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

/// A route suggestion between two place names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestResponse {
    /// Waypoints joined with arrows
    pub recommended_route: String,
    /// Why this route was recommended
    pub reason: String,
    /// Distance in meters
    pub distance_meters: f64,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Duration in minutes
    pub duration_minutes: f64,
    /// Estimated CO₂ emissions in kg
    pub estimated_co2_kg: f64,
    /// Waypoint names in order
    pub waypoints: Vec<String>,
    /// Encoded polyline from the provider, empty for local routes
    pub geometry: String,
    /// `[lat, lon]` points of the local path, empty when a polyline exists
    pub detailed_geometry: Vec<[f64; 2]>,
    /// Turn-by-turn steps
    pub steps: Vec<RouteStep>,
    /// Resolved start
    pub start_point: ResolvedPlace,
    /// Resolved destination
    pub end_point: ResolvedPlace,
    /// Provider that produced the route, `None` for local computation
    pub provider_used: Option<ProviderId>,
}

/// Route planning service
pub struct RoutePlanningService {
    routing: Arc<dyn RoutingPort>,
    resolver: GeoResolver,
}

impl fmt::Debug for RoutePlanningService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePlanningService")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl RoutePlanningService {
    /// Create a new route planning service
    #[must_use]
    pub fn new(routing: Arc<dyn RoutingPort>, resolver: GeoResolver) -> Self {
        Self { routing, resolver }
    }

    /// Plan a single-leg route between two coordinates
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` leaves room for request validation.
    #[instrument(skip(self, request), fields(mode = %request.mode))]
    pub async fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, ApplicationError> {
        let query = RouteQuery::new(request.origin, request.destination, request.mode);

        let (distance, duration, geometry, debug) = match self.routing.route(&query).await {
            Some(route) => {
                info!(provider = %route.provider_used, "Planned with routing provider");
                (
                    route.distance_meters,
                    route.duration_seconds,
                    route.geometry,
                    PlanDebug {
                        implementation: route.provider_used.to_string(),
                        note: Some(format!("Route from {}.", route.provider_used.label())),
                        event_type: None,
                        multiplier: None,
                    },
                )
            },
            None => {
                info!("No routing provider answered, using haversine estimate");
                let estimate = RouteSynthesizer::estimate(
                    request.origin,
                    request.destination,
                    request.mode,
                    &EventImpact::none(),
                );
                (
                    estimate.distance_meters,
                    estimate.duration_seconds,
                    String::new(),
                    PlanDebug {
                        implementation: HAVERSINE_IMPLEMENTATION.to_string(),
                        note: Some("Fallback used (no routing provider available).".to_string()),
                        event_type: None,
                        multiplier: None,
                    },
                )
            },
        };

        Ok(build_plan(request, distance, duration, geometry, debug))
    }

    /// Plan a base route plus an alternate stretched by an event
    ///
    /// # Errors
    ///
    /// Returns a validation error if `event_type` is empty or too long.
    #[instrument(skip(self, request), fields(event_type = %request.event_type))]
    pub async fn plan_alternate(
        &self,
        request: &AlternatePlanRequest,
    ) -> Result<AlternatePlanResponse, ApplicationError> {
        let event_type = request.event_type.trim();
        if event_type.is_empty() {
            return Err(ApplicationError::validation("event_type must not be empty"));
        }
        if event_type.len() > MAX_EVENT_LENGTH {
            return Err(ApplicationError::validation(format!(
                "event_type must be at most {MAX_EVENT_LENGTH} characters"
            )));
        }

        let base = self.plan(&request.plan).await?;
        let impact = RouteSynthesizer::event_impact(event_type);
        debug!(factor = impact.factor, "Applying event multiplier");

        let distance = round_to(base.summary.distance_meters * impact.factor, 2);
        let duration = round_to(base.summary.duration_seconds * impact.factor, 1);

        let alternate = build_plan(
            &request.plan,
            distance,
            duration,
            String::new(),
            PlanDebug {
                implementation: MULTIPLIER_IMPLEMENTATION.to_string(),
                note: None,
                event_type: Some(request.event_type.clone()),
                multiplier: Some(impact.factor),
            },
        );

        Ok(AlternatePlanResponse {
            base_route: base,
            alternate_route: alternate,
            reasoning: impact.explanation().to_string(),
        })
    }

    /// Suggest a route between two place names
    ///
    /// # Errors
    ///
    /// Returns a validation error if a name or the event is too long.
    #[instrument(skip(self, request), fields(mode = %request.mode))]
    pub async fn suggest(
        &self,
        request: &SuggestRequest,
    ) -> Result<SuggestResponse, ApplicationError> {
        request.validate()?;

        let start = self.resolver.resolve(&request.source).await;
        let end = self.resolver.resolve(&request.destination).await;

        let sketch = RouteSynthesizer::sketch(&start.display, &end.display, &request.event);
        let impact = RouteSynthesizer::event_impact(&request.event);
        let estimate =
            RouteSynthesizer::estimate(start.location, end.location, request.mode, &impact);
        let reason = impact.reason(&request.event).unwrap_or_else(|| sketch.reason.clone());

        let query = RouteQuery::new(start.location, end.location, request.mode)
            .with_preferred_provider(request.preferred_provider);

        let mut distance = estimate.distance_meters;
        let mut duration = estimate.duration_seconds;
        let mut geometry = String::new();
        let mut steps = Vec::new();
        let mut provider_used = None;

        if let Some(route) = self.routing.route(&query).await {
            info!(provider = %route.provider_used, "Route calculated using provider");
            distance = route.distance_meters;
            duration = route.duration_seconds;
            geometry = route.geometry;
            steps = route.steps;
            provider_used = Some(route.provider_used);
        }

        let detailed_geometry = if geometry.is_empty() {
            RouteSynthesizer::synthetic_geometry(start.location, end.location, &sketch)
        } else {
            Vec::new()
        };
        if steps.is_empty() {
            steps = RouteSynthesizer::synthetic_steps(start.location, end.location, &sketch);
        }

        Ok(SuggestResponse {
            recommended_route: sketch.waypoint_names.join(" → "),
            reason,
            distance_meters: round_to(distance, 2),
            distance_km: round_to(distance / 1000.0, 2),
            duration_seconds: round_to(duration, 1),
            duration_minutes: round_to(duration / 60.0, 1),
            estimated_co2_kg: co2_kg(distance, request.mode),
            waypoints: sketch.waypoint_names,
            geometry,
            detailed_geometry,
            steps,
            start_point: start,
            end_point: end,
            provider_used,
        })
    }

    /// Recompute a suggestion after conditions changed
    ///
    /// # Errors
    ///
    /// Same as [`Self::suggest`].
    pub async fn recalculate(
        &self,
        request: &SuggestRequest,
    ) -> Result<SuggestResponse, ApplicationError> {
        info!(event = %request.event, "Recalculating route");
        self.suggest(request).await
    }

    /// Configuration status of the routing providers
    #[must_use]
    pub fn provider_status(&self) -> ProviderStatus {
        self.routing.provider_status()
    }
}

fn build_plan(
    request: &PlanRequest,
    distance_meters: f64,
    duration_seconds: f64,
    geometry: String,
    debug: PlanDebug,
) -> PlanResponse {
    let distance_meters = round_to(distance_meters, 2);
    let duration_seconds = round_to(duration_seconds, 1);

    PlanResponse {
        waypoints: vec![request.origin, request.destination],
        legs: vec![RouteLeg {
            start: request.origin,
            end: request.destination,
            distance_meters,
            duration_seconds,
            mode: request.mode,
            geometry,
        }],
        summary: RouteSummary {
            distance_meters,
            duration_seconds,
            estimated_co2_kg: co2_kg(distance_meters, request.mode),
        },
        debug,
    }
}
