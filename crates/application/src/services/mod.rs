//! Application services - Use case implementations

mod gazetteer;
mod geo_resolver;
mod mobility_event_service;
mod route_planning_service;
mod route_synthesizer;

pub use gazetteer::{
    GAZETTEER, GazetteerEntry, JUNCTIONS, Junction, find_junction, lookup_exact, lookup_partial,
};
pub use geo_resolver::{GeoResolver, GeoResolverConfig};
pub use mobility_event_service::{
    ACTIVE_HORIZON_HOURS, EventsResponse, MAX_RADIUS_KM, MIN_RADIUS_KM, MobilityEventService,
    NearbyEventsQuery,
};
pub use route_planning_service::{
    AlternatePlanRequest, AlternatePlanResponse, MAX_EVENT_LENGTH, MAX_PLACE_NAME_LENGTH,
    PlanDebug, PlanRequest, PlanResponse, RouteLeg, RoutePlanningService, RouteSummary,
    SuggestRequest, SuggestResponse,
};
pub use route_synthesizer::{
    CORRIDOR_RULES, CorridorRule, EVENT_IMPACT_RULES, EventImpact, EventImpactRule, ImpactKind,
    RouteEstimate, RouteSketch, RouteSynthesizer, UNKNOWN_EVENT_FACTOR, co2_kg, round_to,
    speed_mps,
};
