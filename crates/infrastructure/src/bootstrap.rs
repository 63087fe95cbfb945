//! Service wiring
//!
//! Builds the application services from a loaded [`AppConfig`]. Everything is
//! constructed once and passed down explicitly.

use std::sync::Arc;

use application::{ApplicationError, GeoResolver, MobilityEventService, RoutePlanningService};
use tracing::info;

use crate::adapters::{GeocodingAdapter, IncidentAdapter, RoutingAdapter};
use crate::config::AppConfig;

/// All application services
#[derive(Debug)]
pub struct Services {
    /// Route planning and suggestions
    pub route_planning: RoutePlanningService,
    /// Mobility events
    pub mobility_events: MobilityEventService,
}

/// Build the route planning service
///
/// # Errors
///
/// Returns an error if a provider or geocoder client cannot be created.
pub fn build_route_planning_service(
    config: &AppConfig,
) -> Result<RoutePlanningService, ApplicationError> {
    let routing = RoutingAdapter::from_config(&config.routing)
        .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
    let geocoder = GeocodingAdapter::from_config(&config.geocoding)?;

    let resolver = GeoResolver::new(config.resolver.clone()).with_geocoder(Arc::new(geocoder));

    Ok(RoutePlanningService::new(Arc::new(routing), resolver))
}

/// Build the mobility event service
///
/// The live incident feed is attached only when MapMyIndia is configured.
///
/// # Errors
///
/// Returns an error if the incident client cannot be created.
pub fn build_mobility_event_service(
    config: &AppConfig,
) -> Result<MobilityEventService, ApplicationError> {
    let service = MobilityEventService::new();
    if !config.routing.is_configured(domain::ProviderId::MapMyIndia) {
        return Ok(service);
    }

    let incidents = IncidentAdapter::from_config(&config.routing)?;
    Ok(service.with_incidents(Arc::new(incidents)))
}

/// Build every service
///
/// # Errors
///
/// Returns an error if any client cannot be created.
pub fn build_services(config: &AppConfig) -> Result<Services, ApplicationError> {
    let services = Services {
        route_planning: build_route_planning_service(config)?,
        mobility_events: build_mobility_event_service(config)?,
    };
    info!("Services ready");
    Ok(services)
}
