//! Mobility events near a location
//!
//! Uses the live incident feed when one is configured. Without it, or when
//! the feed returns nothing, a fixed pair of sample events relative to the
//! current time is served instead.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use domain::{EventSeverity, GeoLocation, MobilityEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::IncidentPort;

/// Smallest accepted search radius
pub const MIN_RADIUS_KM: u32 = 1;

/// Largest accepted search radius
pub const MAX_RADIUS_KM: u32 = 50;

/// Events starting within this many hours count as active
pub const ACTIVE_HORIZON_HOURS: i64 = 3;

const fn default_radius_km() -> u32 {
    5
}

const fn default_active_only() -> bool {
    true
}

/// Query for events around a location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearbyEventsQuery {
    /// Search center
    #[serde(flatten)]
    pub location: GeoLocation,
    /// Search radius in kilometers (1 to 50)
    #[serde(default = "default_radius_km")]
    pub radius_km: u32,
    /// Keep only events that are ongoing or start soon
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

impl NearbyEventsQuery {
    /// Query with the default radius, active events only
    #[must_use]
    pub const fn new(location: GeoLocation) -> Self {
        Self {
            location,
            radius_km: default_radius_km(),
            active_only: default_active_only(),
        }
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if (MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&self.radius_km) {
            Ok(())
        } else {
            Err(ApplicationError::validation(format!(
                "radius_km must be between {MIN_RADIUS_KM} and {MAX_RADIUS_KM}, got {}",
                self.radius_km
            )))
        }
    }
}

/// Events around a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsResponse {
    /// Matching events
    pub items: Vec<MobilityEvent>,
    /// Number of events
    pub count: usize,
    /// Search center latitude
    pub center_lat: f64,
    /// Search center longitude
    pub center_lon: f64,
    /// Search radius in kilometers
    pub radius_km: u32,
}

/// Mobility event service
#[derive(Default)]
pub struct MobilityEventService {
    incidents: Option<Arc<dyn IncidentPort>>,
}

impl fmt::Debug for MobilityEventService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MobilityEventService")
            .field("has_incident_feed", &self.incidents.is_some())
            .finish()
    }
}

impl MobilityEventService {
    /// Service serving sample events only
    #[must_use]
    pub const fn new() -> Self {
        Self { incidents: None }
    }

    /// Attach a live incident feed
    #[must_use]
    pub fn with_incidents(mut self, incidents: Arc<dyn IncidentPort>) -> Self {
        self.incidents = Some(incidents);
        self
    }

    /// Events near a location as of now
    ///
    /// # Errors
    ///
    /// Returns a validation error if the radius is out of range.
    pub async fn nearby_events(
        &self,
        query: &NearbyEventsQuery,
    ) -> Result<EventsResponse, ApplicationError> {
        self.nearby_events_at(query, Utc::now()).await
    }

    /// Events near a location as of `now`
    ///
    /// # Errors
    ///
    /// Returns a validation error if the radius is out of range.
    #[instrument(skip(self, query), fields(radius_km = query.radius_km))]
    pub async fn nearby_events_at(
        &self,
        query: &NearbyEventsQuery,
        now: DateTime<Utc>,
    ) -> Result<EventsResponse, ApplicationError> {
        query.validate()?;

        let mut events = self.live_events(query).await;
        if events.is_empty() {
            debug!("Serving sample events");
            events = Self::sample_events(now);
        }

        if query.active_only {
            let horizon = Duration::hours(ACTIVE_HORIZON_HOURS);
            events.retain(|e| e.is_active_or_upcoming(now, horizon));
        }

        Ok(EventsResponse {
            count: events.len(),
            items: events,
            center_lat: query.location.latitude(),
            center_lon: query.location.longitude(),
            radius_km: query.radius_km,
        })
    }

    async fn live_events(&self, query: &NearbyEventsQuery) -> Vec<MobilityEvent> {
        let Some(incidents) = &self.incidents else {
            return Vec::new();
        };

        match incidents
            .nearby_incidents(&query.location, query.radius_km)
            .await
        {
            Ok(events) => {
                info!(count = events.len(), "Fetched live incidents");
                events
            },
            Err(e) if e.is_unavailable() => {
                debug!(error = %e, "Live incident feed unavailable");
                Vec::new()
            },
            Err(e) => {
                warn!(error = %e, "Live incident feed failed");
                Vec::new()
            },
        }
    }

    /// Built-in events relative to `now`
    #[must_use]
    pub fn sample_events(now: DateTime<Utc>) -> Vec<MobilityEvent> {
        vec![
            MobilityEvent {
                id: "e1".to_string(),
                title: "Road maintenance near central hub".to_string(),
                category: "road_closure".to_string(),
                location: GeoLocation::bangalore_center(),
                starts_at: now - Duration::hours(1),
                ends_at: now + Duration::hours(5),
                description: Some("One lane closed, expect moderate delays.".to_string()),
                severity: EventSeverity::new(3).unwrap_or_default(),
            },
            MobilityEvent {
                id: "e2".to_string(),
                title: "Stadium football match".to_string(),
                category: "sports".to_string(),
                location: GeoLocation::new_unchecked(12.9352, 77.6245),
                starts_at: now + Duration::hours(2),
                ends_at: now + Duration::hours(6),
                description: Some("High traffic expected pre- and post-match.".to_string()),
                severity: EventSeverity::new(4).unwrap_or_default(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockIncidentPort;

    fn query() -> NearbyEventsQuery {
        NearbyEventsQuery::new(GeoLocation::bangalore_center())
    }

    fn incident(id: &str, starts_in_hours: i64, now: DateTime<Utc>) -> MobilityEvent {
        MobilityEvent {
            id: id.to_string(),
            title: "Traffic incident".to_string(),
            category: "incident".to_string(),
            location: GeoLocation::bangalore_center(),
            starts_at: now + Duration::hours(starts_in_hours),
            ends_at: now + Duration::hours(starts_in_hours + 2),
            description: None,
            severity: EventSeverity::new(3).unwrap(),
        }
    }

    #[tokio::test]
    async fn samples_without_feed() {
        let now = Utc::now();
        let response = MobilityEventService::new()
            .nearby_events_at(&query(), now)
            .await
            .unwrap();

        assert_eq!(response.count, 2);
        assert_eq!(response.items[0].id, "e1");
        assert_eq!(response.items[0].severity.level(), 3);
        assert_eq!(response.items[1].category, "sports");
        assert_eq!(response.radius_km, 5);
        assert!((response.center_lat - 12.9716).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn active_only_drops_far_future_events() {
        let now = Utc::now();
        let mut mock = MockIncidentPort::new();
        mock.expect_nearby_incidents()
            .times(1)
            .returning(move |_, _| Ok(vec![incident("soon", 1, now), incident("later", 8, now)]));

        let service = MobilityEventService::new().with_incidents(Arc::new(mock));
        let response = service.nearby_events_at(&query(), now).await.unwrap();

        assert_eq!(response.count, 1);
        assert_eq!(response.items[0].id, "soon");
    }

    #[tokio::test]
    async fn inactive_events_kept_when_requested() {
        let now = Utc::now();
        let mut mock = MockIncidentPort::new();
        mock.expect_nearby_incidents()
            .returning(move |_, _| Ok(vec![incident("later", 8, now), incident("done", -5, now)]));

        let service = MobilityEventService::new().with_incidents(Arc::new(mock));
        let mut q = query();
        q.active_only = false;
        let response = service.nearby_events_at(&q, now).await.unwrap();
        assert_eq!(response.count, 2);
    }

    #[tokio::test]
    async fn unavailable_feed_falls_back_to_samples() {
        let mut mock = MockIncidentPort::new();
        mock.expect_nearby_incidents()
            .withf(|_, radius| *radius == 10)
            .returning(|_, _| {
                Err(ApplicationError::CapabilityUnavailable(
                    "nearby incidents".to_string(),
                ))
            });

        let service = MobilityEventService::new().with_incidents(Arc::new(mock));
        let mut q = query();
        q.radius_km = 10;
        let response = service.nearby_events(&q).await.unwrap();
        assert_eq!(response.count, 2);
        assert_eq!(response.radius_km, 10);
    }

    #[tokio::test]
    async fn failing_feed_falls_back_to_samples() {
        let mut mock = MockIncidentPort::new();
        mock.expect_nearby_incidents()
            .returning(|_, _| Err(ApplicationError::ExternalService("503".to_string())));

        let service = MobilityEventService::new().with_incidents(Arc::new(mock));
        let response = service.nearby_events(&query()).await.unwrap();
        assert_eq!(response.items[0].id, "e1");
    }

    #[tokio::test]
    async fn radius_out_of_range_is_rejected() {
        let mut mock = MockIncidentPort::new();
        mock.expect_nearby_incidents().never();
        let service = MobilityEventService::new().with_incidents(Arc::new(mock));

        for radius in [0, 51] {
            let mut q = query();
            q.radius_km = radius;
            let err = service.nearby_events(&q).await.unwrap_err();
            assert!(err.to_string().contains("radius_km"));
        }
    }

    #[test]
    fn sample_events_relative_to_now() {
        let now = Utc::now();
        let events = MobilityEventService::sample_events(now);
        assert!(events[0].is_ongoing(now));
        assert!(!events[1].is_ongoing(now));
        assert!(events[1].is_active_or_upcoming(now, Duration::hours(ACTIVE_HORIZON_HOURS)));
    }

    #[test]
    fn query_defaults_from_json() {
        let q: NearbyEventsQuery = serde_json::from_str(r#"{"lat": 12.93, "lon": 77.62}"#).unwrap();
        assert_eq!(q.radius_km, 5);
        assert!(q.active_only);
    }
}
