//! Mobility-impacting events (closures, rallies, matches)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::GeoLocation;

/// Impact level of an event, 1 (low) to 5 (high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct EventSeverity(u8);

impl EventSeverity {
    /// Lowest severity
    pub const LOW: Self = Self(1);

    /// Create a severity level
    ///
    /// # Errors
    ///
    /// Returns a validation error if `level` is not in 1..=5.
    pub fn new(level: u8) -> Result<Self, DomainError> {
        if (1..=5).contains(&level) {
            Ok(Self(level))
        } else {
            Err(DomainError::ValidationError(format!(
                "severity must be between 1 and 5, got {level}"
            )))
        }
    }

    /// Numeric level
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }
}

impl Default for EventSeverity {
    fn default() -> Self {
        Self::LOW
    }
}

impl TryFrom<u8> for EventSeverity {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EventSeverity> for u8 {
    fn from(severity: EventSeverity) -> Self {
        severity.0
    }
}

/// An event near a location that may slow or block traffic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobilityEvent {
    /// Event identifier
    pub id: String,
    /// Short title
    pub title: String,
    /// Category such as `road_closure`, `concert`, `protest`, `sports`
    pub category: String,
    /// Where the event takes place
    #[serde(flatten)]
    pub location: GeoLocation,
    /// Start of the event
    pub starts_at: DateTime<Utc>,
    /// End of the event
    pub ends_at: DateTime<Utc>,
    /// Optional free-text details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Impact level
    #[serde(default)]
    pub severity: EventSeverity,
}

impl MobilityEvent {
    /// Whether the event is running at `now`
    #[must_use]
    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now && now <= self.ends_at
    }

    /// Whether the event is running or starts within `horizon` of `now`
    ///
    /// Events that already ended are never active.
    #[must_use]
    pub fn is_active_or_upcoming(&self, now: DateTime<Utc>, horizon: Duration) -> bool {
        self.is_ongoing(now) || (self.starts_at > now && self.starts_at - now <= horizon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(starts_in_hours: i64, lasts_hours: i64) -> MobilityEvent {
        let now = Utc::now();
        MobilityEvent {
            id: "e1".to_string(),
            title: "Match".to_string(),
            category: "sports".to_string(),
            location: GeoLocation::bangalore_center(),
            starts_at: now + Duration::hours(starts_in_hours),
            ends_at: now + Duration::hours(starts_in_hours + lasts_hours),
            description: None,
            severity: EventSeverity::new(4).unwrap(),
        }
    }

    #[test]
    fn test_severity_bounds() {
        assert!(EventSeverity::new(0).is_err());
        assert!(EventSeverity::new(6).is_err());
        assert_eq!(EventSeverity::new(5).unwrap().level(), 5);
        assert_eq!(EventSeverity::default().level(), 1);
    }

    #[test]
    fn test_ongoing_event() {
        let e = event(-1, 5);
        assert!(e.is_ongoing(Utc::now()));
        assert!(e.is_active_or_upcoming(Utc::now(), Duration::hours(3)));
    }

    #[test]
    fn test_upcoming_within_horizon() {
        let e = event(2, 4);
        let now = Utc::now();
        assert!(!e.is_ongoing(now));
        assert!(e.is_active_or_upcoming(now, Duration::hours(3)));
    }

    #[test]
    fn test_far_future_event_is_not_active() {
        let e = event(10, 2);
        assert!(!e.is_active_or_upcoming(Utc::now(), Duration::hours(3)));
    }

    #[test]
    fn test_finished_event_is_not_active() {
        let e = event(-6, 2);
        assert!(!e.is_active_or_upcoming(Utc::now(), Duration::hours(3)));
    }

    #[test]
    fn test_severity_serializes_as_number() {
        let json = serde_json::to_value(event(0, 1)).unwrap();
        assert_eq!(json["severity"], 4);
        assert!(json.get("lat").is_some());
    }
}
