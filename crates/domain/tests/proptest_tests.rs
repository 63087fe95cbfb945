//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use chrono::{Duration, TimeZone, Utc};
use domain::{EventSeverity, GeoLocation, MobilityEvent, ProviderId, RouteResult, TravelMode};
use proptest::prelude::*;

// ============================================================================
// GeoLocation Property Tests
// ============================================================================

mod geo_location_tests {
    use super::*;

    proptest! {
        #[test]
        fn serde_accepts_valid_coordinates(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let json = format!(r#"{{"lat": {lat}, "lon": {lon}}}"#);
            let loc: GeoLocation = serde_json::from_str(&json).unwrap();
            prop_assert!((loc.latitude() - lat).abs() < 1e-9);
            prop_assert!((loc.longitude() - lon).abs() < 1e-9);
        }

        #[test]
        fn serde_rejects_out_of_range_latitude(
            lat in prop_oneof![(-1000.0f64..-90.1f64), (90.1f64..1000.0f64)],
            lon in -180.0f64..=180.0f64
        ) {
            let json = format!(r#"{{"lat": {lat}, "lon": {lon}}}"#);
            prop_assert!(serde_json::from_str::<GeoLocation>(&json).is_err());
        }

        #[test]
        fn serde_rejects_out_of_range_longitude(
            lat in -90.0f64..=90.0f64,
            lon in prop_oneof![(-1000.0f64..-180.1f64), (180.1f64..1000.0f64)]
        ) {
            let json = format!(r#"{{"lat": {lat}, "lon": {lon}}}"#);
            prop_assert!(serde_json::from_str::<GeoLocation>(&json).is_err());
        }

        #[test]
        fn coordinate_pairs_keep_provider_order(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let loc = GeoLocation::new(lat, lon).unwrap();
            prop_assert_eq!(loc.lon_lat_pair(), format!("{lon},{lat}"));
            prop_assert_eq!(loc.lat_lon_pair(), format!("{lat},{lon}"));
        }
    }
}

// ============================================================================
// TravelMode / ProviderId Property Tests
// ============================================================================

mod identifier_tests {
    use super::*;

    fn vary_case(name: &str, upper: bool, padded: bool) -> String {
        let name = if upper {
            name.to_uppercase()
        } else {
            name.to_string()
        };
        if padded { format!("  {name} ") } else { name }
    }

    proptest! {
        #[test]
        fn travel_mode_parses_its_display_in_any_case(
            mode in prop::sample::select(TravelMode::all().to_vec()),
            upper in any::<bool>(),
            padded in any::<bool>()
        ) {
            let input = vary_case(&mode.to_string(), upper, padded);
            prop_assert_eq!(input.parse::<TravelMode>().unwrap(), mode);
        }

        #[test]
        fn provider_parses_its_display_in_any_case(
            provider in prop::sample::select(ProviderId::ALL.to_vec()),
            upper in any::<bool>(),
            padded in any::<bool>()
        ) {
            let input = vary_case(&provider.to_string(), upper, padded);
            prop_assert_eq!(input.parse::<ProviderId>().unwrap(), provider);
        }

        #[test]
        fn unknown_provider_names_are_rejected(name in "[a-z]{1,12}") {
            prop_assume!(ProviderId::ALL.iter().all(|p| p.as_str() != name));
            prop_assert!(name.parse::<ProviderId>().is_err());
        }
    }
}

// ============================================================================
// RouteResult / MobilityEvent Property Tests
// ============================================================================

mod result_tests {
    use super::*;

    proptest! {
        #[test]
        fn route_figures_are_never_negative(
            distance in -1.0e7f64..1.0e7f64,
            duration in -1.0e6f64..1.0e6f64
        ) {
            let route =
                RouteResult::new(ProviderId::Osrm, String::new(), distance, duration, vec![]);
            prop_assert!(route.distance_meters >= 0.0);
            prop_assert!(route.duration_seconds >= 0.0);
        }

        #[test]
        fn severity_accepts_only_one_to_five(level in any::<u8>()) {
            prop_assert_eq!(EventSeverity::new(level).is_ok(), (1..=5).contains(&level));
        }

        #[test]
        fn finished_events_are_never_active(
            ended_minutes_ago in 1i64..10_000,
            lasted_minutes in 0i64..10_000,
            horizon_hours in 0i64..48
        ) {
            let now = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
            let ends_at = now - Duration::minutes(ended_minutes_ago);
            let event = MobilityEvent {
                id: "e".to_string(),
                title: "Closed lane".to_string(),
                category: "road_closure".to_string(),
                location: GeoLocation::bangalore_center(),
                starts_at: ends_at - Duration::minutes(lasted_minutes),
                ends_at,
                description: None,
                severity: EventSeverity::default(),
            };
            let horizon = Duration::hours(horizon_hours);
            prop_assert!(!event.is_active_or_upcoming(now, horizon));
        }
    }
}
