//! Local route synthesis
//!
//! Computes a complete route answer without any remote provider: a corridor
//! sketch (waypoints, reason, junctions), an event impact factor, straight-line
//! estimates, and turn-like steps through the junctions.

use domain::{GeoLocation, RouteStep, TravelMode};

use crate::services::gazetteer::{Junction, find_junction, normalize};

/// A known corridor between two localities
#[derive(Debug, Clone, Copy)]
pub struct CorridorRule {
    /// Substring the normalized source must contain
    pub source: &'static str,
    /// Substring the normalized destination must contain
    pub destination: &'static str,
    /// Event keywords required for this rule (empty means any event)
    pub event_keywords: &'static [&'static str],
    /// Intermediate waypoint names
    pub via: &'static [&'static str],
    /// Junctions the synthetic path passes through
    pub junctions: &'static [&'static str],
    /// Explanation of the route choice
    pub reason: &'static str,
}

impl CorridorRule {
    /// Whether the rule applies to normalized inputs
    #[must_use]
    pub fn matches(&self, source: &str, destination: &str, event: &str) -> bool {
        source.contains(self.source)
            && destination.contains(self.destination)
            && (self.event_keywords.is_empty()
                || self.event_keywords.iter().any(|k| event.contains(k)))
    }
}

/// Corridor rules, first match wins
pub const CORRIDOR_RULES: &[CorridorRule] = &[
    CorridorRule {
        source: "btm",
        destination: "mg road",
        event_keywords: &["rally", "protest", "lalbagh"],
        via: &["Dairy Circle", "Richmond Road"],
        junctions: &["Dairy Circle", "Richmond Circle"],
        reason: "Avoiding rally congestion near Lalbagh via Dairy Circle",
    },
    CorridorRule {
        source: "btm",
        destination: "mg road",
        event_keywords: &[],
        via: &["Richmond Road"],
        junctions: &["Richmond Circle"],
        reason: "Optimal route via Richmond Circle",
    },
    CorridorRule {
        source: "btm",
        destination: "koramangala",
        event_keywords: &[],
        via: &["Sony World Junction"],
        junctions: &["Sony World"],
        reason: "Direct route via Sony World Junction",
    },
    CorridorRule {
        source: "whitefield",
        destination: "mg road",
        event_keywords: &[],
        via: &["Tin Factory", "Indiranagar"],
        junctions: &["Tin Factory"],
        reason: "Standard route via Tin Factory and Old Madras Road",
    },
    CorridorRule {
        source: "electronic city",
        destination: "mg road",
        event_keywords: &[],
        via: &["Silk Board", "Dairy Circle"],
        junctions: &["Silk Board", "Dairy Circle"],
        reason: "Route via Silk Board and Dairy Circle",
    },
];

/// Event categories with a known traffic impact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactKind {
    /// Rallies, protests, parades
    Protest,
    /// Closures, accidents, construction
    Closure,
    /// Concerts, matches, large gatherings
    Congestion,
}

/// How an event category stretches a route
#[derive(Debug, Clone, Copy)]
pub struct EventImpactRule {
    /// Category
    pub kind: ImpactKind,
    /// Keywords looked for in the normalized event text
    pub keywords: &'static [&'static str],
    /// Distance and duration multiplier
    pub factor: f64,
    /// Short reason, `{event}` is replaced with the lower-cased event
    pub reason_template: &'static str,
    /// Longer explanation of the assumption
    pub explanation: &'static str,
}

/// Event impact rules, first match wins
pub const EVENT_IMPACT_RULES: &[EventImpactRule] = &[
    EventImpactRule {
        kind: ImpactKind::Protest,
        keywords: &["rally", "protest", "parade", "political"],
        factor: 1.2,
        reason_template: "Avoiding {event} congestion",
        explanation: "Protests and rallies can slow traffic and partially block streets, \
                      so we assume around 20% extra distance and time.",
    },
    EventImpactRule {
        kind: ImpactKind::Closure,
        keywords: &["closure", "accident", "construction"],
        factor: 1.3,
        reason_template: "Detouring around {event}",
        explanation: "Road closures typically force a detour around the blocked segment, \
                      so we assume about 30% extra distance and time.",
    },
    EventImpactRule {
        kind: ImpactKind::Congestion,
        keywords: &["concert", "sports", "event"],
        factor: 1.15,
        reason_template: "Avoiding {event} traffic",
        explanation: "Large events create localized congestion near the venue, so we \
                      assume a 15% increase in distance and travel time for a smarter route.",
    },
];

/// Multiplier for events no rule recognizes
pub const UNKNOWN_EVENT_FACTOR: f64 = 1.05;

const UNKNOWN_EVENT_EXPLANATION: &str = "Unknown event type. We apply a small 5% buffer as a \
                                         conservative detour estimate while keeping the route \
                                         close to the base plan.";

const NO_EVENT_EXPLANATION: &str = "No event given, so the route matches the base plan.";

/// Impact of an event on a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventImpact {
    /// Distance and duration multiplier (1.0 for no event)
    pub factor: f64,
    /// Matching rule, if the event was recognized
    pub rule: Option<&'static EventImpactRule>,
}

impl PartialEq for EventImpactRule {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl EventImpact {
    /// No event
    #[must_use]
    pub const fn none() -> Self {
        Self {
            factor: 1.0,
            rule: None,
        }
    }

    /// Short reason for a recognized event
    #[must_use]
    pub fn reason(&self, event: &str) -> Option<String> {
        self.rule
            .map(|r| r.reason_template.replace("{event}", &normalize(event)))
    }

    /// Longer explanation of the applied factor
    #[must_use]
    pub fn explanation(&self) -> &'static str {
        match self.rule {
            Some(rule) => rule.explanation,
            None if self.factor > 1.0 => UNKNOWN_EVENT_EXPLANATION,
            None => NO_EVENT_EXPLANATION,
        }
    }
}

/// Waypoint narrative for a route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSketch {
    /// `[source, via.., destination]`
    pub waypoint_names: Vec<String>,
    /// Why this route was chosen
    pub reason: String,
    /// Junctions the path passes through, in order
    pub intermediate: Vec<Junction>,
}

/// Straight-line route estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEstimate {
    /// Distance in meters
    pub distance_meters: f64,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// CO₂ emissions in kg
    pub co2_kg: f64,
}

/// Average speed for a travel mode in meters per second
#[must_use]
pub const fn speed_mps(mode: TravelMode) -> f64 {
    match mode {
        TravelMode::Walk => 1.4,
        TravelMode::Bike => 4.1,
        TravelMode::Transit => 8.3,
        TravelMode::Car => 13.9,
    }
}

/// CO₂ emissions for a distance, rounded to grams
#[must_use]
pub fn co2_kg(distance_meters: f64, mode: TravelMode) -> f64 {
    let kg_per_km = match mode {
        TravelMode::Walk | TravelMode::Bike => return 0.0,
        TravelMode::Transit => 0.08,
        TravelMode::Car => 0.18,
    };
    round_to(distance_meters / 1000.0 * kg_per_km, 3)
}

/// Round to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Local route synthesis
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteSynthesizer;

impl RouteSynthesizer {
    /// Waypoints, reason and junctions between two named places
    #[must_use]
    pub fn sketch(source: &str, destination: &str, event: &str) -> RouteSketch {
        let source_norm = normalize(source);
        let destination_norm = normalize(destination);
        let event_norm = normalize(event);

        let mut waypoint_names = vec![source.to_string()];

        let (reason, intermediate) = match CORRIDOR_RULES
            .iter()
            .find(|r| r.matches(&source_norm, &destination_norm, &event_norm))
        {
            Some(rule) => {
                waypoint_names.extend(rule.via.iter().map(ToString::to_string));
                let junctions = rule
                    .junctions
                    .iter()
                    .filter_map(|name| find_junction(name).copied())
                    .collect();
                (rule.reason.to_string(), junctions)
            },
            None if !event_norm.is_empty() => {
                waypoint_names.push("Alternate Connection".to_string());
                (
                    format!("Avoiding {} by taking alternate route", event.trim()),
                    Vec::new(),
                )
            },
            None => {
                waypoint_names.push("Direct Connection".to_string());
                ("Standard route recommendation".to_string(), Vec::new())
            },
        };

        waypoint_names.push(destination.to_string());

        RouteSketch {
            waypoint_names,
            reason,
            intermediate,
        }
    }

    /// Impact factor of an event description
    #[must_use]
    pub fn event_impact(event: &str) -> EventImpact {
        let event = normalize(event);
        if event.is_empty() {
            return EventImpact::none();
        }

        EVENT_IMPACT_RULES
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| event.contains(k)))
            .map_or(
                EventImpact {
                    factor: UNKNOWN_EVENT_FACTOR,
                    rule: None,
                },
                |rule| EventImpact {
                    factor: rule.factor,
                    rule: Some(rule),
                },
            )
    }

    /// Straight-line estimate stretched by the event impact
    #[must_use]
    pub fn estimate(
        origin: GeoLocation,
        destination: GeoLocation,
        mode: TravelMode,
        impact: &EventImpact,
    ) -> RouteEstimate {
        let distance_meters = origin.distance_meters(&destination) * impact.factor;
        let duration_seconds = distance_meters / speed_mps(mode);
        RouteEstimate {
            distance_meters,
            duration_seconds,
            co2_kg: co2_kg(distance_meters, mode),
        }
    }

    /// Turn-like steps through the sketch's junctions
    #[must_use]
    pub fn synthetic_steps(
        origin: GeoLocation,
        destination: GeoLocation,
        sketch: &RouteSketch,
    ) -> Vec<RouteStep> {
        let first = sketch.waypoint_names.first().map_or("", String::as_str);
        let last = sketch.waypoint_names.last().map_or("", String::as_str);

        let mut steps = Vec::with_capacity(sketch.intermediate.len() + 2);
        steps.push(RouteStep::new(format!("Start from {first}"), 0.0, 0.0).with_location(origin));
        steps.extend(sketch.intermediate.iter().map(|j| {
            RouteStep::new(format!("Head toward {}", j.display), 500.0, 60.0)
                .with_location(j.location)
        }));
        steps.push(
            RouteStep::new(format!("Arrive at {last}"), 200.0, 30.0).with_location(destination),
        );
        steps
    }

    /// `[lat, lon]` polyline through the sketch's junctions
    #[must_use]
    pub fn synthetic_geometry(
        origin: GeoLocation,
        destination: GeoLocation,
        sketch: &RouteSketch,
    ) -> Vec<[f64; 2]> {
        std::iter::once(origin)
            .chain(sketch.intermediate.iter().map(|j| j.location))
            .chain(std::iter::once(destination))
            .map(|p| [p.latitude(), p.longitude()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn btm() -> GeoLocation {
        GeoLocation::new(12.9166, 77.6101).unwrap()
    }

    fn mg_road() -> GeoLocation {
        GeoLocation::new(12.9716, 77.5946).unwrap()
    }

    #[test]
    fn btm_to_mg_road_without_event() {
        let sketch = RouteSynthesizer::sketch("BTM Layout", "MG Road", "");
        assert_eq!(
            sketch.waypoint_names,
            vec!["BTM Layout", "Richmond Road", "MG Road"]
        );
        assert!(sketch.reason.contains("Richmond Circle"));
        assert_eq!(sketch.intermediate.len(), 1);
        assert_eq!(sketch.intermediate[0].display, "Richmond Circle");

        let impact = RouteSynthesizer::event_impact("");
        let estimate = RouteSynthesizer::estimate(btm(), mg_road(), TravelMode::Car, &impact);
        let haversine = btm().distance_meters(&mg_road());
        assert!((estimate.distance_meters - haversine).abs() < 1e-9);
        assert!((estimate.duration_seconds - haversine / 13.9).abs() < 1e-9);
    }

    #[test]
    fn btm_to_mg_road_with_rally() {
        let sketch = RouteSynthesizer::sketch("BTM Layout", "MG Road", "Political Rally");
        assert!(sketch.waypoint_names.contains(&"Dairy Circle".to_string()));
        assert_eq!(
            sketch.reason,
            "Avoiding rally congestion near Lalbagh via Dairy Circle"
        );

        let base =
            RouteSynthesizer::estimate(btm(), mg_road(), TravelMode::Car, &EventImpact::none());
        let impact = RouteSynthesizer::event_impact("Political Rally");
        let with_rally = RouteSynthesizer::estimate(btm(), mg_road(), TravelMode::Car, &impact);
        assert!(with_rally.distance_meters > base.distance_meters);
        assert!((with_rally.distance_meters - base.distance_meters * 1.2).abs() < 1e-9);
        assert_eq!(
            impact.reason("Political Rally").as_deref(),
            Some("Avoiding political rally congestion")
        );
    }

    #[test]
    fn corridor_rules_in_order() {
        let sketch = RouteSynthesizer::sketch("BTM Layout", "Koramangala", "");
        assert_eq!(sketch.reason, "Direct route via Sony World Junction");

        let sketch = RouteSynthesizer::sketch("Whitefield", "MG Road", "");
        assert_eq!(
            sketch.waypoint_names,
            vec!["Whitefield", "Tin Factory", "Indiranagar", "MG Road"]
        );

        let sketch = RouteSynthesizer::sketch("Electronic City", "MG Road", "concert");
        assert_eq!(sketch.intermediate.len(), 2);
        assert_eq!(sketch.intermediate[0].name, "Silk Board");
    }

    #[test]
    fn generic_sketch() {
        let sketch = RouteSynthesizer::sketch("Hebbal", "Ulsoor", "");
        assert_eq!(sketch.waypoint_names, vec!["Hebbal", "Direct Connection", "Ulsoor"]);
        assert_eq!(sketch.reason, "Standard route recommendation");
        assert!(sketch.intermediate.is_empty());

        let sketch = RouteSynthesizer::sketch("Hebbal", "Ulsoor", "Marathon");
        assert_eq!(sketch.waypoint_names[1], "Alternate Connection");
        assert_eq!(sketch.reason, "Avoiding Marathon by taking alternate route");
    }

    #[test]
    fn event_impact_factors() {
        let factor = |event: &str| RouteSynthesizer::event_impact(event).factor;
        assert!((factor("Protest march") - 1.2).abs() < f64::EPSILON);
        assert!((factor("road_closure") - 1.3).abs() < f64::EPSILON);
        assert!((factor("Cricket sports day") - 1.15).abs() < f64::EPSILON);
        assert!((factor("flooding") - 1.05).abs() < f64::EPSILON);
        assert!((factor("  ") - 1.0).abs() < f64::EPSILON);

        // Protest keywords are checked before closure keywords
        let impact = RouteSynthesizer::event_impact("rally causes closure");
        assert_eq!(impact.rule.map(|r| r.kind), Some(ImpactKind::Protest));

        let unknown = RouteSynthesizer::event_impact("flooding");
        assert!(unknown.reason("flooding").is_none());
        assert!(unknown.explanation().contains("5%"));
        assert!(EventImpact::none().explanation().contains("No event"));
    }

    #[test]
    fn co2_by_mode() {
        assert!((co2_kg(10_000.0, TravelMode::Car) - 1.8).abs() < f64::EPSILON);
        assert!((co2_kg(10_000.0, TravelMode::Transit) - 0.8).abs() < f64::EPSILON);
        assert!(co2_kg(10_000.0, TravelMode::Walk).abs() < f64::EPSILON);
        assert!(co2_kg(10_000.0, TravelMode::Bike).abs() < f64::EPSILON);
        assert!((co2_kg(1234.0, TravelMode::Car) - 0.222).abs() < f64::EPSILON);
    }

    #[test]
    fn synthetic_steps_and_geometry() {
        let sketch = RouteSynthesizer::sketch("BTM Layout", "MG Road", "rally");
        let steps = RouteSynthesizer::synthetic_steps(btm(), mg_road(), &sketch);

        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].instruction, "Start from BTM Layout");
        assert!(steps[0].distance_meters.abs() < f64::EPSILON);
        assert_eq!(steps[1].instruction, "Head toward Dairy Circle");
        assert!((steps[1].distance_meters - 500.0).abs() < f64::EPSILON);
        assert!((steps[1].duration_seconds - 60.0).abs() < f64::EPSILON);
        assert_eq!(steps[2].instruction, "Head toward Richmond Circle");
        assert_eq!(steps[3].instruction, "Arrive at MG Road");
        assert!((steps[3].distance_meters - 200.0).abs() < f64::EPSILON);

        let geometry = RouteSynthesizer::synthetic_geometry(btm(), mg_road(), &sketch);
        assert_eq!(geometry.len(), 4);
        assert_eq!(geometry[0], [12.9166, 77.6101]);
        assert_eq!(geometry[1], [12.9385, 77.6015]);
        assert_eq!(geometry[3], [12.9716, 77.5946]);
    }

    #[test]
    fn rounding() {
        assert!((round_to(1.23456, 2) - 1.23).abs() < f64::EPSILON);
        assert!((round_to(1.25, 1) - 1.3).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn recognized_events_always_stretch(
            event in "(rally|closure|concert|parade|accident|sports)[a-z ]{0,10}"
        ) {
            let impact = RouteSynthesizer::event_impact(&event);
            prop_assert!(impact.factor > 1.0);
            prop_assert!(impact.rule.is_some());
        }

        #[test]
        fn estimate_scales_with_factor(lat in 12.0f64..14.0, lon in 77.0f64..78.0) {
            let origin = GeoLocation::new(lat, lon).unwrap();
            let destination = mg_road();
            let mode = TravelMode::Car;
            let base = RouteSynthesizer::estimate(origin, destination, mode, &EventImpact::none());
            let impact = RouteSynthesizer::event_impact("construction");
            let stretched = RouteSynthesizer::estimate(origin, destination, mode, &impact);
            prop_assert!((stretched.distance_meters - base.distance_meters * 1.3).abs() < 1e-6);
        }
    }
}
