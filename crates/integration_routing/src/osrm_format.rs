//! OSRM-style route response schema
//!
//! OSRM, Mapbox Directions and MapMyIndia `route_adv` all answer with the same
//! `code` / `routes[] / legs[] / steps[]` shape, so they share one decoder.

use domain::{GeoLocation, ProviderId, RouteResult, RouteStep};
use serde::Deserialize;
use serde_json::Value;

use crate::error::RoutingError;

/// Success code reported by OSRM-compatible services
const CODE_OK: &str = "Ok";

#[derive(Debug, Deserialize)]
pub(crate) struct RouteResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Route {
    /// Encoded polyline string; GeoJSON objects are ignored
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Leg {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Step {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub maneuver: Maneuver,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Maneuver {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub modifier: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
    /// `[lon, lat]`
    #[serde(default)]
    pub location: Vec<f64>,
}

impl RouteResponse {
    /// Normalize the first route of the response
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::NoRoute` when the service reports a non-`Ok`
    /// code or no routes at all.
    pub fn into_route(self, provider: ProviderId) -> Result<RouteResult, RoutingError> {
        if let Some(code) = self.code.as_deref()
            && code != CODE_OK
        {
            let detail = self.message.unwrap_or_else(|| code.to_string());
            return Err(RoutingError::NoRoute(format!("{code}: {detail}")));
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::NoRoute("no routes returned".to_string()))?;

        let distance = route
            .distance
            .unwrap_or_else(|| route.legs.iter().map(|l| l.distance).sum());
        let duration = route
            .duration
            .unwrap_or_else(|| route.legs.iter().map(|l| l.duration).sum());

        let geometry = match route.geometry {
            Some(Value::String(encoded)) => encoded,
            _ => String::new(),
        };

        let steps = route
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(Step::into_route_step)
            .collect();

        Ok(RouteResult::new(provider, geometry, distance, duration, steps))
    }
}

impl Step {
    fn into_route_step(self) -> RouteStep {
        let instruction = self
            .maneuver
            .instruction
            .clone()
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| {
                describe_maneuver(
                    &self.maneuver.kind,
                    self.maneuver.modifier.as_deref(),
                    &self.name,
                )
            });

        let location = match self.maneuver.location.as_slice() {
            [lon, lat] => GeoLocation::new(*lat, *lon).ok(),
            _ => None,
        };

        let mut step = RouteStep::new(instruction, self.distance, self.duration)
            .with_road_name(self.name);
        if let Some(location) = location {
            step = step.with_location(location);
        }
        step
    }
}

/// Build a readable instruction from a maneuver type and modifier
fn describe_maneuver(kind: &str, modifier: Option<&str>, road: &str) -> String {
    let onto = if road.is_empty() {
        String::new()
    } else {
        format!(" onto {road}")
    };

    match (kind, modifier) {
        ("depart", _) => {
            if road.is_empty() {
                "Depart".to_string()
            } else {
                format!("Depart on {road}")
            }
        },
        ("arrive", _) => "Arrive at destination".to_string(),
        ("turn" | "end of road" | "fork", Some(m)) => format!("Turn {m}{onto}"),
        ("continue" | "new name", _) => format!("Continue{onto}"),
        ("roundabout" | "rotary", _) => {
            format!("Enter the roundabout{}", onto.replace(" onto ", " toward "))
        },
        ("merge", _) => format!("Merge{onto}"),
        ("on ramp", _) => format!("Take the ramp{onto}"),
        ("off ramp", _) => format!("Take the exit{onto}"),
        ("", _) => format!("Continue{onto}"),
        (other, Some(m)) => format!("{} {m}{onto}", capitalize(other)),
        (other, None) => format!("{}{onto}", capitalize(other)),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
