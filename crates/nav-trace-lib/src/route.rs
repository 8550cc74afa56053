//! Route aggregate built from a routing-API response
//!
//! A [`Route`] is a path of route points enriched with legs, stops and
//! turn-by-turn instructions. Legs come either from encoded polylines or from
//! literal point lists; stops are resolved against the flattened point list;
//! instruction parsing degrades to an empty list instead of failing the route.

use crate::path::Path;
use crate::point::{Coordinates, RoutePoint};
use crate::{ParseError, Result, polyline};
use serde::Deserialize;

/// One route element of a routing response, as deserialized from JSON.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSource {
    #[serde(default)]
    pub legs: Vec<LegSource>,
    /// Kept weakly typed so a malformed guidance block degrades instead of
    /// failing the whole document.
    #[serde(default)]
    pub guidance: Option<serde_json::Value>,
}

/// One leg of a route source: either an encoded polyline or literal points.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegSource {
    #[serde(default)]
    pub encoded_polyline: Option<String>,
    #[serde(default)]
    pub encoded_polyline_precision: Option<u32>,
    #[serde(default)]
    pub points: Vec<PointSource>,
    #[serde(default)]
    pub summary: Summary,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PointSource {
    pub latitude: f64,
    pub longitude: f64,
}

/// Summary metadata of a route or leg.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub length_in_meters: Option<f64>,
    #[serde(default)]
    pub traffic_delay_in_seconds: Option<f64>,
    #[serde(default)]
    pub traffic_length_in_meters: Option<f64>,
    #[serde(default)]
    pub travel_time_in_seconds: Option<f64>,
    #[serde(default)]
    pub remaining_charge_at_arrival_ink_wh: Option<f64>,
    #[serde(default)]
    pub total_charging_time_in_seconds: Option<f64>,
    /// Present when the leg ends at a charging session.
    #[serde(default)]
    pub charging_information_at_end_of_leg: Option<serde_json::Value>,
}

/// One routable segment of a route, with its own points and summary.
#[derive(Clone, Debug)]
pub struct RouteLeg {
    pub summary: Summary,
    pub points: Vec<Coordinates>,
}

/// Origin, destination or intermediate waypoint along a route.
#[derive(Clone, Debug)]
pub struct RouteStop {
    pub coordinates: Coordinates,
    /// Index into the flattened route point list.
    pub index: usize,
    pub name: Option<String>,
    pub is_charging_stop: bool,
}

/// A guidance maneuver along a route.
#[derive(Clone, Debug)]
pub struct RouteInstruction {
    pub point: Coordinates,
    pub instruction: String,
}

/// A path of route points enriched with legs, stops and instructions.
#[derive(Clone, Debug)]
pub struct Route {
    path: Path<RoutePoint>,
    pub legs: Vec<RouteLeg>,
    pub stops: Vec<RouteStop>,
    pub instructions: Vec<RouteInstruction>,
}

impl Route {
    /// Build a route from a deserialized source element.
    ///
    /// # Errors
    /// Fails on polyline decode errors, out-of-range coordinates in leg data,
    /// or a source without any leg points. Instruction errors do not fail the
    /// route; they degrade to an empty instruction list.
    pub fn from_source(source: &RouteSource, name: String) -> Result<Self> {
        let legs = legs_from_source(source)?;
        let points = points_from_legs(&legs);
        let stops = stops_from_legs(&legs, &points)?;
        let instructions = instructions_from_source(source);

        Ok(Self {
            path: Path::new(points, name),
            legs,
            stops,
            instructions,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.path.name()
    }

    #[inline]
    pub fn points(&self) -> &[RoutePoint] {
        self.path.points()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

fn legs_from_source(source: &RouteSource) -> Result<Vec<RouteLeg>> {
    let encoded = source
        .legs
        .first()
        .is_some_and(|leg| leg.encoded_polyline.is_some());

    source
        .legs
        .iter()
        .map(|leg| {
            let points = if encoded {
                polyline::decode(
                    leg.encoded_polyline.as_deref().unwrap_or_default(),
                    leg.encoded_polyline_precision.unwrap_or(5),
                )?
            } else {
                leg.points
                    .iter()
                    .map(|p| Coordinates::new(p.latitude, p.longitude))
                    .collect::<Result<Vec<_>>>()?
            };
            Ok(RouteLeg {
                summary: leg.summary.clone(),
                points,
            })
        })
        .collect()
}

/// Flatten leg points into one sequence. Consecutive legs share their boundary
/// point, so every leg after the first drops its first point.
fn points_from_legs(legs: &[RouteLeg]) -> Vec<RoutePoint> {
    legs.iter()
        .enumerate()
        .flat_map(|(index, leg)| {
            let skip = if index == 0 { 0 } else { 1 };
            leg.points.iter().skip(skip)
        })
        .map(|c| RoutePoint::bare(*c))
        .collect()
}

fn stops_from_legs(legs: &[RouteLeg], points: &[RoutePoint]) -> Result<Vec<RouteStop>> {
    let first_point = legs
        .first()
        .and_then(|leg| leg.points.first())
        .ok_or_else(|| ParseError::InvalidRoute("route has no points".into()))?;
    let last_point = legs
        .last()
        .and_then(|leg| leg.points.last())
        .ok_or_else(|| ParseError::InvalidRoute("route has no points".into()))?;

    let origin = RouteStop {
        coordinates: *first_point,
        index: 0,
        name: Some("Origin".into()),
        is_charging_stop: false,
    };
    let destination = RouteStop {
        coordinates: *last_point,
        index: points.len().saturating_sub(1),
        name: Some("Destination".into()),
        is_charging_stop: false,
    };

    let mut stops = vec![origin];
    stops.extend(intermediate_stops(legs, points)?);
    stops.push(destination);
    Ok(stops)
}

/// Waypoints are the end points of every leg but the last; their index is
/// resolved by scanning forward through the flattened point list.
fn intermediate_stops(legs: &[RouteLeg], points: &[RoutePoint]) -> Result<Vec<RouteStop>> {
    let mut index = 0;
    let mut stops = Vec::new();

    for leg in &legs[..legs.len().saturating_sub(1)] {
        let point = leg
            .points
            .last()
            .ok_or_else(|| ParseError::InvalidRoute("leg has no points".into()))?;
        while index < points.len() && points[index].coordinates != *point {
            index += 1;
        }
        stops.push(RouteStop {
            coordinates: *point,
            index,
            name: Some("waypoint".into()),
            is_charging_stop: leg.summary.charging_information_at_end_of_leg.is_some(),
        });
    }

    Ok(stops)
}

/// Extract guidance instructions; any failure degrades to an empty list.
fn instructions_from_source(source: &RouteSource) -> Vec<RouteInstruction> {
    match try_instructions(source) {
        Ok(instructions) => instructions,
        Err(error) => {
            tracing::warn!("Error parsing instructions from source: {error}");
            Vec::new()
        }
    }
}

fn try_instructions(source: &RouteSource) -> std::result::Result<Vec<RouteInstruction>, String> {
    let Some(guidance) = &source.guidance else {
        return Ok(Vec::new());
    };
    let instructions = guidance
        .get("instructions")
        .and_then(|v| v.as_array())
        .ok_or("guidance has no instructions array")?;

    instructions
        .iter()
        .map(|instruction| {
            let maneuver = instruction
                .get("maneuver")
                .and_then(|v| v.as_str())
                .ok_or("instruction has no maneuver")?;
            let maneuver_point = instruction
                .get("maneuverPoint")
                .ok_or("instruction has no maneuverPoint")?;
            let latitude = maneuver_point
                .get("latitude")
                .and_then(|v| v.as_f64())
                .ok_or("maneuverPoint has no latitude")?;
            let longitude = maneuver_point
                .get("longitude")
                .and_then(|v| v.as_f64())
                .ok_or("maneuverPoint has no longitude")?;
            let point = Coordinates::new(latitude, longitude).map_err(|e| e.to_string())?;
            Ok(RouteInstruction {
                point,
                instruction: maneuver.to_string(),
            })
        })
        .collect()
}
