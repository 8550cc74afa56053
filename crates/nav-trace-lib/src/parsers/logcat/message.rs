//! Tag-routed telemetry extraction (stage 2)
//!
//! A fixed registry maps supported tag substrings to regex extractors. Tag
//! matching is substring containment, not equality, because real tags look
//! like `com.tomtom.MapMatcher.impl`. An entry whose tag matches nothing, or
//! whose message does not match its extractor, is dropped without error.

use super::entry::LogcatEntry;
use crate::point::ExtraMap;
use regex::Regex;
use std::sync::LazyLock;

/// Coordinates plus tag-specific extra attributes pulled from one message.
#[derive(Clone, Debug, PartialEq)]
pub struct LogcatMessage {
    pub latitude: f64,
    pub longitude: f64,
    pub extra: ExtraMap,
}

type Extractor = fn(&str) -> Option<LogcatMessage>;

/// Registration order matters: the first tag contained in the entry's tag wins.
/// The two navigation-related tags share one extractor.
const SUPPORTED_TAGS: &[(&str, Extractor)] = &[
    ("MapMatcher", extract_map_matcher),
    ("TomTomNavigation", extract_navigation),
    ("DistanceAlongRouteCalculator", extract_navigation),
    ("RoutePlanner", extract_route_planner),
];

/// Route an entry to its tag's extractor, if any.
pub fn parse(entry: &LogcatEntry) -> Option<LogcatMessage> {
    let (_, extractor) = SUPPORTED_TAGS
        .iter()
        .find(|(tag, _)| entry.tag.contains(tag))?;
    extractor(&entry.message)
}

// e.g.:
// MatchLocation result: lat: 35.69364400, lon: 139.77488353, arc_key: 2011983134088262593, on road: true, route_id: 6903
static MAP_MATCHER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"MatchLocation result.*lat:\s*([-\d.]+),\s*lon:\s*([-\d.]+).*on road:\s(true|false)(?:,.*route_id:\s(\d.*))?",
    )
    .unwrap()
});

fn extract_map_matcher(message: &str) -> Option<LogcatMessage> {
    let captures = MAP_MATCHER.captures(message)?;
    let mut extra = ExtraMap::new();
    extra.insert("on road".into(), captures[3].to_string());
    if let Some(route_id) = captures.get(4) {
        extra.insert("matched route ID".into(), route_id.as_str().to_string());
    }
    Some(LogcatMessage {
        latitude: captures[1].parse().ok()?,
        longitude: captures[2].parse().ok()?,
        extra,
    })
}

// e.g.:
// RouteProgress(... currentLocation=GeoPoint(latitude=52.1, longitude=4.1) ... distanceAlongRoute=2069.239953 m ...)
static NAVIGATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"latitude=(-?\d+\.\d+).*?longitude=(-?\d+\.\d+).*?distanceAlongRoute\s+(\d+\.\d+)\s+m")
        .unwrap()
});

fn extract_navigation(message: &str) -> Option<LogcatMessage> {
    let captures = NAVIGATION.captures(message)?;
    let mut extra = ExtraMap::new();
    extra.insert("distanceAlongRoute".into(), captures[3].to_string());
    Some(LogcatMessage {
        latitude: captures[1].parse().ok()?,
        longitude: captures[2].parse().ok()?,
        extra,
    })
}

// e.g.:
// Planning route with: RoutePlanningOptions(itinerary=Itinerary(origin=ItineraryPoint(... coordinate=GeoPoint(latitude=.., longitude=..)), destination=ItineraryPoint(...)))
static ROUTE_PLANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"origin=ItineraryPoint\(.*?coordinate=GeoPoint\(latitude=([-\d.]+),\s*longitude=([-\d.]+)\).*?destination=ItineraryPoint\(.*?coordinate=GeoPoint\(latitude=([-\d.]+),\s*longitude=([-\d.]+)\)",
    )
    .unwrap()
});

fn extract_route_planner(message: &str) -> Option<LogcatMessage> {
    let captures = ROUTE_PLANNER.captures(message)?;
    let mut extra = ExtraMap::new();
    extra.insert(
        "planning origin".into(),
        format!("{}, {}", &captures[1], &captures[2]),
    );
    extra.insert(
        "planning destination".into(),
        format!("{}, {}", &captures[3], &captures[4]),
    );
    // The origin stands in as this entry's map location
    Some(LogcatMessage {
        latitude: captures[1].parse().ok()?,
        longitude: captures[2].parse().ok()?,
        extra,
    })
}
