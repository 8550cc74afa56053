//! Uniform path model produced by the parsers
//!
//! A [`Path`] is an ordered, immutable-after-construction sequence of points of
//! one concrete point type plus a display name. [`PathVariant`] is the tagged
//! union the dispatcher hands to consumers; matching on it replaces runtime
//! type inspection with something the compiler can check exhaustively.

use crate::point::{Coordinates, LogPoint, PointLike, TtpPoint};
use crate::route::Route;
use std::fmt;

/// An ordered sequence of same-typed geographic points plus a display name.
#[derive(Clone, Debug)]
pub struct Path<P> {
    name: String,
    points: Vec<P>,
}

impl<P> Path<P> {
    pub fn new(points: Vec<P>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn points(&self) -> &[P] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }
}

impl<P: PointLike> Path<P> {
    /// Bounding box as (min_lat, min_lon, max_lat, max_lon), `None` when empty.
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.coordinates());
        let first = iter.next()?;
        let mut bbox = (
            first.latitude(),
            first.longitude(),
            first.latitude(),
            first.longitude(),
        );
        for c in iter {
            bbox.0 = bbox.0.min(c.latitude());
            bbox.1 = bbox.1.min(c.longitude());
            bbox.2 = bbox.2.max(c.latitude());
            bbox.3 = bbox.3.max(c.longitude());
        }
        Some(bbox)
    }
}

/// Which format a parsed path came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathKind {
    Route,
    Geo,
    Ttp,
    Log,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKind::Route => write!(f, "Route"),
            PathKind::Geo => write!(f, "Geo"),
            PathKind::Ttp => write!(f, "TTP"),
            PathKind::Log => write!(f, "Log"),
        }
    }
}

/// A parsed path of any supported format.
///
/// One variant per parser, so consumers can route each path to the right map
/// layer with an exhaustive `match`.
#[derive(Clone, Debug)]
pub enum PathVariant {
    Route(Route),
    Geo(Path<Coordinates>),
    Ttp(Path<TtpPoint>),
    Log(Path<LogPoint>),
}

impl PathVariant {
    #[inline]
    pub fn kind(&self) -> PathKind {
        match self {
            PathVariant::Route(_) => PathKind::Route,
            PathVariant::Geo(_) => PathKind::Geo,
            PathVariant::Ttp(_) => PathKind::Ttp,
            PathVariant::Log(_) => PathKind::Log,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PathVariant::Route(route) => route.name(),
            PathVariant::Geo(path) => path.name(),
            PathVariant::Ttp(path) => path.name(),
            PathVariant::Log(path) => path.name(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PathVariant::Route(route) => route.points().len(),
            PathVariant::Geo(path) => path.len(),
            PathVariant::Ttp(path) => path.len(),
            PathVariant::Log(path) => path.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Display-name sequence for parsed paths.
///
/// Owned by the dispatch service and passed into each parser invocation, so
/// naming is deterministic per session instead of hiding behind process-wide
/// counters. Counters are monotonic and never reset.
#[derive(Debug, Default)]
pub struct PathNamer {
    route: usize,
    geo: usize,
    ttp: usize,
    log: usize,
}

impl PathNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_route_name(&mut self) -> String {
        self.route += 1;
        format!("Route {}", self.route)
    }

    /// Geo paths are named after their cardinality: "Point 1" vs "Points 2".
    pub fn next_geo_name(&mut self, point_count: usize) -> String {
        self.geo += 1;
        if point_count == 1 {
            format!("Point {}", self.geo)
        } else {
            format!("Points {}", self.geo)
        }
    }

    pub fn next_ttp_name(&mut self) -> String {
        self.ttp += 1;
        format!("TTP Path {}", self.ttp)
    }

    pub fn next_log_name(&mut self) -> String {
        self.log += 1;
        format!("Log Path {}", self.log)
    }
}
