//! Validated geographic value objects
//!
//! This module provides the `Coordinates` primitive and the typed point variants
//! built atop it. All of them are immutable after construction; parsers are the
//! only producers.

use crate::{ParseError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// A validated geographic position (WGS84 degrees).
///
/// Constructing out-of-range values fails; equality is structural.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair.
    ///
    /// # Errors
    /// Returns [`ParseError::InvalidLatitude`] / [`ParseError::InvalidLongitude`]
    /// when the values fall outside [-90, 90] / [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ParseError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ParseError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Convert to a `geo::Point` (x = longitude, y = latitude) for rendering consumers.
    #[inline]
    pub fn to_point(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Anything that sits on the map at a single coordinate.
///
/// Lets [`crate::Path`] stay generic over the concrete point variant.
pub trait PointLike {
    fn coordinates(&self) -> Coordinates;
}

impl PointLike for Coordinates {
    #[inline]
    fn coordinates(&self) -> Coordinates {
        *self
    }
}

/// A point along a route, with optional telemetry.
///
/// Raw route polylines carry none of the optional fields; TTP and log points
/// populate them.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePoint {
    pub coordinates: Coordinates,
    pub speed: Option<f64>,
    pub timestamp: Option<f64>,
    pub heading: Option<f64>,
}

impl RoutePoint {
    /// A route point with no telemetry attached.
    pub fn bare(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            speed: None,
            timestamp: None,
            heading: None,
        }
    }
}

impl PointLike for RoutePoint {
    #[inline]
    fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}

/// Whether a TTP record was captured before or after map-matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TtpDirection {
    /// Input to the map-matching algorithm (record code 245).
    Incoming,
    /// Output of the map-matching algorithm (record code 237).
    Outgoing,
}

impl TtpDirection {
    /// The type discriminator used in TTP data lines.
    #[inline]
    pub fn record_code(&self) -> &'static str {
        match self {
            TtpDirection::Incoming => "245",
            TtpDirection::Outgoing => "237",
        }
    }
}

impl fmt::Display for TtpDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtpDirection::Incoming => write!(f, "incoming"),
            TtpDirection::Outgoing => write!(f, "outgoing"),
        }
    }
}

/// A point parsed from a TTP positioning log.
#[derive(Clone, Debug, PartialEq)]
pub struct TtpPoint {
    pub direction: TtpDirection,
    pub coordinates: Coordinates,
    pub speed: Option<f64>,
    pub timestamp: Option<f64>,
    pub heading: Option<f64>,
}

impl PointLike for TtpPoint {
    #[inline]
    fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}

/// Severity of a logcat entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Verbose,
}

impl LogLevel {
    /// Map a raw level token to a log level.
    ///
    /// Single letters come from the Android logcat formats, full words from the
    /// bracketed-thread format. An unrecognized token is a per-line failure the
    /// caller is expected to recover from.
    pub fn from_token(token: &str) -> std::result::Result<Self, String> {
        match token {
            "I" | "INFO" => Ok(LogLevel::Info),
            "W" | "WARN" => Ok(LogLevel::Warn),
            "E" | "ERROR" => Ok(LogLevel::Error),
            "D" | "DEBUG" => Ok(LogLevel::Debug),
            "T" | "TRACE" => Ok(LogLevel::Trace),
            "V" | "VERBOSE" => Ok(LogLevel::Verbose),
            other => Err(format!("Unknown log level: {other}")),
        }
    }
}

/// Per-tag telemetry attributes extracted from a log message.
pub type ExtraMap = BTreeMap<String, String>;

/// A point extracted from a device log line.
#[derive(Clone, Debug, PartialEq)]
pub struct LogPoint {
    pub coordinates: Coordinates,
    pub level: LogLevel,
    /// The originating log tag, verbatim.
    pub tag: String,
    /// Zero-based line number in the source text.
    pub line: usize,
    pub extra: ExtraMap,
    pub timestamp: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
}

impl PointLike for LogPoint {
    #[inline]
    fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}
