//! Nav Trace Library - Format Sniffing and Parsing of Navigation Traces
//!
//! This library takes an opaque block of text of unknown origin (pasted or dropped
//! into a map viewer) and determines, without any explicit format declaration, which
//! of several incompatible formats it is, then parses it into a uniform in-memory
//! path model that a rendering layer can consume.
//!
//! # Architecture
//!
//! - **[`polyline`]**: Google polyline codec with configurable precision
//! - **[`Coordinates`] and point variants**: validated geographic value objects
//! - **Format parsers**: routing JSON, raw coordinate pairs, TTP positioning
//!   logs and logcat dumps, each behind the [`Parser`] trait
//! - **[`ParseService`]**: chain-of-responsibility dispatch over the parsers
//! - **[`PathImporter`]**: external-facing import operation with domain events
//! - **[`Layer`]**: UI-facing wrapper around a parsed path (consumer boundary)
//!
//! # Supported formats
//!
//! | Format | Signal | Output |
//! |--------|--------|--------|
//! | Routing response | JSON with `formatVersion` | [`Route`] per route |
//! | Raw coordinates | `lat, lon` pairs, labeled or bare | one geo path |
//! | TTP | `BEGIN:ApplicationVersion=` header | one TTP path |
//! | Logcat | timestamped log-line grammars | one log path |

mod dispatch;
mod events;
mod import;
mod layer;
mod path;
mod point;
pub mod polyline;
mod route;

pub mod parsers;

// Public API exports
pub use dispatch::{ParseService, Parsed};
pub use events::{EventPublisher, PathCreated};
pub use import::{ImportMessage, ImportOutcome, MessageKind, PathImporter};
pub use layer::{Color, Layer, LayerId, ListenerId};
pub use path::{Path, PathKind, PathNamer, PathVariant};
pub use point::{Coordinates, LogLevel, LogPoint, PointLike, RoutePoint, TtpDirection, TtpPoint};
pub use route::{
    LegSource, PointSource, Route, RouteInstruction, RouteLeg, RouteSource, RouteStop, Summary,
};

pub use parsers::{Outcome, Parser};

/// Error types for the parsing core
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Latitude must be between -90 and 90 degrees, and it's {0}")]
    InvalidLatitude(f64),

    #[error("Longitude must be between -180 and 180 degrees, and it's {0}")]
    InvalidLongitude(f64),

    #[error("Invalid precision for polyline, precision={0}")]
    InvalidPrecision(u32),

    #[error("Invalid encoded polyline, invalid character:{character}, code:{code}")]
    InvalidCharacter { character: char, code: u32 },

    #[error("Invalid encoded polyline.")]
    TruncatedPolyline,

    #[error("Latitude not in range. {0}")]
    LatitudeNotInRange(i64),

    #[error("Longitude not in range. {0}")]
    LongitudeNotInRange(i64),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Failed to parse input from all parsers with errors: {0}")]
    NoParserMatched(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ParseError>;
