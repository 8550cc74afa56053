//! Format parsers and the chain-of-responsibility seam
//!
//! Each supported input format gets one parser behind the [`Parser`] trait.
//! Parsers never panic past their boundary: every result is an explicit
//! [`Outcome`] value.

mod geo_points;
pub mod logcat;
mod routing;
mod ttp;

pub use geo_points::GeoPointsParser;
pub use logcat::LogcatParser;
pub use routing::{RoutingResponseParser, SUPPORTED_JSON_VERSION};
pub use ttp::{SUPPORTED_TTP_VERSION, TTP_HEADER, TtpParser};

use crate::path::{PathNamer, PathVariant};

/// The three-way result of one parser attempt.
///
/// `Declined` is the soft-success case: the format was recognized (or at least
/// claimed) but yielded nothing usable, e.g. a wrong declared version or an
/// empty coordinate match. The dispatcher short-circuits on it just like on
/// `Matched`, while `Failed` only contributes to the aggregate error.
#[derive(Clone, Debug)]
pub enum Outcome {
    Matched {
        paths: Vec<PathVariant>,
        message: String,
        /// Reasons for lines the parser skipped while still succeeding, one
        /// entry per recoverable per-line failure.
        skipped: Vec<String>,
    },
    Declined {
        reason: String,
    },
    Failed {
        reason: String,
    },
}

impl Outcome {
    pub fn matched(paths: Vec<PathVariant>, message: impl Into<String>) -> Self {
        Outcome::Matched {
            paths,
            message: message.into(),
            skipped: Vec::new(),
        }
    }

    pub fn matched_with_skipped(
        paths: Vec<PathVariant>,
        message: impl Into<String>,
        skipped: Vec<String>,
    ) -> Self {
        Outcome::Matched {
            paths,
            message: message.into(),
            skipped,
        }
    }

    pub fn declined(reason: impl Into<String>) -> Self {
        Outcome::Declined {
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Outcome::Failed {
            reason: reason.into(),
        }
    }
}

/// One format sniffer in the dispatch chain.
pub trait Parser {
    /// Attempt to parse `input`. The namer hands out display names for any
    /// paths this invocation produces.
    fn parse(&self, input: &str, namer: &mut PathNamer) -> Outcome;
}
