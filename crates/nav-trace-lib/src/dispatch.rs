//! Chain-of-responsibility dispatch over the format parsers
//!
//! The single entry point external callers use. Parsers run in a fixed
//! priority order and the first one that matches or declines wins; only when
//! every parser hard-fails does the service return an aggregate error.

use crate::parsers::{
    GeoPointsParser, LogcatParser, Outcome, Parser, RoutingResponseParser, TtpParser,
};
use crate::path::{PathNamer, PathVariant};
use crate::{ParseError, Result};

/// The outcome of a successful dispatch: zero or more paths plus a
/// user-facing message.
#[derive(Clone, Debug)]
pub struct Parsed {
    pub paths: Vec<PathVariant>,
    pub message: String,
    /// Per-line skip reasons collected by the winning parser.
    pub skipped: Vec<String>,
}

/// Format sniffer over all supported input formats.
///
/// Stateless apart from the [`PathNamer`] it owns; separate instances can be
/// used concurrently on different inputs without locking.
pub struct ParseService {
    namer: PathNamer,
    one_line_parser: GeoPointsParser,
    // The order of parsing is defined here.
    parsers: Vec<Box<dyn Parser + Send + Sync>>,
}

impl Default for ParseService {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseService {
    pub fn new() -> Self {
        Self {
            namer: PathNamer::new(),
            one_line_parser: GeoPointsParser::new(),
            parsers: vec![
                Box::new(RoutingResponseParser::new()),
                Box::new(TtpParser::new()),
                Box::new(LogcatParser::new()),
            ],
        }
    }

    /// Sniff and parse `input`.
    ///
    /// # Errors
    /// [`ParseError::NoParserMatched`] when every parser hard-fails; the
    /// message joins the individual failure reasons with `"; "`.
    pub fn parse(&mut self, input: &str) -> Result<Parsed> {
        if input.is_empty() {
            return Ok(Parsed {
                paths: Vec::new(),
                message: "The input is empty.".into(),
                skipped: Vec::new(),
            });
        }

        // A one-line input can't be any of the multi-line formats; the raw
        // coordinate parser gets first (and only heuristic) shot at it.
        if !input.contains('\n') {
            if let Outcome::Matched {
                paths,
                message,
                skipped,
            } = self.one_line_parser.parse(input, &mut self.namer)
            {
                if !paths.is_empty() {
                    return Ok(Parsed {
                        paths,
                        message,
                        skipped,
                    });
                }
            }
        }

        let mut errors: Vec<String> = Vec::new();
        for parser in &self.parsers {
            match parser.parse(input, &mut self.namer) {
                Outcome::Matched {
                    paths,
                    message,
                    skipped,
                } => {
                    return Ok(Parsed {
                        paths,
                        message,
                        skipped,
                    });
                }
                // A decline is accepted as the final (empty) result so its
                // reason reaches the user; later parsers never run.
                Outcome::Declined { reason } => {
                    return Ok(Parsed {
                        paths: Vec::new(),
                        message: reason,
                        skipped: Vec::new(),
                    });
                }
                Outcome::Failed { reason } => errors.push(reason),
            }
        }

        Err(ParseError::NoParserMatched(errors.join("; ")))
    }
}
