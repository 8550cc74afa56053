//! Device-log ("logcat") parser — a three-stage pipeline
//!
//! 1. [`entry`]: match each line against the known line grammars
//! 2. [`message`]: route matched entries to tag-specific telemetry extractors
//! 3. point assembly (here): combine entry and extracted message into a
//!    [`LogPoint`]
//!
//! Every failure inside the pipeline is per-line: a malformed line, unknown
//! tag or unrecognized level never aborts the rest of the file.

pub mod entry;
pub mod message;

use crate::parsers::{Outcome, Parser};
use crate::path::{Path, PathNamer, PathVariant};
use crate::point::{Coordinates, LogLevel, LogPoint};
use entry::LogcatEntry;
use message::LogcatMessage;

#[derive(Debug, Default)]
pub struct LogcatParser;

impl LogcatParser {
    pub fn new() -> Self {
        Self
    }

    /// Stage 3: build a [`LogPoint`] from an entry and its extracted message.
    fn assemble(
        entry: &LogcatEntry,
        message: &LogcatMessage,
        line_number: usize,
    ) -> std::result::Result<LogPoint, String> {
        let level = LogLevel::from_token(&entry.level)?;
        let coordinates = Coordinates::new(message.latitude, message.longitude)
            .map_err(|error| error.to_string())?;
        Ok(LogPoint {
            coordinates,
            level,
            tag: entry.tag.clone(),
            line: line_number,
            extra: message.extra.clone(),
            timestamp: (entry.timestamp >= 0).then_some(entry.timestamp as f64),
            speed: None,
            heading: None,
        })
    }
}

impl Parser for LogcatParser {
    fn parse(&self, input: &str, namer: &mut PathNamer) -> Outcome {
        let mut points = Vec::new();
        let mut skipped = Vec::new();
        let mut matched_lines = 0usize;

        for (line_number, line) in input.split('\n').enumerate() {
            let Some(entry) = entry::parse(line) else {
                continue;
            };
            matched_lines += 1;
            let Some(message) = message::parse(&entry) else {
                continue;
            };
            match Self::assemble(&entry, &message, line_number) {
                Ok(point) => points.push(point),
                Err(error) => {
                    tracing::warn!("Error parsing a Logcat point: {error}");
                    skipped.push(format!("line {line_number}: {error}"));
                }
            }
        }

        // No line matched any grammar: this is not a logcat file at all, which
        // is a hard failure. Matched lines without points is a soft decline.
        if matched_lines == 0 {
            return Outcome::failed("Error parsing as Logcat: no recognizable log lines");
        }
        if points.is_empty() {
            return Outcome::declined("No routes found in given logcat.");
        }

        let name = namer.next_log_name();
        Outcome::matched_with_skipped(
            vec![PathVariant::Log(Path::new(points, name))],
            "Parsed Logcat successfully.",
            skipped,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Outcome {
        LogcatParser::new().parse(input, &mut PathNamer::new())
    }

    fn expect_points(outcome: Outcome) -> Vec<LogPoint> {
        match outcome {
            Outcome::Matched { paths, message, .. } => {
                assert_eq!(paths.len(), 1);
                assert_eq!(message, "Parsed Logcat successfully.");
                let PathVariant::Log(path) = &paths[0] else {
                    panic!("expected a log path");
                };
                path.points().to_vec()
            }
            other => panic!("expected Matched, got {other:?}"),
        }
    }

    const MATCHER_LINE: &str = "05-06 10:15:30.123 1234 5678 I MapMatcher: MatchLocation result: lat: 35.693644, lon: 139.774883, arc_key: 1, on road: true, route_id: 6903";

    #[test]
    fn test_full_pipeline() {
        let input = format!(
            "some garbage\n{MATCHER_LINE}\n05-06 10:15:31.000 1234 5678 W OtherTag: nothing here"
        );
        let points = expect_points(parse(&input));
        assert_eq!(points.len(), 1);

        let point = &points[0];
        assert_eq!(point.coordinates.latitude(), 35.693644);
        assert_eq!(point.coordinates.longitude(), 139.774883);
        assert_eq!(point.level, LogLevel::Info);
        assert_eq!(point.tag, "MapMatcher");
        assert_eq!(point.line, 1);
        assert_eq!(point.extra.get("on road").unwrap(), "true");
        assert_eq!(point.extra.get("matched route ID").unwrap(), "6903");
        assert!(point.timestamp.is_some());
    }

    #[test]
    fn test_qualified_tag_containment() {
        let input = "05-06 10:15:30.123 1 2 I com.tomtom.MapMatcher.impl: MatchLocation result: lat: 35.5, lon: 139.5, on road: false";
        let points = expect_points(parse(input));
        assert_eq!(points[0].tag, "com.tomtom.MapMatcher.impl");
    }

    #[test]
    fn test_line_numbers_are_source_positions() {
        let input = format!("\n\n{MATCHER_LINE}");
        let points = expect_points(parse(&input));
        assert_eq!(points[0].line, 2);
    }

    #[test]
    fn test_unknown_level_skips_line_only() {
        // 'F' matches the line grammar but maps to no level; the second line
        // must still be parsed and the skip must be reported.
        let bad = "05-06 10:15:30.123 1 2 F MapMatcher: MatchLocation result: lat: 35.5, lon: 139.5, on road: true";
        let input = format!("{bad}\n{MATCHER_LINE}");
        match parse(&input) {
            Outcome::Matched { paths, skipped, .. } => {
                assert_eq!(paths[0].len(), 1);
                assert_eq!(skipped.len(), 1);
                assert!(skipped[0].contains("line 0"));
                assert!(skipped[0].contains("Unknown log level: F"));
            }
            other => panic!("expected Matched, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_coordinates_skip_line_only() {
        let bad = "05-06 10:15:30.123 1 2 I MapMatcher: MatchLocation result: lat: 95.5, lon: 139.5, on road: true";
        let input = format!("{bad}\n{MATCHER_LINE}");
        let points = expect_points(parse(&input));
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_unrecognizable_input_fails() {
        match parse("just\nsome\nnoise") {
            Outcome::Failed { reason } => {
                assert!(reason.contains("Error parsing as Logcat"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_log_lines_without_points_decline() {
        let input = "05-06 10:15:30.123 1 2 I Noise: nothing\n05-06 10:15:31.000 1 2 W Other: still nothing";
        match parse(input) {
            Outcome::Declined { reason } => {
                assert_eq!(reason, "No routes found in given logcat.");
            }
            other => panic!("expected Declined, got {other:?}"),
        }
    }

    #[test]
    fn test_points_in_file_order() {
        let line2 = "05-06 10:15:31.000 1 2 I MapMatcher: MatchLocation result: lat: 36.0, lon: 140.0, on road: false";
        let input = format!("{MATCHER_LINE}\n{line2}");
        let points = expect_points(parse(&input));
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].line, 0);
        assert_eq!(points[1].line, 1);
        assert_eq!(points[1].coordinates.latitude(), 36.0);
    }

    #[test]
    fn test_path_naming() {
        match parse(MATCHER_LINE) {
            Outcome::Matched { paths, .. } => assert_eq!(paths[0].name(), "Log Path 1"),
            other => panic!("expected Matched, got {other:?}"),
        }
    }
}
