//! TTP positioning-log parser
//!
//! Line-oriented proprietary format. The first line must carry the exact
//! supported header and version; body lines are comma-delimited records with a
//! type discriminator separating the incoming (pre-map-matching) and outgoing
//! (post-map-matching) streams. Only one stream is ever returned.

use crate::parsers::{Outcome, Parser};
use crate::path::{Path, PathNamer, PathVariant};
use crate::point::{Coordinates, TtpDirection, TtpPoint};
use std::collections::HashSet;

/// Fixed first-line prefix of a TTP file.
pub const TTP_HEADER: &str = "BEGIN:ApplicationVersion=TomTom Positioning";

/// The one TTP version this parser accepts.
pub const SUPPORTED_TTP_VERSION: &str = "0.7";

// Positional fields of a TTP data record.
const FIELD_TIMESTAMP: usize = 0;
const FIELD_TYPE: usize = 1;
const FIELD_LONGITUDE: usize = 3;
const FIELD_LATITUDE: usize = 5;
const FIELD_HEADING: usize = 9;
const FIELD_SPEED: usize = 11;

#[derive(Debug, Default)]
pub struct TtpParser;

impl TtpParser {
    pub fn new() -> Self {
        Self
    }

    /// Collect the points of one stream, de-duplicating on reception timestamp.
    ///
    /// A timestamp of exactly 0 or a repeat is skipped. Records missing any of
    /// lon/lat/speed/heading mark their timestamp as seen and are skipped, so a
    /// later repeat is not retried. Records with unparseable field values are
    /// recorded as skipped reasons without claiming their timestamp, never
    /// aborting the rest of the stream.
    fn parse_points(
        &self,
        lines: &[&str],
        direction: TtpDirection,
    ) -> (Vec<TtpPoint>, Vec<String>) {
        let mut points = Vec::new();
        let mut skipped = Vec::new();
        let mut seen_timestamps: HashSet<u64> = HashSet::new();

        for (line_number, line) in lines.iter().enumerate() {
            if line.starts_with('#') {
                continue; // skip comments
            }
            let parts: Vec<&str> = line.split(',').collect();
            let Ok(reception_timestamp) = field(&parts, FIELD_TIMESTAMP).parse::<f64>() else {
                continue;
            };
            if reception_timestamp == 0.0
                || seen_timestamps.contains(&reception_timestamp.to_bits())
            {
                continue;
            }
            if field(&parts, FIELD_TYPE) != direction.record_code() {
                continue;
            }

            let lon = field(&parts, FIELD_LONGITUDE);
            let lat = field(&parts, FIELD_LATITUDE);
            let heading = field(&parts, FIELD_HEADING);
            let speed = field(&parts, FIELD_SPEED);
            if lon.is_empty() || lat.is_empty() || speed.is_empty() || heading.is_empty() {
                seen_timestamps.insert(reception_timestamp.to_bits());
                skipped.push(format!("line {line_number}: missing positional fields"));
                continue;
            }

            match self.build_point(direction, lat, lon, heading, speed, reception_timestamp) {
                Ok(point) => {
                    points.push(point);
                    seen_timestamps.insert(reception_timestamp.to_bits());
                }
                // A malformed record does not claim its timestamp; a later
                // well-formed repeat is still accepted.
                Err(error) => {
                    tracing::warn!("error parsing a TTP point: {error}");
                    skipped.push(format!("line {line_number}: {error}"));
                }
            }
        }

        (points, skipped)
    }

    fn build_point(
        &self,
        direction: TtpDirection,
        lat: &str,
        lon: &str,
        heading: &str,
        speed: &str,
        reception_timestamp: f64,
    ) -> std::result::Result<TtpPoint, String> {
        let latitude: f64 = lat.parse().map_err(|_| format!("bad latitude {lat:?}"))?;
        let longitude: f64 = lon.parse().map_err(|_| format!("bad longitude {lon:?}"))?;
        let heading: f64 = heading
            .parse()
            .map_err(|_| format!("bad heading {heading:?}"))?;
        let speed: f64 = speed.parse().map_err(|_| format!("bad speed {speed:?}"))?;

        let coordinates =
            Coordinates::new(latitude, longitude).map_err(|error| error.to_string())?;
        Ok(TtpPoint {
            direction,
            coordinates,
            speed: Some((speed * 100.0).round() / 100.0),
            timestamp: Some(reception_timestamp),
            heading: Some(heading),
        })
    }

    /// Pick ONE stream: a non-empty stream beats an empty one; with both
    /// non-empty, outgoing wins only when strictly larger. Streams are never
    /// merged.
    fn select_stream(
        &self,
        incoming: (Vec<TtpPoint>, Vec<String>),
        outgoing: (Vec<TtpPoint>, Vec<String>),
    ) -> (Vec<TtpPoint>, Vec<String>, &'static str) {
        let (incoming, incoming_skipped) = incoming;
        let (outgoing, outgoing_skipped) = outgoing;
        if incoming.is_empty() {
            (outgoing, outgoing_skipped, "TTP: outgoing locations")
        } else if outgoing.is_empty() || outgoing.len() <= incoming.len() {
            (incoming, incoming_skipped, "TTP: incoming locations")
        } else {
            (outgoing, outgoing_skipped, "TTP: outgoing locations")
        }
    }
}

impl Parser for TtpParser {
    fn parse(&self, input: &str, namer: &mut PathNamer) -> Outcome {
        let lines: Vec<&str> = input.split('\n').collect();
        let first_line = lines.first().copied().unwrap_or_default();

        if !first_line.starts_with(TTP_HEADER) {
            return Outcome::failed("Error parsing as TTP: Invalid TTP format");
        }
        let version = first_line
            .get(TTP_HEADER.len() + 1..)
            .unwrap_or_default()
            .trim_end_matches('\r');
        if version != SUPPORTED_TTP_VERSION {
            return Outcome::failed(format!(
                "Error parsing as TTP: Unsupported TTP version: {version}, expected {SUPPORTED_TTP_VERSION}"
            ));
        }

        let incoming = self.parse_points(&lines, TtpDirection::Incoming);
        let outgoing = self.parse_points(&lines, TtpDirection::Outgoing);
        let (points, skipped, message) = self.select_stream(incoming, outgoing);

        if points.is_empty() {
            return Outcome::declined("No routes found in given TTP.");
        }

        let name = namer.next_ttp_name();
        Outcome::matched_with_skipped(
            vec![PathVariant::Ttp(Path::new(points, name))],
            message,
            skipped,
        )
    }
}

fn field<'a>(parts: &[&'a str], index: usize) -> &'a str {
    parts.get(index).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "BEGIN:ApplicationVersion=TomTom Positioning 0.7";

    /// A data line with the positional layout the parser expects.
    fn record(timestamp: f64, code: &str, lon: f64, lat: f64, heading: f64, speed: f64) -> String {
        format!("{timestamp},{code},x,{lon},x,{lat},x,x,x,{heading},x,{speed}")
    }

    fn ttp_file(lines: &[String]) -> String {
        let mut text = String::from(HEADER);
        for line in lines {
            text.push('\n');
            text.push_str(line);
        }
        text
    }

    fn parse(input: &str) -> Outcome {
        TtpParser::new().parse(input, &mut PathNamer::new())
    }

    fn expect_ttp(outcome: Outcome) -> (Vec<TtpPoint>, String) {
        match outcome {
            Outcome::Matched { paths, message, .. } => {
                assert_eq!(paths.len(), 1);
                let PathVariant::Ttp(path) = &paths[0] else {
                    panic!("expected a TTP path");
                };
                (path.points().to_vec(), message)
            }
            other => panic!("expected Matched, got {other:?}"),
        }
    }

    #[test]
    fn test_header_rejection() {
        match parse("no header here\n1,245") {
            Outcome::Failed { reason } => assert!(reason.contains("Invalid TTP format")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_version_rejection() {
        let input = "BEGIN:ApplicationVersion=TomTom Positioning 0.6\n";
        match parse(input) {
            Outcome::Failed { reason } => {
                assert!(reason.contains("Unsupported TTP version: 0.6"));
                assert!(reason.contains("expected 0.7"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_incoming_points_parsed() {
        let input = ttp_file(&[
            record(1.0, "245", 4.1, 52.1, 90.0, 13.456),
            record(2.0, "245", 4.2, 52.2, 91.0, 14.0),
        ]);
        let (points, message) = expect_ttp(parse(&input));
        assert_eq!(points.len(), 2);
        assert_eq!(message, "TTP: incoming locations");
        assert_eq!(points[0].direction, TtpDirection::Incoming);
        assert_eq!(points[0].coordinates.latitude(), 52.1);
        assert_eq!(points[0].coordinates.longitude(), 4.1);
        assert_eq!(points[0].heading, Some(90.0));
        // Speed is rounded to two decimals
        assert_eq!(points[0].speed, Some(13.46));
        assert_eq!(points[0].timestamp, Some(1.0));
    }

    #[test]
    fn test_outgoing_wins_when_strictly_larger() {
        let mut lines = Vec::new();
        for i in 0..3 {
            lines.push(record(10.0 + i as f64, "245", 4.0, 52.0, 0.0, 1.0));
        }
        for i in 0..5 {
            lines.push(record(20.0 + i as f64, "237", 4.0, 52.0, 0.0, 1.0));
        }
        let (points, message) = expect_ttp(parse(&ttp_file(&lines)));
        assert_eq!(points.len(), 5);
        assert_eq!(message, "TTP: outgoing locations");
    }

    #[test]
    fn test_tie_goes_to_incoming() {
        let mut lines = Vec::new();
        for i in 0..3 {
            lines.push(record(10.0 + i as f64, "245", 4.0, 52.0, 0.0, 1.0));
            lines.push(record(20.0 + i as f64, "237", 4.0, 52.0, 0.0, 1.0));
        }
        let (points, message) = expect_ttp(parse(&ttp_file(&lines)));
        assert_eq!(points.len(), 3);
        assert_eq!(message, "TTP: incoming locations");
    }

    #[test]
    fn test_incoming_wins_when_larger() {
        let mut lines = Vec::new();
        for i in 0..5 {
            lines.push(record(10.0 + i as f64, "245", 4.0, 52.0, 0.0, 1.0));
        }
        for i in 0..3 {
            lines.push(record(20.0 + i as f64, "237", 4.0, 52.0, 0.0, 1.0));
        }
        let (points, message) = expect_ttp(parse(&ttp_file(&lines)));
        assert_eq!(points.len(), 5);
        assert_eq!(message, "TTP: incoming locations");
    }

    #[test]
    fn test_duplicate_timestamps_deduplicated() {
        let input = ttp_file(&[
            record(1.0, "245", 4.1, 52.1, 0.0, 1.0),
            record(1.0, "245", 4.9, 52.9, 0.0, 1.0),
            record(2.0, "245", 4.2, 52.2, 0.0, 1.0),
        ]);
        let (points, _) = expect_ttp(parse(&input));
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].coordinates.latitude(), 52.1);
    }

    #[test]
    fn test_zero_timestamp_skipped() {
        let input = ttp_file(&[
            record(0.0, "245", 4.1, 52.1, 0.0, 1.0),
            record(1.0, "245", 4.2, 52.2, 0.0, 1.0),
        ]);
        let (points, _) = expect_ttp(parse(&input));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].coordinates.latitude(), 52.2);
    }

    #[test]
    fn test_missing_fields_mark_timestamp_seen() {
        // First record for ts=1 lacks a speed field; the complete repeat for
        // the same timestamp must not be retried.
        let incomplete = "1,245,x,4.1,x,52.1,x,x,x,90.0,x,".to_string();
        let input = ttp_file(&[incomplete, record(1.0, "245", 4.1, 52.1, 90.0, 1.0)]);
        match parse(&input) {
            Outcome::Declined { reason } => {
                assert_eq!(reason, "No routes found in given TTP.");
            }
            other => panic!("expected Declined, got {other:?}"),
        }
    }

    #[test]
    fn test_comment_lines_skipped() {
        let input = ttp_file(&[
            "# a comment".to_string(),
            record(1.0, "245", 4.1, 52.1, 0.0, 1.0),
        ]);
        let (points, _) = expect_ttp(parse(&input));
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_header_only_declines() {
        match parse(HEADER) {
            Outcome::Declined { reason } => {
                assert_eq!(reason, "No routes found in given TTP.");
            }
            other => panic!("expected Declined, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_record_timestamp_can_be_retried() {
        // The malformed record does not consume ts=1; the well-formed repeat
        // that follows must still produce a point.
        let input = ttp_file(&[
            "1,245,x,4.1,x,not-a-number,x,x,x,90.0,x,1.0".to_string(),
            record(1.0, "245", 4.1, 52.1, 90.0, 1.0),
        ]);
        let (points, _) = expect_ttp(parse(&input));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].coordinates.latitude(), 52.1);
    }

    #[test]
    fn test_skipped_records_are_reported() {
        let input = ttp_file(&[
            record(1.0, "245", 4.1, 52.1, 0.0, 1.0),
            "2,245,x,4.2,x,not-a-number,x,x,x,0.0,x,1.0".to_string(),
        ]);
        match parse(&input) {
            Outcome::Matched { paths, skipped, .. } => {
                assert_eq!(paths[0].len(), 1);
                assert_eq!(skipped.len(), 1);
                assert!(skipped[0].contains("line 2"));
            }
            other => panic!("expected Matched, got {other:?}"),
        }
    }

    #[test]
    fn test_path_naming() {
        let input = ttp_file(&[record(1.0, "245", 4.1, 52.1, 0.0, 1.0)]);
        match parse(&input) {
            Outcome::Matched { paths, .. } => assert_eq!(paths[0].name(), "TTP Path 1"),
            other => panic!("expected Matched, got {other:?}"),
        }
    }
}
