//! Raw coordinate-pair parser
//!
//! Two regex passes over the input, first-match-wins: explicitly labeled
//! `lat=..., lon=...` pairs, then bare `number, number` pairs. This parser is
//! heuristic by design and never hard-fails; with no usable pairs it declines.

use crate::parsers::{Outcome, Parser};
use crate::path::{Path, PathNamer, PathVariant};
use crate::point::Coordinates;
use regex::Regex;
use std::sync::LazyLock;

static LABELED_PAIRS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:["']?(?:lat|latitude)["']?)\s?[=:]\s?([\d.-]+)[,\s]+(?:["']?(?:lon|long|lng|longitude)["']?)\s?[=:]\s?([\d.-]+)"#,
    )
    .unwrap()
});

static BARE_PAIRS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.-]+)[,\s]+([\d.-]+)").unwrap());

#[derive(Debug, Default)]
pub struct GeoPointsParser;

impl GeoPointsParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for GeoPointsParser {
    fn parse(&self, input: &str, namer: &mut PathNamer) -> Outcome {
        let mut points: Vec<Coordinates> = Vec::new();

        for regex in [&*LABELED_PAIRS, &*BARE_PAIRS] {
            for captures in regex.captures_iter(input) {
                let (Ok(latitude), Ok(longitude)) = (
                    captures[1].parse::<f64>(),
                    captures[2].parse::<f64>(),
                ) else {
                    continue;
                };
                // A literal 0 latitude or longitude is rejected here, mirroring
                // the truthiness filter this check descends from.
                if latitude == 0.0 || longitude == 0.0 {
                    continue;
                }
                match Coordinates::new(latitude, longitude) {
                    Ok(point) => points.push(point),
                    Err(error) => {
                        tracing::debug!("skipping out-of-range candidate pair: {error}");
                    }
                }
            }
            if !points.is_empty() {
                break;
            }
        }

        if points.is_empty() {
            return Outcome::declined("No coordinates found.");
        }

        let name = namer.next_geo_name(points.len());
        Outcome::matched(
            vec![PathVariant::Geo(Path::new(points, name))],
            "Parsed as coordinates.",
        )
    }
}
