//! Routing-response parser (JSON)
//!
//! Parses a routing-API JSON response into [`Route`] aggregates. The document
//! must declare a supported `formatVersion`; a mismatch declines (so the
//! dispatcher surfaces why this parser passed) instead of hard-failing.

use crate::parsers::{Outcome, Parser};
use crate::path::{PathNamer, PathVariant};
use crate::route::{Route, RouteSource};
use serde::Deserialize;

/// The one `formatVersion` literal this parser accepts, byte for byte.
pub const SUPPORTED_JSON_VERSION: &str = "0.0.12";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoutingResponse {
    #[serde(default)]
    format_version: Option<String>,
    #[serde(default)]
    routes: Option<Vec<RouteSource>>,
}

#[derive(Debug, Default)]
pub struct RoutingResponseParser;

impl RoutingResponseParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for RoutingResponseParser {
    fn parse(&self, input: &str, namer: &mut PathNamer) -> Outcome {
        let response: RoutingResponse = match serde_json::from_str(input) {
            Ok(response) => response,
            Err(error) => return Outcome::failed(format!("Error parsing as JSON: {error}")),
        };

        let found_version = response.format_version.unwrap_or_default();
        if found_version != SUPPORTED_JSON_VERSION {
            return Outcome::declined(format!(
                "Unsupported JSON version: {found_version}, expected {SUPPORTED_JSON_VERSION}"
            ));
        }

        let Some(routes) = response.routes else {
            return Outcome::declined("No routes found in given JSON.");
        };

        let mut paths = Vec::with_capacity(routes.len());
        for source in &routes {
            match Route::from_source(source, namer.next_route_name()) {
                Ok(route) => paths.push(PathVariant::Route(route)),
                Err(error) => {
                    return Outcome::failed(format!("Error parsing as JSON: {error}"));
                }
            }
        }

        if paths.is_empty() {
            return Outcome::declined("No routes found in given JSON.");
        }

        Outcome::matched(paths, "Parsed JSON successfully.")
    }
}
