//! CLI command implementations

pub mod distance;
pub mod feed;
pub mod parse;
pub mod path;
pub mod simulate;
pub mod trail;

use routeplay_core::config::ParserConfig;
use routeplay_core::Error;
use routeplay_geo::{GeoError, KmlParser, LineFeature, RouteDocument};
use routeplay_playback::PlaybackError;
use routeplay_telemetry::{metrics, names};
use std::io::Read;
use std::path::Path;

/// Read a text input; `-` reads stdin
pub fn read_input(path: &Path) -> Result<String, Error> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Parse a route file with the configured precision
pub fn load_route(
    path: &Path,
    config: &ParserConfig,
    strict: bool,
) -> Result<RouteDocument, Error> {
    routeplay_telemetry::timed_span!("load_route", path = %path.display());
    let text = read_input(path)?;
    let parser = KmlParser::with_precision(config.coordinate_precision);

    let doc = if strict {
        parser.parse_strict(&text).map_err(geo_error)?
    } else {
        parser.parse(&text)
    };

    metrics().add(names::PARSER_FEATURES, doc.features.len() as u64);
    metrics().add(names::PARSER_SKIPPED, doc.skipped_triples as u64);
    if doc.skipped_triples > 0 {
        tracing::warn!(skipped = doc.skipped_triples, "Dropped malformed coordinate triples");
    }
    Ok(doc)
}

/// The feature that gets animated
pub fn first_feature(doc: &RouteDocument) -> Result<&LineFeature, Error> {
    doc.first_feature()
        .ok_or_else(|| Error::invalid_route("The document has no <coordinates> span"))
}

fn geo_error(err: GeoError) -> Error {
    PlaybackError::from(err).into()
}
