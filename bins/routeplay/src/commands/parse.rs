//! Parse command - print a route as GeoJSON

use anyhow::Result;
use routeplay_cli::output::Status;
use routeplay_core::config::Config;
use routeplay_geo::feature_collection;
use std::path::Path;

pub fn run(input: &Path, pretty: bool, strict: bool, config: &Config) -> Result<()> {
    let doc = super::load_route(input, &config.schema.parser, strict)?;
    if doc.truncated {
        Status::warning("Unterminated <coordinates> span; the partial feature was dropped");
    }

    let collection = feature_collection(&doc);
    let json = if pretty {
        serde_json::to_string_pretty(&collection)?
    } else {
        serde_json::to_string(&collection)?
    };
    println!("{}", json);
    Ok(())
}
