//! Path command - describe the animation path of a route

use anyhow::Result;
use routeplay_cli::output::{format_count, format_distance, Status};
use routeplay_core::config::Config;
use routeplay_geo::haversine_distance;
use routeplay_playback::AnimationPath;
use std::path::Path;

pub fn run(input: &Path, json: bool, config: &Config) -> Result<()> {
    let doc = super::load_route(input, &config.schema.parser, false)?;
    let feature = super::first_feature(&doc)?;
    let path = AnimationPath::from_config(feature, &config.schema.playback)
        .map_err(routeplay_core::Error::from)?;

    let length_km: f64 = feature
        .coordinates
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum();

    if json {
        let output = serde_json::json!({
            "features": doc.features.len(),
            "waypoints": feature.len(),
            "frames": path.len(),
            "length_km": length_km,
            "waypoint_offsets": path.waypoint_offsets(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    Status::header("Animation path");
    Status::field("Waypoints", format_count(feature.len(), "waypoint", "waypoints"));
    Status::field("Frames", path.len());
    Status::field("Length", format_distance(length_km));
    if doc.features.len() > 1 {
        Status::warning(&format!(
            "Only the first of {} features is animated",
            doc.features.len()
        ));
    }
    Ok(())
}
