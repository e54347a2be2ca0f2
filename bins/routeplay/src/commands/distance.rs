//! Distance command - great-circle distance and frame count for one segment

use anyhow::Result;
use routeplay_cli::output::{format_coordinate, format_distance, Status};
use routeplay_core::config::Config;
use routeplay_geo::{central_angle, haversine_distance, points_per_km, segment_steps, Coordinate};

pub fn run(from: &Coordinate, to: &Coordinate, config: &Config) -> Result<()> {
    let density = points_per_km(config.schema.playback.animation_speed);

    Status::header("Segment");
    Status::field("From", format_coordinate(from));
    Status::field("To", format_coordinate(to));
    Status::field("Central angle", format!("{:.9} rad", central_angle(from, to)));
    Status::field("Distance", format_distance(haversine_distance(from, to)));
    Status::field("Frames", segment_steps(from, to, density));
    Ok(())
}
