//! routeplay - KML route parsing and stop-aware playback
//!
//! Parses `<coordinates>` spans, densifies routes along great-circle arcs and
//! plays a marker along them on a virtual clock.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use routeplay_cli::args::GlobalArgs;
use routeplay_cli::output::report_error;
use routeplay_core::error::exit_codes;
use routeplay_geo::Coordinate;
use routeplay_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{distance, feed, parse, path, simulate, trail};

/// Route playback toolkit
#[derive(Parser)]
#[command(name = "routeplay")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a KML route and print it as GeoJSON
    Parse {
        /// Route file (`-` for stdin)
        input: PathBuf,

        /// Pretty-print the GeoJSON
        #[arg(long)]
        pretty: bool,

        /// Fail on an unterminated <coordinates> span instead of dropping it
        #[arg(long)]
        strict: bool,
    },

    /// Great-circle distance between two `lon,lat` coordinates
    Distance {
        /// Start, as `lon,lat`
        #[arg(value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Coordinate,

        /// End, as `lon,lat`
        #[arg(value_parser = parse_coordinate, allow_hyphen_values = true)]
        to: Coordinate,
    },

    /// Build the animation path for a route and describe it
    Path {
        /// Route file (`-` for stdin)
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a route to completion and print a summary
    Simulate {
        /// Route file (`-` for stdin)
        input: PathBuf,

        /// GeoJSON FeatureCollection of stop points
        #[arg(short, long)]
        stops: Option<PathBuf>,

        /// Pace frames in wall-clock time
        #[arg(long)]
        realtime: bool,

        /// Reveal the route line while playing
        #[arg(long)]
        reveal: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Emit `geo_position` notifications for a route's waypoints as NDJSON
    Feed {
        /// Route file (`-` for stdin)
        input: PathBuf,

        /// Milliseconds between notifications
        #[arg(long, default_value = "1000")]
        interval_ms: i64,

        /// Timestamp of the first notification (defaults to now)
        #[arg(long)]
        start_ms: Option<i64>,
    },

    /// Replay NDJSON notifications through a live tracker and print the trail
    Trail {
        /// Notification file (`-` for stdin)
        input: PathBuf,
    },
}

fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [lon, lat] = parts.as_slice() else {
        return Err(format!("expected `lon,lat`, got `{}`", value));
    };
    let lon: f64 = lon.parse().map_err(|_| format!("invalid longitude `{}`", lon))?;
    let lat: f64 = lat.parse().map_err(|_| format!("invalid latitude `{}`", lat))?;

    let coord = Coordinate::new(lon, lat);
    if coord.is_valid() {
        Ok(coord)
    } else {
        Err(format!("coordinate out of range: {}", value))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.global.load_config() {
        Ok(config) => config,
        Err(e) => {
            report_error(&e);
            return ExitCode::from(exit_codes::for_code(e.code) as u8);
        }
    };

    let telemetry = TelemetryConfig {
        json: config.schema.telemetry.json,
        ..TelemetryConfig::with_level(cli.global.log_level(&config.schema.telemetry.log_level))
    };
    if let Err(e) = routeplay_telemetry::init_with_config(&telemetry) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }
    if let Some(path) = &config.path {
        tracing::debug!(path = %path.display(), "Loaded configuration");
    }

    let result = match cli.command {
        Commands::Parse { input, pretty, strict } => parse::run(&input, pretty, strict, &config),
        Commands::Distance { from, to } => distance::run(&from, &to, &config),
        Commands::Path { input, json } => path::run(&input, json, &config),
        Commands::Simulate { input, stops, realtime, reveal, json } => {
            let options = simulate::Options { realtime, reveal, json };
            simulate::run(&input, stops.as_deref(), options, &config).await
        }
        Commands::Feed { input, interval_ms, start_ms } => {
            feed::run(&input, interval_ms, start_ms, &config)
        }
        Commands::Trail { input } => trail::run(&input),
    };

    tracing::debug!(metrics = %routeplay_telemetry::metrics().snapshot(), "Session metrics");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<routeplay_core::Error>() {
            Some(err) => {
                report_error(err);
                ExitCode::from(exit_codes::for_code(err.code) as u8)
            }
            None => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                ExitCode::FAILURE
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("-92.1,44.0"), Ok(Coordinate::new(-92.1, 44.0)));
        assert_eq!(parse_coordinate(" 1.5 , 2 "), Ok(Coordinate::new(1.5, 2.0)));
        assert!(parse_coordinate("1,2,3").is_err());
        assert!(parse_coordinate("abc,2").is_err());
        assert!(parse_coordinate("200,0").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
