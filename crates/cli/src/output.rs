//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;
use routeplay_core::Error;
use routeplay_geo::Coordinate;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a labelled value, aligned under a header
    pub fn field(label: &str, value: impl std::fmt::Display) {
        println!("  {:<16} {}", format!("{}:", label).dimmed(), value);
    }
}

/// Print a coded error with its context and suggestion to stderr
pub fn report_error(err: &Error) {
    eprintln!("{} {} {}", "✗".red(), err.code.to_string().red().bold(), err.message);
    if let Some(context) = &err.context {
        eprintln!("  {} {}", "context:".dimmed(), context);
    }
    if let Some(suggestion) = &err.suggestion {
        eprintln!("  {} {}", "hint:".cyan(), suggestion);
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a distance in kilometres, switching to metres below 1 km
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.1} m", km * 1000.0)
    } else {
        format!("{:.3} km", km)
    }
}

/// Format a coordinate as `lon, lat`
pub fn format_coordinate(coord: &Coordinate) -> String {
    match coord.altitude {
        Some(alt) => format!("{:.6}, {:.6} ({} m)", coord.longitude, coord.latitude, alt),
        None => format!("{:.6}, {:.6}", coord.longitude, coord.latitude),
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
