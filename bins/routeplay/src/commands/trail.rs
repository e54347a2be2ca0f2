//! Trail command - replay notifications through a live tracker

use anyhow::Result;
use routeplay_cli::output::format_count;
use routeplay_geo::{line_string, Coordinate};
use routeplay_playback::{ChangeBatch, LiveTracker, RecordingSurface};
use std::path::Path;

/// Each line is either a single notification or a replication change batch
/// (an object with a `direction` field).
pub fn run(input: &Path) -> Result<()> {
    let text = super::read_input(input)?;

    let mut tracker = LiveTracker::new();
    let mut surface = RecordingSurface::new();
    tracker.register(&mut surface, Coordinate::new(0.0, 0.0));

    let mut malformed = 0;
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(line = number + 1, error = %e, "Skipping malformed line");
                malformed += 1;
                continue;
            }
        };

        if value.get("direction").is_none() {
            tracker.ingest_value(&value, &mut surface);
            continue;
        }
        match serde_json::from_value::<ChangeBatch>(value) {
            Ok(batch) => {
                tracker.apply_change(&batch, &mut surface);
            }
            Err(e) => {
                tracing::warn!(line = number + 1, error = %e, "Skipping unreadable batch");
                malformed += 1;
            }
        }
    }

    tracing::info!(
        positions = tracker.applied(),
        ignored = tracker.ignored(),
        malformed,
        "Replayed {}",
        format_count(tracker.trail().len(), "trail point", "trail points")
    );

    println!("{}", serde_json::to_string(&line_string(tracker.trail().points()))?);
    Ok(())
}
