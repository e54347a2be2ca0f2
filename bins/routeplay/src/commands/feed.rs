//! Feed command - synthesize live position notifications from a route

use anyhow::Result;
use routeplay_core::config::Config;
use routeplay_playback::PositionUpdate;
use std::io::Write;
use std::path::Path;

pub fn run(input: &Path, interval_ms: i64, start_ms: Option<i64>, config: &Config) -> Result<()> {
    let doc = super::load_route(input, &config.schema.parser, false)?;
    let feature = super::first_feature(&doc)?;
    let start = start_ms.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for update in PositionUpdate::feed_from_route(feature, start, interval_ms) {
        serde_json::to_writer(&mut out, &update)?;
        writeln!(out)?;
    }
    Ok(())
}
