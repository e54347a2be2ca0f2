//! Logging and in-process metrics for routeplay
//!
//! Counters and timings live in one process-wide registry. Commands log a
//! [`Snapshot`] of it at debug level when they finish.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt as layer_fmt, prelude::*, EnvFilter};
use uuid::Uuid;

#[doc(hidden)]
pub use tracing as __tracing;

/// Metric names recorded by the routeplay crates.
pub mod names {
    /// Frames published by the player
    pub const PLAYBACK_FRAMES: &str = "playback.frames";
    /// Dwell pauses scheduled at stops
    pub const PLAYBACK_DWELLS: &str = "playback.dwells";
    /// Player (re)starts
    pub const PLAYBACK_RESTARTS: &str = "playback.restarts";
    /// Continuations dropped because their epoch was stale
    pub const STALE_TICKETS: &str = "playback.stale_tickets";
    /// Live positions applied to a trail
    pub const LIVE_POSITIONS: &str = "live.positions";
    /// Line features parsed
    pub const PARSER_FEATURES: &str = "parser.features";
    /// Coordinate triples dropped by the parser
    pub const PARSER_SKIPPED: &str = "parser.skipped_triples";
    /// Animation path build time
    pub const PATH_BUILD: &str = "path.build";
}

static REGISTRY: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::default);

static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Logging options.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// One JSON object per log line instead of compact text
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::with_level("info")
    }
}

impl TelemetryConfig {
    /// Compact text logs at `level`
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            log_level: level.into(),
            json: false,
        }
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays
/// machine-readable.
pub fn init_with_config(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        let layer = layer_fmt::layer().json().with_writer(std::io::stderr);
        tracing::subscriber::set_global_default(registry.with(layer))
    } else {
        let layer = layer_fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr);
        tracing::subscriber::set_global_default(registry.with(layer))
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        json = config.json,
        "Telemetry initialized"
    );
    Ok(())
}

/// Identifier shared by every log line and event of this process.
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// The process-wide registry.
pub fn metrics() -> &'static MetricsRegistry {
    &REGISTRY
}

/// Count, total and worst case of one timed operation, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimingStats {
    pub count: u64,
    pub total_ms: f64,
    pub max_ms: f64,
}

impl TimingStats {
    fn record(&mut self, ms: f64) {
        self.count += 1;
        self.total_ms += ms;
        self.max_ms = self.max_ms.max(ms);
    }

    /// Average duration, 0 when nothing was recorded.
    pub fn mean_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }
}

/// Named counters and timings.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    counters: RwLock<BTreeMap<String, AtomicU64>>,
    timings: Mutex<BTreeMap<String, TimingStats>>,
}

impl MetricsRegistry {
    /// Adds one to `name`.
    pub fn increment(&self, name: &str) {
        self.add(name, 1);
    }

    /// Adds `value` to `name`, creating the counter on first use.
    pub fn add(&self, name: &str, value: u64) {
        {
            let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(counter) = counters.get(name) {
                counter.fetch_add(value, Ordering::Relaxed);
                return;
            }
        }
        let mut counters = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        counters
            .entry(name.to_string())
            .or_default()
            .fetch_add(value, Ordering::Relaxed);
    }

    /// Current value of `name`; 0 if it was never touched.
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters.get(name).map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Records one run of the operation `name`.
    pub fn record(&self, name: &str, elapsed: Duration) {
        let mut timings = self.timings.lock().unwrap_or_else(PoisonError::into_inner);
        timings
            .entry(name.to_string())
            .or_default()
            .record(elapsed.as_secs_f64() * 1000.0);
    }

    /// Timings recorded for `name`.
    pub fn timing(&self, name: &str) -> Option<TimingStats> {
        let timings = self.timings.lock().unwrap_or_else(PoisonError::into_inner);
        timings.get(name).copied()
    }

    /// Point-in-time copy of every counter and timing.
    pub fn snapshot(&self) -> Snapshot {
        let counters = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, value)| (name.clone(), value.load(Ordering::Relaxed)))
            .collect();
        let timings = self
            .timings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        Snapshot {
            session_id: session_id().to_string(),
            counters,
            timings,
        }
    }
}

/// Serializable copy of the registry. Displays as a single JSON line.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub session_id: String,
    pub counters: BTreeMap<String, u64>,
    pub timings: BTreeMap<String, TimingStats>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&line)
    }
}

/// Times an operation into the global registry.
///
/// Recorded on [`Timer::stop`], or on drop if the timer was never stopped.
pub struct Timer {
    name: &'static str,
    start: Instant,
    stopped: bool,
}

impl Timer {
    /// Starts timing `name`.
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            stopped: false,
        }
    }

    /// Records and returns the elapsed time.
    pub fn stop(mut self) -> Duration {
        self.stopped = true;
        let elapsed = self.start.elapsed();
        metrics().record(self.name, elapsed);
        elapsed
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if !self.stopped {
            metrics().record(self.name, self.start.elapsed());
        }
    }
}

/// Enters an info span named `$name` and times it until the end of the
/// enclosing scope.
#[macro_export]
macro_rules! timed_span {
    ($name:literal) => {
        let _timer = $crate::Timer::start($name);
        let _span = $crate::__tracing::info_span!($name).entered();
    };
    ($name:literal, $($field:tt)*) => {
        let _timer = $crate::Timer::start($name);
        let _span = $crate::__tracing::info_span!($name, $($field)*).entered();
    };
}

/// A notable occurrence, logged with the session id and a JSON payload.
#[derive(Debug, Serialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub kind: String,
    pub data: serde_json::Value,
}

impl Event {
    /// Event of `kind` stamped now.
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id: session_id().to_string(),
            kind: kind.into(),
            data,
        }
    }

    /// Writes the event at info level.
    pub fn log(&self) {
        tracing::info!(
            event = %self.kind,
            at = %self.timestamp.to_rfc3339(),
            data = %self.data,
            "Event recorded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let registry = MetricsRegistry::default();
        registry.increment(names::PLAYBACK_FRAMES);
        registry.increment(names::PLAYBACK_FRAMES);
        registry.add(names::PLAYBACK_FRAMES, 3);

        assert_eq!(registry.counter(names::PLAYBACK_FRAMES), 5);
        assert_eq!(registry.counter(names::PLAYBACK_DWELLS), 0);
    }

    #[test]
    fn test_timing_stats() {
        let registry = MetricsRegistry::default();
        registry.record(names::PATH_BUILD, Duration::from_millis(2));
        registry.record(names::PATH_BUILD, Duration::from_millis(6));

        let stats = registry.timing(names::PATH_BUILD).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.max_ms, 6.0);
        assert_eq!(stats.mean_ms(), 4.0);
        assert!(registry.timing("never").is_none());
        assert_eq!(TimingStats::default().mean_ms(), 0.0);
    }

    #[test]
    fn test_snapshot_is_one_json_line() {
        let registry = MetricsRegistry::default();
        registry.add(names::PARSER_FEATURES, 2);
        registry.record(names::PATH_BUILD, Duration::from_millis(1));

        let line = registry.snapshot().to_string();
        assert!(!line.contains('\n'));
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["counters"][names::PARSER_FEATURES], 2);
        assert_eq!(json["timings"][names::PATH_BUILD]["count"], 1);
        assert_eq!(json["session_id"], session_id());
    }

    #[test]
    fn test_timer_records_on_stop_and_drop() {
        let elapsed = Timer::start("test.stopped").stop();
        assert_eq!(metrics().timing("test.stopped").map(|t| t.count), Some(1));
        assert!(elapsed < Duration::from_secs(5));

        drop(Timer::start("test.dropped"));
        assert_eq!(metrics().timing("test.dropped").map(|t| t.count), Some(1));
    }

    #[test]
    fn test_timed_span_records_scope() {
        {
            timed_span!("test.span", stage = "parse");
        }
        assert_eq!(metrics().timing("test.span").map(|t| t.count), Some(1));
    }

    #[test]
    fn test_session_id_is_a_uuid() {
        assert!(Uuid::parse_str(session_id()).is_ok());
    }

    #[test]
    fn test_event_carries_session() {
        let event = Event::new("playback_completed", serde_json::json!({"frames": 3}));
        assert_eq!(event.session_id, session_id());
        assert_eq!(event.kind, "playback_completed");
        event.log();
    }
}
