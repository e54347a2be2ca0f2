//! Configuration schema definitions
//!
//! Every section defaults independently, so a partial file is valid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Route parsing options
    #[serde(default)]
    pub parser: ParserConfig,

    /// Animation and dwell timing
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Route line reveal options
    #[serde(default)]
    pub reveal: RevealConfig,

    /// Logging options
    #[serde(default)]
    pub telemetry: LogConfig,
}

impl ConfigSchema {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let precision = self.parser.coordinate_precision;
        if !(1..=17).contains(&precision) {
            return Err(Error::config_validation(format!(
                "parser.coordinate_precision must be between 1 and 17, got {}",
                precision
            )));
        }
        if !self.playback.dwell_secs.is_finite() || self.playback.dwell_secs < 0.0 {
            return Err(Error::config_validation(format!(
                "playback.dwell_secs must be a non-negative number, got {}",
                self.playback.dwell_secs
            )));
        }
        if !self.playback.animation_speed.is_finite() {
            return Err(Error::config_validation("playback.animation_speed must be finite"));
        }
        if self.playback.frame_interval_ms == 0 {
            return Err(Error::config_validation("playback.frame_interval_ms must be positive"));
        }
        if self.reveal.interval_ms == 0 {
            return Err(Error::config_validation("reveal.interval_ms must be positive"));
        }
        Ok(())
    }
}

/// Route parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Significant digits coordinates are rounded to
    #[serde(default = "default_coordinate_precision")]
    pub coordinate_precision: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            coordinate_precision: default_coordinate_precision(),
        }
    }
}

fn default_coordinate_precision() -> usize {
    8
}

/// Playback timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Higher is faster; the path holds `3000 / animation_speed` points per km
    #[serde(default = "default_animation_speed")]
    pub animation_speed: f64,

    /// Pause at a stop, in seconds
    #[serde(default = "default_dwell_secs")]
    pub dwell_secs: f64,

    /// Frames at the start of a run that never dwell
    #[serde(default = "default_warmup_frames")]
    pub warmup_frames: usize,

    /// Repaint interval of the virtual scheduler
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            animation_speed: default_animation_speed(),
            dwell_secs: default_dwell_secs(),
            warmup_frames: default_warmup_frames(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl PlaybackConfig {
    /// Dwell delay as a duration
    pub fn dwell(&self) -> Duration {
        Duration::from_secs_f64(self.dwell_secs.max(0.0))
    }

    /// Repaint interval as a duration
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

fn default_animation_speed() -> f64 {
    3.0
}

fn default_dwell_secs() -> f64 {
    3.0
}

fn default_warmup_frames() -> usize {
    3
}

fn default_frame_interval_ms() -> u64 {
    16
}

/// Route line reveal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Delay between revealed waypoints
    #[serde(default = "default_reveal_interval_ms")]
    pub interval_ms: u64,

    /// Reveal the line progressively instead of all at once
    #[serde(default = "default_true")]
    pub animate: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_reveal_interval_ms(),
            animate: true,
        }
    }
}

impl RevealConfig {
    /// Reveal interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_reveal_interval_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Write logs as JSON lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
