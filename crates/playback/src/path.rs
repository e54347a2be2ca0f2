//! Animation path assembly.
//!
//! A path is the route's waypoints with great-circle points synthesized
//! between each consecutive pair:
//! `[W0] + between(W0, W1) + [W1] + between(W1, W2) + [W2] ...`

use crate::error::{PlaybackError, Result};
use routeplay_core::config::PlaybackConfig;
use routeplay_geo::{points_between, points_per_km, segment_steps, Coordinate, LineFeature};
use routeplay_telemetry::{names, Timer};

/// Dense coordinate sequence the marker travels along, one entry per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPath {
    points: Vec<Coordinate>,
    waypoint_offsets: Vec<usize>,
}

impl AnimationPath {
    /// Builds the path for `feature` at the given density.
    ///
    /// Waypoints are inserted exactly as parsed, so a stop placed on a
    /// waypoint matches the frame that reaches it.
    ///
    /// # Errors
    /// [`PlaybackError::InvalidRoute`] when the feature has fewer than two
    /// waypoints.
    pub fn build(feature: &LineFeature, points_per_km: f64) -> Result<Self> {
        let waypoints = &feature.coordinates;
        if waypoints.len() < 2 {
            return Err(PlaybackError::InvalidRoute {
                waypoints: waypoints.len(),
            });
        }

        let timer = Timer::start(names::PATH_BUILD);
        let mut points = Vec::with_capacity(waypoints.len());
        let mut waypoint_offsets = Vec::with_capacity(waypoints.len());

        points.push(waypoints[0]);
        waypoint_offsets.push(0);
        for pair in waypoints.windows(2) {
            let steps = segment_steps(&pair[0], &pair[1], points_per_km);
            points.extend(points_between(&pair[0], &pair[1], steps));
            waypoint_offsets.push(points.len());
            points.push(pair[1]);
        }
        let elapsed = timer.stop();

        tracing::debug!(
            waypoints = waypoints.len(),
            frames = points.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "Built animation path"
        );

        Ok(Self {
            points,
            waypoint_offsets,
        })
    }

    /// Builds the path using the configured animation speed.
    pub fn from_config(feature: &LineFeature, config: &PlaybackConfig) -> Result<Self> {
        Self::build(feature, points_per_km(config.animation_speed))
    }

    /// All frames in travel order.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a path holds at least its two end waypoints.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Frame at `index`.
    pub fn get(&self, index: usize) -> Option<&Coordinate> {
        self.points.get(index)
    }

    /// Index of the final frame.
    pub fn last_index(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Frame index of each original waypoint.
    pub fn waypoint_offsets(&self) -> &[usize] {
        &self.waypoint_offsets
    }
}
