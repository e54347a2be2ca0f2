//! Marker playback over an [`AnimationPath`].

use crate::error::Result;
use crate::path::AnimationPath;
use crate::render::{layers, LayerKind, RenderSurface};
use crate::scheduler::{Scheduler, Task, Ticket};
use crate::state::{advance_frame, DwellPolicy, NextFrame, Phase, PlaybackState};
use crate::stops::StopSet;
use geojson::GeoJson;
use routeplay_core::config::PlaybackConfig;
use routeplay_geo::{line_string, point, LineFeature};
use routeplay_telemetry::{metrics, names, Event};
use serde::Serialize;

/// Counters for the current run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Frames published
    pub frames: u64,
    /// Dwell pauses scheduled
    pub dwells: u64,
    /// Tickets ignored because they belonged to an earlier run
    pub stale_tickets: u64,
}

/// Drives a marker along a path, pausing at stops.
///
/// `Idle -> Running -> (Dwelling <-> Running)* -> Completed`. [`Player::start`]
/// is legal in any phase and begins a new run over the same path.
#[derive(Debug)]
pub struct Player {
    path: AnimationPath,
    stops: StopSet,
    policy: DwellPolicy,
    state: Option<PlaybackState>,
    epoch: u64,
    stats: RunStats,
}

impl Player {
    /// Idle player over a built path.
    pub fn new(path: AnimationPath, stops: StopSet, policy: DwellPolicy) -> Self {
        Self {
            path,
            stops,
            policy,
            state: None,
            epoch: 0,
            stats: RunStats::default(),
        }
    }

    /// Builds the path for `feature` with the configured speed and dwell.
    pub fn from_feature(
        feature: &LineFeature,
        stops: StopSet,
        config: &PlaybackConfig,
    ) -> Result<Self> {
        let path = AnimationPath::from_config(feature, config)?;
        Ok(Self::new(path, stops, DwellPolicy::from(config)))
    }

    /// Path shared by every run.
    pub fn path(&self) -> &AnimationPath {
        &self.path
    }

    /// Stops the marker pauses at.
    pub fn stops(&self) -> &StopSet {
        &self.stops
    }

    /// Warm-up and dwell settings.
    pub fn policy(&self) -> &DwellPolicy {
        &self.policy
    }

    /// State of the current run, `None` before the first start.
    pub fn state(&self) -> Option<&PlaybackState> {
        self.state.as_ref()
    }

    /// [`Phase::Idle`] until started or after [`Player::stop`].
    pub fn phase(&self) -> Phase {
        self.state.as_ref().map_or(Phase::Idle, PlaybackState::phase)
    }

    /// Generation of the current run; tickets from older ones are stale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Counters for the current run.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Adds the trail and marker layers, both placed on the first frame.
    pub fn register(&self, surface: &mut dyn RenderSurface) {
        let first = &self.path.points()[0];
        surface.register_layer(
            layers::TRAIL,
            LayerKind::Line,
            GeoJson::Geometry(line_string(std::slice::from_ref(first))),
        );
        surface.register_layer(layers::MARKER, LayerKind::Symbol, GeoJson::Geometry(point(first)));
    }

    /// Starts a new run at the first frame.
    ///
    /// Any continuation scheduled by a previous run becomes a no-op.
    pub fn start(&mut self, scheduler: &mut dyn Scheduler, surface: &mut dyn RenderSurface) {
        if self.state.is_some() {
            metrics().increment(names::PLAYBACK_RESTARTS);
            tracing::debug!(epoch = self.epoch, phase = ?self.phase(), "Restarting playback");
        }
        self.epoch += 1;
        self.state = Some(PlaybackState::new());
        self.stats = RunStats {
            stale_tickets: self.stats.stale_tickets,
            ..RunStats::default()
        };
        self.step(scheduler, surface);
    }

    /// Drops the current run and returns to [`Phase::Idle`].
    pub fn stop(&mut self) {
        self.epoch += 1;
        self.state = None;
    }

    /// Continues the run a scheduled `ticket` belongs to.
    ///
    /// Returns false, doing nothing, when the ticket is stale or not a frame
    /// ticket, or when the run has already completed.
    pub fn resume(
        &mut self,
        ticket: Ticket,
        scheduler: &mut dyn Scheduler,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        if ticket.task != Task::Frame {
            return false;
        }
        if ticket.epoch != self.epoch {
            self.stats.stale_tickets += 1;
            metrics().increment(names::STALE_TICKETS);
            tracing::debug!(ticket = ticket.epoch, current = self.epoch, "Ignoring stale frame");
            return false;
        }
        if matches!(self.phase(), Phase::Idle | Phase::Completed) {
            return false;
        }
        self.step(scheduler, surface);
        true
    }

    fn step(&mut self, scheduler: &mut dyn Scheduler, surface: &mut dyn RenderSurface) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let frame = advance_frame(state, &self.path, &self.stops, &self.policy);

        surface.update_layer_data(layers::MARKER, GeoJson::Geometry(point(&frame.marker)));
        surface.update_layer_data(
            layers::TRAIL,
            GeoJson::Geometry(line_string(state.trail().points())),
        );
        self.stats.frames += 1;
        metrics().increment(names::PLAYBACK_FRAMES);

        let ticket = Ticket::new(Task::Frame, self.epoch);
        match frame.next {
            Some(NextFrame::Immediate) => scheduler.schedule_next(ticket),
            Some(NextFrame::After(delay)) => {
                self.stats.dwells += 1;
                metrics().increment(names::PLAYBACK_DWELLS);
                let label = self
                    .stops
                    .find(&frame.marker)
                    .map(|s| s.label.as_str())
                    .unwrap_or_default();
                tracing::debug!(index = frame.index, stop = label, ?delay, "Dwelling at stop");
                scheduler.schedule_after(delay, ticket);
            }
            None => {
                Event::new(
                    "playback_completed",
                    serde_json::json!({
                        "epoch": self.epoch,
                        "frames": self.stats.frames,
                        "dwells": self.stats.dwells,
                    }),
                )
                .log();
            }
        }
    }
}
