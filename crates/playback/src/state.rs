//! Frame advancement.
//!
//! [`advance_frame`] is the pure core of playback: it reads the marker for
//! the current cursor, decides whether the next frame follows immediately or
//! after a dwell, and moves the cursor. Scheduling and rendering live in
//! [`crate::Player`].

use crate::path::AnimationPath;
use crate::stops::StopSet;
use crate::trail::Trail;
use routeplay_core::config::PlaybackConfig;
use routeplay_geo::Coordinate;
use serde::Serialize;
use std::time::Duration;

/// Lifecycle of a playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No run has started
    Idle,
    /// Frames follow one another at the repaint rate
    Running,
    /// Paused at a stop
    Dwelling,
    /// The last frame has been shown
    Completed,
}

/// Mutable state of one run over an [`AnimationPath`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    cursor: usize,
    phase: Phase,
    trail: Trail,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackState {
    /// Fresh state at cursor 0, ready to run.
    pub fn new() -> Self {
        Self {
            cursor: 0,
            phase: Phase::Running,
            trail: Trail::new(),
        }
    }

    /// Index of the next frame to show.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Phase after the most recent frame.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Frames shown so far in this run.
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// True once the last frame has been shown.
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }
}

/// When to pause at stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwellPolicy {
    /// Stops matched at or before this cursor are passed without pausing
    pub warmup_frames: usize,
    /// Pause length at a stop
    pub dwell: Duration,
}

impl Default for DwellPolicy {
    fn default() -> Self {
        Self::from(&PlaybackConfig::default())
    }
}

impl From<&PlaybackConfig> for DwellPolicy {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            warmup_frames: config.warmup_frames,
            dwell: config.dwell(),
        }
    }
}

/// How the frame after this one should be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextFrame {
    /// At the next repaint
    Immediate,
    /// After a dwell pause
    After(Duration),
}

/// Result of one [`advance_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Path index of the marker
    pub index: usize,
    /// Marker position to publish
    pub marker: Coordinate,
    /// `None` once the path is exhausted
    pub next: Option<NextFrame>,
}

impl Frame {
    /// True for the last frame of the path.
    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }

    /// True when the next frame waits out a dwell.
    pub fn is_dwell(&self) -> bool {
        matches!(self.next, Some(NextFrame::After(_)))
    }
}

/// Produces the frame at the state's cursor and advances the state.
///
/// Every frame past the warm-up window whose marker sits exactly on a stop
/// schedules the next frame after the dwell delay. A segment's first point
/// repeats its waypoint, so a stop on an interior waypoint pauses on both
/// frames.
///
/// At the last index the state becomes [`Phase::Completed`] and stays there:
/// further calls return the same terminal frame without side effects.
pub fn advance_frame(
    state: &mut PlaybackState,
    path: &AnimationPath,
    stops: &StopSet,
    policy: &DwellPolicy,
) -> Frame {
    let last = path.last_index();
    let index = state.cursor.min(last);
    let marker = path.points()[index];

    if index == last {
        if state.phase != Phase::Completed {
            state.trail.record(marker);
            state.phase = Phase::Completed;
        }
        state.cursor = index;
        return Frame {
            index,
            marker,
            next: None,
        };
    }

    state.trail.record(marker);
    let at_stop = index > policy.warmup_frames && stops.contains(&marker);
    state.cursor = index + 1;

    let next = if at_stop {
        state.phase = Phase::Dwelling;
        NextFrame::After(policy.dwell)
    } else {
        state.phase = Phase::Running;
        NextFrame::Immediate
    };

    Frame {
        index,
        marker,
        next: Some(next),
    }
}
