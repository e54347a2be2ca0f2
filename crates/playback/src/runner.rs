//! Headless playback runs.

use crate::render::RenderSurface;
use crate::scheduler::VirtualScheduler;
use crate::state::Phase;
use crate::view::RouteView;
use serde::Serialize;
use std::time::Duration;

/// Outcome of a run on the virtual clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Frames in the animation path
    pub path_len: usize,
    pub frames: u64,
    pub dwells: u64,
    pub stale_tickets: u64,
    /// Virtual time from start to the last ticket, in milliseconds
    pub elapsed_ms: u64,
    pub completed: bool,
}

impl RunSummary {
    /// Summarizes the current state of `view` on `scheduler`'s clock.
    pub fn collect(view: &RouteView, scheduler: &VirtualScheduler) -> Self {
        let stats = view.player().stats();
        Self {
            path_len: view.player().path().len(),
            frames: stats.frames,
            dwells: stats.dwells,
            stale_tickets: stats.stale_tickets,
            elapsed_ms: scheduler.now().as_millis() as u64,
            completed: view.player().phase() == Phase::Completed,
        }
    }

    /// Virtual time the run took.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}

/// Starts playback and fires every ticket until the scheduler is idle.
pub fn run_virtual(
    view: &mut RouteView,
    scheduler: &mut VirtualScheduler,
    surface: &mut dyn RenderSurface,
) -> RunSummary {
    view.start_playback(scheduler, surface);
    while let Some(due) = scheduler.pop() {
        view.dispatch(due.ticket, scheduler, surface);
    }

    let summary = RunSummary::collect(view, scheduler);
    tracing::info!(
        frames = summary.frames,
        dwells = summary.dwells,
        elapsed_ms = summary.elapsed_ms,
        "Virtual run finished"
    );
    summary
}
