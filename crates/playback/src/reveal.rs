//! Route line visibility and progressive reveal.

use crate::render::{layers, LayerKind, RenderSurface};
use crate::scheduler::{Scheduler, Task, Ticket};
use geojson::GeoJson;
use routeplay_core::config::RevealConfig;
use routeplay_geo::{line_string, Coordinate, LineFeature};
use std::time::Duration;

/// Shows and hides the route line, optionally drawing it one waypoint at a time.
#[derive(Debug)]
pub struct RouteReveal {
    waypoints: Vec<Coordinate>,
    revealed: usize,
    visible: bool,
    animate: bool,
    interval: Duration,
    epoch: u64,
}

impl RouteReveal {
    /// Hidden reveal over the waypoints of `feature`.
    pub fn new(feature: &LineFeature, config: &RevealConfig) -> Self {
        Self {
            waypoints: feature.coordinates.clone(),
            revealed: 0,
            visible: false,
            animate: config.animate,
            interval: config.interval(),
            epoch: 0,
        }
    }

    /// Whether the route line is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Waypoints currently drawn.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// True once every waypoint is drawn.
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.waypoints.len()
    }

    /// Adds the route layer, hidden, holding only the first waypoint.
    pub fn register(&mut self, surface: &mut dyn RenderSurface) {
        self.revealed = self.waypoints.len().min(1);
        surface.register_layer(layers::ROUTE, LayerKind::Line, self.line_data());
        surface.set_visibility(layers::ROUTE, false);
    }

    /// Flips route visibility and returns the new state.
    ///
    /// Showing an animated route restarts the reveal from the first waypoint.
    /// Hiding it cancels any reveal still in progress.
    pub fn toggle(
        &mut self,
        scheduler: &mut dyn Scheduler,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        self.epoch += 1;
        if self.visible {
            self.visible = false;
            surface.set_visibility(layers::ROUTE, false);
            return false;
        }

        self.visible = true;
        if self.animate {
            self.revealed = self.waypoints.len().min(1);
            surface.update_layer_data(layers::ROUTE, self.line_data());
            surface.set_visibility(layers::ROUTE, true);
            self.reveal_next(scheduler, surface);
        } else {
            self.revealed = self.waypoints.len();
            surface.update_layer_data(layers::ROUTE, self.line_data());
            surface.set_visibility(layers::ROUTE, true);
        }
        true
    }

    /// Continues a reveal; stale or foreign tickets are ignored.
    pub fn resume(
        &mut self,
        ticket: Ticket,
        scheduler: &mut dyn Scheduler,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        if ticket.task != Task::Reveal || ticket.epoch != self.epoch || !self.visible {
            return false;
        }
        self.reveal_next(scheduler, surface);
        true
    }

    fn reveal_next(&mut self, scheduler: &mut dyn Scheduler, surface: &mut dyn RenderSurface) {
        if self.revealed < self.waypoints.len() {
            self.revealed += 1;
            surface.update_layer_data(layers::ROUTE, self.line_data());
        }
        if self.is_complete() {
            tracing::debug!(waypoints = self.revealed, "Route fully revealed");
        } else {
            scheduler.schedule_after(self.interval, Ticket::new(Task::Reveal, self.epoch));
        }
    }

    fn line_data(&self) -> GeoJson {
        GeoJson::Geometry(line_string(&self.waypoints[..self.revealed]))
    }
}
