//! Route view orchestration.
//!
//! A [`RouteView`] owns everything shown for one route: the marker
//! [`Player`], the [`RouteReveal`] and the stop layer. Hosts forward every
//! due [`Ticket`] to [`RouteView::dispatch`].

use crate::error::{PlaybackError, Result};
use crate::player::Player;
use crate::render::{layers, LayerKind, RenderSurface};
use crate::reveal::RouteReveal;
use crate::scheduler::{Scheduler, Task, Ticket};
use crate::stops::StopSet;
use geojson::GeoJson;
use routeplay_core::config::ConfigSchema;
use routeplay_geo::{BoundingBox, LineFeature, RouteDocument};

#[derive(Debug)]
pub struct RouteView {
    player: Player,
    reveal: RouteReveal,
    bounds: Option<BoundingBox>,
    stops_visible: bool,
}

impl RouteView {
    /// View over `feature`, framed to include its stops.
    pub fn new(feature: &LineFeature, stops: StopSet, config: &ConfigSchema) -> Result<Self> {
        let player = Player::from_feature(feature, stops, &config.playback)?;
        let mut bounds = feature.bounds();
        if let Some(b) = bounds.as_mut() {
            for stop in player.stops().iter() {
                b.extend(&stop.position);
            }
        }

        Ok(Self {
            player,
            reveal: RouteReveal::new(feature, &config.reveal),
            bounds,
            stops_visible: true,
        })
    }

    /// View over the first feature of `doc`; later features are not animated.
    pub fn from_document(
        doc: &RouteDocument,
        stops: StopSet,
        config: &ConfigSchema,
    ) -> Result<Self> {
        let feature = doc
            .first_feature()
            .ok_or(PlaybackError::InvalidRoute { waypoints: 0 })?;
        if doc.features.len() > 1 {
            tracing::debug!(ignored = doc.features.len() - 1, "Animating first feature only");
        }
        Self::new(feature, stops, config)
    }

    /// Adds the route, stop, trail and marker layers, bottom to top.
    pub fn register(&mut self, surface: &mut dyn RenderSurface) {
        self.reveal.register(surface);
        surface.register_layer(
            layers::STOPS,
            LayerKind::Symbol,
            GeoJson::FeatureCollection(self.player.stops().to_feature_collection()),
        );
        surface.set_visibility(layers::STOPS, self.stops_visible);
        self.player.register(surface);
    }

    /// Extent of the route and its stops, for fitting the camera.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Marker playback.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Route line reveal.
    pub fn reveal(&self) -> &RouteReveal {
        &self.reveal
    }

    /// Starts (or restarts) the marker.
    pub fn start_playback(
        &mut self,
        scheduler: &mut dyn Scheduler,
        surface: &mut dyn RenderSurface,
    ) {
        self.player.start(scheduler, surface);
    }

    /// Shows or hides the route line; returns the new visibility.
    pub fn toggle_route(
        &mut self,
        scheduler: &mut dyn Scheduler,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        self.reveal.toggle(scheduler, surface)
    }

    /// Shows or hides the stop layer; returns the new visibility.
    pub fn toggle_stops(&mut self, surface: &mut dyn RenderSurface) -> bool {
        self.stops_visible = !self.stops_visible;
        surface.set_visibility(layers::STOPS, self.stops_visible);
        self.stops_visible
    }

    /// Routes a due ticket to its owner. Returns false if it was stale.
    pub fn dispatch(
        &mut self,
        ticket: Ticket,
        scheduler: &mut dyn Scheduler,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        match ticket.task {
            Task::Frame => self.player.resume(ticket, scheduler, surface),
            Task::Reveal => self.reveal.resume(ticket, scheduler, surface),
        }
    }
}
