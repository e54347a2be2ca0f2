//! Rendering collaborator.
//!
//! The engine publishes GeoJSON data to named layers; how the layers are
//! drawn is up to the surface.

use geojson::GeoJson;
use serde::Serialize;
use std::collections::BTreeMap;

/// Layer identifiers used by the engine.
pub mod layers {
    /// Moving marker (a `Point`)
    pub const MARKER: &str = "route-marker";
    /// Route line (a `LineString`)
    pub const ROUTE: &str = "route-line";
    /// Stop points (a `FeatureCollection`)
    pub const STOPS: &str = "route-stops";
    /// Live trail (a `LineString`)
    pub const TRAIL: &str = "route-trail";
}

/// How a layer is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Symbol,
    Line,
}

/// A map-like surface the engine draws on.
pub trait RenderSurface {
    /// Adds a layer, replacing any layer already registered under `id`.
    fn register_layer(&mut self, id: &str, kind: LayerKind, initial: GeoJson);

    /// Replaces the data shown by layer `id`.
    fn update_layer_data(&mut self, id: &str, data: GeoJson);

    /// Shows or hides layer `id`.
    fn set_visibility(&mut self, id: &str, visible: bool);
}

/// Snapshot of one layer on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerState {
    pub kind: LayerKind,
    pub data: GeoJson,
    pub visible: bool,
    /// Data updates since registration
    pub updates: usize,
}

/// In-memory surface that keeps the latest state of every layer.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    layers: BTreeMap<String, LayerState>,
    history: Option<Vec<(String, GeoJson)>>,
}

impl RecordingSurface {
    /// Surface that keeps only the latest state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also keeps every data update, in order.
    pub fn with_history() -> Self {
        Self {
            layers: BTreeMap::new(),
            history: Some(Vec::new()),
        }
    }

    /// State of layer `id`, if registered.
    pub fn layer(&self, id: &str) -> Option<&LayerState> {
        self.layers.get(id)
    }

    /// Registered layers by id.
    pub fn layers(&self) -> impl Iterator<Item = (&str, &LayerState)> {
        self.layers.iter().map(|(id, state)| (id.as_str(), state))
    }

    /// False for hidden or unregistered layers.
    pub fn is_visible(&self, id: &str) -> bool {
        self.layers.get(id).is_some_and(|l| l.visible)
    }

    /// Recorded updates; empty unless created with [`RecordingSurface::with_history`].
    pub fn history(&self) -> &[(String, GeoJson)] {
        self.history.as_deref().unwrap_or_default()
    }

    /// Recorded updates to a single layer.
    pub fn updates_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GeoJson> + 'a {
        self.history()
            .iter()
            .filter(move |(layer, _)| layer == id)
            .map(|(_, data)| data)
    }
}

impl RenderSurface for RecordingSurface {
    fn register_layer(&mut self, id: &str, kind: LayerKind, initial: GeoJson) {
        self.layers.insert(
            id.to_string(),
            LayerState {
                kind,
                data: initial,
                visible: true,
                updates: 0,
            },
        );
    }

    fn update_layer_data(&mut self, id: &str, data: GeoJson) {
        if let Some(history) = self.history.as_mut() {
            history.push((id.to_string(), data.clone()));
        }
        match self.layers.get_mut(id) {
            Some(layer) => {
                layer.data = data;
                layer.updates += 1;
            }
            None => tracing::warn!(layer = id, "Update for unregistered layer"),
        }
    }

    fn set_visibility(&mut self, id: &str, visible: bool) {
        match self.layers.get_mut(id) {
            Some(layer) => layer.visible = visible,
            None => tracing::warn!(layer = id, "Visibility change for unregistered layer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routeplay_geo::{point, Coordinate};

    fn marker(lon: f64, lat: f64) -> GeoJson {
        GeoJson::Geometry(point(&Coordinate::new(lon, lat)))
    }

    #[test]
    fn test_register_update_and_hide() {
        let mut surface = RecordingSurface::new();
        surface.register_layer(layers::MARKER, LayerKind::Symbol, marker(0.0, 0.0));
        surface.update_layer_data(layers::MARKER, marker(1.0, 1.0));
        surface.set_visibility(layers::MARKER, false);

        let layer = surface.layer(layers::MARKER).unwrap();
        assert_eq!(layer.data, marker(1.0, 1.0));
        assert_eq!(layer.updates, 1);
        assert!(!surface.is_visible(layers::MARKER));
        assert!(surface.history().is_empty());
    }

    #[test]
    fn test_reregistering_replaces_layer() {
        let mut surface = RecordingSurface::new();
        surface.register_layer(layers::ROUTE, LayerKind::Line, marker(0.0, 0.0));
        surface.update_layer_data(layers::ROUTE, marker(1.0, 1.0));
        surface.register_layer(layers::ROUTE, LayerKind::Line, marker(2.0, 2.0));
        assert_eq!(surface.layer(layers::ROUTE).unwrap().updates, 0);
    }

    #[test]
    fn test_history_records_updates_per_layer() {
        let mut surface = RecordingSurface::with_history();
        surface.register_layer(layers::MARKER, LayerKind::Symbol, marker(0.0, 0.0));
        surface.register_layer(layers::TRAIL, LayerKind::Line, marker(0.0, 0.0));
        surface.update_layer_data(layers::MARKER, marker(1.0, 1.0));
        surface.update_layer_data(layers::TRAIL, marker(2.0, 2.0));
        surface.update_layer_data(layers::MARKER, marker(3.0, 3.0));

        assert_eq!(surface.history().len(), 3);
        assert_eq!(surface.updates_to(layers::MARKER).count(), 2);
    }

    #[test]
    fn test_unknown_layer_is_ignored() {
        let mut surface = RecordingSurface::new();
        surface.update_layer_data("missing", marker(0.0, 0.0));
        surface.set_visibility("missing", true);
        assert!(surface.layer("missing").is_none());
    }
}
