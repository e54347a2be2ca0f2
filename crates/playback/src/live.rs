//! Live position tracking.
//!
//! Devices publish `{"type": "geo_position", "coordinates": [lon, lat]}`
//! notifications. The tracker moves the marker to each reported position and
//! extends the trail with it. Other notifications share the stream and may
//! carry any shape; they are skipped without being decoded.

use crate::render::{layers, LayerKind, RenderSurface};
use crate::trail::Trail;
use geojson::GeoJson;
use routeplay_geo::{line_string, point, Coordinate, LineFeature};
use routeplay_telemetry::{metrics, names};
use serde::{Deserialize, Serialize};

/// Notification type carrying a device position.
pub const GEO_POSITION: &str = "geo_position";

/// A notification from the live position stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
    /// Milliseconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

impl PositionUpdate {
    /// A `geo_position` notification.
    pub fn position(coordinates: Coordinate) -> Self {
        Self {
            kind: GEO_POSITION.to_string(),
            coordinates: Some(coordinates),
            ts: None,
        }
    }

    /// Stamps the notification, in milliseconds since the Unix epoch.
    pub fn with_timestamp(mut self, ts: i64) -> Self {
        self.ts = Some(ts);
        self
    }

    /// The reported position, if this is a position notification.
    pub fn as_position(&self) -> Option<Coordinate> {
        if self.kind == GEO_POSITION {
            self.coordinates
        } else {
            None
        }
    }

    /// One `geo_position` notification per waypoint of `feature`, stamped
    /// `interval_ms` apart starting at `start_ms`.
    pub fn feed_from_route(feature: &LineFeature, start_ms: i64, interval_ms: i64) -> Vec<Self> {
        feature
            .coordinates
            .iter()
            .enumerate()
            .map(|(i, coord)| {
                Self::position(*coord).with_timestamp(start_ms + i as i64 * interval_ms)
            })
            .collect()
    }
}

/// Replication direction of a [`ChangeBatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Pull,
    Push,
}

/// A batch of documents reported by a replication change event.
///
/// Documents stay raw JSON until [`LiveTracker::apply_change`] picks out the
/// positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeBatch {
    pub direction: Direction,
    #[serde(default)]
    pub docs: Vec<serde_json::Value>,
}

/// Marker and trail driven by reported positions.
#[derive(Debug, Default)]
pub struct LiveTracker {
    marker: Option<Coordinate>,
    trail: Trail,
    applied: u64,
    ignored: u64,
}

impl LiveTracker {
    /// Tracker with no position yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the marker and trail layers at `initial`; the trail starts hidden.
    pub fn register(&self, surface: &mut dyn RenderSurface, initial: Coordinate) {
        surface.register_layer(
            layers::MARKER,
            LayerKind::Symbol,
            GeoJson::Geometry(point(&initial)),
        );
        surface.register_layer(
            layers::TRAIL,
            LayerKind::Line,
            GeoJson::Geometry(line_string(&[initial])),
        );
        surface.set_visibility(layers::TRAIL, false);
    }

    /// Applies one notification. Returns false if it was not a position.
    pub fn ingest(&mut self, update: &PositionUpdate, surface: &mut dyn RenderSurface) -> bool {
        let Some(position) = update.as_position() else {
            self.ignored += 1;
            tracing::trace!(kind = %update.kind, "Ignoring notification");
            return false;
        };

        self.marker = Some(position);
        self.trail.record(position);
        self.applied += 1;
        metrics().increment(names::LIVE_POSITIONS);

        surface.update_layer_data(layers::MARKER, GeoJson::Geometry(point(&position)));
        surface.update_layer_data(
            layers::TRAIL,
            GeoJson::Geometry(line_string(self.trail.points())),
        );
        true
    }

    /// Applies a raw JSON notification.
    ///
    /// Only `geo_position` documents are decoded; anything else, and a
    /// position whose coordinates cannot be read, is counted as ignored.
    pub fn ingest_value(
        &mut self,
        doc: &serde_json::Value,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        let kind = doc.get("type").and_then(serde_json::Value::as_str).unwrap_or_default();
        if kind != GEO_POSITION {
            self.ignored += 1;
            tracing::trace!(kind, "Ignoring notification");
            return false;
        }
        match PositionUpdate::deserialize(doc) {
            Ok(update) => self.ingest(&update, surface),
            Err(e) => {
                self.ignored += 1;
                tracing::warn!(error = %e, "Ignoring unreadable position");
                false
            }
        }
    }

    /// Applies the documents of a pulled batch; pushed batches are local
    /// writes and are skipped. Returns the number of positions applied.
    pub fn apply_change(&mut self, batch: &ChangeBatch, surface: &mut dyn RenderSurface) -> usize {
        if batch.direction != Direction::Pull {
            return 0;
        }
        let mut applied = 0;
        for doc in &batch.docs {
            if self.ingest_value(doc, surface) {
                applied += 1;
            }
        }
        applied
    }

    /// Starts a new session: the next position reinitializes the trail.
    pub fn reset(&mut self) {
        self.trail.reset();
    }

    /// Last applied position.
    pub fn marker(&self) -> Option<Coordinate> {
        self.marker
    }

    /// Positions applied since the last reset.
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Positions applied so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Notifications skipped because they were not positions.
    pub fn ignored(&self) -> u64 {
        self.ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    fn setup() -> (LiveTracker, RecordingSurface) {
        let tracker = LiveTracker::new();
        let mut surface = RecordingSurface::new();
        tracker.register(&mut surface, Coordinate::new(-71.09, 42.35));
        (tracker, surface)
    }

    #[test]
    fn test_deserialize_notification() {
        let update: PositionUpdate =
            serde_json::from_str(r#"{"type":"geo_position","coordinates":[-92.1,44.0]}"#).unwrap();
        assert_eq!(update.as_position(), Some(Coordinate::new(-92.1, 44.0)));

        let other: PositionUpdate = serde_json::from_str(r#"{"type":"chat","text":"hi"}"#).unwrap();
        assert_eq!(other.kind, "chat");
        assert!(other.as_position().is_none());
    }

    #[test]
    fn test_ingest_moves_marker_and_extends_trail() {
        let (mut tracker, mut surface) = setup();
        tracker.ingest(&PositionUpdate::position(Coordinate::new(1.0, 1.0)), &mut surface);
        tracker.ingest(&PositionUpdate::position(Coordinate::new(2.0, 2.0)), &mut surface);

        assert_eq!(tracker.marker(), Some(Coordinate::new(2.0, 2.0)));
        assert_eq!(tracker.trail().len(), 2);
        assert_eq!(
            surface.layer(layers::TRAIL).unwrap().data,
            GeoJson::Geometry(line_string(&[Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0)]))
        );
        assert_eq!(surface.layer(layers::MARKER).unwrap().updates, 2);
    }

    #[test]
    fn test_other_types_are_ignored() {
        let (mut tracker, mut surface) = setup();
        let update = PositionUpdate {
            kind: "Feature".to_string(),
            coordinates: Some(Coordinate::new(1.0, 1.0)),
            ts: None,
        };
        assert!(!tracker.ingest(&update, &mut surface));
        assert!(tracker.marker().is_none());
        assert_eq!(tracker.ignored(), 1);
        assert_eq!(surface.layer(layers::MARKER).unwrap().updates, 0);
    }

    #[test]
    fn test_only_pull_batches_apply() {
        let (mut tracker, mut surface) = setup();
        let batch: ChangeBatch = serde_json::from_str(
            r#"{"direction":"pull","docs":[
                {"type":"geo_position","coordinates":[1.0,1.0]},
                {"_id":"settings"},
                {"type":"geo_position","coordinates":[2.0,2.0,10.0]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(tracker.apply_change(&batch, &mut surface), 2);

        let pushed = ChangeBatch {
            direction: Direction::Push,
            ..batch
        };
        assert_eq!(tracker.apply_change(&pushed, &mut surface), 0);
        assert_eq!(tracker.applied(), 2);
    }

    #[test]
    fn test_foreign_documents_do_not_spoil_a_batch() {
        let (mut tracker, mut surface) = setup();
        let batch: ChangeBatch = serde_json::from_str(
            r#"{"direction":"pull","docs":[
                {"type":"geo_position","coordinates":[1.0,1.0]},
                {"type":"route","coordinates":[[1,2],[3,4]]},
                {"type":"geo_position","coordinates":[2.0,2.0]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(tracker.apply_change(&batch, &mut surface), 2);
        assert_eq!(tracker.ignored(), 1);
        assert_eq!(
            tracker.trail().points(),
            &[Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0)]
        );
    }

    #[test]
    fn test_unreadable_position_is_ignored() {
        let (mut tracker, mut surface) = setup();
        let doc = serde_json::json!({"type": "geo_position", "coordinates": "nowhere"});
        assert!(!tracker.ingest_value(&doc, &mut surface));
        assert_eq!(tracker.ignored(), 1);

        let doc = serde_json::json!({"type": "geo_position", "coordinates": [3.0, 4.0]});
        assert!(tracker.ingest_value(&doc, &mut surface));
        assert_eq!(tracker.marker(), Some(Coordinate::new(3.0, 4.0)));
    }

    #[test]
    fn test_reset_reinitializes_trail() {
        let (mut tracker, mut surface) = setup();
        tracker.ingest(&PositionUpdate::position(Coordinate::new(1.0, 1.0)), &mut surface);
        tracker.ingest(&PositionUpdate::position(Coordinate::new(2.0, 2.0)), &mut surface);
        tracker.reset();
        tracker.ingest(&PositionUpdate::position(Coordinate::new(3.0, 3.0)), &mut surface);
        assert_eq!(tracker.trail().points(), &[Coordinate::new(3.0, 3.0)]);
    }

    #[test]
    fn test_feed_from_route() {
        let route = LineFeature::new(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)]);
        let feed = PositionUpdate::feed_from_route(&route, 1_000, 1_000);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[1].ts, Some(2_000));
        assert!(feed.iter().all(|u| u.kind == GEO_POSITION));

        let line = serde_json::to_string(&feed[0]).unwrap();
        assert_eq!(line, r#"{"type":"geo_position","coordinates":[0.0,0.0],"ts":1000}"#);
    }
}
