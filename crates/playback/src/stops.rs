//! Labelled stop locations.
//!
//! Stops are read from a GeoJSON `FeatureCollection` of `Point` features.
//! The label comes from the `title` property, falling back to `name`.
//! Positions are rounded like parsed route coordinates so a stop written at
//! source precision still matches its waypoint.

use crate::error::{PlaybackError, Result};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, Value};
use routeplay_geo::{point, Coordinate, GeoError, COORDINATE_PRECISION};
use serde::{Deserialize, Serialize};

/// A labelled location the marker pauses at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub label: String,
    pub position: Coordinate,
}

impl Stop {
    /// Stop at `position`, used as given.
    pub fn new(label: impl Into<String>, position: Coordinate) -> Self {
        Self {
            label: label.into(),
            position,
        }
    }
}

/// Collection of stops. Membership is exact equality on longitude and latitude.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopSet {
    stops: Vec<Stop>,
}

impl StopSet {
    /// Set over `stops`, in order.
    pub fn new(stops: Vec<Stop>) -> Self {
        Self { stops }
    }

    /// Set with no stops; playback never dwells.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// True when playback can never dwell.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter()
    }

    /// True if any stop sits exactly at `position`.
    pub fn contains(&self, position: &Coordinate) -> bool {
        self.find(position).is_some()
    }

    /// First stop sitting exactly at `position`.
    pub fn find(&self, position: &Coordinate) -> Option<&Stop> {
        self.stops.iter().find(|s| s.position.same_position(position))
    }

    /// Parses a GeoJSON document of point features, rounding positions to
    /// [`COORDINATE_PRECISION`] significant digits.
    ///
    /// Accepts a `FeatureCollection` or a single `Feature`. Any feature
    /// without a `Point` geometry makes the whole document invalid.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        Self::from_geojson_str_with_precision(text, COORDINATE_PRECISION)
    }

    /// Like [`StopSet::from_geojson_str`], rounding to `precision` digits.
    pub fn from_geojson_str_with_precision(text: &str, precision: usize) -> Result<Self> {
        let geojson: GeoJson = text.parse().map_err(GeoError::from)?;
        let features = match geojson {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(PlaybackError::InvalidStops(
                    "expected a Feature or FeatureCollection, found a bare geometry".to_string(),
                ))
            }
        };

        let stops = features
            .iter()
            .enumerate()
            .map(|(index, feature)| stop_from_feature(index, feature, precision))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(stops = stops.len(), "Loaded stops");
        Ok(Self { stops })
    }

    /// Stops as point features carrying a `title` property.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .stops
            .iter()
            .map(|stop| {
                let mut properties = JsonObject::new();
                properties.insert("title".to_string(), stop.label.clone().into());
                Feature {
                    bbox: None,
                    geometry: Some(point(&stop.position)),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

impl FromIterator<Stop> for StopSet {
    fn from_iter<I: IntoIterator<Item = Stop>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn stop_from_feature(index: usize, feature: &Feature, precision: usize) -> Result<Stop> {
    let position = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(position)) => Coordinate::try_from(position.clone())?.rounded(precision),
        Some(other) => {
            return Err(PlaybackError::InvalidStops(format!(
                "feature {} is a {}, expected Point",
                index,
                geometry_kind(other)
            )))
        }
        None => {
            return Err(PlaybackError::InvalidStops(format!(
                "feature {} has no geometry",
                index
            )))
        }
    };

    let label = feature
        .properties
        .as_ref()
        .and_then(|props| props.get("title").or_else(|| props.get("name")))
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_string();

    Ok(Stop { label, position })
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOPS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"title": "Depot"},
             "geometry": {"type": "Point", "coordinates": [-92.1, 44.0]}},
            {"type": "Feature", "properties": {"name": "Market"},
             "geometry": {"type": "Point", "coordinates": [-92.11, 44.01, 250.0]}},
            {"type": "Feature", "properties": null,
             "geometry": {"type": "Point", "coordinates": [-92.12, 44.0]}}
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let stops = StopSet::from_geojson_str(STOPS).unwrap();
        let labels: Vec<&str> = stops.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Depot", "Market", ""]);
        assert_eq!(stops.len(), 3);
    }

    #[test]
    fn test_membership_is_exact_and_ignores_altitude() {
        let stops = StopSet::from_geojson_str(STOPS).unwrap();
        assert!(stops.contains(&Coordinate::new(-92.11, 44.01)));
        assert!(stops.contains(&Coordinate::new(-92.1, 44.0).with_altitude(9.0)));
        assert!(!stops.contains(&Coordinate::new(-92.1, 44.000000001)));
        assert_eq!(
            stops.find(&Coordinate::new(-92.1, 44.0)).map(|s| s.label.as_str()),
            Some("Depot")
        );
    }

    #[test]
    fn test_positions_rounded_like_route_coordinates() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"title": "Precise"},
             "geometry": {"type": "Point", "coordinates": [-92.123456789, 44.123456789]}}
        ]}"#;
        let waypoint = routeplay_geo::parse_route(
            "<coordinates>-92.123456789,44.123456789,0</coordinates>",
        )
        .features[0]
            .coordinates[0];

        let stops = StopSet::from_geojson_str(text).unwrap();
        assert!(stops.contains(&waypoint));
        assert_eq!(stops.iter().next().map(|s| s.position.latitude), Some(44.123457));

        let coarse = StopSet::from_geojson_str_with_precision(text, 4).unwrap();
        assert!(coarse.contains(&Coordinate::new(-92.12, 44.12)));
    }

    #[test]
    fn test_single_feature_is_accepted() {
        let text = r#"{"type": "Feature", "properties": {"title": "Only"},
            "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}"#;
        let stops = StopSet::from_geojson_str(text).unwrap();
        assert_eq!(stops.len(), 1);
    }

    #[test]
    fn test_non_point_feature_is_rejected() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {},
             "geometry": {"type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]]}}
        ]}"#;
        let err = StopSet::from_geojson_str(text).unwrap_err();
        assert!(matches!(err, PlaybackError::InvalidStops(msg) if msg.contains("LineString")));
    }

    #[test]
    fn test_bare_geometry_is_rejected() {
        let text = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#;
        assert!(matches!(
            StopSet::from_geojson_str(text),
            Err(PlaybackError::InvalidStops(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            StopSet::from_geojson_str("{not json"),
            Err(PlaybackError::Geo(_))
        ));
    }

    #[test]
    fn test_feature_collection_round_trips_labels() {
        let stops: StopSet = [Stop::new("A", Coordinate::new(1.0, 2.0))].into_iter().collect();
        let value = serde_json::to_value(stops.to_feature_collection()).unwrap();
        assert_eq!(value["features"][0]["properties"]["title"], "A");
        assert_eq!(value["features"][0]["geometry"]["type"], "Point");
    }
}
