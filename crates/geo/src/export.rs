//! GeoJSON export.
//!
//! Route documents are published as a `FeatureCollection` of `LineString`
//! features, the shape any map surface accepts.

use crate::{Coordinate, RouteDocument};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

/// `Point` geometry for a single coordinate.
pub fn point(coord: &Coordinate) -> Geometry {
    Geometry::new(Value::Point(coord.to_position()))
}

/// `LineString` geometry for a coordinate sequence, altitude included when present.
pub fn line_string(coords: &[Coordinate]) -> Geometry {
    Geometry::new(Value::LineString(
        coords.iter().map(Coordinate::to_position).collect(),
    ))
}

/// Converts every feature of `doc` into a `LineString` feature, in source order.
///
/// ```
/// use routeplay_geo::{feature_collection, parse_route};
///
/// let doc = parse_route("<coordinates>-92.1,44.0,0 -92.11,44.01,0</coordinates>");
/// let fc = feature_collection(&doc);
/// assert_eq!(fc.features.len(), 1);
/// ```
pub fn feature_collection(doc: &RouteDocument) -> FeatureCollection {
    let features = doc
        .features
        .iter()
        .map(|feature| Feature {
            bbox: None,
            geometry: Some(line_string(&feature.coordinates)),
            id: None,
            properties: Some(JsonObject::new()),
            foreign_members: None,
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
