//! Geodesic primitives for route playback.
//!
//! This crate provides:
//! - Haversine distance (central angle, kilometres, metres)
//! - Great-circle interpolation between two coordinates
//! - Tolerant KML `<coordinates>` parsing into line features
//! - GeoJSON export of parsed route documents
//!
//! # Example
//!
//! ```
//! use routeplay_geo::{parse_route, points_between, central_angle};
//!
//! let doc = parse_route("<coordinates>-92.1,44.0,0 -92.11,44.01,0</coordinates>");
//! let line = &doc.features[0].coordinates;
//! assert_eq!(line.len(), 2);
//!
//! let angle = central_angle(&line[0], &line[1]);
//! assert!(angle > 0.0);
//!
//! let between = points_between(&line[0], &line[1], 10);
//! assert_eq!(between.len(), 10);
//! ```

mod error;
mod export;
mod geodesic;
mod haversine;
pub mod kml;

pub use error::{GeoError, GeoErrorCode, Result};
pub use export::{feature_collection, line_string, point};
pub use geodesic::{points_between, points_per_km, segment_steps};
pub use haversine::{
    central_angle, haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M,
};
pub use kml::{parse_route, parse_route_strict, KmlParser, LineFeature, RouteDocument};

use serde::{Deserialize, Serialize};

/// Number of significant digits coordinates are normalized to on ingestion.
pub const COORDINATE_PRECISION: usize = 8;

/// A geographic coordinate in degrees, with optional pass-through altitude.
///
/// Serialized as a GeoJSON position: `[longitude, latitude]` or
/// `[longitude, latitude, altitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Coordinate {
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Altitude, carried through untouched
    pub altitude: Option<f64>,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `longitude` - Longitude in degrees (-180 to 180)
    /// * `latitude` - Latitude in degrees (-90 to 90)
    #[inline]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude: None,
        }
    }

    /// Returns a copy of this coordinate carrying the given altitude.
    #[inline]
    pub const fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Exact match on longitude and latitude. Altitude is ignored.
    #[inline]
    pub fn same_position(&self, other: &Coordinate) -> bool {
        self.longitude == other.longitude && self.latitude == other.latitude
    }

    /// Copy with every component rounded to `digits` significant digits.
    pub fn rounded(&self, digits: usize) -> Self {
        Self {
            longitude: round_significant(self.longitude, digits),
            latitude: round_significant(self.latitude, digits),
            altitude: self.altitude.map(|alt| round_significant(alt, digits)),
        }
    }

    /// Converts degrees to radians for internal calculations, as `(lat, lon)`.
    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }

    /// GeoJSON position for this coordinate.
    pub fn to_position(&self) -> Vec<f64> {
        match self.altitude {
            Some(alt) => vec![self.longitude, self.latitude, alt],
            None => vec![self.longitude, self.latitude],
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self::new(lng, lat)
    }
}

impl TryFrom<Vec<f64>> for Coordinate {
    type Error = GeoError;

    fn try_from(position: Vec<f64>) -> Result<Self> {
        match position.as_slice() {
            [lng, lat] => Ok(Self::new(*lng, *lat)),
            [lng, lat, alt, ..] => Ok(Self::new(*lng, *lat).with_altitude(*alt)),
            _ => Err(GeoError::InvalidCoordinate(format!(
                "expected at least 2 components, got {}",
                position.len()
            ))),
        }
    }
}

impl From<Coordinate> for Vec<f64> {
    fn from(coord: Coordinate) -> Self {
        coord.to_position()
    }
}

/// Rounds `value` to `digits` significant digits.
///
/// Zero, non-finite values and `digits == 0` are returned unchanged.
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if value == 0.0 || !value.is_finite() || digits == 0 {
        return value;
    }
    format!("{:.*e}", digits - 1, value)
        .parse()
        .unwrap_or(value)
}

/// Axis-aligned extent of a set of coordinates, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_longitude: f64,
    pub min_latitude: f64,
    pub max_longitude: f64,
    pub max_latitude: f64,
}

impl BoundingBox {
    /// Smallest box containing every coordinate, or `None` for an empty input.
    pub fn from_coordinates<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min_longitude: first.longitude,
            min_latitude: first.latitude,
            max_longitude: first.longitude,
            max_latitude: first.latitude,
        };
        for coord in iter {
            bounds.extend(coord);
        }
        Some(bounds)
    }

    /// Grows the box to include `coord`.
    pub fn extend(&mut self, coord: &Coordinate) {
        self.min_longitude = self.min_longitude.min(coord.longitude);
        self.min_latitude = self.min_latitude.min(coord.latitude);
        self.max_longitude = self.max_longitude.max(coord.longitude);
        self.max_latitude = self.max_latitude.max(coord.latitude);
    }

    /// Centre of the box as a coordinate.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_longitude + self.max_longitude) / 2.0,
            (self.min_latitude + self.max_latitude) / 2.0,
        )
    }
}
