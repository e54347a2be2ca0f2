//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::Coordinate;

/// Earth's mean radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = EARTH_RADIUS_KM * 1000.0;

/// Central angle between two coordinates on the unit sphere, in radians.
///
/// This is the angular distance `d` the interpolator slerps over.
///
/// # Example
/// ```
/// use routeplay_geo::{central_angle, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(90.0, 0.0);
/// assert!((central_angle(&a, &b) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
#[inline]
pub fn central_angle(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// # Example
/// ```
/// use routeplay_geo::{haversine_distance, Coordinate};
///
/// let berlin = Coordinate::new(13.4050, 52.5200);
/// let paris = Coordinate::new(2.3522, 48.8566);
///
/// let distance = haversine_distance(&berlin, &paris);
/// assert!((distance - 878.0).abs() < 10.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    central_angle(from, to) * EARTH_RADIUS_KM
}

/// Calculates the great-circle distance between two coordinates in meters.
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    central_angle(from, to) * EARTH_RADIUS_M
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN: Coordinate = Coordinate::new(13.4050, 52.5200);
    const PARIS: Coordinate = Coordinate::new(2.3522, 48.8566);
    const NEW_YORK: Coordinate = Coordinate::new(-74.0060, 40.7128);
    const TOKYO: Coordinate = Coordinate::new(139.6503, 35.6762);

    #[test]
    fn test_berlin_to_paris() {
        let distance = haversine_distance(&BERLIN, &PARIS);
        // Expected: ~878 km
        assert!((distance - 878.0).abs() < 5.0, "Berlin-Paris: {}", distance);
    }

    #[test]
    fn test_new_york_to_tokyo() {
        let distance = haversine_distance(&NEW_YORK, &TOKYO);
        // Expected: ~10,838 km
        assert!((distance - 10838.0).abs() < 50.0, "NYC-Tokyo: {}", distance);
    }

    #[test]
    fn test_same_point_zero_distance() {
        assert_eq!(central_angle(&BERLIN, &BERLIN), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let d1 = central_angle(&BERLIN, &PARIS);
        let d2 = central_angle(&PARIS, &BERLIN);
        assert!((d1 - d2).abs() < 1e-15);
    }

    #[test]
    fn test_meters_conversion() {
        let km = haversine_distance(&BERLIN, &PARIS);
        let meters = haversine_distance_meters(&BERLIN, &PARIS);
        assert!((meters - km * 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_short_segment_matches_vincenty_reference() {
        let from = Coordinate::new(-92.1, 44.0);
        let to = Coordinate::new(-92.11, 44.01);

        // Independent reference: the Vincenty form of the great-circle angle,
        // which stays well conditioned for short arcs.
        let (lat1, lon1) = (44.0_f64.to_radians(), (-92.1_f64).to_radians());
        let (lat2, lon2) = (44.01_f64.to_radians(), (-92.11_f64).to_radians());
        let d_lon = lon2 - lon1;
        let num = ((lat2.cos() * d_lon.sin()).powi(2)
            + (lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos()).powi(2))
        .sqrt();
        let den = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * d_lon.cos();
        let reference = num.atan2(den);

        let angle = central_angle(&from, &to);
        assert!((angle - reference).abs() < 1e-9, "{} vs {}", angle, reference);
        // ~1.37 km on the ground
        assert!((haversine_distance(&from, &to) - 1.37).abs() < 0.01);
    }
}
