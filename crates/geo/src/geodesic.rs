//! Great-circle interpolation.
//!
//! Points are synthesized with spherical linear interpolation (slerp) between
//! the unit vectors of the two endpoints, so that equal steps in `f` cover
//! equal arc lengths along the geodesic.

use crate::{central_angle, haversine_distance, Coordinate};

/// Frames per kilometre at animation speed 1.
const BASE_POINTS_PER_KM: f64 = 3000.0;

/// Converts an animation speed into a "points per kilometre" density.
///
/// Higher speeds produce fewer synthesized points. Non-positive speeds are
/// treated as 1.
///
/// ```
/// use routeplay_geo::points_per_km;
///
/// assert_eq!(points_per_km(3.0), 1000.0);
/// assert_eq!(points_per_km(0.0), 3000.0);
/// ```
#[inline]
pub fn points_per_km(animation_speed: f64) -> f64 {
    let speed = if animation_speed > 0.0 { animation_speed } else { 1.0 };
    BASE_POINTS_PER_KM / speed
}

/// Number of interpolation steps for the segment `from -> to`.
///
/// Proportional to the segment's great-circle length, so every segment is
/// animated at the same ground speed.
#[inline]
pub fn segment_steps(from: &Coordinate, to: &Coordinate, points_per_km: f64) -> i64 {
    (haversine_distance(from, to) * points_per_km).ceil() as i64
}

/// Points on the great-circle arc from `from` towards `to`.
///
/// Returns `steps` points at fractional progress `i / steps` for
/// `i in 0..steps`; `to` itself is never included. The first point is `from`'s
/// exact position (without altitude). If both endpoints share the
/// same position the result is `[from]` regardless of `steps`. Zero or
/// negative `steps` yield an empty vector.
///
/// Endpoints that differ by less than floating point can resolve (or are
/// antipodal) make `sin(d)` vanish; such input is not guarded.
///
/// # Example
/// ```
/// use routeplay_geo::{points_between, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(10.0, 0.0);
/// let points = points_between(&a, &b, 4);
/// assert_eq!(points.len(), 4);
/// assert!((points[2].longitude - 5.0).abs() < 1e-9);
/// ```
pub fn points_between(from: &Coordinate, to: &Coordinate, steps: i64) -> Vec<Coordinate> {
    if from.same_position(to) {
        return vec![*from];
    }
    if steps <= 0 {
        return Vec::new();
    }

    let d = central_angle(from, to);
    let sin_d = d.sin();
    let v1 = unit_vector(from);
    let v2 = unit_vector(to);

    let start = Coordinate::new(from.longitude, from.latitude);
    let synthesized = (1..steps).map(|i| {
        let f = i as f64 / steps as f64;
        let a = ((1.0 - f) * d).sin() / sin_d;
        let b = (f * d).sin() / sin_d;

        let x = a * v1[0] + b * v2[0];
        let y = a * v1[1] + b * v2[1];
        let z = a * v1[2] + b * v2[2];

        let lat = z.atan2((x * x + y * y).sqrt());
        let lon = y.atan2(x);
        Coordinate::new(lon.to_degrees(), lat.to_degrees())
    });

    std::iter::once(start).chain(synthesized).collect()
}

#[inline]
fn unit_vector(coord: &Coordinate) -> [f64; 3] {
    let (lat, lon) = coord.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}
