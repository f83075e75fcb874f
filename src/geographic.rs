//! Great-circle distance on a spherical Earth
//!
//! Trip mileage is an estimate, so distances are computed with the haversine
//! formula over a sphere of fixed radius rather than on an ellipsoid. For
//! typical inter-city hops the error stays around half a percent.

use crate::measure::Kilometers;
use crate::types::GeoPoint;

/// Mean Earth radius used by [`great_circle_distance`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two latitude/longitude pairs given
/// in degrees.
///
/// This is the unchecked form of [`great_circle_distance`]: non-finite inputs
/// yield NaN rather than an error, so callers that cannot guarantee valid
/// coordinates must filter them beforehand.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    // Taking magnitudes keeps the result bitwise symmetric in its arguments.
    let dphi = (lat2 - lat1).abs().to_radians();
    let dlambda = (lon2 - lon1).abs().to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push antipodal points just past 1. The comparison is false
    // for NaN, which is passed through.
    let a = if a > 1.0 { 1.0 } else { a };
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Great-circle distance between two points.
///
/// Symmetric in its arguments, and zero for identical points.
pub fn great_circle_distance(point1: &GeoPoint, point2: &GeoPoint) -> Kilometers<f64> {
    Kilometers(haversine_km(
        point1.lat().0,
        point1.lon().0,
        point2.lat().0,
        point2.lon().0,
    ))
}
