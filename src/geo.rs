//! Great-circle math on a spherical earth.

use crate::model::LngLat;
use crate::EARTH_RADIUS_M;

/// Returns the point reached by travelling `distance_m` meters from `pos`
/// along the initial bearing `bearing_deg` (0° = north, clockwise).
///
/// Degenerate results (should not happen for finite inputs) fall back to the
/// start point rather than failing.
#[must_use]
pub fn translate(pos: LngLat, distance_m: f64, bearing_deg: f64) -> LngLat {
    let lat1 = pos.lat().to_radians();
    let lng1 = pos.lng().to_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    LngLat::new(normalize_longitude(lng2.to_degrees()), lat2.to_degrees()).unwrap_or(pos)
}

/// Wraps a longitude into (-180, 180].
#[must_use]
pub fn normalize_longitude(lng: f64) -> f64 {
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn translate_zero_distance_is_identity() {
        let pos = LngLat::new(9.18, 48.78).unwrap();
        let moved = translate(pos, 0.0, 0.0);
        assert!(close(moved.lng(), pos.lng(), 1e-12));
        assert!(close(moved.lat(), pos.lat(), 1e-12));
    }

    #[test]
    fn translate_north_increases_latitude_only() {
        let pos = LngLat::new(9.18, 48.78).unwrap();
        let moved = translate(pos, 1000.0, 0.0);

        // 1 km north on a 6371 km sphere is ~0.008993 degrees of latitude.
        let expected_delta = (1000.0 / EARTH_RADIUS_M).to_degrees();
        assert!(close(moved.lat(), pos.lat() + expected_delta, 1e-9));
        assert!(close(moved.lng(), pos.lng(), 1e-9));
    }

    #[test]
    fn translate_east_nearly_keeps_latitude() {
        let pos = LngLat::new(0.0, 45.0).unwrap();
        let moved = translate(pos, 5000.0, 90.0);
        assert!(moved.lng() > pos.lng());
        // A great circle headed due east from 45°N bends slightly toward the
        // equator; over 5 km the drift is on the order of 1e-5 degrees.
        assert!(moved.lat() <= pos.lat());
        assert!(close(moved.lat(), pos.lat(), 1e-4));
    }

    #[test]
    fn translate_across_antimeridian_normalizes() {
        let pos = LngLat::new(179.999, 0.0).unwrap();
        let moved = translate(pos, 10_000.0, 90.0);
        assert!(moved.lng() < 0.0);
        assert!(moved.lng() >= -180.0);
    }

    #[test]
    fn normalize_longitude_wraps() {
        assert!((normalize_longitude(190.0) - -170.0).abs() < 1e-9);
        assert!((normalize_longitude(-190.0) - 170.0).abs() < 1e-9);
        assert!((normalize_longitude(540.0) - 180.0).abs() < 1e-9);
        assert!((normalize_longitude(0.0)).abs() < 1e-9);
    }

    #[test]
    fn normalize_longitude_prefers_positive_180() {
        assert!((normalize_longitude(-180.0) - 180.0).abs() < 1e-9);
        assert!((normalize_longitude(180.0) - 180.0).abs() < 1e-9);
    }
}
