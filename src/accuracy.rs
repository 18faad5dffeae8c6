//! Accuracy-circle screen sizing.
//!
//! Instead of a closed-form meters-per-pixel formula (which would have to
//! model projection distortion at the current zoom, tilt and rotation), the
//! accuracy radius is measured by projecting two real points: the fix itself
//! and a point translated due north by the accuracy distance. The vertical
//! pixel distance between them is the radius, correct under any camera.

use crate::capabilities::ScreenPoint;
use crate::geo;
use crate::model::LngLat;

/// The pair of coordinates to project: the anchor and a point `accuracy_m`
/// meters north of it. A zero or negative accuracy yields the anchor twice,
/// which measures to a zero radius.
#[must_use]
pub fn probe_points(anchor: LngLat, accuracy_m: f64) -> (LngLat, LngLat) {
    if accuracy_m <= 0.0 {
        return (anchor, anchor);
    }
    (anchor, geo::translate(anchor, accuracy_m, 0.0))
}

/// Radius in pixels from the two projected probe points. A missing projection
/// (engine not ready, point off-viewport) degrades to zero.
#[must_use]
pub fn radius_px(anchor: Option<ScreenPoint>, north: Option<ScreenPoint>) -> f32 {
    match (anchor, north) {
        (Some(anchor), Some(north)) => (north.y - anchor.y).abs(),
        _ => 0.0,
    }
}

/// Convenience over a batch projection response, in `probe_points` order.
#[must_use]
pub fn radius_px_from_batch(points: &[Option<ScreenPoint>]) -> f32 {
    let anchor = points.first().copied().flatten();
    let north = points.get(1).copied().flatten();
    radius_px(anchor, north)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(x: f32, y: f32) -> Option<ScreenPoint> {
        Some(ScreenPoint { x, y })
    }

    #[test]
    fn zero_accuracy_measures_zero() {
        let anchor = LngLat::new(9.18, 48.78).unwrap();
        let (a, b) = probe_points(anchor, 0.0);
        assert_eq!(a, b);
        assert_eq!(radius_px(point(10.0, 10.0), point(10.0, 10.0)), 0.0);
    }

    #[test]
    fn negative_accuracy_measures_zero() {
        let anchor = LngLat::new(9.18, 48.78).unwrap();
        let (a, b) = probe_points(anchor, -5.0);
        assert_eq!(a, b);
    }

    #[test]
    fn probe_point_lies_north() {
        let anchor = LngLat::new(9.18, 48.78).unwrap();
        let (a, north) = probe_points(anchor, 30.0);
        assert_eq!(a, anchor);
        assert!(north.lat() > anchor.lat());
        assert!((north.lng() - anchor.lng()).abs() < 1e-9);
    }

    #[test]
    fn missing_projection_degrades_to_zero() {
        assert_eq!(radius_px(None, point(0.0, 10.0)), 0.0);
        assert_eq!(radius_px(point(0.0, 10.0), None), 0.0);
        assert_eq!(radius_px(None, None), 0.0);
        assert_eq!(radius_px_from_batch(&[]), 0.0);
        assert_eq!(radius_px_from_batch(&[point(1.0, 2.0)]), 0.0);
    }

    #[test]
    fn batch_order_is_anchor_then_north() {
        let batch = [point(50.0, 200.0), point(50.0, 155.0)];
        assert_eq!(radius_px_from_batch(&batch), 45.0);
    }

    #[test]
    fn repeated_measurement_is_idempotent() {
        let anchor = LngLat::new(9.18, 48.78).unwrap();
        let first = probe_points(anchor, 25.0);
        let second = probe_points(anchor, 25.0);
        assert_eq!(first, second);

        let batch = [point(12.0, 80.0), point(12.0, 62.5)];
        assert_eq!(radius_px_from_batch(&batch), radius_px_from_batch(&batch));
    }

    proptest! {
        #[test]
        fn radius_is_non_negative(ax in -4096.0f32..4096.0, ay in -4096.0f32..4096.0,
                                  nx in -4096.0f32..4096.0, ny in -4096.0f32..4096.0) {
            prop_assert!(radius_px(point(ax, ay), point(nx, ny)) >= 0.0);
        }

        #[test]
        fn radius_under_linear_projection_scales_with_accuracy(
            accuracy in 0.0f64..5000.0,
            px_per_degree in 100.0f32..100_000.0,
        ) {
            let anchor = LngLat::new(9.18, 48.78).unwrap();
            let (a, n) = probe_points(anchor, accuracy);

            // Fake linear projection: screen y grows as latitude shrinks.
            let project = |p: LngLat| ScreenPoint {
                x: (p.lng() as f32) * px_per_degree,
                y: -(p.lat() as f32) * px_per_degree,
            };

            let radius = radius_px(Some(project(a)), Some(project(n)));
            prop_assert!(radius >= 0.0);
            if accuracy == 0.0 {
                prop_assert!(radius == 0.0);
            }
        }
    }
}
