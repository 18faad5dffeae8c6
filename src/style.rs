//! Point styling descriptors for the renderer.
//!
//! These are the small JSON-like strings the vector-map engine accepts for
//! marker styling. All three markers draw flat on the map plane at a fixed
//! order, without collision detection.

use crate::model::MarkerSizePx;

pub const POINT_ORDER: u32 = 2000;
pub const LOCATION_COLOR: &str = "white";
pub const ACCURACY_COLOR: &str = "white";
pub const DIRECTION_COLOR: &str = "#cc536dfe";

#[must_use]
pub fn location_dot(size_px: MarkerSizePx) -> String {
    format!(
        "{{ style: 'points', color: '{LOCATION_COLOR}', size: [{}px, {}px], order: {POINT_ORDER}, flat: true, collide: false }}",
        size_px.0, size_px.1
    )
}

/// The accuracy circle is a fixed drawable scaled to the projected radius, so
/// its size is recomputed on every fix and camera movement.
#[must_use]
pub fn accuracy_circle(radius_px: f32) -> String {
    format!(
        "{{ style: 'points', color: '{ACCURACY_COLOR}', size: [{radius_px}px, {radius_px}px], order: {POINT_ORDER}, flat: true, collide: false }}"
    )
}

#[must_use]
pub fn direction_arrow(size_px: MarkerSizePx, angle_deg: f32) -> String {
    format!(
        "{{ style: 'points', color: '{DIRECTION_COLOR}', size: [{}px, {}px], order: {POINT_ORDER}, collide: false, flat: true, angle: {angle_deg} }}",
        size_px.0, size_px.1
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_dot_descriptor() {
        assert_eq!(
            location_dot((24.0, 24.0)),
            "{ style: 'points', color: 'white', size: [24px, 24px], order: 2000, flat: true, collide: false }"
        );
    }

    #[test]
    fn accuracy_circle_descriptor_carries_radius() {
        let style = accuracy_circle(37.5);
        assert!(style.contains("size: [37.5px, 37.5px]"));
        assert!(style.contains("flat: true"));
        assert!(style.contains("order: 2000"));
    }

    #[test]
    fn direction_arrow_descriptor_carries_angle() {
        let style = direction_arrow((48.0, 48.0), 92.5);
        assert!(style.contains("color: '#cc536dfe'"));
        assert!(style.contains("angle: 92.5"));
        assert!(style.contains("size: [48px, 48px]"));
    }
}
