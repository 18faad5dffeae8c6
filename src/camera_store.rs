//! Encoding between `CameraState` and the per-screen preference file.
//!
//! Rotation, tilt and zoom are stored as floats; latitude and longitude as
//! raw f64 bit patterns so a save/restore cycle is bit-identical. Restore is
//! partial: absent keys leave the caller's defaults untouched, and position is
//! only restored when both halves are present and decode to a valid
//! coordinate.

use crate::capabilities::{PrefValue, PrefsOutput};
use crate::model::{CameraState, LngLat};

pub const PREF_ROTATION: &str = "map_rotation";
pub const PREF_TILT: &str = "map_tilt";
pub const PREF_ZOOM: &str = "map_zoom";
pub const PREF_LAT: &str = "map_lat";
pub const PREF_LON: &str = "map_lon";

/// The keys a restore asks for.
#[must_use]
pub fn restore_keys() -> Vec<String> {
    [PREF_ROTATION, PREF_TILT, PREF_ZOOM, PREF_LAT, PREF_LON]
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[must_use]
pub fn save_entries(camera: &CameraState) -> Vec<(String, PrefValue)> {
    vec![
        (PREF_ROTATION.into(), PrefValue::Float(camera.rotation)),
        (PREF_TILT.into(), PrefValue::Float(camera.tilt)),
        (PREF_ZOOM.into(), PrefValue::Float(camera.zoom)),
        (
            PREF_LAT.into(),
            PrefValue::Long(camera.position.lat().to_bits()),
        ),
        (
            PREF_LON.into(),
            PrefValue::Long(camera.position.lng().to_bits()),
        ),
    ]
}

/// What a restore found. Each field is independently optional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RestoredCamera {
    pub rotation: Option<f32>,
    pub tilt: Option<f32>,
    pub zoom: Option<f32>,
    pub position: Option<LngLat>,
}

impl RestoredCamera {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rotation.is_none()
            && self.tilt.is_none()
            && self.zoom.is_none()
            && self.position.is_none()
    }
}

#[must_use]
pub fn restore(output: &PrefsOutput) -> RestoredCamera {
    let position = match (output.get(PREF_LON), output.get(PREF_LAT)) {
        (Some(lon), Some(lat)) => match (lon.as_long(), lat.as_long()) {
            (Some(lon_bits), Some(lat_bits)) => {
                LngLat::new(f64::from_bits(lon_bits), f64::from_bits(lat_bits))
            }
            _ => None,
        },
        _ => None,
    };

    RestoredCamera {
        rotation: output.get(PREF_ROTATION).and_then(PrefValue::as_float),
        tilt: output.get(PREF_TILT).and_then(PrefValue::as_float),
        zoom: output.get(PREF_ZOOM).and_then(PrefValue::as_float),
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraState {
        CameraState {
            rotation: 12.5,
            tilt: 30.0,
            zoom: 17.25,
            position: LngLat::new(9.183_512_946_1, 48.779_812_235_7).unwrap(),
        }
    }

    fn loaded(entries: Vec<(String, PrefValue)>) -> PrefsOutput {
        PrefsOutput::Loaded { entries }
    }

    #[test]
    fn round_trip_is_bit_identical() {
        let camera = camera();
        let restored = restore(&loaded(save_entries(&camera)));

        assert_eq!(restored.rotation, Some(camera.rotation));
        assert_eq!(restored.tilt, Some(camera.tilt));
        assert_eq!(restored.zoom, Some(camera.zoom));
        // LngLat equality is bitwise, so this checks the exact bit pattern.
        assert_eq!(restored.position, Some(camera.position));
    }

    #[test]
    fn restore_with_no_keys_is_empty() {
        let restored = restore(&loaded(vec![]));
        assert!(restored.is_empty());
    }

    #[test]
    fn restore_with_position_only_leaves_other_defaults() {
        let camera = camera();
        let entries = save_entries(&camera)
            .into_iter()
            .filter(|(k, _)| k == PREF_LAT || k == PREF_LON)
            .collect();

        let restored = restore(&loaded(entries));
        assert_eq!(restored.position, Some(camera.position));
        assert_eq!(restored.rotation, None);
        assert_eq!(restored.tilt, None);
        assert_eq!(restored.zoom, None);
    }

    #[test]
    fn restore_requires_both_position_halves() {
        let camera = camera();
        let entries: Vec<_> = save_entries(&camera)
            .into_iter()
            .filter(|(k, _)| k == PREF_LAT)
            .collect();

        let restored = restore(&loaded(entries));
        assert_eq!(restored.position, None);
    }

    #[test]
    fn restore_rejects_corrupt_position_bits() {
        let entries = vec![
            (PREF_LAT.into(), PrefValue::Long(f64::NAN.to_bits())),
            (PREF_LON.into(), PrefValue::Long(9.2_f64.to_bits())),
        ];

        let restored = restore(&loaded(entries));
        assert_eq!(restored.position, None);
    }

    #[test]
    fn restore_ignores_mistyped_values() {
        let entries = vec![
            (PREF_ROTATION.into(), PrefValue::Long(1)),
            (PREF_ZOOM.into(), PrefValue::Float(15.0)),
        ];

        let restored = restore(&loaded(entries));
        assert_eq!(restored.rotation, None);
        assert_eq!(restored.zoom, Some(15.0));
    }
}
