use serde::{Deserialize, Serialize};

use crate::DEFAULT_TILE_CACHE_MB;

/// Validated geographic coordinate.
///
/// Equality is bitwise so a coordinate that round-trips through persisted
/// state compares exactly equal to the original.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct LngLat {
    lng: f64,
    lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Option<Self> {
        if !lng.is_finite() || !lat.is_finite() {
            return None;
        }
        if !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        Some(Self { lng, lat })
    }

    #[must_use]
    pub fn lng(self) -> f64 {
        self.lng
    }

    #[must_use]
    pub fn lat(self) -> f64 {
        self.lat
    }
}

impl PartialEq for LngLat {
    fn eq(&self, other: &Self) -> bool {
        self.lng.to_bits() == other.lng.to_bits() && self.lat.to_bits() == other.lat.to_bits()
    }
}

impl Eq for LngLat {}

/// The four camera parameters the screen persists and restores.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Rotation in degrees.
    pub rotation: f32,
    /// Tilt in degrees.
    pub tilt: f32,
    /// Zoom level.
    pub zoom: f32,
    pub position: LngLat,
}

/// Latest sample from the location provider. Replaced wholesale per update,
/// no history kept.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiveLocation {
    pub position: LngLat,
    pub accuracy_m: f32,
    pub bearing_deg: Option<f32>,
}

/// Whether the camera tracks the live position.
///
/// `zoomed_to_first_fix` lives inside `Following` so "zoomed while untracked"
/// is unrepresentable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingState {
    Untracked,
    Following { zoomed_to_first_fix: bool },
    Detached,
}

impl TrackingState {
    #[must_use]
    pub const fn is_following(self) -> bool {
        matches!(self, Self::Following { .. })
    }

    /// True while a tracking session is active, whether or not the camera is
    /// still glued to the position.
    #[must_use]
    pub const fn is_tracking(self) -> bool {
        !matches!(self, Self::Untracked)
    }
}

impl Default for TrackingState {
    fn default() -> Self {
        Self::Untracked
    }
}

/// Marker drawable size in density-independent pixels, reported by the shell
/// when the map becomes ready.
pub type MarkerSizePx = (f32, f32);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Model {
    pub tracking: TrackingState,
    /// Bumped on every tracking start and stop. Capability responses carry the
    /// epoch captured at request time; a mismatch means the response is stale
    /// and must be discarded.
    pub epoch: u64,
    pub last_location: Option<LiveLocation>,
    /// Camera as last reported by the shell. `None` until the shell reports
    /// one; camera mutations no-op until then.
    pub camera: Option<CameraState>,
    /// The renderer loads asynchronously; until this is set every camera and
    /// marker operation is a no-op.
    pub map_ready: bool,
    pub location_marker_size: Option<MarkerSizePx>,
    pub direction_marker_size: Option<MarkerSizePx>,
    /// Latest compass heading in degrees, kept so the direction marker can be
    /// styled when it becomes visible.
    pub compass_rotation_deg: Option<f32>,
    pub tile_cache_mb: u32,
}

impl Model {
    /// The three markers are visible exactly while a fix exists and the map
    /// can draw them. Stopping tracking clears the fix, so this also encodes
    /// "tracking has not been stopped".
    #[must_use]
    pub fn markers_visible(&self) -> bool {
        self.map_ready && self.last_location.is_some()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            tracking: TrackingState::Untracked,
            epoch: 0,
            last_location: None,
            camera: None,
            map_ready: false,
            location_marker_size: None,
            direction_marker_size: None,
            compass_rotation_deg: None,
            tile_cache_mb: DEFAULT_TILE_CACHE_MB,
        }
    }
}
