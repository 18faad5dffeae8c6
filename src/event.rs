use serde::{Deserialize, Serialize};

use crate::capabilities::{LocationResult, MapResult, PrefsResult};
use crate::model::{CameraState, LiveLocation, MarkerSizePx};

/// Manual gestures recognized by the renderer's touch input and forwarded by
/// the shell. Any of them detaches the camera from the live position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    Pan,
    Fling,
    Scale,
    Rotate,
    Shove,
    DoubleTap { x: f32, y: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Screen lifecycle, forwarded by the shell.
    ScreenStarted,
    ScreenPaused,
    ScreenStopped,

    /// The asynchronously loaded renderer is ready. Marker drawable sizes are
    /// measured shell-side and reported here.
    MapReady {
        location_marker_size_px: MarkerSizePx,
        direction_marker_size_px: MarkerSizePx,
    },

    // Position tracking.
    StartTracking,
    StopTracking,
    /// The user tapped the recenter control.
    RecenterRequested,
    LocationConnected(Box<LocationResult>),
    LocationChanged(LiveLocation),
    CompassChanged {
        rotation_rad: f32,
    },

    // User input.
    Gesture(Gesture),
    ZoomInPressed,
    ZoomOutPressed,

    /// The shell reports the camera after every movement, user-driven or
    /// eased.
    CameraChanged(CameraState),

    // Capability responses. Epochs were captured at request time; stale ones
    // are discarded.
    DoubleTapTargetResolved {
        epoch: u64,
        result: MapResult,
    },
    AccuracyProjected {
        epoch: u64,
        result: MapResult,
    },
    CameraStateLoaded(Box<PrefsResult>),
    TileCachePrefLoaded(Box<PrefsResult>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ScreenStarted => "screen_started",
            Self::ScreenPaused => "screen_paused",
            Self::ScreenStopped => "screen_stopped",
            Self::MapReady { .. } => "map_ready",
            Self::StartTracking => "start_tracking",
            Self::StopTracking => "stop_tracking",
            Self::RecenterRequested => "recenter_requested",
            Self::LocationConnected(_) => "location_connected",
            Self::LocationChanged(_) => "location_changed",
            Self::CompassChanged { .. } => "compass_changed",
            Self::Gesture(_) => "gesture",
            Self::ZoomInPressed => "zoom_in_pressed",
            Self::ZoomOutPressed => "zoom_out_pressed",
            Self::CameraChanged(_) => "camera_changed",
            Self::DoubleTapTargetResolved { .. } => "double_tap_target_resolved",
            Self::AccuracyProjected { .. } => "accuracy_projected",
            Self::CameraStateLoaded(_) => "camera_state_loaded",
            Self::TileCachePrefLoaded(_) => "tile_cache_pref_loaded",
        }
    }
}
