//! Capability wrapping the vector-map renderer.
//!
//! The renderer itself (tiles, gestures, easing animations) lives in the
//! shell; the core only issues narrow marker and camera commands and asks for
//! projection transforms. Everything degrades silently while the engine is
//! still loading.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::LngLat;

/// The three markers the screen owns. The shell maps these to renderer marker
/// handles; `draw_order` matches the original stacking (dot above arrow above
/// circle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    LocationDot,
    AccuracyCircle,
    DirectionArrow,
}

impl MarkerKind {
    #[must_use]
    pub const fn draw_order(self) -> u8 {
        match self {
            Self::LocationDot => 3,
            Self::DirectionArrow => 2,
            Self::AccuracyCircle => 1,
        }
    }
}

/// Interpolation curve for eased marker movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EaseKind {
    Linear,
    Cubic,
    Quint,
    Sine,
}

/// A position in screen pixels. Bitwise equality, same as `LngLat`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl PartialEq for ScreenPoint {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for ScreenPoint {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum MapOperation {
    AddMarker {
        kind: MarkerKind,
    },
    SetMarkerVisible {
        kind: MarkerKind,
        visible: bool,
    },
    SetMarkerStyling {
        kind: MarkerKind,
        style: String,
    },
    SetMarkerPointEased {
        kind: MarkerKind,
        position: LngLat,
        duration_ms: u64,
        ease: EaseKind,
    },
    SetPosition {
        position: LngLat,
    },
    SetPositionEased {
        position: LngLat,
        duration_ms: u64,
    },
    SetZoom {
        zoom: f32,
    },
    SetZoomEased {
        zoom: f32,
        duration_ms: u64,
    },
    /// Relative zoom from whatever level the camera is currently at.
    SetZoomBy {
        delta: f32,
        duration_ms: u64,
    },
    SetRotation {
        degrees: f32,
    },
    SetTilt {
        degrees: f32,
    },
    /// Sizes the HTTP tile cache, in megabytes.
    SetTileCacheSize {
        megabytes: u32,
    },
    ScreenToLngLat {
        point: ScreenPoint,
    },
    /// Projects coordinates through the current camera. Points outside the
    /// viewport or an unready projection come back as `None`.
    LngLatToScreen {
        points: Vec<LngLat>,
    },
}

// Floats in operations are validated finite (`LngLat`) or camera scalars the
// shell produced itself, so bitwise equality is total in practice.
impl Eq for MapOperation {}

impl Operation for MapOperation {
    type Output = MapResult;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MapOutput {
    Done,
    Position(Option<LngLat>),
    ScreenPositions(Vec<Option<ScreenPoint>>),
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapError {
    #[error("map engine is not ready yet")]
    NotReady,

    #[error("engine error: {message}")]
    Engine { message: String },
}

pub type MapResult = Result<MapOutput, MapError>;

#[derive(Clone)]
pub struct MapEngine<E> {
    context: CapabilityContext<MapOperation, E>,
}

impl<Ev> Capability<Ev> for MapEngine<Ev> {
    type Operation = MapOperation;
    type MappedSelf<MappedEv> = MapEngine<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        MapEngine::new(self.context.map_event(f))
    }
}

impl<E> MapEngine<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<MapOperation, E>) -> Self {
        Self { context }
    }

    /// Fire-and-forget command; the shell applies it once the engine is ready
    /// and the core does not care about the acknowledgement.
    fn notify(&self, operation: MapOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let _ = ctx.request_from_shell(operation).await;
        });
    }

    fn request<F>(&self, operation: MapOperation, callback: F)
    where
        F: FnOnce(MapResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let response = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(response));
        });
    }

    pub fn add_marker(&self, kind: MarkerKind) {
        self.notify(MapOperation::AddMarker { kind });
    }

    pub fn set_marker_visible(&self, kind: MarkerKind, visible: bool) {
        self.notify(MapOperation::SetMarkerVisible { kind, visible });
    }

    pub fn set_marker_styling(&self, kind: MarkerKind, style: String) {
        self.notify(MapOperation::SetMarkerStyling { kind, style });
    }

    pub fn set_marker_point_eased(
        &self,
        kind: MarkerKind,
        position: LngLat,
        duration_ms: u64,
        ease: EaseKind,
    ) {
        self.notify(MapOperation::SetMarkerPointEased {
            kind,
            position,
            duration_ms,
            ease,
        });
    }

    pub fn set_position(&self, position: LngLat) {
        self.notify(MapOperation::SetPosition { position });
    }

    pub fn set_position_eased(&self, position: LngLat, duration_ms: u64) {
        self.notify(MapOperation::SetPositionEased {
            position,
            duration_ms,
        });
    }

    pub fn set_zoom(&self, zoom: f32) {
        self.notify(MapOperation::SetZoom { zoom });
    }

    pub fn set_zoom_eased(&self, zoom: f32, duration_ms: u64) {
        self.notify(MapOperation::SetZoomEased { zoom, duration_ms });
    }

    /// Zoom controls use this so they work before the shell has reported a
    /// camera.
    pub fn set_zoom_by(&self, delta: f32, duration_ms: u64) {
        self.notify(MapOperation::SetZoomBy { delta, duration_ms });
    }

    pub fn set_rotation(&self, degrees: f32) {
        self.notify(MapOperation::SetRotation { degrees });
    }

    pub fn set_tilt(&self, degrees: f32) {
        self.notify(MapOperation::SetTilt { degrees });
    }

    pub fn set_tile_cache_size(&self, megabytes: u32) {
        self.notify(MapOperation::SetTileCacheSize { megabytes });
    }

    pub fn screen_to_lng_lat<F>(&self, point: ScreenPoint, callback: F)
    where
        F: FnOnce(MapResult) -> E + Send + 'static,
    {
        self.request(MapOperation::ScreenToLngLat { point }, callback);
    }

    pub fn lng_lat_to_screen<F>(&self, points: Vec<LngLat>, callback: F)
    where
        F: FnOnce(MapResult) -> E + Send + 'static,
    {
        self.request(MapOperation::LngLatToScreen { points }, callback);
    }
}
