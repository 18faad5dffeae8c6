//! Shared core of the map screen: follow/detach position tracking, accuracy
//! circle sizing and camera state persistence, behind narrow capability
//! interfaces to the vector-map renderer, the fused-location client and the
//! platform preference store. The renderer, location fusion and gesture
//! recognition themselves live in the shell.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod accuracy;
pub mod camera_store;
pub mod capabilities;
pub mod event;
pub mod geo;
pub mod model;
pub mod style;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use event::{Event, Gesture};
pub use model::{CameraState, LiveLocation, LngLat, Model, TrackingState};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Street-level zoom the camera eases to on the first fix of a tracking
/// session.
pub const FIRST_FIX_ZOOM: f32 = 19.0;
pub const FOLLOW_EASE_MS: u64 = 1000;
pub const MARKER_EASE_MS: u64 = 1000;
pub const DOUBLE_TAP_EASE_MS: u64 = 500;
pub const DOUBLE_TAP_ZOOM_STEP: f32 = 1.5;
pub const BUTTON_ZOOM_STEP: f32 = 1.0;
pub const BUTTON_ZOOM_EASE_MS: u64 = 500;

pub const LOCATION_INTERVAL_MS: u64 = 2000;
pub const LOCATION_MIN_DISPLACEMENT_M: f32 = 5.0;

/// Shared preference key for the HTTP tile cache size, in megabytes.
pub const TILE_CACHE_PREF: &str = "map_tilecache";
pub const DEFAULT_TILE_CACHE_MB: u32 = 50;

/// What the shell renders: the recenter affordance reads `is_following`, the
/// overlay chrome reads the rest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub is_following: bool,
    pub is_tracking: bool,
    pub map_ready: bool,
    pub displayed_location: Option<LiveLocation>,
    pub camera: Option<CameraState>,
}

pub mod app {
    use tracing::debug;

    use super::{
        accuracy, camera_store, style, ViewModel, BUTTON_ZOOM_EASE_MS, BUTTON_ZOOM_STEP,
        DEFAULT_TILE_CACHE_MB, DOUBLE_TAP_EASE_MS, DOUBLE_TAP_ZOOM_STEP, FIRST_FIX_ZOOM,
        FOLLOW_EASE_MS, MARKER_EASE_MS, TILE_CACHE_PREF,
    };
    use crate::capabilities::{
        Capabilities, EaseKind, LocationOutput, LocationRequest, MapOutput, MarkerKind, PrefScope,
        PrefValue, ScreenPoint,
    };
    use crate::event::{Event, Gesture};
    use crate::model::{Model, TrackingState};

    const MARKERS: [MarkerKind; 3] = [
        MarkerKind::LocationDot,
        MarkerKind::AccuracyCircle,
        MarkerKind::DirectionArrow,
    ];

    #[derive(Default)]
    pub struct App;

    impl App {
        /// Detaches the camera from the live position. Notifies the shell
        /// exactly once per detach; gestures while already detached are
        /// silent.
        fn unglue(model: &mut Model, caps: &Capabilities) {
            if model.tracking.is_following() {
                model.tracking = TrackingState::Detached;
                caps.render.render();
            }
        }

        /// Eases the camera onto the latest fix while following; first fix of
        /// the session also eases down to street level. No-op until the map
        /// is ready.
        fn follow_position(model: &mut Model, caps: &Capabilities) {
            if !model.map_ready {
                return;
            }
            let Some(location) = model.last_location else {
                return;
            };
            if let TrackingState::Following { zoomed_to_first_fix } = model.tracking {
                caps.map_engine
                    .set_position_eased(location.position, FOLLOW_EASE_MS);
                if !zoomed_to_first_fix {
                    model.tracking = TrackingState::Following {
                        zoomed_to_first_fix: true,
                    };
                    caps.map_engine.set_zoom_eased(FIRST_FIX_ZOOM, FOLLOW_EASE_MS);
                }
            }
        }

        /// Shows and moves the three markers onto the latest fix, applies the
        /// stored compass heading to the direction arrow, then asks for a
        /// fresh accuracy projection.
        fn show_location(model: &Model, caps: &Capabilities) {
            if !model.markers_visible() {
                return;
            }
            let Some(location) = model.last_location else {
                return;
            };
            for kind in MARKERS {
                caps.map_engine.set_marker_visible(kind, true);
                caps.map_engine.set_marker_point_eased(
                    kind,
                    location.position,
                    MARKER_EASE_MS,
                    EaseKind::Cubic,
                );
            }
            // A heading that arrived before the markers became visible would
            // otherwise be lost until the next compass event.
            if let (Some(degrees), Some(size)) =
                (model.compass_rotation_deg, model.direction_marker_size)
            {
                caps.map_engine.set_marker_styling(
                    MarkerKind::DirectionArrow,
                    style::direction_arrow(size, degrees),
                );
            }
            Self::request_accuracy(model, caps);
        }

        /// Projects the fix and a point one accuracy-radius north of it; the
        /// response sizes the accuracy circle.
        fn request_accuracy(model: &Model, caps: &Capabilities) {
            if !model.markers_visible() {
                return;
            }
            let Some(location) = model.last_location else {
                return;
            };
            let (anchor, north) =
                accuracy::probe_points(location.position, f64::from(location.accuracy_m));
            let epoch = model.epoch;
            caps.map_engine
                .lng_lat_to_screen(vec![anchor, north], move |result| Event::AccuracyProjected {
                    epoch,
                    result,
                });
        }

        fn stop_tracking(model: &mut Model, caps: &Capabilities) {
            // Stopping an already untracked screen changes nothing, so the
            // shell is not notified either.
            if !model.tracking.is_tracking() {
                return;
            }
            if model.map_ready {
                for kind in MARKERS {
                    caps.map_engine.set_marker_visible(kind, false);
                }
            }
            caps.location_client.remove_updates();
            caps.location_client.disconnect();
            model.last_location = None;
            model.tracking = TrackingState::Untracked;
            model.epoch += 1;
            caps.render.render();
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(event = event.name(), "update");

            match event {
                Event::ScreenStarted => {
                    caps.preferences.load(
                        PrefScope::Shared,
                        vec![TILE_CACHE_PREF.to_string()],
                        |result| Event::TileCachePrefLoaded(Box::new(result)),
                    );
                }

                Event::TileCachePrefLoaded(result) => {
                    match *result {
                        Ok(output) => {
                            let megabytes = output
                                .get(TILE_CACHE_PREF)
                                .and_then(PrefValue::as_int)
                                .and_then(|v| u32::try_from(v).ok())
                                .filter(|v| *v > 0)
                                .unwrap_or(DEFAULT_TILE_CACHE_MB);
                            model.tile_cache_mb = megabytes;
                        }
                        Err(error) => {
                            debug!(%error, "tile cache preference unavailable, using default");
                        }
                    }
                    caps.map_engine.set_tile_cache_size(model.tile_cache_mb);
                }

                Event::ScreenPaused => {
                    if let Some(camera) = model.camera {
                        caps.preferences
                            .store(PrefScope::Screen, camera_store::save_entries(&camera));
                    }
                }

                Event::ScreenStopped | Event::StopTracking => {
                    Self::stop_tracking(model, caps);
                }

                Event::MapReady {
                    location_marker_size_px,
                    direction_marker_size_px,
                } => {
                    model.map_ready = true;
                    model.location_marker_size = Some(location_marker_size_px);
                    model.direction_marker_size = Some(direction_marker_size_px);

                    for kind in MARKERS {
                        caps.map_engine.add_marker(kind);
                    }
                    caps.map_engine.set_marker_styling(
                        MarkerKind::LocationDot,
                        style::location_dot(location_marker_size_px),
                    );

                    caps.preferences
                        .load(PrefScope::Screen, camera_store::restore_keys(), |result| {
                            Event::CameraStateLoaded(Box::new(result))
                        });

                    // A fix that arrived before the renderer finished loading
                    // is shown and followed now.
                    Self::show_location(model, caps);
                    Self::follow_position(model, caps);
                    caps.render.render();
                }

                Event::CameraStateLoaded(result) => match *result {
                    Ok(output) => {
                        if model.map_ready {
                            let restored = camera_store::restore(&output);
                            if let Some(rotation) = restored.rotation {
                                caps.map_engine.set_rotation(rotation);
                            }
                            if let Some(tilt) = restored.tilt {
                                caps.map_engine.set_tilt(tilt);
                            }
                            if let Some(zoom) = restored.zoom {
                                caps.map_engine.set_zoom(zoom);
                            }
                            if let Some(position) = restored.position {
                                caps.map_engine.set_position(position);
                            }
                        }
                    }
                    Err(error) => {
                        debug!(%error, "camera state unavailable, keeping defaults");
                    }
                },

                Event::StartTracking => {
                    if !model.tracking.is_tracking() {
                        model.tracking = TrackingState::Following {
                            zoomed_to_first_fix: false,
                        };
                        model.last_location = None;
                        model.epoch += 1;
                        caps.location_client
                            .connect(|result| Event::LocationConnected(Box::new(result)));
                        caps.render.render();
                    }
                }

                Event::LocationConnected(result) => {
                    if !model.tracking.is_tracking() {
                        debug!("connection callback after tracking stopped, ignoring");
                        return;
                    }
                    match *result {
                        Ok(LocationOutput::Connected) => {
                            caps.location_client.request_updates(LocationRequest::default());
                        }
                        Ok(_) => {}
                        Err(error) => {
                            // Best effort: the screen simply shows no live
                            // position.
                            debug!(%error, "location client unavailable");
                        }
                    }
                }

                Event::LocationChanged(location) => {
                    if !model.tracking.is_tracking() {
                        debug!("fix after tracking stopped, discarding");
                        return;
                    }
                    model.last_location = Some(location);
                    Self::show_location(model, caps);
                    Self::follow_position(model, caps);
                    caps.render.render();
                }

                Event::CompassChanged { rotation_rad } => {
                    let degrees = rotation_rad.to_degrees();
                    model.compass_rotation_deg = Some(degrees);
                    if model.markers_visible() {
                        if let Some(size) = model.direction_marker_size {
                            caps.map_engine.set_marker_styling(
                                MarkerKind::DirectionArrow,
                                style::direction_arrow(size, degrees),
                            );
                        }
                    }
                }

                Event::Gesture(gesture) => {
                    Self::unglue(model, caps);
                    if let Gesture::DoubleTap { x, y } = gesture {
                        if model.map_ready {
                            let epoch = model.epoch;
                            caps.map_engine.screen_to_lng_lat(
                                ScreenPoint { x, y },
                                move |result| Event::DoubleTapTargetResolved { epoch, result },
                            );
                        }
                    }
                }

                Event::ZoomInPressed | Event::ZoomOutPressed => {
                    if model.map_ready {
                        let step = if matches!(event, Event::ZoomInPressed) {
                            BUTTON_ZOOM_STEP
                        } else {
                            -BUTTON_ZOOM_STEP
                        };
                        caps.map_engine.set_zoom_by(step, BUTTON_ZOOM_EASE_MS);
                    }
                }

                Event::CameraChanged(camera) => {
                    model.camera = Some(camera);
                    Self::request_accuracy(model, caps);
                    caps.render.render();
                }

                Event::RecenterRequested => {
                    if model.tracking == TrackingState::Detached {
                        model.tracking = TrackingState::Following {
                            zoomed_to_first_fix: false,
                        };
                        Self::follow_position(model, caps);
                        caps.render.render();
                    }
                }

                Event::DoubleTapTargetResolved { epoch, result } => {
                    if epoch != model.epoch {
                        debug!("double tap target from a previous session, discarding");
                        return;
                    }
                    if !model.map_ready {
                        return;
                    }
                    if let Ok(MapOutput::Position(Some(target))) = result {
                        caps.map_engine.set_position_eased(target, DOUBLE_TAP_EASE_MS);
                        caps.map_engine
                            .set_zoom_by(DOUBLE_TAP_ZOOM_STEP, DOUBLE_TAP_EASE_MS);
                    }
                }

                Event::AccuracyProjected { epoch, result } => {
                    if epoch != model.epoch {
                        debug!("accuracy projection from a previous session, discarding");
                        return;
                    }
                    if !model.markers_visible() {
                        return;
                    }
                    match result {
                        Ok(MapOutput::ScreenPositions(points)) => {
                            let radius = accuracy::radius_px_from_batch(&points);
                            caps.map_engine.set_marker_styling(
                                MarkerKind::AccuracyCircle,
                                style::accuracy_circle(radius),
                            );
                        }
                        Ok(_) => {}
                        Err(error) => {
                            debug!(%error, "projection unavailable, keeping previous size");
                        }
                    }
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            ViewModel {
                is_following: model.tracking.is_following(),
                is_tracking: model.tracking.is_tracking(),
                map_ready: model.map_ready,
                displayed_location: model.last_location,
                camera: model.camera,
            }
        }
    }
}
