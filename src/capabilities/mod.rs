mod location;
mod map;
mod prefs;

pub use self::location::{
    LocationClient, LocationError, LocationOperation, LocationOutput, LocationPriority,
    LocationRequest, LocationResult,
};
pub use self::map::{
    EaseKind, MapEngine, MapError, MapOperation, MapOutput, MapResult, MarkerKind, ScreenPoint,
};
pub use self::prefs::{
    PrefScope, PrefValue, Preferences, PrefsError, PrefsOperation, PrefsOutput, PrefsResult,
};

pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub map_engine: MapEngine<Event>,
    pub location_client: LocationClient<Event>,
    pub preferences: Preferences<Event>,
}
