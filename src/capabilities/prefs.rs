//! Scalar preference storage, mirroring the host platform's per-screen and
//! app-wide key-value preferences.
//!
//! Loads return only the keys that are present; callers fall back to their own
//! defaults for the rest. No versioning, no migration.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which preference file a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefScope {
    /// Private to the hosting screen. Camera state lives here.
    Screen,
    /// Shared application defaults, e.g. the tile cache size.
    Shared,
}

/// The scalar types the preference store can hold. `Long` carries raw bit
/// patterns (used for f64 coordinates, so round-trips are bit-identical).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PrefValue {
    Float(f32),
    Long(u64),
    Int(i32),
}

// Floats stored here are camera scalars the shell produced; NaN never occurs.
impl Eq for PrefValue {}

impl PrefValue {
    #[must_use]
    pub const fn as_float(self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_long(self) -> Option<u64> {
        match self {
            Self::Long(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum PrefsOperation {
    Load {
        scope: PrefScope,
        keys: Vec<String>,
    },
    Store {
        scope: PrefScope,
        entries: Vec<(String, PrefValue)>,
    },
}

impl Operation for PrefsOperation {
    type Output = PrefsResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PrefsOutput {
    /// Present keys only, in no particular order.
    Loaded { entries: Vec<(String, PrefValue)> },
    Stored,
}

impl PrefsOutput {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<PrefValue> {
        match self {
            Self::Loaded { entries } => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| *v),
            Self::Stored => None,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefsError {
    #[error("preference storage unavailable: {message}")]
    Unavailable { message: String },
}

pub type PrefsResult = Result<PrefsOutput, PrefsError>;

#[derive(Clone)]
pub struct Preferences<E> {
    context: CapabilityContext<PrefsOperation, E>,
}

impl<Ev> Capability<Ev> for Preferences<Ev> {
    type Operation = PrefsOperation;
    type MappedSelf<MappedEv> = Preferences<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Preferences::new(self.context.map_event(f))
    }
}

impl<E> Preferences<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<PrefsOperation, E>) -> Self {
        Self { context }
    }

    pub fn load<F>(&self, scope: PrefScope, keys: Vec<String>, callback: F)
    where
        F: FnOnce(PrefsResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let response = ctx
                .request_from_shell(PrefsOperation::Load { scope, keys })
                .await;
            ctx.update_app(callback(response));
        });
    }

    /// Fire-and-forget write, equivalent to an apply-style commit.
    pub fn store(&self, scope: PrefScope, entries: Vec<(String, PrefValue)>) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let _ = ctx
                .request_from_shell(PrefsOperation::Store { scope, entries })
                .await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(PrefValue::Float(1.5).as_float(), Some(1.5));
        assert_eq!(PrefValue::Float(1.5).as_long(), None);
        assert_eq!(PrefValue::Long(42).as_long(), Some(42));
        assert_eq!(PrefValue::Int(-7).as_int(), Some(-7));
        assert_eq!(PrefValue::Int(-7).as_float(), None);
    }

    #[test]
    fn test_output_lookup() {
        let output = PrefsOutput::Loaded {
            entries: vec![
                ("map_zoom".into(), PrefValue::Float(16.0)),
                ("map_lat".into(), PrefValue::Long(123)),
            ],
        };

        assert_eq!(output.get("map_zoom"), Some(PrefValue::Float(16.0)));
        assert_eq!(output.get("map_lat"), Some(PrefValue::Long(123)));
        assert_eq!(output.get("map_rotation"), None);
        assert_eq!(PrefsOutput::Stored.get("map_zoom"), None);
    }

    #[test]
    fn test_operation_serialization_round_trip() {
        let op = PrefsOperation::Store {
            scope: PrefScope::Screen,
            entries: vec![("map_tilt".into(), PrefValue::Float(30.0))],
        };
        let json = serde_json::to_string(&op).unwrap();
        let parsed: PrefsOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, parsed);
    }

    #[test]
    fn test_long_round_trips_f64_bits() {
        let lat = 48.783_521_9_f64;
        let value = PrefValue::Long(lat.to_bits());
        let restored = f64::from_bits(value.as_long().unwrap());
        assert_eq!(restored.to_bits(), lat.to_bits());
    }
}
