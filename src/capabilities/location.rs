//! Capability wrapping the fused-location client.
//!
//! Connection and update subscription are commands to the shell; the fixes
//! themselves arrive back as plain `Event::LocationChanged` pushes at the
//! configured interval and displacement. A permission failure surfaces to the
//! hosting screen, not here: the core just stops receiving fixes.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{LOCATION_INTERVAL_MS, LOCATION_MIN_DISPLACEMENT_M};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationPriority {
    HighAccuracy,
    BalancedPower,
    LowPower,
    NoPower,
}

impl Default for LocationPriority {
    fn default() -> Self {
        Self::HighAccuracy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationRequest {
    pub interval_ms: u64,
    pub min_displacement_m: f32,
    pub priority: LocationPriority,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            interval_ms: LOCATION_INTERVAL_MS,
            min_displacement_m: LOCATION_MIN_DISPLACEMENT_M,
            priority: LocationPriority::HighAccuracy,
        }
    }
}

impl LocationRequest {
    #[must_use]
    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    #[must_use]
    pub fn with_min_displacement_m(mut self, meters: f32) -> Self {
        self.min_displacement_m = meters.max(0.0);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: LocationPriority) -> Self {
        self.priority = priority;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum LocationOperation {
    Connect,
    RequestUpdates { request: LocationRequest },
    RemoveUpdates,
    Disconnect,
}

// `min_displacement_m` is clamped non-negative, never NaN in practice.
impl Eq for LocationOperation {}

impl Operation for LocationOperation {
    type Output = LocationResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationOutput {
    Connected,
    Suspended,
    Done,
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location services unavailable: {message}")]
    Unavailable { message: String },
}

pub type LocationResult = Result<LocationOutput, LocationError>;

#[derive(Clone)]
pub struct LocationClient<E> {
    context: CapabilityContext<LocationOperation, E>,
}

impl<Ev> Capability<Ev> for LocationClient<Ev> {
    type Operation = LocationOperation;
    type MappedSelf<MappedEv> = LocationClient<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        LocationClient::new(self.context.map_event(f))
    }
}

impl<E> LocationClient<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<LocationOperation, E>) -> Self {
        Self { context }
    }

    fn notify(&self, operation: LocationOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let _ = ctx.request_from_shell(operation).await;
        });
    }

    pub fn connect<F>(&self, callback: F)
    where
        F: FnOnce(LocationResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let response = ctx.request_from_shell(LocationOperation::Connect).await;
            ctx.update_app(callback(response));
        });
    }

    pub fn request_updates(&self, request: LocationRequest) {
        self.notify(LocationOperation::RequestUpdates { request });
    }

    pub fn remove_updates(&self) {
        self.notify(LocationOperation::RemoveUpdates);
    }

    pub fn disconnect(&self) {
        self.notify(LocationOperation::Disconnect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_matches_tracking_profile() {
        let request = LocationRequest::default();
        assert_eq!(request.interval_ms, 2000);
        assert!((request.min_displacement_m - 5.0).abs() < f32::EPSILON);
        assert_eq!(request.priority, LocationPriority::HighAccuracy);
    }

    #[test]
    fn test_request_builder() {
        let request = LocationRequest::default()
            .with_interval_ms(10_000)
            .with_min_displacement_m(-3.0)
            .with_priority(LocationPriority::LowPower);

        assert_eq!(request.interval_ms, 10_000);
        assert!(request.min_displacement_m.abs() < f32::EPSILON);
        assert_eq!(request.priority, LocationPriority::LowPower);
    }

    #[test]
    fn test_operation_serialization_round_trip() {
        let op = LocationOperation::RequestUpdates {
            request: LocationRequest::default(),
        };
        let json = serde_json::to_string(&op).unwrap();
        let parsed: LocationOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, parsed);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LocationError::PermissionDenied.to_string(),
            "location permission denied"
        );
    }
}
