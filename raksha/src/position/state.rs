//! Core state types for position tracking.
//!
//! - [`TrackingState`] - Where is the tracking session in its lifecycle?
//! - [`PositionSnapshot`] - One captured device position with metadata
//! - [`TrackingEvent`] - What the controller publishes to subscribers

use std::fmt;
use std::sync::Arc;

use crate::geo::Coordinate;

use super::source::PositionError;

/// Tracking session state.
///
/// Exactly one current state per session. `Denied` is terminal until the
/// caller explicitly re-invokes `start()`; transient failures never enter
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    /// No position has been acquired and no request is running.
    #[default]
    Idle,
    /// A position request is outstanding.
    Requesting,
    /// A position is held; scheduled refreshes re-enter `Requesting`.
    Active,
    /// The provider refused permission; requires user action.
    Denied,
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Requesting => write!(f, "Requesting"),
            Self::Active => write!(f, "Active"),
            Self::Denied => write!(f, "Denied"),
        }
    }
}

/// An immutable captured device position.
///
/// A new snapshot replaces, never mutates, the previous one. Snapshots
/// originate exclusively from real provider callbacks; the engine never
/// fabricates one.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// Reported accuracy radius in meters; never negative.
    pub accuracy_meters: f64,

    /// Capture time as Unix epoch milliseconds.
    pub captured_at_epoch_ms: i64,

    /// Best-effort resolved address; `None` when resolution did not
    /// complete in time.
    pub resolved_address: Option<String>,
}

impl PositionSnapshot {
    /// The snapshot's coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Events published by the tracking controller.
///
/// Snapshots are published in resolution order, which equals request-issue
/// order because only one request is ever outstanding.
#[derive(Debug, Clone)]
pub enum TrackingEvent {
    /// A new position snapshot was captured.
    Position(Arc<PositionSnapshot>),

    /// A retryable failure; the schedule, if running, continues.
    Transient(PositionError),

    /// Permission was refused; tracking is inactive until the user acts.
    Denied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(TrackingState::default(), TrackingState::Idle);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(TrackingState::Idle.to_string(), "Idle");
        assert_eq!(TrackingState::Denied.to_string(), "Denied");
    }

    #[test]
    fn test_snapshot_coordinate() {
        let snapshot = PositionSnapshot {
            latitude: 28.6139,
            longitude: 77.2090,
            accuracy_meters: 12.0,
            captured_at_epoch_ms: 1_700_000_000_000,
            resolved_address: None,
        };

        let coordinate = snapshot.coordinate();
        assert!((coordinate.latitude - 28.6139).abs() < 1e-9);
        assert!((coordinate.longitude - 77.2090).abs() < 1e-9);
    }
}
