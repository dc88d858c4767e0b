//! Live device position tracking
//!
//! This module provides the **single source of truth** for the device
//! position during a safety session. A [`TrackingController`] drives the
//! platform's asynchronous position API on a schedule, reconciles
//! intermittent provider failures, attaches a best-effort resolved
//! address to each fix, and publishes immutable snapshots to subscribers.
//!
//! # State machine
//!
//! ```text
//! Idle ──start()──► Requesting ──success──► Active ──tick──► Requesting ...
//!                       │
//!                       ├── permission refused ──► Denied (terminal until start())
//!                       └── unavailable/timeout ──► previous state (+ retry event)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use raksha::position::{TrackingController, TrackingEvent};
//!
//! let controller = TrackingController::new(source, resolver, config, metrics);
//! let mut events = controller.subscribe();
//! controller.start(Duration::from_secs(15), true)?;
//!
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         TrackingEvent::Position(snapshot) => println!("at {}", snapshot.coordinate()),
//!         TrackingEvent::Transient(error) => println!("retrying: {}", error),
//!         TrackingEvent::Denied => println!("enable location services"),
//!     }
//! }
//! ```
//!
//! # Components
//!
//! - [`state`] - `TrackingState`, `PositionSnapshot`, `TrackingEvent`
//! - [`source`] - `PositionSource` trait and request/error types
//! - [`controller`] - the poll-loop state machine

mod controller;
mod source;
mod state;

pub use controller::TrackingController;
pub use source::{PositionError, PositionRequest, PositionSource, RawPosition};
pub use state::{PositionSnapshot, TrackingEvent, TrackingState};

#[cfg(test)]
pub use source::tests::MockPositionSource;
