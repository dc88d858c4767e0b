//! Raksha - Live location & proximity service discovery engine
//!
//! This library provides the core engine of the Raksha personal-safety
//! client: continuous device position tracking with graceful degradation,
//! best-effort reverse geocoding, and discovery/ranking of nearby emergency
//! services (police stations, hospitals, fixed facilities).
//!
//! # High-Level API
//!
//! A host composes one [`position::TrackingController`] and one
//! [`discovery::ServiceDiscoveryEngine`] per active session:
//!
//! ```ignore
//! use raksha::config::TrackingConfig;
//! use raksha::position::{TrackingController, TrackingEvent};
//! use raksha::discovery::{ServiceDiscoveryEngine, ServiceCategory};
//!
//! let controller = TrackingController::new(source, resolver, config, metrics);
//! let mut events = controller.subscribe();
//! controller.start(Duration::from_secs(15), true)?;
//!
//! while let Ok(event) = events.recv().await {
//!     if let TrackingEvent::Position(snapshot) = event {
//!         engine.re_rank(snapshot.coordinate());
//!     }
//! }
//! ```
//!
//! Rendering (map markers, camera) and outbound telephony are the host's
//! responsibility; this crate only produces ranked data and deep links.

pub mod config;
pub mod directory;
pub mod discovery;
pub mod geo;
pub mod geocode;
pub mod intents;
pub mod logging;
pub mod metrics;
pub mod position;

/// Version of the Raksha engine library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
