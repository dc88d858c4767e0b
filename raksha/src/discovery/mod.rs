//! Nearby emergency service discovery
//!
//! This module resolves and ranks nearby emergency services (police,
//! hospitals, fixed facilities) around the device position for display
//! and one-tap contact.
//!
//! # Design
//!
//! - **Fetch**: one nearby-search per requested category against the
//!   external directory, each bounded by the provider's own timeout.
//! - **Merge**: results deduplicated by identity, capped per category,
//!   seeds appended after live results.
//! - **Rank**: great-circle distance against the reference position,
//!   recomputed in place when the position moves; sorting is explicit
//!   and deterministic.
//! - **Filter**: category and free-text filters operate purely on the
//!   fetched in-memory set; no filter change triggers a network call.
//!
//! # Example
//!
//! ```ignore
//! use raksha::discovery::{ServiceDiscoveryEngine, ServiceCategory, CategoryFilter};
//!
//! let engine = ServiceDiscoveryEngine::new(Some(provider), config, metrics);
//! engine.refresh(center, &ServiceCategory::ALL).await;
//! engine.set_filter(CategoryFilter::Only(ServiceCategory::Hospital));
//! for service in engine.visible_by_distance() {
//!     println!("{} ({:.1} km)", service.name, service.distance_km);
//! }
//! ```

mod engine;
mod record;
mod session;

pub use engine::ServiceDiscoveryEngine;
pub use record::{seed_records, CategoryFilter, ServiceCategory, ServiceRecord};
pub use session::DiscoverySession;
