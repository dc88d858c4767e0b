//! Engine configuration.
//!
//! This module defines the configuration structs for the tracking and
//! discovery components, with validated defaults taken from the shipped
//! client behavior. Hosts supply these at session start; nothing is
//! persisted by the engine itself.

use std::time::Duration;

use thiserror::Error;

use crate::geo::Coordinate;

/// Default interval between scheduled position requests (15 s).
pub const DEFAULT_TRACKING_INTERVAL: Duration = Duration::from_secs(15);

/// Recommended floor for the tracking interval.
///
/// Shorter intervals hammer the position provider and drain battery;
/// `start()` logs a warning below this but does not reject the value.
pub const RECOMMENDED_MIN_INTERVAL: Duration = Duration::from_secs(5);

/// Default per-request position timeout (15 s).
pub const DEFAULT_POSITION_TIMEOUT: Duration = Duration::from_secs(15);

/// Default bounded timeout for reverse geocoding (5 s).
///
/// Geocoding is best-effort; a snapshot is never delayed longer than this
/// waiting for an address.
pub const DEFAULT_GEOCODE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default nearby-search radius in meters (5 km).
pub const DEFAULT_SEARCH_RADIUS_METERS: u32 = 5_000;

/// Maximum accepted live results per category per refresh.
///
/// Bounds marker-rendering cost on the presentation surface.
pub const DEFAULT_PER_CATEGORY_CAP: usize = 5;

/// Default map center when no position is available yet (Delhi).
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: 28.6139,
    longitude: 77.2090,
};

/// Errors raised by configuration validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The tracking interval must be greater than zero.
    #[error("tracking interval must be greater than zero")]
    ZeroInterval,

    /// The search radius must be greater than zero.
    #[error("search radius must be greater than zero")]
    ZeroRadius,

    /// The per-category result cap must be greater than zero.
    #[error("per-category result cap must be greater than zero")]
    ZeroCategoryCap,
}

/// Configuration for the tracking controller.
#[derive(Debug, Clone)]
pub struct TrackingConfig {
    /// Per-request position timeout.
    pub position_timeout: Duration,

    /// Maximum acceptable age of a cached provider position.
    ///
    /// Zero forces a fresh fix on every request, matching the shipped
    /// client's tracked requests.
    pub max_cache_age: Duration,

    /// Bounded timeout for the reverse-geocode attempt per snapshot.
    pub geocode_timeout: Duration,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            position_timeout: DEFAULT_POSITION_TIMEOUT,
            max_cache_age: Duration::ZERO,
            geocode_timeout: DEFAULT_GEOCODE_TIMEOUT,
        }
    }
}

impl TrackingConfig {
    /// Set the per-request position timeout.
    pub fn with_position_timeout(mut self, timeout: Duration) -> Self {
        self.position_timeout = timeout;
        self
    }

    /// Set the maximum cached-position age.
    pub fn with_max_cache_age(mut self, age: Duration) -> Self {
        self.max_cache_age = age;
        self
    }

    /// Set the reverse-geocode timeout.
    pub fn with_geocode_timeout(mut self, timeout: Duration) -> Self {
        self.geocode_timeout = timeout;
        self
    }
}

/// Configuration for the service discovery engine.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Nearby-search radius in meters.
    pub radius_meters: u32,

    /// Maximum accepted live results per category per refresh.
    pub per_category_cap: usize,

    /// Whether static seed facilities are appended after live results.
    pub include_seeds: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
            per_category_cap: DEFAULT_PER_CATEGORY_CAP,
            include_seeds: true,
        }
    }
}

impl DiscoveryConfig {
    /// Set the search radius in meters.
    pub fn with_radius_meters(mut self, radius: u32) -> Self {
        self.radius_meters = radius;
        self
    }

    /// Set the per-category result cap.
    pub fn with_per_category_cap(mut self, cap: usize) -> Self {
        self.per_category_cap = cap;
        self
    }

    /// Enable or disable seed facilities.
    pub fn with_seeds(mut self, include: bool) -> Self {
        self.include_seeds = include;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radius_meters == 0 {
            return Err(ConfigError::ZeroRadius);
        }
        if self.per_category_cap == 0 {
            return Err(ConfigError::ZeroCategoryCap);
        }
        Ok(())
    }
}
