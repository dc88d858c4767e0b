//! Directory/geocoding provider abstraction
//!
//! This module provides the trait and implementations for querying an
//! external places directory: reverse geocoding (coordinate → address
//! text) and nearby-search for emergency service categories.
//!
//! The engine treats the directory as optional and unreliable: every call
//! is a suspension point bounded by a timeout upstream, and failures
//! degrade gracefully (coordinate-text fallback for geocoding, empty
//! category results for searches).

mod nominatim;

pub use nominatim::{NominatimProvider, DEFAULT_NOMINATIM_URL};

use std::future::Future;

use thiserror::Error;

use crate::discovery::ServiceCategory;
use crate::geo::Coordinate;

/// Errors that can occur during directory provider operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DirectoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider returned a payload we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Provider-specific failure.
    #[error("provider error: {0}")]
    ProviderSpecific(String),
}

/// A raw nearby-search hit as returned by a directory provider.
///
/// Hits are provider-shaped and unranked; the discovery engine converts
/// accepted hits into `ServiceRecord`s. A hit without a usable coordinate
/// is discarded during that conversion, never surfaced with a placeholder
/// location.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    /// Facility name as reported by the provider.
    pub name: String,

    /// Facility coordinate, if the provider supplied a usable one.
    pub coordinate: Option<Coordinate>,

    /// Human-readable address text.
    pub address: String,

    /// Provider-scoped stable reference (e.g. an OSM place id).
    pub place_ref: Option<String>,

    /// Contact number, when the provider carries one.
    pub phone: Option<String>,
}

/// Trait for external directory/geocoding providers.
///
/// Implementations perform non-blocking I/O; both operations may suspend
/// indefinitely and are bounded by timeouts at the call site (geocode) or
/// inside the provider's HTTP client (search).
pub trait DirectoryProvider: Send + Sync {
    /// Resolve a coordinate to human-readable address text.
    fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<String, DirectoryError>> + Send;

    /// Search for facilities of a category around a center coordinate.
    ///
    /// # Arguments
    ///
    /// * `center` - Search center
    /// * `radius_meters` - Search radius in meters
    /// * `category` - Service category to search for
    fn nearby_search(
        &self,
        center: Coordinate,
        radius_meters: u32,
        category: ServiceCategory,
    ) -> impl Future<Output = Result<Vec<RawHit>, DirectoryError>> + Send;
}

#[cfg(test)]
pub mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock directory provider for testing.
    ///
    /// Configured per category with hits or an error; reverse geocoding
    /// returns a fixed result. An optional artificial delay simulates a
    /// slow provider for timeout and staleness tests.
    pub struct MockDirectoryProvider {
        reverse: Result<String, DirectoryError>,
        hits: Mutex<HashMap<ServiceCategory, Result<Vec<RawHit>, DirectoryError>>>,
        delay: Option<Duration>,
    }

    impl MockDirectoryProvider {
        pub fn new() -> Self {
            Self {
                reverse: Ok("Mock Street, Mock City".to_string()),
                hits: Mutex::new(HashMap::new()),
                delay: None,
            }
        }

        pub fn with_reverse(mut self, result: Result<String, DirectoryError>) -> Self {
            self.reverse = result;
            self
        }

        pub fn with_hits(self, category: ServiceCategory, hits: Vec<RawHit>) -> Self {
            self.hits.lock().unwrap().insert(category, Ok(hits));
            self
        }

        pub fn with_search_error(self, category: ServiceCategory, error: DirectoryError) -> Self {
            self.hits.lock().unwrap().insert(category, Err(error));
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    impl DirectoryProvider for MockDirectoryProvider {
        async fn reverse_geocode(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<String, DirectoryError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reverse.clone()
        }

        async fn nearby_search(
            &self,
            _center: Coordinate,
            _radius_meters: u32,
            category: ServiceCategory,
        ) -> Result<Vec<RawHit>, DirectoryError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.hits
                .lock()
                .unwrap()
                .get(&category)
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    /// Build a RawHit with a valid coordinate, for use across test modules.
    pub fn hit(name: &str, lat: f64, lng: f64, address: &str, place_ref: &str) -> RawHit {
        RawHit {
            name: name.to_string(),
            coordinate: Some(Coordinate::new(lat, lng)),
            address: address.to_string(),
            place_ref: Some(place_ref.to_string()),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_mock_provider_returns_configured_hits() {
        let provider = MockDirectoryProvider::new().with_hits(
            ServiceCategory::Police,
            vec![hit("PS", 28.62, 77.21, "MG Road", "p1")],
        );

        let hits = provider
            .nearby_search(Coordinate::new(28.6139, 77.2090), 5_000, ServiceCategory::Police)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        // Unconfigured category yields empty, not an error
        let hits = provider
            .nearby_search(Coordinate::new(28.6139, 77.2090), 5_000, ServiceCategory::Hospital)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_mock_provider_search_error() {
        let provider = MockDirectoryProvider::new().with_search_error(
            ServiceCategory::Hospital,
            DirectoryError::Http("503".to_string()),
        );

        let result = provider
            .nearby_search(Coordinate::new(28.6139, 77.2090), 5_000, ServiceCategory::Hospital)
            .await;
        assert!(matches!(result, Err(DirectoryError::Http(_))));
    }
}
