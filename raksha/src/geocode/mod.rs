//! Best-effort reverse geocoding
//!
//! Resolves a coordinate to human-readable address text via the optional
//! directory provider. Resolution is strictly best-effort: any provider
//! error, timeout, or absence degrades to a deterministic fallback string
//! of fixed-precision decimal coordinates. The resolver never returns an
//! error to its caller.

use std::sync::Arc;
use std::time::Duration;

use crate::config::DEFAULT_GEOCODE_TIMEOUT;
use crate::directory::DirectoryProvider;
use crate::metrics::EngineMetrics;

/// Coordinate → address resolver with graceful degradation.
pub struct GeocodeResolver<D> {
    /// Directory provider, if one is configured.
    provider: Option<Arc<D>>,

    /// Bounded timeout for one resolution attempt.
    timeout: Duration,

    /// Shared engine metrics.
    metrics: Arc<EngineMetrics>,
}

impl<D: DirectoryProvider> GeocodeResolver<D> {
    /// Create a resolver with the default timeout.
    pub fn new(provider: Option<Arc<D>>, metrics: Arc<EngineMetrics>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_GEOCODE_TIMEOUT,
            metrics,
        }
    }

    /// Set the resolution timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve a coordinate to address text.
    ///
    /// Returns the provider's address when it answers in time with a
    /// non-empty result, otherwise the coordinate fallback text. Never
    /// fails.
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> String {
        let Some(provider) = &self.provider else {
            self.metrics.geocode_fallback();
            return fallback_text(latitude, longitude);
        };

        match tokio::time::timeout(self.timeout, provider.reverse_geocode(latitude, longitude))
            .await
        {
            Ok(Ok(address)) if !address.trim().is_empty() => address,
            Ok(Ok(_)) => {
                tracing::debug!(latitude, longitude, "Geocoder returned empty address");
                self.metrics.geocode_fallback();
                fallback_text(latitude, longitude)
            }
            Ok(Err(error)) => {
                tracing::debug!(latitude, longitude, error = %error, "Geocoding failed");
                self.metrics.geocode_fallback();
                fallback_text(latitude, longitude)
            }
            Err(_) => {
                tracing::debug!(
                    latitude,
                    longitude,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Geocoding timed out"
                );
                self.metrics.geocode_fallback();
                fallback_text(latitude, longitude)
            }
        }
    }
}

/// Deterministic coordinate fallback: fixed-precision decimal degrees.
pub fn fallback_text(latitude: f64, longitude: f64) -> String {
    format!("{:.4}, {:.4}", latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::tests::MockDirectoryProvider;
    use crate::directory::DirectoryError;

    fn metrics() -> Arc<EngineMetrics> {
        Arc::new(EngineMetrics::new())
    }

    #[test]
    fn test_fallback_text_fixed_precision() {
        assert_eq!(fallback_text(28.61391234, 77.20901234), "28.6139, 77.2090");
        assert_eq!(fallback_text(-12.5, 0.0), "-12.5000, 0.0000");
    }

    #[tokio::test]
    async fn test_resolver_without_provider_falls_back() {
        let metrics = metrics();
        let resolver: GeocodeResolver<MockDirectoryProvider> =
            GeocodeResolver::new(None, Arc::clone(&metrics));

        let address = resolver.resolve(28.6139, 77.2090).await;
        assert_eq!(address, "28.6139, 77.2090");
        assert_eq!(metrics.snapshot().geocode_fallbacks, 1);
    }

    #[tokio::test]
    async fn test_resolver_returns_provider_address() {
        let provider = MockDirectoryProvider::new()
            .with_reverse(Ok("Connaught Place, New Delhi".to_string()));
        let resolver = GeocodeResolver::new(Some(Arc::new(provider)), metrics());

        let address = resolver.resolve(28.6139, 77.2090).await;
        assert_eq!(address, "Connaught Place, New Delhi");
    }

    #[tokio::test]
    async fn test_resolver_falls_back_on_provider_error() {
        let provider = MockDirectoryProvider::new()
            .with_reverse(Err(DirectoryError::Http("500".to_string())));
        let metrics = metrics();
        let resolver = GeocodeResolver::new(Some(Arc::new(provider)), Arc::clone(&metrics));

        let address = resolver.resolve(28.6139, 77.2090).await;
        assert_eq!(address, "28.6139, 77.2090");
        assert_eq!(metrics.snapshot().geocode_fallbacks, 1);
    }

    #[tokio::test]
    async fn test_resolver_falls_back_on_empty_address() {
        let provider = MockDirectoryProvider::new().with_reverse(Ok("   ".to_string()));
        let resolver = GeocodeResolver::new(Some(Arc::new(provider)), metrics());

        let address = resolver.resolve(28.6139, 77.2090).await;
        assert_eq!(address, "28.6139, 77.2090");
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolver_falls_back_on_timeout() {
        let provider =
            MockDirectoryProvider::new().with_delay(Duration::from_secs(30));
        let resolver = GeocodeResolver::new(Some(Arc::new(provider)), metrics())
            .with_timeout(Duration::from_secs(1));

        let address = resolver.resolve(28.6139, 77.2090).await;
        assert_eq!(address, "28.6139, 77.2090");
    }
}
