//! Device position source abstraction.
//!
//! Wraps the host platform's asynchronous position API behind a trait so
//! the engine holds no process-wide device state and tests can inject
//! scripted sources. A request may suspend indefinitely; the controller
//! bounds every call with the request's own timeout.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::config::DEFAULT_POSITION_TIMEOUT;

/// Errors a position request can fail with.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PositionError {
    /// The user or platform refused location permission.
    ///
    /// Fatal for the session until the caller explicitly retries; the
    /// schedule never re-prompts on its own.
    #[error("location permission denied")]
    PermissionDenied,

    /// The provider could not produce a fix.
    #[error("position unavailable: {0}")]
    Unavailable(String),

    /// The request exceeded its timeout.
    #[error("position request timed out after {0:?}")]
    Timeout(Duration),
}

impl PositionError {
    /// Whether the next scheduled tick should retry automatically.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, PositionError::PermissionDenied)
    }
}

/// Options for one position request.
#[derive(Debug, Clone, Copy)]
pub struct PositionRequest {
    /// Request a high-accuracy (GPS-grade) fix.
    pub high_accuracy: bool,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Maximum acceptable age of a cached fix; zero forces a fresh one.
    pub max_cache_age: Duration,
}

impl Default for PositionRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: DEFAULT_POSITION_TIMEOUT,
            max_cache_age: Duration::ZERO,
        }
    }
}

/// A raw position fix from the device provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPosition {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Accuracy radius in meters.
    pub accuracy_meters: f64,
}

/// Trait for asynchronous device position providers.
pub trait PositionSource: Send + Sync {
    /// Request a single position fix.
    fn request_position(
        &self,
        options: PositionRequest,
    ) -> impl Future<Output = Result<RawPosition, PositionError>> + Send;
}
