//! Engine metrics for observability.
//!
//! Lock-free atomic counters instrumenting the tracking and discovery
//! paths, with point-in-time snapshots for display by a host or the CLI.
//!
//! ```ignore
//! use raksha::metrics::EngineMetrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(EngineMetrics::new());
//! // ... shared with TrackingController / ServiceDiscoveryEngine ...
//! let snapshot = metrics.snapshot();
//! println!("snapshots published: {}", snapshot.snapshots_published);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters for the engine's hot paths.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    position_requests: AtomicU64,
    snapshots_published: AtomicU64,
    ticks_coalesced: AtomicU64,
    transient_failures: AtomicU64,
    permission_denials: AtomicU64,
    refreshes_started: AtomicU64,
    refreshes_committed: AtomicU64,
    refreshes_superseded: AtomicU64,
    geocode_fallbacks: AtomicU64,
}

impl EngineMetrics {
    /// Create a new metrics instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position request issued to the provider.
    pub fn position_request(&self) {
        self.position_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a snapshot published to subscribers.
    pub fn snapshot_published(&self) {
        self.snapshots_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a scheduled tick skipped because a request was outstanding.
    pub fn tick_coalesced(&self) {
        self.ticks_coalesced.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a retryable position failure (unavailable or timeout).
    pub fn transient_failure(&self) {
        self.transient_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a permission denial.
    pub fn permission_denied(&self) {
        self.permission_denials.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a discovery refresh being issued.
    pub fn refresh_started(&self) {
        self.refreshes_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a discovery refresh whose result set was committed.
    pub fn refresh_committed(&self) {
        self.refreshes_committed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a stale refresh discarded because a newer one superseded it.
    pub fn refresh_superseded(&self) {
        self.refreshes_superseded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a reverse-geocode attempt that degraded to the coordinate fallback.
    pub fn geocode_fallback(&self) {
        self.geocode_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            position_requests: self.position_requests.load(Ordering::Relaxed),
            snapshots_published: self.snapshots_published.load(Ordering::Relaxed),
            ticks_coalesced: self.ticks_coalesced.load(Ordering::Relaxed),
            transient_failures: self.transient_failures.load(Ordering::Relaxed),
            permission_denials: self.permission_denials.load(Ordering::Relaxed),
            refreshes_started: self.refreshes_started.load(Ordering::Relaxed),
            refreshes_committed: self.refreshes_committed.load(Ordering::Relaxed),
            refreshes_superseded: self.refreshes_superseded.load(Ordering::Relaxed),
            geocode_fallbacks: self.geocode_fallbacks.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the engine counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub position_requests: u64,
    pub snapshots_published: u64,
    pub ticks_coalesced: u64,
    pub transient_failures: u64,
    pub permission_denials: u64,
    pub refreshes_started: u64,
    pub refreshes_committed: u64,
    pub refreshes_superseded: u64,
    pub geocode_fallbacks: u64,
}
