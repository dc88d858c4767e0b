//! Tracking controller - poll-loop state machine over the position source.
//!
//! Drives the device position provider on a schedule, applies best-effort
//! reverse geocoding to each fix, and publishes immutable snapshots to
//! subscribers over a broadcast channel.
//!
//! # Concurrency contract
//!
//! - Only one position request is outstanding at any time. A scheduled
//!   tick firing while a request is in flight is coalesced (skipped),
//!   never queued.
//! - `stop()` cancels the schedule immediately. In-flight requests are
//!   not force-aborted; their results are discarded on arrival via a
//!   session generation counter.
//! - Repeated retryable failures delay the next scheduled request with a
//!   capped exponential backoff; a success resets it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigError, TrackingConfig, RECOMMENDED_MIN_INTERVAL};
use crate::directory::DirectoryProvider;
use crate::geocode::GeocodeResolver;
use crate::metrics::EngineMetrics;

use super::source::{PositionError, PositionRequest, PositionSource, RawPosition};
use super::state::{PositionSnapshot, TrackingEvent, TrackingState};

/// Broadcast capacity for tracking events.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Maximum backoff between retries after consecutive failures (5 minutes).
const MAX_BACKOFF: Duration = Duration::from_secs(300);

/// Mutable controller state.
struct Inner {
    /// Current session state.
    state: TrackingState,

    /// Most recent snapshot, if any.
    snapshot: Option<Arc<PositionSnapshot>>,

    /// Consecutive retryable failures (for backoff).
    consecutive_failures: u32,
}

impl Inner {
    /// Last-known-good state: `Active` with a snapshot, `Idle` without.
    fn last_good(&self) -> TrackingState {
        if self.snapshot.is_some() {
            TrackingState::Active
        } else {
            TrackingState::Idle
        }
    }
}

/// Handle to a running schedule.
struct Schedule {
    token: CancellationToken,
}

struct ControllerShared<S, D> {
    /// Device position provider.
    source: Arc<S>,

    /// Best-effort address resolver.
    resolver: GeocodeResolver<D>,

    /// Tracking configuration.
    config: TrackingConfig,

    /// Session state.
    inner: RwLock<Inner>,

    /// One-outstanding-request guard.
    in_flight: AtomicBool,

    /// Session generation; results from superseded sessions are discarded.
    generation: AtomicU64,

    /// Active schedule, if tracking.
    schedule: Mutex<Option<Schedule>>,

    /// Event broadcast to subscribers.
    events_tx: broadcast::Sender<TrackingEvent>,

    /// Shared engine metrics.
    metrics: Arc<EngineMetrics>,
}

/// Poll-loop state machine over the position source.
///
/// Cheap to clone; clones share the same session.
pub struct TrackingController<S, D> {
    shared: Arc<ControllerShared<S, D>>,
}

impl<S, D> Clone for TrackingController<S, D> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S, D> TrackingController<S, D>
where
    S: PositionSource + 'static,
    D: DirectoryProvider + 'static,
{
    /// Create a new controller. No request is issued until `start()` or
    /// `request_once()`.
    pub fn new(
        source: Arc<S>,
        resolver: GeocodeResolver<D>,
        config: TrackingConfig,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(ControllerShared {
                source,
                resolver,
                config,
                inner: RwLock::new(Inner {
                    state: TrackingState::Idle,
                    snapshot: None,
                    consecutive_failures: 0,
                }),
                in_flight: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                schedule: Mutex::new(None),
                events_tx,
                metrics,
            }),
        }
    }

    /// Subscribe to tracking events.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackingEvent> {
        self.shared.events_tx.subscribe()
    }

    /// Current session state.
    pub fn state(&self) -> TrackingState {
        self.shared.inner.read().unwrap().state
    }

    /// Most recent snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<PositionSnapshot>> {
        self.shared.inner.read().unwrap().snapshot.clone()
    }

    /// Whether a recurring schedule is running.
    pub fn is_tracking(&self) -> bool {
        self.shared.schedule.lock().unwrap().is_some()
    }

    /// Start recurring tracking.
    ///
    /// No-op when already tracking. Transitions `Idle`/`Denied` →
    /// `Requesting`, issues an immediate request, and repeats every
    /// `interval`.
    pub fn start(&self, interval: Duration, high_accuracy: bool) -> Result<(), ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }

        let mut schedule = self.shared.schedule.lock().unwrap();
        if schedule.is_some() {
            tracing::debug!("Tracking already active; start ignored");
            return Ok(());
        }

        if interval < RECOMMENDED_MIN_INTERVAL {
            tracing::warn!(
                interval_ms = interval.as_millis() as u64,
                floor_ms = RECOMMENDED_MIN_INTERVAL.as_millis() as u64,
                "Tracking interval below recommended floor"
            );
        }

        {
            let mut inner = self.shared.inner.write().unwrap();
            inner.state = TrackingState::Requesting;
            inner.consecutive_failures = 0;
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        *schedule = Some(Schedule {
            token: token.clone(),
        });
        drop(schedule);

        let controller = self.clone();
        tokio::spawn(async move {
            controller
                .run_schedule(interval, high_accuracy, generation, token)
                .await;
        });

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            high_accuracy,
            "Tracking started"
        );
        Ok(())
    }

    /// Stop recurring tracking.
    ///
    /// Cancels the schedule immediately and transitions to the
    /// last-known-good state (`Active` if a snapshot exists, else
    /// `Idle`). Idempotent; a second call leaves the state unchanged.
    /// Results of requests still in flight are discarded on arrival.
    pub fn stop(&self) {
        let mut schedule = self.shared.schedule.lock().unwrap();
        let had_schedule = match schedule.take() {
            Some(active) => {
                active.token.cancel();
                true
            }
            None => false,
        };

        // Supersede any in-flight request
        self.shared.generation.fetch_add(1, Ordering::SeqCst);

        let mut inner = self.shared.inner.write().unwrap();
        inner.state = inner.last_good();
        inner.consecutive_failures = 0;

        if had_schedule {
            tracing::info!(state = %inner.state, "Tracking stopped");
        } else {
            tracing::debug!("stop() with no active schedule");
        }
    }

    /// Issue a single high-accuracy position request outside the schedule.
    ///
    /// Does not reset the schedule timer. Returns `false` when coalesced
    /// because another request was already outstanding; the outcome is
    /// published to subscribers like any scheduled request.
    pub async fn request_once(&self) -> bool {
        let generation = self.shared.generation.load(Ordering::SeqCst);
        self.issue_request(true, generation).await
    }

    /// The recurring schedule loop.
    async fn run_schedule(
        &self,
        interval: Duration,
        high_accuracy: bool,
        generation: u64,
        token: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(interval);
        // Coalesce: ticks that fire while a request is outstanding are
        // skipped, never queued.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let failures = self.shared.inner.read().unwrap().consecutive_failures;
            if failures > 0 {
                let backoff = retry_backoff(failures);
                tracing::debug!(
                    backoff_secs = backoff.as_secs(),
                    consecutive_failures = failures,
                    "Backing off before next position request"
                );
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(backoff) => {}
                }
            }

            // Denied is terminal: ticks must not re-prompt on their own
            if self.state() == TrackingState::Denied {
                continue;
            }

            self.issue_request(high_accuracy, generation).await;
        }

        tracing::debug!("Tracking schedule stopped");
    }

    /// Issue one position request and publish its outcome.
    ///
    /// Returns `false` when the request was coalesced or its result was
    /// discarded as stale, `true` otherwise.
    async fn issue_request(&self, high_accuracy: bool, generation: u64) -> bool {
        if self.shared.in_flight.swap(true, Ordering::SeqCst) {
            self.shared.metrics.tick_coalesced();
            tracing::debug!("Position request already outstanding; coalescing");
            return false;
        }

        {
            let mut inner = self.shared.inner.write().unwrap();
            inner.state = TrackingState::Requesting;
        }
        self.shared.metrics.position_request();

        let options = PositionRequest {
            high_accuracy,
            timeout: self.shared.config.position_timeout,
            max_cache_age: self.shared.config.max_cache_age,
        };

        let result = match tokio::time::timeout(
            options.timeout,
            self.shared.source.request_position(options),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(PositionError::Timeout(options.timeout)),
        };

        if generation != self.shared.generation.load(Ordering::SeqCst) {
            tracing::debug!("Discarding position result from superseded session");
            self.shared.in_flight.store(false, Ordering::SeqCst);
            return false;
        }

        let issued = match result {
            Ok(raw) => {
                self.handle_fix(raw, generation).await;
                true
            }
            Err(PositionError::PermissionDenied) => {
                {
                    let mut inner = self.shared.inner.write().unwrap();
                    inner.state = TrackingState::Denied;
                }
                self.shared.metrics.permission_denied();
                tracing::warn!("Location permission denied; tracking requires user action");
                let _ = self.shared.events_tx.send(TrackingEvent::Denied);
                true
            }
            Err(error) => {
                {
                    let mut inner = self.shared.inner.write().unwrap();
                    inner.state = inner.last_good();
                    inner.consecutive_failures += 1;
                }
                self.shared.metrics.transient_failure();
                tracing::warn!(error = %error, "Position request failed; will retry on schedule");
                let _ = self.shared.events_tx.send(TrackingEvent::Transient(error));
                true
            }
        };

        self.shared.in_flight.store(false, Ordering::SeqCst);
        issued
    }

    /// Build, store and publish a snapshot from a successful fix.
    async fn handle_fix(&self, raw: RawPosition, generation: u64) {
        // Geocoding is best-effort and bounded; a slow resolver leaves
        // the address empty, never delays or fails the snapshot.
        let resolved_address = match tokio::time::timeout(
            self.shared.config.geocode_timeout,
            self.shared.resolver.resolve(raw.latitude, raw.longitude),
        )
        .await
        {
            Ok(address) => Some(address),
            Err(_) => None,
        };

        // The geocode attempt may outlast a stop(); re-check before publishing
        if generation != self.shared.generation.load(Ordering::SeqCst) {
            tracing::debug!("Discarding snapshot from superseded session");
            return;
        }

        let snapshot = Arc::new(PositionSnapshot {
            latitude: raw.latitude,
            longitude: raw.longitude,
            accuracy_meters: raw.accuracy_meters.max(0.0),
            captured_at_epoch_ms: chrono::Utc::now().timestamp_millis(),
            resolved_address,
        });

        {
            let mut inner = self.shared.inner.write().unwrap();
            inner.state = TrackingState::Active;
            inner.snapshot = Some(Arc::clone(&snapshot));
            inner.consecutive_failures = 0;
        }

        self.shared.metrics.snapshot_published();
        tracing::info!(
            latitude = snapshot.latitude,
            longitude = snapshot.longitude,
            accuracy_m = snapshot.accuracy_meters,
            "Position updated"
        );
        let _ = self.shared.events_tx.send(TrackingEvent::Position(snapshot));
    }
}

/// Exponential backoff: 2^n seconds, capped at [`MAX_BACKOFF`].
fn retry_backoff(consecutive_failures: u32) -> Duration {
    let secs = 2u64.saturating_pow(consecutive_failures.min(20));
    Duration::from_secs(secs).min(MAX_BACKOFF)
}
