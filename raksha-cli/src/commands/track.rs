//! Track command - run a live tracking session in the terminal.
//!
//! Drives the engine with a simulated device position source (a slow
//! northward walk from the given start coordinate, so re-ranking is
//! visible) and prints each snapshot with the nearest services.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use console::style;
use tokio_util::sync::CancellationToken;

use raksha::config::{DiscoveryConfig, TrackingConfig};
use raksha::discovery::{ServiceCategory, ServiceDiscoveryEngine};
use raksha::geo::Coordinate;
use raksha::geocode::GeocodeResolver;
use raksha::logging::{default_log_dir, default_log_file, init_logging};
use raksha::metrics::EngineMetrics;
use raksha::position::{
    PositionError, PositionRequest, PositionSource, RawPosition, TrackingController, TrackingEvent,
};

use super::common::{print_services, resolve_provider};
use crate::error::CliError;

/// Degrees of latitude walked per fix (~11 m).
const WALK_STEP_DEG: f64 = 0.0001;

/// Arguments for the track command.
#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Simulated device start latitude
    #[arg(long, default_value_t = 28.6139)]
    pub lat: f64,

    /// Simulated device start longitude
    #[arg(long, default_value_t = 77.2090)]
    pub lng: f64,

    /// Tracking interval in seconds
    #[arg(long, default_value_t = 15)]
    pub interval: u64,

    /// Request lower-power positioning
    #[arg(long)]
    pub low_accuracy: bool,

    /// Skip live directory lookups (seed facilities only)
    #[arg(long)]
    pub offline: bool,
}

/// Simulated device position source.
///
/// Each request returns a fix one step further north of the start, like a
/// pedestrian walking away from the initial location.
struct SimulatedSource {
    start: Coordinate,
    fixes: AtomicU64,
}

impl SimulatedSource {
    fn new(start: Coordinate) -> Self {
        Self {
            start,
            fixes: AtomicU64::new(0),
        }
    }
}

impl PositionSource for SimulatedSource {
    async fn request_position(
        &self,
        options: PositionRequest,
    ) -> Result<RawPosition, PositionError> {
        let step = self.fixes.fetch_add(1, Ordering::SeqCst);
        Ok(RawPosition {
            latitude: self.start.latitude + step as f64 * WALK_STEP_DEG,
            longitude: self.start.longitude,
            accuracy_meters: if options.high_accuracy { 8.0 } else { 50.0 },
        })
    }
}

/// Run the track command.
pub fn run(args: TrackArgs) -> Result<(), CliError> {
    let start = Coordinate::new(args.lat, args.lng);
    if !start.is_valid() {
        return Err(CliError::Config(format!(
            "invalid start coordinate: {}, {}",
            args.lat, args.lng
        )));
    }

    let _guard =
        init_logging(default_log_dir(), default_log_file()).map_err(CliError::Logging)?;

    tracing::info!(
        latitude = args.lat,
        longitude = args.lng,
        interval_secs = args.interval,
        offline = args.offline,
        "Track command started"
    );

    println!("{} v{}", style("Raksha Live Tracking").bold(), raksha::VERSION);
    println!("Start:    {}", start);
    println!("Interval: {} s", args.interval);
    println!("Press Ctrl-C to stop.");
    println!();

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    runtime.block_on(track_session(args, start))
}

async fn track_session(args: TrackArgs, start: Coordinate) -> Result<(), CliError> {
    let metrics = Arc::new(EngineMetrics::new());
    let provider = resolve_provider(args.offline)?;

    let resolver = GeocodeResolver::new(provider.clone(), Arc::clone(&metrics));
    let controller = TrackingController::new(
        Arc::new(SimulatedSource::new(start)),
        resolver,
        TrackingConfig::default(),
        Arc::clone(&metrics),
    );
    let engine = ServiceDiscoveryEngine::new(
        provider,
        DiscoveryConfig::default(),
        Arc::clone(&metrics),
    );

    let shutdown = CancellationToken::new();
    let handler_token = shutdown.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| CliError::Config(format!("failed to install Ctrl-C handler: {}", e)))?;

    let mut events = controller.subscribe();
    controller.start(Duration::from_secs(args.interval), !args.low_accuracy)?;

    let mut refreshed = false;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            event = events.recv() => {
                let Ok(event) = event else { break };
                match event {
                    TrackingEvent::Position(snapshot) => {
                        let center = snapshot.coordinate();
                        if refreshed {
                            engine.re_rank(center);
                        } else {
                            engine.refresh(center, &ServiceCategory::ALL).await;
                            refreshed = true;
                        }

                        let address = snapshot
                            .resolved_address
                            .clone()
                            .unwrap_or_else(|| "address unavailable".to_string());
                        println!(
                            "{} {} (±{:.0} m) - {}",
                            style("position").blue(),
                            center,
                            snapshot.accuracy_meters,
                            address
                        );
                        print_services(&engine.visible_by_distance());
                        println!();
                    }
                    TrackingEvent::Transient(error) => {
                        println!("{} {} (retrying on schedule)", style("warning").yellow(), error);
                    }
                    TrackingEvent::Denied => {
                        println!(
                            "{} location permission denied - tracking inactive, action required",
                            style("blocked").red()
                        );
                    }
                }
            }
        }
    }

    controller.stop();

    let summary = metrics.snapshot();
    println!();
    println!(
        "Session: {} requests, {} snapshots, {} coalesced, {} transient failures",
        summary.position_requests,
        summary.snapshots_published,
        summary.ticks_coalesced,
        summary.transient_failures
    );

    Ok(())
}
