//! Nearby command - one-shot discovery of emergency services.

use std::sync::Arc;

use clap::Args;
use console::style;

use raksha::config::DiscoveryConfig;
use raksha::discovery::{ServiceCategory, ServiceDiscoveryEngine};
use raksha::geo::Coordinate;
use raksha::metrics::EngineMetrics;

use super::common::{print_services, resolve_provider, CategoryArg};
use crate::error::CliError;

/// Arguments for the nearby command.
#[derive(Debug, Args)]
pub struct NearbyArgs {
    /// Search center latitude
    #[arg(long, default_value_t = 28.6139)]
    pub lat: f64,

    /// Search center longitude
    #[arg(long, default_value_t = 77.2090)]
    pub lng: f64,

    /// Search radius in meters
    #[arg(long, default_value_t = 5000)]
    pub radius: u32,

    /// Category to show
    #[arg(long, value_enum, default_value_t = CategoryArg::All)]
    pub filter: CategoryArg,

    /// Free-text filter against name or address
    #[arg(long)]
    pub query: Option<String>,

    /// Skip live directory lookups (seed facilities only)
    #[arg(long)]
    pub offline: bool,
}

/// Run the nearby command.
pub fn run(args: NearbyArgs) -> Result<(), CliError> {
    let center = Coordinate::new(args.lat, args.lng);
    if !center.is_valid() {
        return Err(CliError::Config(format!(
            "invalid search center: {}, {}",
            args.lat, args.lng
        )));
    }

    let config = DiscoveryConfig::default().with_radius_meters(args.radius);
    config.validate()?;

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    runtime.block_on(async {
        let provider = resolve_provider(args.offline)?;
        let engine =
            ServiceDiscoveryEngine::new(provider, config, Arc::new(EngineMetrics::new()));

        engine.refresh(center, &ServiceCategory::ALL).await;
        engine.set_filter(args.filter.into());
        if let Some(query) = &args.query {
            engine.set_query(query.clone());
        }

        let ranked = engine.visible_by_distance();
        println!(
            "{} near {} ({} found)",
            style("Emergency services").bold(),
            center,
            ranked.len()
        );
        print_services(&ranked);

        Ok(())
    })
}
