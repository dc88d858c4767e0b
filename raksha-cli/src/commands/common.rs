//! Common types and utilities shared across CLI commands.

use std::sync::Arc;

use clap::ValueEnum;
use console::style;

use raksha::directory::NominatimProvider;
use raksha::discovery::{CategoryFilter, ServiceCategory, ServiceRecord};

use crate::error::CliError;

/// Category filter selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CategoryArg {
    /// All categories
    All,
    /// Police stations only
    Police,
    /// Hospitals only
    Hospital,
    /// Fixed facilities only
    Facility,
}

impl From<CategoryArg> for CategoryFilter {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::All => CategoryFilter::All,
            CategoryArg::Police => CategoryFilter::Only(ServiceCategory::Police),
            CategoryArg::Hospital => CategoryFilter::Only(ServiceCategory::Hospital),
            CategoryArg::Facility => CategoryFilter::Only(ServiceCategory::FixedFacility),
        }
    }
}

/// Build the live directory provider unless running offline.
pub fn resolve_provider(offline: bool) -> Result<Option<Arc<NominatimProvider>>, CliError> {
    if offline {
        return Ok(None);
    }
    let provider = NominatimProvider::new().map_err(|e| CliError::Provider(e.to_string()))?;
    Ok(Some(Arc::new(provider)))
}

/// Print a ranked service listing.
pub fn print_services(services: &[ServiceRecord]) {
    if services.is_empty() {
        println!("  {}", style("no services found").dim());
        return;
    }

    for service in services {
        println!(
            "  {:<9} {:>6.1} km  {}  {}",
            style(service.category.to_string()).cyan(),
            service.distance_km,
            style(&service.name).bold(),
            style(format!("☎ {}", service.phone)).green(),
        );
        println!("            {}", style(&service.address).dim());
    }
}
