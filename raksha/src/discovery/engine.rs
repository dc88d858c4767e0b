//! Service discovery engine.
//!
//! Issues category searches against the external directory, merges and
//! deduplicates the results, ranks them by distance, and owns the
//! [`DiscoverySession`] the presentation layer reads from.
//!
//! # Staleness
//!
//! Refreshes are guarded by a generation counter: a refresh issued while
//! an older one is still in flight supersedes it, and the older result
//! set is discarded when it finally resolves. The visible set therefore
//! always comes from the most recently issued refresh.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use futures::future::join_all;

use crate::config::DiscoveryConfig;
use crate::directory::{DirectoryProvider, RawHit};
use crate::geo::{distance_km, Coordinate};
use crate::metrics::EngineMetrics;

use super::record::{seed_records, CategoryFilter, ServiceCategory, ServiceRecord};
use super::session::DiscoverySession;

/// Discovery engine over an optional live directory provider.
///
/// Without a provider, every refresh yields the seed registry only; the
/// filtering, ranking and staleness contracts are identical either way.
pub struct ServiceDiscoveryEngine<D> {
    /// Live directory provider, if one is configured.
    provider: Option<Arc<D>>,

    /// Engine configuration.
    config: DiscoveryConfig,

    /// The current session (merged set + view state).
    session: RwLock<DiscoverySession>,

    /// Refresh generation counter; the newest issued refresh wins.
    generation: AtomicU64,

    /// Shared engine metrics.
    metrics: Arc<EngineMetrics>,
}

impl<D: DirectoryProvider> ServiceDiscoveryEngine<D> {
    /// Create a new engine.
    pub fn new(provider: Option<Arc<D>>, config: DiscoveryConfig, metrics: Arc<EngineMetrics>) -> Self {
        Self {
            provider,
            config,
            session: RwLock::new(DiscoverySession::new()),
            generation: AtomicU64::new(0),
            metrics,
        }
    }

    /// Run a full discovery refresh around a center.
    ///
    /// Issues one nearby-search per requested category. A failed category
    /// contributes zero results and never aborts the others; seeds are
    /// appended after live results regardless. The merged set replaces
    /// the session's prior set atomically.
    ///
    /// Returns `true` if the result set was committed, `false` if a newer
    /// refresh superseded this one and the result was discarded.
    pub async fn refresh(&self, center: Coordinate, categories: &[ServiceCategory]) -> bool {
        self.metrics.refresh_started();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut merged: Vec<ServiceRecord> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        if let Some(provider) = &self.provider {
            let radius = self.config.radius_meters;
            let searches = categories.iter().map(|&category| {
                let provider = Arc::clone(provider);
                async move {
                    (
                        category,
                        provider.nearby_search(center, radius, category).await,
                    )
                }
            });

            for (category, result) in join_all(searches).await {
                match result {
                    Ok(hits) => {
                        let accepted =
                            accept_hits(category, hits, center, self.config.per_category_cap);
                        for record in accepted {
                            if seen.insert(record.id.clone()) {
                                merged.push(record);
                            }
                        }
                    }
                    Err(error) => {
                        // One category failing must not abort the refresh
                        tracing::warn!(
                            category = %category,
                            error = %error,
                            "Nearby search failed; category left empty"
                        );
                    }
                }
            }
        }

        if self.config.include_seeds {
            for record in seed_records(center) {
                if seen.insert(record.id.clone()) {
                    merged.push(record);
                }
            }
        }

        // Commit only if no newer refresh was issued meanwhile. The check
        // happens under the session write lock so a superseded refresh can
        // never overwrite the newer set.
        let mut session = self.session.write().unwrap();
        if self.generation.load(Ordering::SeqCst) != generation {
            self.metrics.refresh_superseded();
            tracing::debug!(generation, "Discarding superseded refresh result");
            return false;
        }

        tracing::info!(
            generation,
            records = merged.len(),
            "Discovery refresh committed"
        );
        session.replace(merged);
        self.metrics.refresh_committed();
        true
    }

    /// Recompute every record's distance against a new center.
    ///
    /// Operates on the in-memory set only; record order is untouched.
    /// The update is atomic: readers observe either the old distances or
    /// the new ones, never a half-updated set.
    pub fn re_rank(&self, center: Coordinate) {
        let mut session = self.session.write().unwrap();
        session.re_rank(center);
    }

    /// Set the category filter; no provider call is made.
    pub fn set_filter(&self, filter: CategoryFilter) {
        self.session.write().unwrap().set_filter(filter);
    }

    /// Set the free-text query; no provider call is made.
    pub fn set_query(&self, query: impl Into<String>) {
        self.session.write().unwrap().set_query(query);
    }

    /// All records of the current set in merge order.
    pub fn records(&self) -> Vec<ServiceRecord> {
        self.session.read().unwrap().records().to_vec()
    }

    /// Records passing the active filter and query, in merge order.
    pub fn visible(&self) -> Vec<ServiceRecord> {
        self.session.read().unwrap().visible()
    }

    /// Records passing the active filter and query, nearest first.
    pub fn visible_by_distance(&self) -> Vec<ServiceRecord> {
        self.session.read().unwrap().visible_by_distance()
    }
}

/// Convert raw hits of one category into accepted records.
///
/// Hits without a usable coordinate are discarded; acceptance stops at
/// the per-category cap. Live hits without a phone get the category's
/// national emergency number.
fn accept_hits(
    category: ServiceCategory,
    hits: Vec<RawHit>,
    center: Coordinate,
    cap: usize,
) -> Vec<ServiceRecord> {
    let mut accepted = Vec::new();

    for hit in hits {
        if accepted.len() == cap {
            break;
        }

        let Some(coordinate) = hit.coordinate.filter(Coordinate::is_valid) else {
            tracing::debug!(
                category = %category,
                name = %hit.name,
                "Discarding hit without usable coordinate"
            );
            continue;
        };

        let id = match &hit.place_ref {
            Some(place_ref) => format!("{}-{}", category.slug(), place_ref),
            None => format!("{}-{}", category.slug(), accepted.len()),
        };

        let phone = hit
            .phone
            .or_else(|| category.default_phone().map(str::to_string))
            .unwrap_or_default();

        accepted.push(ServiceRecord {
            id,
            name: hit.name,
            category,
            coordinate,
            address: hit.address,
            phone,
            distance_km: distance_km(center, coordinate),
            provider_ref: hit.place_ref,
        });
    }

    accepted
}
