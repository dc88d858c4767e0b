//! Discovery session - the in-memory, filterable result set.
//!
//! A session owns the merged record set produced by the most recent
//! refresh plus the active category filter and free-text query. Filter
//! and query changes operate purely on this in-memory set; no provider
//! call is ever triggered from here.

use std::cmp::Ordering;

use crate::geo::{distance_km, Coordinate};

use super::record::{CategoryFilter, ServiceRecord};

/// The current merged/ranked result set with its view state.
#[derive(Debug, Default)]
pub struct DiscoverySession {
    /// Merged records in merge order: live results first, seeds after.
    records: Vec<ServiceRecord>,

    /// Active category filter.
    filter: CategoryFilter,

    /// Active free-text query.
    query: String,
}

impl DiscoverySession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole record set.
    ///
    /// Filter and query survive a refresh; the record set does not.
    pub fn replace(&mut self, records: Vec<ServiceRecord>) {
        self.records = records;
    }

    /// Set the category filter.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    /// Set the free-text query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The active category filter.
    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    /// The active free-text query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// All records in merge order, ignoring filter and query.
    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    /// Records passing the category filter AND the text query, in merge
    /// order.
    pub fn visible(&self) -> Vec<ServiceRecord> {
        self.records
            .iter()
            .filter(|r| self.filter.matches(r.category) && r.matches_query(&self.query))
            .cloned()
            .collect()
    }

    /// Visible records sorted ascending by distance.
    ///
    /// The sort is stable with ties broken by `id` ascending, so repeated
    /// ranking of unchanged inputs is deterministic.
    pub fn visible_by_distance(&self) -> Vec<ServiceRecord> {
        let mut visible = self.visible();
        visible.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        visible
    }

    /// Recompute every record's distance against a new center.
    ///
    /// Record order is preserved; callers wanting distance order use
    /// [`Self::visible_by_distance`].
    pub fn re_rank(&mut self, center: Coordinate) {
        for record in &mut self.records {
            record.distance_km = distance_km(center, record.coordinate);
        }
    }

    /// Number of records in the set (unfiltered).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::record::ServiceCategory;

    fn record(id: &str, name: &str, category: ServiceCategory, distance_km: f64) -> ServiceRecord {
        ServiceRecord {
            id: id.to_string(),
            name: name.to_string(),
            category,
            coordinate: Coordinate::new(28.62, 77.21),
            address: format!("{} address", name),
            phone: "100".to_string(),
            distance_km,
            provider_ref: None,
        }
    }

    #[test]
    fn test_filter_and_query_compose_with_and() {
        let mut session = DiscoverySession::new();
        session.replace(vec![
            record("police-1", "Central Police Station", ServiceCategory::Police, 0.8),
            record("hospital-1", "City General Hospital", ServiceCategory::Hospital, 1.2),
            record("hospital-2", "Central Hospital", ServiceCategory::Hospital, 2.0),
        ]);

        session.set_filter(CategoryFilter::Only(ServiceCategory::Hospital));
        session.set_query("central");

        let visible = session.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "hospital-2");
    }

    #[test]
    fn test_unmatched_query_yields_empty() {
        let mut session = DiscoverySession::new();
        session.replace(vec![record(
            "police-1",
            "Central Police Station",
            ServiceCategory::Police,
            0.8,
        )]);

        session.set_query("xyz");
        assert!(session.visible().is_empty());
    }

    #[test]
    fn test_filter_survives_replace() {
        let mut session = DiscoverySession::new();
        session.set_filter(CategoryFilter::Only(ServiceCategory::Police));
        session.set_query("central");

        session.replace(vec![
            record("police-1", "Central Police Station", ServiceCategory::Police, 0.8),
            record("hospital-1", "Central Hospital", ServiceCategory::Hospital, 1.2),
        ]);

        let visible = session.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "police-1");
    }

    #[test]
    fn test_sort_is_stable_with_id_tiebreak() {
        let mut session = DiscoverySession::new();
        session.replace(vec![
            record("b", "Station B", ServiceCategory::Police, 1.0),
            record("a", "Station A", ServiceCategory::Police, 1.0),
            record("c", "Station C", ServiceCategory::Police, 0.5),
        ]);

        let sorted = session.visible_by_distance();
        let ids: Vec<_> = sorted.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        // Repeated ranking of unchanged inputs is deterministic
        let again: Vec<_> = session
            .visible_by_distance()
            .iter()
            .map(|r| r.id.clone())
            .collect();
        assert_eq!(again, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_re_rank_updates_distances_without_reordering() {
        let near = Coordinate::new(28.6139, 77.2090);
        let mut session = DiscoverySession::new();

        let mut far_record = record("a", "Station A", ServiceCategory::Police, 0.0);
        far_record.coordinate = Coordinate::new(28.7000, 77.3000);
        let mut near_record = record("b", "Station B", ServiceCategory::Police, 0.0);
        near_record.coordinate = Coordinate::new(28.6200, 77.2100);

        session.replace(vec![far_record, near_record]);
        session.re_rank(near);

        // Order unchanged: still a, b
        assert_eq!(session.records()[0].id, "a");
        assert_eq!(session.records()[1].id, "b");

        // Distances consistent with the new center
        assert!(session.records()[0].distance_km > 12.0);
        assert!(session.records()[1].distance_km < 1.0);
    }
}
