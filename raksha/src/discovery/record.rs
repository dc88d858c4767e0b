//! Service record types and the static seed registry.
//!
//! A [`ServiceRecord`] is one ranked emergency facility in the current
//! discovery session. Records come from live provider searches or from
//! the seed registry of facilities the live directory does not carry.

use std::fmt;

use crate::geo::{distance_km, Coordinate};

/// Emergency service category.
///
/// A closed enumeration rather than a free string, so category filtering
/// stays exhaustive at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceCategory {
    /// Police stations.
    Police,
    /// Hospitals and emergency rooms.
    Hospital,
    /// Fixed facilities known to the app but not to the live directory
    /// (e.g. the NCC headquarters).
    FixedFacility,
}

impl ServiceCategory {
    /// All categories, in display order.
    pub const ALL: [ServiceCategory; 3] = [
        ServiceCategory::Police,
        ServiceCategory::Hospital,
        ServiceCategory::FixedFacility,
    ];

    /// Short stable identifier used in record ids and logs.
    pub fn slug(&self) -> &'static str {
        match self {
            ServiceCategory::Police => "police",
            ServiceCategory::Hospital => "hospital",
            ServiceCategory::FixedFacility => "facility",
        }
    }

    /// National emergency number dialed when a live hit carries no phone.
    pub fn default_phone(&self) -> Option<&'static str> {
        match self {
            ServiceCategory::Police => Some("100"),
            ServiceCategory::Hospital => Some("108"),
            ServiceCategory::FixedFacility => None,
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Category filter applied to the discovery session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Show every category.
    #[default]
    All,
    /// Show a single category.
    Only(ServiceCategory),
}

impl CategoryFilter {
    /// Whether a record of the given category passes this filter.
    pub fn matches(&self, category: ServiceCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => *only == category,
        }
    }
}

/// One ranked emergency facility.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRecord {
    /// Provider-scoped identifier, unique within a merged result set and
    /// stable for the session.
    pub id: String,

    /// Facility name.
    pub name: String,

    /// Service category.
    pub category: ServiceCategory,

    /// Facility coordinate.
    pub coordinate: Coordinate,

    /// Human-readable address.
    pub address: String,

    /// Contact number for one-tap calling.
    pub phone: String,

    /// Distance from the current reference position in kilometers.
    ///
    /// Recomputed on every re-rank; always consistent with the most
    /// recent reference position applied to the whole set.
    pub distance_km: f64,

    /// Original provider reference, when the record came from a live hit.
    pub provider_ref: Option<String>,
}

impl ServiceRecord {
    /// Case-insensitive substring match against name or address.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.address.to_lowercase().contains(&query)
    }
}

/// A facility in the static seed registry.
struct SeedFacility {
    id: &'static str,
    name: &'static str,
    category: ServiceCategory,
    latitude: f64,
    longitude: f64,
    address: &'static str,
    phone: &'static str,
}

/// Facilities shipped with the app that the live directory does not carry.
const SEED_FACILITIES: &[SeedFacility] = &[
    SeedFacility {
        id: "seed-police-central",
        name: "Central Police Station",
        category: ServiceCategory::Police,
        latitude: 28.6210,
        longitude: 77.2095,
        address: "MG Road, City Center",
        phone: "100",
    },
    SeedFacility {
        id: "seed-hospital-city",
        name: "City General Hospital",
        category: ServiceCategory::Hospital,
        latitude: 28.6031,
        longitude: 77.2090,
        address: "Hospital Road, Medical District",
        phone: "108",
    },
    SeedFacility {
        id: "seed-police-traffic",
        name: "Traffic Police Station",
        category: ServiceCategory::Police,
        latitude: 28.6328,
        longitude: 77.2090,
        address: "Highway Junction",
        phone: "100",
    },
    SeedFacility {
        id: "seed-ncc-hq",
        name: "Delhi NCC Headquarters",
        category: ServiceCategory::FixedFacility,
        latitude: 28.6562,
        longitude: 77.2410,
        address: "Red Fort, Delhi",
        phone: "+91-11-23011234",
    },
];

/// Build seed records ranked against a center coordinate.
pub fn seed_records(center: Coordinate) -> Vec<ServiceRecord> {
    SEED_FACILITIES
        .iter()
        .map(|seed| {
            let coordinate = Coordinate::new(seed.latitude, seed.longitude);
            ServiceRecord {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                category: seed.category,
                coordinate,
                address: seed.address.to_string(),
                phone: seed.phone.to_string(),
                distance_km: distance_km(center, coordinate),
                provider_ref: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CENTER;

    #[test]
    fn test_category_slugs_are_distinct() {
        let slugs: std::collections::HashSet<_> =
            ServiceCategory::ALL.iter().map(|c| c.slug()).collect();
        assert_eq!(slugs.len(), ServiceCategory::ALL.len());
    }

    #[test]
    fn test_default_phones() {
        assert_eq!(ServiceCategory::Police.default_phone(), Some("100"));
        assert_eq!(ServiceCategory::Hospital.default_phone(), Some("108"));
        assert_eq!(ServiceCategory::FixedFacility.default_phone(), None);
    }

    #[test]
    fn test_filter_matches() {
        assert!(CategoryFilter::All.matches(ServiceCategory::Police));
        assert!(CategoryFilter::Only(ServiceCategory::Hospital).matches(ServiceCategory::Hospital));
        assert!(!CategoryFilter::Only(ServiceCategory::Hospital).matches(ServiceCategory::Police));
    }

    #[test]
    fn test_query_matches_name_or_address_case_insensitive() {
        let record = ServiceRecord {
            id: "police-1".to_string(),
            name: "Central Police Station".to_string(),
            category: ServiceCategory::Police,
            coordinate: Coordinate::new(28.62, 77.21),
            address: "MG Road, City Center".to_string(),
            phone: "100".to_string(),
            distance_km: 0.8,
            provider_ref: None,
        };

        assert!(record.matches_query(""));
        assert!(record.matches_query("central"));
        assert!(record.matches_query("POLICE"));
        assert!(record.matches_query("mg road"));
        assert!(!record.matches_query("xyz"));
    }

    #[test]
    fn test_seed_records_have_unique_ids_and_distances() {
        let seeds = seed_records(DEFAULT_CENTER);
        assert_eq!(seeds.len(), 4);

        let ids: std::collections::HashSet<_> = seeds.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), seeds.len());

        for record in &seeds {
            assert!(record.distance_km > 0.0);
            assert!(record.coordinate.is_valid());
        }
    }

    #[test]
    fn test_seed_distances_match_shipped_listing() {
        // The shipped client lists these at ~0.8 / ~1.2 / ~2.1 km from the
        // default center.
        let seeds = seed_records(DEFAULT_CENTER);

        let central = seeds.iter().find(|r| r.id == "seed-police-central").unwrap();
        assert!((central.distance_km - 0.8).abs() < 0.05);

        let hospital = seeds.iter().find(|r| r.id == "seed-hospital-city").unwrap();
        assert!((hospital.distance_km - 1.2).abs() < 0.05);

        let traffic = seeds.iter().find(|r| r.id == "seed-police-traffic").unwrap();
        assert!((traffic.distance_km - 2.1).abs() < 0.05);
    }
}
