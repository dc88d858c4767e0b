//! Geographic coordinate primitives and distance model
//!
//! Provides the [`Coordinate`] type used throughout the engine and the
//! great-circle distance calculation used for ranking nearby services.

use std::fmt;

/// Mean Earth radius in kilometers, used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// A geographic coordinate (WGS84 latitude/longitude in degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check whether both components are finite and within valid ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (MIN_LAT..=MAX_LAT).contains(&self.latitude)
            && (MIN_LON..=MAX_LON).contains(&self.longitude)
    }

    /// Great-circle distance to another coordinate in kilometers.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        distance_km(*self, *other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two coordinates in kilometers.
///
/// Uses the haversine formula with a mean Earth radius of 6371 km.
/// Pure and deterministic: symmetric in its arguments, and identical
/// coordinates yield exactly `0.0`.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (dlon / 2.0).sin().powi(2);

    // Clamp against floating-point drift for near-antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_coordinates_yield_zero() {
        let delhi = Coordinate::new(28.6139, 77.2090);
        assert_eq!(distance_km(delhi, delhi), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(28.6139, 77.2090);
        let b = Coordinate::new(28.7000, 77.3000);
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_nearby_police_station_distance() {
        // Center to a police station ~0.68 km away
        let center = Coordinate::new(28.6139, 77.2090);
        let police = Coordinate::new(28.6200, 77.2100);

        let d = distance_km(center, police);
        assert!(
            (d - 0.685).abs() < 0.02,
            "Expected ~0.68 km, got {:.3} km",
            d
        );
    }

    #[test]
    fn test_cross_city_hospital_distance() {
        // Center to a hospital on the other side of the city
        let center = Coordinate::new(28.6139, 77.2090);
        let hospital = Coordinate::new(28.7000, 77.3000);

        let d = distance_km(center, hospital);
        assert!(d > 12.5 && d < 13.5, "Expected ~13 km, got {:.3} km", d);
    }

    #[test]
    fn test_known_long_distance() {
        // Delhi to Mumbai is roughly 1150 km
        let delhi = Coordinate::new(28.6139, 77.2090);
        let mumbai = Coordinate::new(19.0760, 72.8777);

        let d = distance_km(delhi, mumbai);
        assert!(d > 1100.0 && d < 1200.0, "Got {:.1} km", d);
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(28.6139, 77.2090).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(90.1, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_display_is_fixed_precision() {
        let c = Coordinate::new(28.61391234, 77.20901234);
        assert_eq!(c.to_string(), "28.6139, 77.2090");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_symmetric(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                let a = Coordinate::new(lat1, lon1);
                let b = Coordinate::new(lat2, lon2);

                let ab = distance_km(a, b);
                let ba = distance_km(b, a);

                prop_assert!(
                    (ab - ba).abs() < 1e-9,
                    "distance not symmetric: {} vs {}",
                    ab, ba
                );
            }

            #[test]
            fn test_distance_non_negative(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                let d = distance_km(Coordinate::new(lat1, lon1), Coordinate::new(lat2, lon2));
                prop_assert!(d >= 0.0);
            }

            #[test]
            fn test_distance_identity(
                lat in -90.0..90.0_f64,
                lon in -180.0..180.0_f64,
            ) {
                let c = Coordinate::new(lat, lon);
                prop_assert_eq!(distance_km(c, c), 0.0);
            }

            #[test]
            fn test_distance_bounded_by_half_circumference(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                // No two points on the sphere are further apart than half
                // the circumference (~20015 km).
                let d = distance_km(Coordinate::new(lat1, lon1), Coordinate::new(lat2, lon2));
                prop_assert!(d <= EARTH_RADIUS_KM * std::f64::consts::PI + 1e-6);
            }
        }
    }
}
