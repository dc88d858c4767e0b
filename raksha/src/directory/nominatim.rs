//! Nominatim directory provider.
//!
//! Queries the OpenStreetMap Nominatim JSON API for reverse geocoding and
//! amenity search. Uses a reusable `reqwest::Client` with connection
//! pooling and a request timeout; Nominatim requires an identifying
//! User-Agent, which we set from the crate version.

use std::time::Duration;

use serde::Deserialize;

use super::{DirectoryError, DirectoryProvider, RawHit};
use crate::discovery::ServiceCategory;
use crate::geo::Coordinate;

/// Default Nominatim endpoint.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// HTTP timeout for directory requests.
///
/// A search exceeding this surfaces as a category-level failure; the
/// refresh as a whole still completes.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Results requested per search; the engine applies its own acceptance cap.
const SEARCH_RESULT_LIMIT: usize = 10;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Reverse geocoding response (jsonv2).
#[derive(Debug, Deserialize)]
struct ReversePlace {
    display_name: String,
}

/// One row of a search response (jsonv2).
///
/// Nominatim serializes coordinates as strings; rows with unparseable
/// coordinates become hits without a usable coordinate and are discarded
/// downstream.
#[derive(Debug, Deserialize)]
struct SearchRow {
    #[serde(default)]
    place_id: Option<u64>,
    lat: String,
    lon: String,
    #[serde(default)]
    name: Option<String>,
    display_name: String,
}

/// Directory provider backed by the OSM Nominatim API.
pub struct NominatimProvider {
    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,

    /// Base URL of the Nominatim endpoint.
    base_url: String,
}

impl NominatimProvider {
    /// Create a provider against the public Nominatim endpoint.
    pub fn new() -> Result<Self, DirectoryError> {
        Self::with_base_url(DEFAULT_NOMINATIM_URL.to_string())
    }

    /// Create a provider against a custom endpoint (self-hosted instance).
    pub fn with_base_url(base_url: String) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(format!("raksha/{}", crate::VERSION))
            .build()
            .map_err(|e| DirectoryError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, DirectoryError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| DirectoryError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DirectoryError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DirectoryError::Http(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| DirectoryError::InvalidResponse(e.to_string()))
    }
}

impl DirectoryProvider for NominatimProvider {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, DirectoryError> {
        let url = format!(
            "{}/reverse?format=jsonv2&lat={:.6}&lon={:.6}",
            self.base_url, latitude, longitude
        );

        let place: ReversePlace = self.get_json(&url).await?;

        if place.display_name.trim().is_empty() {
            return Err(DirectoryError::InvalidResponse(
                "empty display_name".to_string(),
            ));
        }

        Ok(place.display_name)
    }

    async fn nearby_search(
        &self,
        center: Coordinate,
        radius_meters: u32,
        category: ServiceCategory,
    ) -> Result<Vec<RawHit>, DirectoryError> {
        let Some(amenity) = amenity_query(category) else {
            tracing::debug!(category = %category, "Category has no live search query");
            return Ok(Vec::new());
        };

        let (left, top, right, bottom) = bounding_box(center, radius_meters);
        let url = format!(
            "{}/search?format=jsonv2&q={}&viewbox={:.6},{:.6},{:.6},{:.6}&bounded=1&limit={}",
            self.base_url, amenity, left, top, right, bottom, SEARCH_RESULT_LIMIT
        );

        let rows: Vec<SearchRow> = self.get_json(&url).await?;

        tracing::debug!(
            category = %category,
            rows = rows.len(),
            radius_meters,
            "Nearby search completed"
        );

        Ok(rows.into_iter().map(hit_from_row).collect())
    }
}

/// Map a service category to its Nominatim amenity query.
///
/// Fixed facilities come from the seed registry only and have no live
/// search term.
fn amenity_query(category: ServiceCategory) -> Option<&'static str> {
    match category {
        ServiceCategory::Police => Some("police"),
        ServiceCategory::Hospital => Some("hospital"),
        ServiceCategory::FixedFacility => None,
    }
}

/// Compute a `(left, top, right, bottom)` viewbox around a center.
///
/// Longitude degrees shrink with latitude; clamp the cosine away from
/// zero so polar centers do not produce an unbounded box.
fn bounding_box(center: Coordinate, radius_meters: u32) -> (f64, f64, f64, f64) {
    let radius = radius_meters as f64;
    let dlat = radius / METERS_PER_DEGREE;
    let dlon = radius / (METERS_PER_DEGREE * center.latitude.to_radians().cos().abs().max(0.01));

    (
        center.longitude - dlon,
        center.latitude + dlat,
        center.longitude + dlon,
        center.latitude - dlat,
    )
}

/// Convert a search row into a raw hit.
fn hit_from_row(row: SearchRow) -> RawHit {
    let coordinate = match (row.lat.parse::<f64>(), row.lon.parse::<f64>()) {
        (Ok(lat), Ok(lon)) => {
            let c = Coordinate::new(lat, lon);
            c.is_valid().then_some(c)
        }
        _ => None,
    };

    let name = match row.name {
        Some(ref n) if !n.trim().is_empty() => n.clone(),
        // Fall back to the first segment of the display name
        _ => row
            .display_name
            .split(',')
            .next()
            .unwrap_or(&row.display_name)
            .trim()
            .to_string(),
    };

    RawHit {
        name,
        coordinate,
        address: row.display_name,
        place_ref: row.place_id.map(|id| id.to_string()),
        phone: None,
    }
}
