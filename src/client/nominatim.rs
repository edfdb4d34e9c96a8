/// Nominatim (OpenStreetMap) geocoding client
///
/// Resolves free-text locations such as "Test Village, Some District" to a
/// single best-match coordinate pair using the `/search` endpoint.
///
/// API Documentation: https://nominatim.org/release-docs/latest/api/Search/

use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

use crate::client::Geocoder;
use crate::config::GeocoderConfig;
use crate::model::{Coordinates, GeocodeError};

// ============================================================================
// Nominatim API Response Structures
// ============================================================================

/// One search hit. Nominatim returns coordinates as decimal-degree strings.
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

pub struct NominatimGeocoder {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodeError::Transport(format!("building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn locate(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        let url = build_search_url(&self.base_url, query)?;

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| GeocodeError::Transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Transport(format!("HTTP error: {}", response.status())));
        }

        let body = response
            .text()
            .map_err(|e| GeocodeError::Transport(format!("Failed to read response: {}", e)))?;

        parse_search_response(&body, query)
    }
}

// ============================================================================
// URL construction and parsing
// ============================================================================

/// Builds `{base}/search?format=json&limit=1&q={query}` with the query
/// percent-encoded.
pub fn build_search_url(base_url: &str, query: &str) -> Result<Url, GeocodeError> {
    let endpoint = format!("{}/search", base_url.trim_end_matches('/'));
    Url::parse_with_params(&endpoint, &[("format", "json"), ("limit", "1"), ("q", query)])
        .map_err(|e| GeocodeError::Transport(format!("invalid geocoder URL '{}': {}", endpoint, e)))
}

/// Picks the first hit of a `/search` response body.
pub fn parse_search_response(body: &str, query: &str) -> Result<Coordinates, GeocodeError> {
    let places: Vec<NominatimPlace> = serde_json::from_str(body)
        .map_err(|e| GeocodeError::Transport(format!("Parse error: {}", e)))?;

    let first = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;

    Coordinates::parse(&first.lat, &first.lon).ok_or_else(|| {
        GeocodeError::Transport(format!(
            "Parse error: unreadable coordinates ({}, {})",
            first.lat, first.lon
        ))
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_query() {
        let url = build_search_url("https://nominatim.openstreetmap.org/", "Test Village & Co")
            .expect("valid base URL");
        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("format".to_string(), "json".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "1".to_string())));
        assert!(pairs.contains(&("q".to_string(), "Test Village & Co".to_string())));
        assert!(!url.as_str().contains(' '), "spaces must be encoded: {}", url);
    }

    #[test]
    fn test_invalid_base_url_is_transport_error() {
        let result = build_search_url("not a url", "Pune");
        assert!(matches!(result, Err(GeocodeError::Transport(_))));
    }

    #[test]
    fn test_first_result_wins() {
        let body = r#"[
            {"lat": "18.5213738", "lon": "73.8545071", "display_name": "Pune, Maharashtra, India"},
            {"lat": "1.0", "lon": "2.0"}
        ]"#;
        let coords = parse_search_response(body, "Pune").expect("should resolve");
        assert_eq!(coords, Coordinates::new(18.5213738, 73.8545071));
    }

    #[test]
    fn test_empty_result_is_not_found() {
        let result = parse_search_response("[]", "Nowhere Village");
        assert_eq!(result, Err(GeocodeError::NotFound("Nowhere Village".to_string())));
    }

    #[test]
    fn test_garbled_body_is_transport_error() {
        let result = parse_search_response("<html>rate limited</html>", "Pune");
        assert!(matches!(result, Err(GeocodeError::Transport(_))));
    }

    #[test]
    fn test_unparseable_coordinates_are_transport_error() {
        let result = parse_search_response(r#"[{"lat": "north", "lon": "73.8"}]"#, "Pune");
        assert!(matches!(result, Err(GeocodeError::Transport(_))));
    }
}
