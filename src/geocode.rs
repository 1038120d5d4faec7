use std::time::Duration;

use geo::Point;
use serde::Deserialize;

use crate::{config::GeocoderConfig, error::CoverageError};

/// One entry of a Nominatim `/search` response. Coordinates come back
/// as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Client for the Nominatim search API.
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(config: &GeocoderConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Geocoder {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Resolves a free-text address to a point. `Ok(None)` means the
    /// geocoder answered but found nothing; transport errors, timeouts
    /// and malformed payloads all surface as `LookupFailure`.
    pub async fn geocode(&self, address: &str) -> Result<Option<Point>, CoverageError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| {
                log::warn!("geocoder request failed: {e}");
                CoverageError::LookupFailure
            })?;

        let places: Vec<Place> = response.json().await.map_err(|e| {
            log::warn!("geocoder returned an unreadable response: {e}");
            CoverageError::LookupFailure
        })?;

        match first_point(&places) {
            FirstPoint::Found(point) => Ok(Some(point)),
            FirstPoint::NoMatch => Ok(None),
            FirstPoint::Malformed => {
                log::warn!("geocoder returned non-numeric coordinates");
                Err(CoverageError::LookupFailure)
            }
        }
    }
}

enum FirstPoint {
    Found(Point),
    NoMatch,
    Malformed,
}

fn first_point(places: &[Place]) -> FirstPoint {
    let Some(place) = places.first() else {
        return FirstPoint::NoMatch;
    };
    match (place.lat.parse(), place.lon.parse()) {
        (Ok(lat), Ok(lon)) => FirstPoint::Found(Point::new(lon, lat)),
        _ => FirstPoint::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_search_response() {
        let body = r#"[{"place_id":83201951,"lat":"47.3113753","lon":"5.0392644","display_name":"47 Rue Charles Dumont, Dijon"}]"#;
        let places: Vec<Place> = serde_json::from_str(body).unwrap();
        match first_point(&places) {
            FirstPoint::Found(p) => {
                assert_eq!(p.y(), 47.3113753);
                assert_eq!(p.x(), 5.0392644);
            }
            _ => panic!("expected a point"),
        }
    }

    #[test]
    fn empty_response_means_no_match() {
        let places: Vec<Place> = serde_json::from_str("[]").unwrap();
        assert!(matches!(first_point(&places), FirstPoint::NoMatch));
    }

    #[test]
    fn garbage_coordinates_are_malformed() {
        let places = vec![Place {
            lat: "not-a-number".into(),
            lon: "5.0".into(),
        }];
        assert!(matches!(first_point(&places), FirstPoint::Malformed));
    }
}
