use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::model::Coordinates;

use super::{Geocoder, truncate_body};

/// Forward geocoding against Nominatim's `/search`.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

// Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NmPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, place, "geocoding place");

        let res = self
            .http
            .get(&url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .context("Failed to send request to Nominatim (search)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Nominatim search response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Nominatim search failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: Vec<NmPlace> =
            serde_json::from_str(&body).context("Failed to parse Nominatim search JSON")?;

        let Some(first) = parsed.into_iter().next() else {
            return Ok(None);
        };

        let latitude: f64 = first
            .lat
            .trim()
            .parse()
            .with_context(|| format!("Nominatim returned a non-numeric latitude: {}", first.lat))?;
        let longitude: f64 = first
            .lon
            .trim()
            .parse()
            .with_context(|| format!("Nominatim returned a non-numeric longitude: {}", first.lon))?;

        debug!(
            latitude,
            longitude,
            resolved = first.display_name.as_deref().unwrap_or("-"),
            "place geocoded"
        );

        Ok(Some(Coordinates { latitude, longitude }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder(server: &MockServer) -> NominatimGeocoder {
        NominatimGeocoder::new(Client::new(), &server.uri())
    }

    #[tokio::test]
    async fn parses_string_encoded_coordinates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Bangalore"))
            .and(query_param("format", "json"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "lat": "12.9767936",
                    "lon": "77.590082",
                    "display_name": "Bengaluru, Karnataka, India"
                }
            ])))
            .mount(&mock_server)
            .await;

        let coords = geocoder(&mock_server).geocode("Bangalore").await.unwrap().unwrap();

        assert!((coords.latitude - 12.9767936).abs() < 1e-9);
        assert!((coords.longitude - 77.590082).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_array_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let coords = geocoder(&mock_server).geocode("Atlantis").await.unwrap();

        assert_eq!(coords, None);
    }

    #[tokio::test]
    async fn rejected_request_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Access blocked"))
            .mount(&mock_server)
            .await;

        let err = geocoder(&mock_server).geocode("Paris").await.unwrap_err();

        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("Access blocked"));
    }

    #[tokio::test]
    async fn garbled_latitude_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "lat": "north", "lon": "2.35" }])),
            )
            .mount(&mock_server)
            .await;

        let err = geocoder(&mock_server).geocode("Paris").await.unwrap_err();

        assert!(err.to_string().contains("non-numeric latitude"));
    }
}
