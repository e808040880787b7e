use crate::{
    Config,
    model::{Coordinates, PlaceList, WeatherReading},
    provider::{nominatim::NominatimGeocoder, open_meteo::OpenMeteoWeather, overpass::OverpassPlaces},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug};

pub mod nominatim;
pub mod open_meteo;
pub mod overpass;

/// The three outbound lookups a query can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Geocoding,
    Weather,
    Places,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Geocoding => "geocoding",
            LookupKind::Weather => "weather",
            LookupKind::Places => "places",
        }
    }

    /// Base URL of the public provider used when no override is configured.
    pub fn default_url(&self) -> &'static str {
        match self {
            LookupKind::Geocoding => "https://nominatim.openstreetmap.org",
            LookupKind::Weather => "https://api.open-meteo.com",
            LookupKind::Places => "https://overpass-api.de",
        }
    }

    pub const fn all() -> &'static [LookupKind] {
        &[LookupKind::Geocoding, LookupKind::Weather, LookupKind::Places]
    }
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LookupKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "geocoding" => Ok(LookupKind::Geocoding),
            "weather" => Ok(LookupKind::Weather),
            "places" => Ok(LookupKind::Places),
            _ => Err(anyhow::anyhow!(
                "Unknown lookup '{value}'. Supported lookups: geocoding, weather, places."
            )),
        }
    }
}

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// `Ok(None)` when the provider knows no place by that name.
    async fn geocode(&self, place: &str) -> anyhow::Result<Option<Coordinates>>;
}

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current_weather(&self, at: Coordinates) -> anyhow::Result<WeatherReading>;
}

#[async_trait]
pub trait PlacesSource: Send + Sync + Debug {
    async fn nearby_places(&self, at: Coordinates) -> anyhow::Result<PlaceList>;
}

/// The set of lookup clients an orchestrator drives.
#[derive(Debug)]
pub struct Providers {
    pub geocoder: Box<dyn Geocoder>,
    pub weather: Box<dyn WeatherSource>,
    pub places: Box<dyn PlacesSource>,
}

/// HTTP client shared by all providers, carrying the configured timeout and
/// the caller identity Nominatim insists on.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent())
        .build()
        .context("Failed to build HTTP client")
}

/// Construct the public-provider clients, honoring endpoint overrides.
pub fn providers_from_config(config: &Config) -> anyhow::Result<Providers> {
    let http = http_client(config)?;

    Ok(Providers {
        geocoder: Box::new(NominatimGeocoder::new(
            http.clone(),
            config.endpoint_url(LookupKind::Geocoding),
        )),
        weather: Box::new(OpenMeteoWeather::new(
            http.clone(),
            config.endpoint_url(LookupKind::Weather),
        )),
        places: Box::new(OverpassPlaces::new(http, config.endpoint_url(LookupKind::Places))),
    })
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_USER_AGENT;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_pointing_at(server: &MockServer) -> Config {
        let mut config = Config::default();
        for kind in LookupKind::all() {
            config.upsert_endpoint(*kind, server.uri()).unwrap();
        }
        config
    }

    #[test]
    fn lookup_kind_as_str_roundtrip() {
        for kind in LookupKind::all() {
            let parsed = LookupKind::try_from(kind.as_str()).expect("roundtrip should succeed");
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn lookup_kind_parse_ignores_case() {
        assert_eq!(LookupKind::try_from("Places").unwrap(), LookupKind::Places);
    }

    #[test]
    fn unknown_lookup_error() {
        let err = LookupKind::try_from("flights").unwrap_err();
        assert!(err.to_string().contains("Unknown lookup"));
    }

    #[test]
    fn providers_from_default_config_builds() {
        let providers = providers_from_config(&Config::default());
        assert!(providers.is_ok());
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }

    #[tokio::test]
    async fn geocoder_identifies_itself() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "lat": "59.91", "lon": "10.75" }])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let providers = providers_from_config(&config_pointing_at(&mock_server)).unwrap();
        let coords = providers.geocoder.geocode("Oslo").await.unwrap();

        assert_eq!(coords, Some(Coordinates { latitude: 59.91, longitude: 10.75 }));
    }

    #[tokio::test]
    async fn configured_user_agent_is_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(header("user-agent", "trip-tests/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = config_pointing_at(&mock_server);
        config.user_agent = Some("trip-tests/1.0".into());
        let providers = providers_from_config(&config).unwrap();

        assert_eq!(providers.geocoder.geocode("Nowhere").await.unwrap(), None);
    }

    #[tokio::test]
    async fn slow_provider_hits_configured_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "current": { "temperature_2m": 5.0 } }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let mut config = config_pointing_at(&mock_server);
        config.timeout_secs = Some(1);
        let providers = providers_from_config(&config).unwrap();

        let err = providers
            .weather
            .current_weather(Coordinates { latitude: 59.91, longitude: 10.75 })
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("Failed to send request to Open-Meteo"));
    }
}
