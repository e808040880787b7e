use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::model::{Coordinates, WeatherReading};

use super::{WeatherSource, truncate_body};

const CURRENT_FIELDS: &str = "temperature_2m,precipitation_probability";

/// Current conditions from Open-Meteo's `/v1/forecast`.
#[derive(Debug, Clone)]
pub struct OpenMeteoWeather {
    base_url: String,
    http: Client,
}

impl OpenMeteoWeather {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    #[serde(default)]
    precipitation_probability: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current: OmCurrent,
}

#[async_trait]
impl WeatherSource for OpenMeteoWeather {
    async fn current_weather(&self, at: Coordinates) -> Result<WeatherReading> {
        let url = format!("{}/v1/forecast", self.base_url);
        debug!(%url, latitude = at.latitude, longitude = at.longitude, "fetching current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", at.latitude.to_string().as_str()),
                ("longitude", at.longitude.to_string().as_str()),
                ("current", CURRENT_FIELDS),
                ("timezone", "auto"),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo JSON")?;

        Ok(WeatherReading {
            temperature_c: parsed.current.temperature_2m,
            rain_probability_pct: rain_percent(parsed.current.precipitation_probability),
        })
    }
}

fn rain_percent(raw: Option<f64>) -> u8 {
    raw.filter(|p| p.is_finite())
        .map(|p| p.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}
