use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::Deserialize;
use tracing::debug;

use crate::model::{Coordinates, PlaceList};

use super::{PlacesSource, truncate_body};

pub const SEARCH_RADIUS_M: u32 = 10_000;
pub const MAX_PLACES: usize = 5;

/// Named attractions, historic sites and parks from the Overpass interpreter.
#[derive(Debug, Clone)]
pub struct OverpassPlaces {
    base_url: String,
    http: Client,
}

impl OverpassPlaces {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

fn build_query(at: Coordinates) -> String {
    let around = format!("around:{},{},{}", SEARCH_RADIUS_M, at.latitude, at.longitude);

    format!(
        "[out:json];\n\
         (\n  \
         node[\"tourism\"=\"attraction\"][\"name\"]({around});\n  \
         node[\"historic\"][\"name\"]({around});\n  \
         node[\"leisure\"=\"park\"][\"name\"]({around});\n\
         );\n\
         out {MAX_PLACES};"
    )
}

#[derive(Debug, Deserialize)]
struct OpTags {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpElement {
    #[serde(default)]
    tags: Option<OpTags>,
}

#[derive(Debug, Deserialize)]
struct OpResponse {
    elements: Vec<OpElement>,
}

impl OpResponse {
    fn into_names(self) -> PlaceList {
        self.elements
            .into_iter()
            .filter_map(|el| el.tags.and_then(|t| t.name))
            .filter(|name| !name.trim().is_empty())
            .take(MAX_PLACES)
            .collect()
    }
}

#[async_trait]
impl PlacesSource for OverpassPlaces {
    async fn nearby_places(&self, at: Coordinates) -> Result<PlaceList> {
        let url = format!("{}/api/interpreter", self.base_url);
        let query = build_query(at);
        debug!(%url, %query, "searching nearby places");

        let res = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(query)
            .send()
            .await
            .context("Failed to send request to Overpass (interpreter)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Overpass response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Overpass request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OpResponse =
            serde_json::from_str(&body).context("Failed to parse Overpass JSON")?;

        let names = parsed.into_names();
        debug!(count = names.len(), "nearby places found");

        Ok(names)
    }
}
