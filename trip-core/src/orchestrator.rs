//! Single entry point for a query: analyze, geocode, then run whichever of
//! the weather and places lookups the intent activates.

use tracing::{error, info, instrument, warn};

use crate::{
    Config,
    analyzer::{KeywordAnalyzer, QueryAnalyzer},
    error::QueryError,
    model::{Intent, QueryResult},
    provider::{LookupKind, Providers, providers_from_config},
};

/// Which lookups run for an intent.
///
/// A single matched keyword group runs only its lookup. No match, or both,
/// runs both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub weather: bool,
    pub places: bool,
}

impl Activation {
    pub fn for_intent(intent: &Intent) -> Self {
        Self {
            weather: intent.wants_weather || !intent.wants_places,
            places: intent.wants_places || !intent.wants_weather,
        }
    }
}

#[derive(Debug)]
pub struct Orchestrator {
    analyzer: Box<dyn QueryAnalyzer>,
    providers: Providers,
}

impl Orchestrator {
    pub fn new(analyzer: Box<dyn QueryAnalyzer>, providers: Providers) -> Self {
        Self { analyzer, providers }
    }

    /// Keyword analyzer plus the public providers (or configured overrides).
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            Box::new(KeywordAnalyzer::new()?),
            providers_from_config(config)?,
        ))
    }

    /// Answer one query. Either every activated lookup succeeds or the whole
    /// request fails; partial results are never returned.
    #[instrument(skip(self))]
    pub async fn handle(&self, query: &str) -> Result<QueryResult, QueryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let intent = self.analyzer.analyze(query);
        let activation = Activation::for_intent(&intent);
        info!(
            place = %intent.place,
            wants_weather = intent.wants_weather,
            wants_places = intent.wants_places,
            run_weather = activation.weather,
            run_places = activation.places,
            "query analyzed"
        );

        if intent.place.is_empty() {
            warn!("no place could be extracted");
            return Err(QueryError::PlaceNotFound(query.to_string()));
        }

        let coordinates = match self.providers.geocoder.geocode(&intent.place).await {
            Ok(Some(coordinates)) => coordinates,
            Ok(None) => {
                warn!(place = %intent.place, "place not found");
                return Err(QueryError::PlaceNotFound(intent.place));
            }
            Err(cause) => return Err(lookup_failed(LookupKind::Geocoding, cause)),
        };

        let weather = if activation.weather {
            let reading = self
                .providers
                .weather
                .current_weather(coordinates)
                .await
                .map_err(|cause| lookup_failed(LookupKind::Weather, cause))?;
            Some(reading)
        } else {
            None
        };

        let places = if activation.places {
            let names = self
                .providers
                .places
                .nearby_places(coordinates)
                .await
                .map_err(|cause| lookup_failed(LookupKind::Places, cause))?;
            Some(names)
        } else {
            None
        };

        Ok(QueryResult {
            location: intent.place,
            weather,
            places,
        })
    }
}

fn lookup_failed(kind: LookupKind, cause: anyhow::Error) -> QueryError {
    error!(lookup = %kind, error = %format!("{cause:#}"), "lookup failed");
    QueryError::LookupFailed { kind, cause }
}
