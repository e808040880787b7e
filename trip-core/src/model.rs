use serde::{Deserialize, Serialize};

/// What a free-text query asks for, as reported by a [`QueryAnalyzer`](crate::QueryAnalyzer).
///
/// The keyword flags are raw: a query that matches neither group has both set
/// to `false`. Deciding what to fetch in that case is the orchestrator's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub place: String,
    pub wants_weather: bool,
    pub wants_places: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    /// Always present; providers that omit it are read as 0.
    pub rain_probability_pct: u8,
}

/// Point-of-interest names in the order the provider returned them.
pub type PlaceList = Vec<String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The place as extracted from the query, not the geocoder's canonical name.
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub places: Option<PlaceList>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_sections_are_left_out_of_json() {
        let result = QueryResult {
            location: "Paris".into(),
            weather: Some(WeatherReading { temperature_c: 18.5, rain_probability_pct: 0 }),
            places: None,
        };

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["location"], "Paris");
        assert_eq!(json["weather"]["rain_probability_pct"], 0);
        assert!(json.get("places").is_none());
    }
}
