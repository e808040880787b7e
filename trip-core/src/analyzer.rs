//! Turns a free-text travel query into an [`Intent`].
//!
//! The keyword analyzer is a rule-based stand-in. The orchestrator only sees
//! the [`QueryAnalyzer`] trait, so a trained classifier can replace it later.

use anyhow::{Context, Result};
use regex::Regex;
use std::fmt::Debug;

use crate::model::Intent;

const WEATHER_KEYWORDS: &[&str] = &["temperature", "weather", "climate", "hot", "cold", "rain"];

const PLACES_KEYWORDS: &[&str] = &[
    "places",
    "visit",
    "attractions",
    "tourist",
    "spots",
    "things to do",
    "plan",
    "trip",
];

/// Capitalized name after the word "to", "in" or "visit", up to `,` `.` `?` or end of text.
const PLACE_AFTER_PREPOSITION: &str = r"(?i:\b(?:to|in|visit))\s+([A-Z][a-zA-Z\s]*?)(?:[,.?]|$)";

const LEADING_TRIP_PHRASE: &str = r"(?i)^(?:i'm going to|go to|visit)\b";

pub trait QueryAnalyzer: Send + Sync + Debug {
    fn analyze(&self, query: &str) -> Intent;
}

#[derive(Debug, Clone)]
pub struct KeywordAnalyzer {
    place_after_preposition: Regex,
    leading_trip_phrase: Regex,
}

impl KeywordAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            place_after_preposition: Regex::new(PLACE_AFTER_PREPOSITION)
                .context("Failed to compile place extraction pattern")?,
            leading_trip_phrase: Regex::new(LEADING_TRIP_PHRASE)
                .context("Failed to compile trip phrase pattern")?,
        })
    }

    fn extract_place(&self, query: &str) -> String {
        if let Some(name) = self
            .place_after_preposition
            .captures(query)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|name| !name.is_empty())
        {
            return name.to_string();
        }

        let head = query.split([',', '?']).next().unwrap_or_default().trim_start();
        self.leading_trip_phrase.replace(head, "").trim().to_string()
    }
}

impl QueryAnalyzer for KeywordAnalyzer {
    fn analyze(&self, query: &str) -> Intent {
        let lower = query.to_lowercase();

        Intent {
            place: self.extract_place(query),
            wants_weather: contains_any(&lower, WEATHER_KEYWORDS),
            wants_places: contains_any(&lower, PLACES_KEYWORDS),
        }
    }
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
