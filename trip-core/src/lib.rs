//! Core library for the `trip` CLI.
//!
//! This crate defines:
//! - Query analysis (place + intent extraction from free text)
//! - Geocoding, weather and points-of-interest lookup clients
//! - The orchestrator that routes a query through them
//! - Configuration of endpoints, timeout and caller identity
//!
//! It is used by `trip-cli`, but any front end can call
//! [`Orchestrator::handle`] with the raw text the user typed.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod provider;

pub use analyzer::{KeywordAnalyzer, QueryAnalyzer};
pub use config::{Config, EndpointConfig};
pub use error::QueryError;
pub use model::{Coordinates, Intent, PlaceList, QueryResult, WeatherReading};
pub use orchestrator::{Activation, Orchestrator};
pub use provider::{Geocoder, LookupKind, PlacesSource, Providers, WeatherSource};
