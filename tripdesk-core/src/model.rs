use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub location_name: Option<String>,
    pub description: String,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Provider-local timestamp text, e.g. `2024-05-01 12:00:00`.
    pub dt_txt: String,
    pub temperature_c: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRates {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}

impl ExchangeRates {
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub city: String,
    pub days: u8,
    pub month: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripReport {
    pub city: String,
    pub current: WeatherReading,
    pub forecast: Vec<ForecastEntry>,
    pub plan: String,
    pub hotels_link: String,
}

/// Conversion of one unit of the base currency into a fixed target.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub target: &'static str,
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatesSection {
    pub base: String,
    pub outcome: Result<Vec<Conversion>, Error>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSection {
    pub ticker: &'static str,
    pub outcome: Result<Vec<IndexBar>, Error>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketReport {
    pub country: String,
    pub overview: String,
    /// `None` when no currency code could be extracted from the overview.
    pub rates: Option<RatesSection>,
    /// `None` when the country has no known index.
    pub index: Option<IndexSection>,
    pub exchange_link: String,
}
