use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Settings,
    credentials::ApiKey,
    error::Result,
    model::{ExchangeRates, ForecastEntry, IndexBar, WeatherReading},
    provider::{
        exchangerate::ExchangeRateProvider, groq::GroqChat, openweather::OpenWeatherProvider,
        yahoo::YahooIndexHistory,
    },
};

pub mod exchangerate;
pub mod groq;
pub mod openweather;
pub mod yahoo;

/// Single-prompt chat completion.
#[async_trait]
pub trait ChatModel: Send + Sync + Debug {
    /// Returns the first choice's text verbatim.
    async fn complete(&self, key: &ApiKey, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, key: &ApiKey, city: &str) -> Result<WeatherReading>;

    /// Every 3-hour entry of the 5-day forecast, in provider order.
    async fn forecast(&self, key: &ApiKey, city: &str) -> Result<Vec<ForecastEntry>>;
}

#[async_trait]
pub trait RatesProvider: Send + Sync + Debug {
    async fn latest(&self, key: &ApiKey, base: &str) -> Result<ExchangeRates>;
}

/// Stock index price history. No credentials needed.
#[async_trait]
pub trait IndexHistoryProvider: Send + Sync + Debug {
    /// One trading day of bars for `ticker`.
    async fn one_day(&self, ticker: &str) -> Result<Vec<IndexBar>>;
}

/// All external services a flow may call.
#[derive(Debug)]
pub struct Services {
    pub llm: Box<dyn ChatModel>,
    pub weather: Box<dyn WeatherProvider>,
    pub rates: Box<dyn RatesProvider>,
    pub index: Box<dyn IndexHistoryProvider>,
}

impl Services {
    /// Construct the HTTP-backed services from settings.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            llm: Box::new(GroqChat::new(&settings.llm)?),
            weather: Box::new(OpenWeatherProvider::new(&settings.weather)?),
            rates: Box::new(ExchangeRateProvider::new(&settings.exchange)),
            index: Box::new(YahooIndexHistory::new(&settings.stocks)?),
        })
    }
}
