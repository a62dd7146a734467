//! In-memory service doubles for flow tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::{
    credentials::{ApiKey, Credentials},
    error::Result,
    model::{ExchangeRates, ForecastEntry, IndexBar, WeatherReading},
    provider::{ChatModel, IndexHistoryProvider, RatesProvider, Services, WeatherProvider},
};

/// Ordered record of every service call, shared by all fakes of one test.
pub type CallLog = Arc<Mutex<Vec<String>>>;

fn record(log: &CallLog, call: String) {
    log.lock().expect("call log poisoned").push(call);
}

#[derive(Debug)]
pub struct FakeChat {
    pub reply: Result<String>,
    pub log: CallLog,
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(&self, _key: &ApiKey, prompt: &str) -> Result<String> {
        record(&self.log, format!("llm:{prompt}"));
        self.reply.clone()
    }
}

#[derive(Debug)]
pub struct FakeWeather {
    pub current: Result<WeatherReading>,
    pub forecast: Result<Vec<ForecastEntry>>,
    pub log: CallLog,
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self, _key: &ApiKey, city: &str) -> Result<WeatherReading> {
        record(&self.log, format!("weather.current:{city}"));
        self.current.clone()
    }

    async fn forecast(&self, _key: &ApiKey, city: &str) -> Result<Vec<ForecastEntry>> {
        record(&self.log, format!("weather.forecast:{city}"));
        self.forecast.clone()
    }
}

#[derive(Debug)]
pub struct FakeRates {
    pub rates: Result<ExchangeRates>,
    pub log: CallLog,
}

#[async_trait]
impl RatesProvider for FakeRates {
    async fn latest(&self, _key: &ApiKey, base: &str) -> Result<ExchangeRates> {
        record(&self.log, format!("rates:{base}"));
        self.rates.clone()
    }
}

#[derive(Debug)]
pub struct FakeIndex {
    pub bars: Result<Vec<IndexBar>>,
    pub log: CallLog,
}

#[async_trait]
impl IndexHistoryProvider for FakeIndex {
    async fn one_day(&self, ticker: &str) -> Result<Vec<IndexBar>> {
        record(&self.log, format!("index:{ticker}"));
        self.bars.clone()
    }
}

pub fn all_credentials() -> Credentials {
    Credentials::new(ApiKey::new("llm"), ApiKey::new("weather"), ApiKey::new("exchange"))
}

pub fn sunny() -> WeatherReading {
    WeatherReading {
        location_name: Some("Lisbon".into()),
        description: "clear sky".into(),
        temperature_c: 24.0,
    }
}

/// Builder for a `Services` bundle made of fakes with harmless defaults.
pub struct FakeServices {
    pub log: CallLog,
    pub reply: Result<String>,
    pub current: Result<WeatherReading>,
    pub forecast: Result<Vec<ForecastEntry>>,
    pub rates: Result<ExchangeRates>,
    pub bars: Result<Vec<IndexBar>>,
}

impl Default for FakeServices {
    fn default() -> Self {
        Self {
            log: CallLog::default(),
            reply: Ok("reply".into()),
            current: Ok(sunny()),
            forecast: Ok(Vec::new()),
            rates: Ok(ExchangeRates { base: "XXX".into(), rates: Default::default() }),
            bars: Ok(Vec::new()),
        }
    }
}

impl FakeServices {
    pub fn build(self) -> (Services, CallLog) {
        let log = self.log;
        let services = Services {
            llm: Box::new(FakeChat { reply: self.reply, log: log.clone() }),
            weather: Box::new(FakeWeather {
                current: self.current,
                forecast: self.forecast,
                log: log.clone(),
            }),
            rates: Box::new(FakeRates { rates: self.rates, log: log.clone() }),
            index: Box::new(FakeIndex { bars: self.bars, log: log.clone() }),
        };
        (services, log)
    }
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().expect("call log poisoned").clone()
}
