use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::WeatherSettings,
    credentials::ApiKey,
    error::{Error, Result},
    http::fetch_json,
    model::{ForecastEntry, WeatherReading},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(settings: &WeatherSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build OpenWeather HTTP client")?;

        Ok(Self { base_url: settings.base_url.trim_end_matches('/').to_string(), http })
    }

    fn get(&self, path: &str, key: &ApiKey, city: &str) -> reqwest::RequestBuilder {
        self.http.get(format!("{}{path}", self.base_url)).query(&[
            ("q", city),
            ("appid", key.expose()),
            ("units", "metric"),
        ])
    }
}

/// `cod` is a number on the current endpoint and a string on the forecast one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn is_ok(&self) -> bool {
        match self {
            OwCode::Number(n) => *n == 200,
            OwCode::Text(s) => s == "200",
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    cod: Option<OwCode>,
    name: Option<String>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

fn first_description(weather: &[OwWeather]) -> String {
    weather.first().map(|w| w.description.clone()).unwrap_or_else(|| "Unknown".to_string())
}

fn current_from_payload(city: &str, parsed: OwCurrentResponse) -> Result<WeatherReading> {
    if !parsed.cod.as_ref().is_some_and(OwCode::is_ok) {
        return Err(Error::NotFound(format!("city '{city}'")));
    }

    let main = parsed
        .main
        .ok_or_else(|| Error::MalformedJson("current weather payload has no 'main'".into()))?;

    Ok(WeatherReading {
        location_name: parsed.name,
        description: first_description(&parsed.weather),
        temperature_c: main.temp,
    })
}

fn forecast_from_payload(parsed: OwForecastResponse) -> Vec<ForecastEntry> {
    parsed
        .list
        .into_iter()
        .map(|e| ForecastEntry {
            description: first_description(&e.weather),
            dt_txt: e.dt_txt,
            temperature_c: e.main.temp,
        })
        .collect()
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, key: &ApiKey, city: &str) -> Result<WeatherReading> {
        debug!(city, "fetching current weather");

        let parsed: OwCurrentResponse =
            fetch_json(self.get("/data/2.5/weather", key, city), "openweather.current")
                .await
                .map_err(|err| match err {
                    Error::Http(404) => Error::NotFound(format!("city '{city}'")),
                    other => other,
                })?;

        current_from_payload(city, parsed)
    }

    async fn forecast(&self, key: &ApiKey, city: &str) -> Result<Vec<ForecastEntry>> {
        debug!(city, "fetching 5-day forecast");

        let parsed: OwForecastResponse =
            fetch_json(self.get("/data/2.5/forecast", key, city), "openweather.forecast").await?;

        Ok(forecast_from_payload(parsed))
    }
}
