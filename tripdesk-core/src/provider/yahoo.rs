use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::StockSettings,
    error::{Error, Result},
    http::fetch_json,
    model::IndexBar,
};

use super::IndexHistoryProvider;

// The chart endpoint rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

#[derive(Debug, Clone)]
pub struct YahooIndexHistory {
    base_url: String,
    http: Client,
}

impl YahooIndexHistory {
    pub fn new(settings: &StockSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build Yahoo Finance HTTP client")?;

        Ok(Self { base_url: settings.base_url.trim_end_matches('/').to_string(), http })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range=1d&interval=1d",
            self.base_url,
            urlencoding::encode(ticker)
        )
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    result: Option<Vec<YahooChartResult>>,
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

fn bars_from_chart(ticker: &str, parsed: YahooChartResponse) -> Result<Vec<IndexBar>> {
    if let Some(error) = parsed.chart.error {
        let message = error
            .description
            .or(error.code)
            .unwrap_or_else(|| format!("chart request for {ticker} failed"));
        return Err(Error::Api(message));
    }

    let result = parsed
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| Error::NotFound(format!("chart data for {ticker}")))?;

    // A market that has not opened yet reports no timestamps.
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let Some(quote) = result.indicators.quote.first() else {
        return Ok(Vec::new());
    };

    let bars = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let timestamp = DateTime::<Utc>::from_timestamp(ts, 0)?;
            // Only keep rows where all OHLC values are present.
            Some(IndexBar {
                timestamp,
                open: (*quote.open.get(i)?)?,
                high: (*quote.high.get(i)?)?,
                low: (*quote.low.get(i)?)?,
                close: (*quote.close.get(i)?)?,
                volume: quote.volume.get(i).copied().flatten().and_then(|v| u64::try_from(v).ok()),
            })
        })
        .collect();

    Ok(bars)
}

#[async_trait]
impl IndexHistoryProvider for YahooIndexHistory {
    async fn one_day(&self, ticker: &str) -> Result<Vec<IndexBar>> {
        debug!(ticker, "fetching index history");

        let parsed: YahooChartResponse =
            fetch_json(self.http.get(self.chart_url(ticker)), "yahoo.chart").await?;

        bars_from_chart(ticker, parsed)
    }
}
