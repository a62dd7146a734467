use tracing::{info, warn};

use crate::{
    credentials::{CredentialKind, Credentials},
    currency::extract_currency_code,
    error::Result,
    markets::{index_ticker, stock_exchange_link},
    model::{Conversion, ExchangeRates, IndexSection, MarketReport, RatesSection},
    provider::{Services, exchangerate::TARGET_CURRENCIES},
};

pub fn market_prompt(country: &str) -> String {
    format!(
        "For {country}, provide:\n\
         - Official currency (ISO code only)\n\
         - Major stock exchanges and indices\n\
         - Stock exchange headquarters city\n"
    )
}

fn conversions(rates: &ExchangeRates) -> Vec<Conversion> {
    TARGET_CURRENCIES
        .iter()
        .map(|&target| Conversion { target, rate: rates.rate(target) })
        .collect()
}

/// Financial overview, exchange rates and index history for a country.
///
/// Only a missing key or an LLM failure aborts; rates and index failures are
/// kept in their section of the report.
pub async fn market_report(services: &Services, creds: &Credentials, country: &str) -> Result<MarketReport> {
    let llm_key = creds.require(CredentialKind::Llm)?;
    let exchange_key = creds.require(CredentialKind::Exchange)?;

    info!(country, "building market report");

    let overview = services.llm.complete(llm_key, &market_prompt(country)).await?;

    let rates = match extract_currency_code(&overview) {
        Some(code) => {
            let outcome = services.rates.latest(exchange_key, code).await.map(|r| conversions(&r));
            Some(RatesSection { base: code.to_string(), outcome })
        }
        None => {
            warn!(country, "no currency code found in overview; skipping exchange rates");
            None
        }
    };

    let index = match index_ticker(country) {
        Some(ticker) => Some(IndexSection { ticker, outcome: services.index.one_day(ticker).await }),
        None => None,
    };

    Ok(MarketReport {
        country: country.to_string(),
        overview,
        rates,
        index,
        exchange_link: stock_exchange_link(country),
    })
}
