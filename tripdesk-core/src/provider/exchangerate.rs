use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::{collections::BTreeMap, time::Duration};
use tracing::{debug, warn};

use crate::{
    config::ExchangeSettings,
    credentials::ApiKey,
    error::{Error, Result},
    http::{decode_body, fetch_text},
    model::ExchangeRates,
};

use super::RatesProvider;

/// Fixed for every rate-table request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Currencies every rates lookup is reported against.
pub const TARGET_CURRENCIES: [&str; 4] = ["USD", "INR", "GBP", "EUR"];

#[derive(Debug, Clone)]
pub struct ExchangeRateProvider {
    base_url: String,
    http: Client,
}

impl ExchangeRateProvider {
    pub fn new(settings: &ExchangeSettings) -> Self {
        Self { base_url: settings.base_url.trim_end_matches('/').to_string(), http: Client::new() }
    }
}

/// Classifies a rate-table response that made it past the transport layer.
///
/// Order: status, blank body, JSON, then the `result` envelope. Only a body
/// that fails to parse is `MalformedJson`; any parsed value without
/// `"result": "success"` is an `Api` error.
pub fn classify_rates_response(base: &str, status: StatusCode, body: &str) -> Result<ExchangeRates> {
    let payload: Value = decode_body(status, body)?;

    if payload.get("result").and_then(Value::as_str) != Some("success") {
        let message = match payload.get("error-type") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "Unknown API error".to_string(),
        };
        return Err(Error::Api(message));
    }

    // Non-numeric entries are dropped rather than failing the whole table.
    let rates: BTreeMap<String, f64> = payload
        .get("conversion_rates")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter().filter_map(|(code, rate)| Some((code.clone(), rate.as_f64()?))).collect()
        })
        .unwrap_or_default();

    Ok(ExchangeRates {
        base: payload
            .get("base_code")
            .and_then(Value::as_str)
            .map_or_else(|| base.to_string(), str::to_string),
        rates,
    })
}

#[async_trait]
impl RatesProvider for ExchangeRateProvider {
    async fn latest(&self, key: &ApiKey, base: &str) -> Result<ExchangeRates> {
        debug!(base, "fetching exchange rates");

        let url = format!("{}/v6/{}/latest/{}", self.base_url, key.expose(), base);
        let request = self.http.get(url).timeout(REQUEST_TIMEOUT);

        let (status, body) = fetch_text(request, "exchangerate").await?;

        classify_rates_response(base, status, &body)
            .inspect_err(|err| warn!(base, %err, "exchange rate lookup failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    fn classify(status: u16, body: &str) -> Result<ExchangeRates> {
        classify_rates_response("INR", StatusCode::from_u16(status).expect("status"), body)
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let provider = ExchangeRateProvider::new(&ExchangeSettings {
            base_url: "http://127.0.0.1:1".to_string(),
        });
        let key = ApiKey::new("KEY").expect("non-empty");

        let err = provider.latest(&key, "USD").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)), "got {err:?}");
        assert!(!err.to_string().contains("KEY"));
    }

    #[test]
    fn non_200_is_http_error_regardless_of_body() {
        assert_eq!(classify(500, r#"{"result":"success"}"#).unwrap_err(), Error::Http(500));
        assert_eq!(classify(403, "").unwrap_err(), Error::Http(403));
        assert_eq!(classify(204, "").unwrap_err(), Error::Http(204));
    }

    #[test]
    fn blank_200_is_empty_response() {
        assert_eq!(classify(200, "").unwrap_err(), Error::EmptyResponse);
        assert_eq!(classify(200, "  \n ").unwrap_err(), Error::EmptyResponse);
    }

    #[test]
    fn non_json_200_is_malformed() {
        assert!(matches!(classify(200, "Service Unavailable").unwrap_err(), Error::MalformedJson(_)));
        assert!(matches!(classify(200, "{\"result\":").unwrap_err(), Error::MalformedJson(_)));
    }

    #[test]
    fn error_envelope_is_api_error() {
        let err = classify(200, r#"{"result": "error", "error-type": "unsupported-code"}"#).unwrap_err();
        assert_eq!(err, Error::Api("unsupported-code".into()));
    }

    #[test]
    fn error_envelope_without_type_is_unknown() {
        let err = classify(200, r#"{"result": "error"}"#).unwrap_err();
        assert_eq!(err, Error::Api("Unknown API error".into()));

        let err = classify(200, r#"{"conversion_rates": {"USD": 1.0}}"#).unwrap_err();
        assert_eq!(err, Error::Api("Unknown API error".into()));
    }

    #[test]
    fn success_envelope_exposes_rates() {
        let rates =
            classify(200, r#"{"result": "success", "conversion_rates": {"USD": 1.0, "INR": 83.2}}"#)
                .expect("success");

        assert_eq!(rates.rate("INR"), Some(83.2));
        assert_eq!(rates.rate("USD"), Some(1.0));
        assert_eq!(rates.rate("GBP"), None);
        assert_eq!(rates.base, "INR");
    }

    #[test]
    fn error_envelope_with_odd_fields_is_still_api_error() {
        let err = classify(
            200,
            r#"{"result":"error","error-type":"invalid-key","conversion_rates":{"USD":null}}"#,
        )
        .unwrap_err();
        assert_eq!(err, Error::Api("invalid-key".into()));

        let err = classify(200, r#"{"result":"error","error-type":"invalid-key","base_code":123}"#)
            .unwrap_err();
        assert_eq!(err, Error::Api("invalid-key".into()));
    }

    #[test]
    fn non_object_json_is_api_error() {
        assert_eq!(classify(200, "[]").unwrap_err(), Error::Api("Unknown API error".into()));
        assert_eq!(classify(200, "42").unwrap_err(), Error::Api("Unknown API error".into()));
    }

    #[test]
    fn non_numeric_rates_are_skipped() {
        let rates = classify(
            200,
            r#"{"result":"success","conversion_rates":{"USD":0.012,"XDR":"n/a","EUR":null}}"#,
        )
        .expect("success");

        assert_eq!(rates.rate("USD"), Some(0.012));
        assert_eq!(rates.rate("XDR"), None);
        assert_eq!(rates.rates.len(), 1);
    }

    /// Serves exactly one canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}")
    }

    fn provider_for(base_url: String) -> ExchangeRateProvider {
        ExchangeRateProvider::new(&ExchangeSettings { base_url })
    }

    #[tokio::test]
    async fn server_error_with_json_body_is_http_error() {
        let base_url = serve_once("500 Internal Server Error", r#"{"result":"success"}"#).await;
        let key = ApiKey::new("KEY").expect("non-empty");

        let err = provider_for(base_url).latest(&key, "USD").await.unwrap_err();
        assert_eq!(err, Error::Http(500));
    }

    #[tokio::test]
    async fn served_success_payload_yields_rates() {
        let base_url = serve_once(
            "200 OK",
            r#"{"result":"success","base_code":"USD","conversion_rates":{"INR":83.2}}"#,
        )
        .await;
        let key = ApiKey::new("KEY").expect("non-empty");

        let rates = provider_for(base_url).latest(&key, "USD").await.expect("rates");
        assert_eq!(rates.base, "USD");
        assert_eq!(rates.rate("INR"), Some(83.2));
    }

    #[tokio::test]
    async fn served_blank_body_is_empty_response() {
        let base_url = serve_once("200 OK", "  ").await;
        let key = ApiKey::new("KEY").expect("non-empty");

        let err = provider_for(base_url).latest(&key, "USD").await.unwrap_err();
        assert_eq!(err, Error::EmptyResponse);
    }

    #[test]
    fn success_prefers_reported_base_code() {
        let rates = classify(200, r#"{"result":"success","base_code":"JPY","conversion_rates":{}}"#)
            .expect("success");
        assert_eq!(rates.base, "JPY");
        assert!(rates.rates.is_empty());
    }
}
