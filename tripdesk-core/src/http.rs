//! Shared response classification used by every service client.
//!
//! Each check short-circuits before the next one: transport, status, blank
//! body, JSON. Service-specific envelope checks run on the decoded value.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Sends `request` and returns the decoded JSON body.
///
/// `service` only labels log lines; it must never contain a secret.
pub(crate) async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder, service: &str) -> Result<T> {
    let (status, body) = fetch_text(request, service).await?;
    decode_body(status, &body).inspect_err(|err| warn!(service, %err, "response rejected"))
}

/// Sends `request` and returns the status and raw body text.
///
/// Non-200 responses are returned as `Error::Http` without reading the body.
pub(crate) async fn fetch_text(request: RequestBuilder, service: &str) -> Result<(StatusCode, String)> {
    let res = request.send().await.map_err(|e| {
        let err = Error::network(e);
        warn!(service, %err, "request failed");
        err
    })?;

    let status = res.status();
    debug!(service, %status, "response received");

    if status != StatusCode::OK {
        warn!(service, %status, "unexpected status");
        return Err(Error::Http(status.as_u16()));
    }

    let body = res.text().await.map_err(Error::network)?;
    Ok((status, body))
}

/// Classifies an already received response, starting at the status check.
pub(crate) fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if status != StatusCode::OK {
        return Err(Error::Http(status.as_u16()));
    }

    if body.trim().is_empty() {
        return Err(Error::EmptyResponse);
    }

    serde_json::from_str(body)
        .map_err(|e| Error::MalformedJson(format!("{e} (body: {})", truncate_body(body))))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
