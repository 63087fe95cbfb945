//! Shared HTTP plumbing for provider clients

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::RoutingError;

/// Build an HTTP client with the given request timeout
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, RoutingError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))
}

/// Send a request and decode a JSON body
///
/// Non-success statuses are classified through [`RoutingError::from_status`].
/// Request URLs are never logged: several providers carry keys in them.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    timeout_secs: u64,
) -> Result<T, RoutingError> {
    let response = request
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| RoutingError::from_transport(e, timeout_secs))?;

    let status = response.status();
    debug!(status = %status, "Received provider response");

    if !status.is_success() {
        let retry_after = retry_after_secs(&response, status);
        let body = response.text().await.unwrap_or_default();
        return Err(RoutingError::from_status(status, retry_after, &body));
    }

    let body = response
        .text()
        .await
        .map_err(|e| RoutingError::from_transport(e, timeout_secs))?;

    serde_json::from_str(&body).map_err(|e| RoutingError::ParseError(e.to_string()))
}

fn retry_after_secs(response: &reqwest::Response, status: StatusCode) -> Option<u64> {
    if status != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }
    response
        .headers()
        .get("Retry-After")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}
