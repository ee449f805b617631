//! HTTP client utilities.
//!
//! Provides the shared HTTP client used by every source adapter.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, StatusCode};

use crate::error::{CepError, Result};

/// Default per-call timeout for source requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("ceprace/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CepError::Network(e.to_string()))
}

/// Fetch JSON from a URL.
///
/// Only `200 OK` counts as success; any other status, even another 2xx, is
/// reported as [`CepError::HttpStatus`]. `timeout` labels timeout errors and
/// should match the client's configured timeout.
///
/// # Errors
///
/// Returns error on network failure, non-OK status, or JSON parse failure.
pub async fn fetch_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CepError::from_reqwest(&e, timeout))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(CepError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| CepError::from_reqwest(&e, timeout))?;

    serde_json::from_slice(&body).map_err(|e| CepError::ParseResponse(e.to_string()))
}
