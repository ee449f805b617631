//! BrasilAPI source adapter.
//!
//! Endpoint: `{base}/api/cep/v1/{cep}`. The response already uses English
//! field names, so the remapping is mostly one-to-one.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;

use crate::core::http::fetch_json;
use crate::core::models::Address;
use crate::core::source::AddressSource;
use crate::error::Result;

/// Response from `GET /api/cep/v1/{cep}`.
#[derive(Debug, Deserialize)]
struct BrasilApiResponse {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    neighborhood: String,
    #[serde(default)]
    street: String,
}

/// Adapter for <https://brasilapi.com.br>.
#[derive(Debug, Clone)]
pub struct BrasilApi {
    client: Client,
    base: String,
    timeout: Duration,
}

impl BrasilApi {
    /// `timeout` must match the one `client` was built with.
    #[must_use]
    pub fn new(client: Client, base: &str, timeout: Duration) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Endpoint URL for `cep`.
    #[must_use]
    pub fn url_for(&self, cep: &str) -> String {
        format!("{}/api/cep/v1/{cep}", self.base)
    }
}

impl AddressSource for BrasilApi {
    fn lookup<'a>(&'a self, cep: &'a str) -> BoxFuture<'a, Result<Address>> {
        async move {
            let url = self.url_for(cep);
            tracing::trace!(%url, "BrasilAPI request");
            let response: BrasilApiResponse = fetch_json(&self.client, &url, self.timeout).await?;
            Ok(normalize(response))
        }
        .boxed()
    }
}

fn normalize(response: BrasilApiResponse) -> Address {
    Address {
        postal_code: response.cep,
        region: response.state,
        city: response.city,
        district: response.neighborhood,
        street: response.street,
    }
}
