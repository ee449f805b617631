//! Source adapters.
//!
//! Each lookup service has its own submodule with its URL template and
//! response schema. [`registry`] turns the resolved configuration into the
//! handles the race runs.

pub mod brasilapi;
pub mod viacep;

use std::time::Duration;

use reqwest::Client;

use crate::config::ResolvedConfig;
use crate::core::http::build_client;
use crate::core::source::{Source, SourceHandle};
use crate::error::{CepError, Result};

pub use brasilapi::BrasilApi;
pub use viacep::ViaCep;

/// Build the handle for one built-in source.
#[must_use]
pub fn handle_for(source: Source, client: Client, api_base: &str, timeout: Duration) -> SourceHandle {
    match source {
        Source::BrasilApi => {
            SourceHandle::new(source.display_name(), BrasilApi::new(client, api_base, timeout))
        }
        Source::ViaCep => {
            SourceHandle::new(source.display_name(), ViaCep::new(client, api_base, timeout))
        }
    }
}

/// Build handles for every enabled source, sharing one HTTP client.
///
/// # Errors
///
/// Returns an error if no source is enabled or the HTTP client cannot be
/// built.
pub fn registry(config: &ResolvedConfig) -> Result<Vec<SourceHandle>> {
    if config.sources.is_empty() {
        return Err(CepError::NoSources);
    }

    let client = build_client(config.timeout)?;
    Ok(config
        .sources
        .iter()
        .map(|&source| {
            handle_for(
                source,
                client.clone(),
                config.api_base(source),
                config.timeout,
            )
        })
        .collect())
}
