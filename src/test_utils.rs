//! Test utilities for ceprace.
//!
//! Provides scripted mock sources and fixture payloads for unit and
//! integration tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ceprace::test_utils::*;
//!
//! let fast = MockSource::ok(make_test_address()).with_delay(Duration::from_millis(10));
//! let handle = SourceHandle::new("fast", fast.clone());
//! // ... race ...
//! assert_eq!(fast.calls(), 1);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Value, json};

use crate::core::models::Address;
use crate::core::source::AddressSource;
use crate::error::{CepError, Result};

// =============================================================================
// Test Data Factories
// =============================================================================

/// The address both fixture payloads describe (Praça da Sé, São Paulo).
#[must_use]
pub fn make_test_address() -> Address {
    Address {
        postal_code: "01001000".to_string(),
        region: "SP".to_string(),
        city: "São Paulo".to_string(),
        district: "Sé".to_string(),
        street: "Praça da Sé".to_string(),
    }
}

/// An address with a distinguishable city, for telling sources apart.
#[must_use]
pub fn make_test_address_in(city: &str) -> Address {
    Address {
        city: city.to_string(),
        ..make_test_address()
    }
}

/// BrasilAPI response body for `01001000`.
#[must_use]
pub fn brasilapi_payload() -> Value {
    json!({
        "cep": "01001000",
        "state": "SP",
        "city": "São Paulo",
        "neighborhood": "Sé",
        "street": "Praça da Sé",
        "service": "open-cep"
    })
}

/// ViaCEP response body for `01001000`.
#[must_use]
pub fn viacep_payload() -> Value {
    json!({
        "cep": "01001-000",
        "logradouro": "Praça da Sé",
        "complemento": "lado ímpar",
        "unidade": "",
        "bairro": "Sé",
        "localidade": "São Paulo",
        "uf": "SP",
        "ibge": "3550308",
        "gia": "1004",
        "ddd": "11",
        "siafi": "7107"
    })
}

/// ViaCEP response body for an unknown code.
#[must_use]
pub fn viacep_not_found_payload() -> Value {
    json!({ "erro": true })
}

// =============================================================================
// Mock Source
// =============================================================================

#[derive(Debug, Clone)]
enum Scripted {
    Ok(Address),
    HttpStatus(u16),
    Parse(String),
}

/// A source with scripted latency and result.
///
/// Clones share their counters, so keep one clone to inspect after the
/// original has been moved into a `SourceHandle`.
#[derive(Debug, Clone)]
pub struct MockSource {
    delay: Duration,
    result: Scripted,
    calls: Arc<AtomicUsize>,
    completions: Arc<AtomicUsize>,
}

impl MockSource {
    fn scripted(result: Scripted) -> Self {
        Self {
            delay: Duration::ZERO,
            result,
            calls: Arc::new(AtomicUsize::new(0)),
            completions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answers with `address`.
    #[must_use]
    pub fn ok(address: Address) -> Self {
        Self::scripted(Scripted::Ok(address))
    }

    /// Fails with an HTTP status error.
    #[must_use]
    pub fn http_error(status: u16) -> Self {
        Self::scripted(Scripted::HttpStatus(status))
    }

    /// Fails with a parse error.
    #[must_use]
    pub fn parse_error(message: &str) -> Self {
        Self::scripted(Scripted::Parse(message.to_string()))
    }

    /// Wait `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// How many lookups were started.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// How many lookups ran to the end of their delay (not cancelled).
    #[must_use]
    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}

impl AddressSource for MockSource {
    fn lookup<'a>(&'a self, cep: &'a str) -> BoxFuture<'a, Result<Address>> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.completions.fetch_add(1, Ordering::SeqCst);

            match &self.result {
                Scripted::Ok(address) => Ok(address.clone()),
                Scripted::HttpStatus(status) => Err(CepError::HttpStatus {
                    status: *status,
                    url: format!("mock://{cep}"),
                }),
                Scripted::Parse(message) => Err(CepError::ParseResponse(message.clone())),
            }
        }
        .boxed()
    }
}

// =============================================================================
// Temporary Config Files
// =============================================================================

/// Write `content` to a temporary TOML file that lives as long as the
/// returned handle.
///
/// # Panics
///
/// Panics if the temporary file cannot be created or written.
#[must_use]
pub fn write_temp_config(content: &str) -> tempfile::NamedTempFile {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(content.as_bytes()).expect("write temp config");
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_source_counts_calls_and_completions() {
        let mock = MockSource::ok(make_test_address());
        let observer = mock.clone();

        let address = mock.lookup("01001000").await.unwrap();
        assert_eq!(address, make_test_address());
        assert_eq!(observer.calls(), 1);
        assert_eq!(observer.completions(), 1);
    }

    #[tokio::test]
    async fn mock_source_scripted_errors() {
        let err = MockSource::http_error(502).lookup("x").await.unwrap_err();
        assert!(matches!(err, CepError::HttpStatus { status: 502, .. }));

        let err = MockSource::parse_error("eof").lookup("x").await.unwrap_err();
        assert!(matches!(err, CepError::ParseResponse(_)));
    }

    #[test]
    fn fixture_payloads_describe_the_same_place() {
        assert_eq!(brasilapi_payload()["city"], viacep_payload()["localidade"]);
        assert_eq!(brasilapi_payload()["state"], viacep_payload()["uf"]);
    }

    #[test]
    fn temp_config_is_readable() {
        let file = write_temp_config("[race]\ndeadline_ms = 10\n");
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("deadline_ms"));
    }
}
