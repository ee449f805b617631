//! ViaCEP source adapter.
//!
//! Endpoint: `{base}/ws/{cep}/json/`. Field names are Portuguese:
//!
//! | ViaCEP       | Address       |
//! |--------------|---------------|
//! | `cep`        | `postal_code` |
//! | `uf`         | `region`      |
//! | `localidade` | `city`        |
//! | `bairro`     | `district`    |
//! | `logradouro` | `street`      |
//!
//! Unknown codes come back as `200 {"erro": true}` (older deployments send
//! the string `"true"`), which is reported as [`CepError::NotFound`].

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::core::http::fetch_json;
use crate::core::models::Address;
use crate::core::source::AddressSource;
use crate::error::{CepError, Result};

/// Response from `GET /ws/{cep}/json/`.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    erro: Option<Value>,
}

impl ViaCepResponse {
    fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// Adapter for <https://viacep.com.br>.
#[derive(Debug, Clone)]
pub struct ViaCep {
    client: Client,
    base: String,
    timeout: Duration,
}

impl ViaCep {
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
        format!("{}/ws/{cep}/json/", self.base)
    }
}

impl AddressSource for ViaCep {
    fn lookup<'a>(&'a self, cep: &'a str) -> BoxFuture<'a, Result<Address>> {
        async move {
            let url = self.url_for(cep);
            tracing::trace!(%url, "ViaCEP request");
            let response: ViaCepResponse = fetch_json(&self.client, &url, self.timeout).await?;
            normalize(cep, response)
        }
        .boxed()
    }
}

fn normalize(cep: &str, response: ViaCepResponse) -> Result<Address> {
    if response.is_not_found() {
        return Err(CepError::NotFound(cep.to_string()));
    }

    Ok(Address {
        postal_code: response.cep,
        region: response.uf,
        city: response.localidade,
        district: response.bairro,
        street: response.logradouro,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ViaCepResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn normalize_remaps_portuguese_fields() {
        let response = parse(
            r#"{
                "cep": "01001-000",
                "logradouro": "Praça da Sé",
                "complemento": "lado ímpar",
                "bairro": "Sé",
                "localidade": "São Paulo",
                "uf": "SP",
                "ibge": "3550308"
            }"#,
        );

        let address = normalize("01001000", response).unwrap();
        assert_eq!(address.postal_code, "01001-000");
        assert_eq!(address.region, "SP");
        assert_eq!(address.city, "São Paulo");
        assert_eq!(address.district, "Sé");
        assert_eq!(address.street, "Praça da Sé");
    }

    #[test]
    fn erro_flag_is_not_found() {
        let err = normalize("99999999", parse(r#"{"erro": true}"#)).unwrap_err();
        assert!(matches!(err, CepError::NotFound(ref cep) if cep == "99999999"));

        let err = normalize("99999999", parse(r#"{"erro": "true"}"#)).unwrap_err();
        assert!(matches!(err, CepError::NotFound(_)));
    }

    #[test]
    fn erro_false_is_ignored() {
        let address = normalize("69900000", parse(r#"{"uf": "AC", "erro": false}"#)).unwrap();
        assert_eq!(address.region, "AC");
        assert!(address.street.is_empty());
    }

    #[test]
    fn url_template() {
        let adapter = ViaCep::new(Client::new(), "http://viacep.com.br", Duration::from_secs(1));
        assert_eq!(
            adapter.url_for("01001000"),
            "http://viacep.com.br/ws/01001000/json/"
        );
    }
}
