//! Source descriptors and the adapter trait.
//!
//! A source is an external CEP lookup service. Each one has an adapter that
//! knows its URL template and response schema, and nothing about the label
//! it races under.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::models::Address;
use crate::error::{CepError, Result};

// =============================================================================
// Source Enum
// =============================================================================

/// Built-in lookup services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    BrasilApi,
    ViaCep,
}

impl Source {
    /// All sources, in launch order.
    pub const ALL: &'static [Self] = &[Self::BrasilApi, Self::ViaCep];

    /// CLI / config name for this source.
    #[must_use]
    pub const fn cli_name(self) -> &'static str {
        match self {
            Self::BrasilApi => "brasilapi",
            Self::ViaCep => "viacep",
        }
    }

    /// Label used in results and human output.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::BrasilApi => "BrasilAPI",
            Self::ViaCep => "ViaCEP",
        }
    }

    /// Production base URL.
    #[must_use]
    pub const fn default_base(self) -> &'static str {
        match self {
            Self::BrasilApi => "https://brasilapi.com.br",
            Self::ViaCep => "http://viacep.com.br",
        }
    }

    /// Parse from a CLI or config name (case-insensitive).
    pub fn from_cli_name(name: &str) -> Result<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|s| s.cli_name() == lower)
            .copied()
            .ok_or_else(|| CepError::InvalidSource(name.to_string()))
    }

    /// Parse a comma-separated list, or `all`.
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        if list.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::ALL.to_vec());
        }

        let mut sources = Vec::new();
        for name in list.split(',').filter(|s| !s.trim().is_empty()) {
            let source = Self::from_cli_name(name)?;
            if !sources.contains(&source) {
                sources.push(source);
            }
        }

        if sources.is_empty() {
            return Err(CepError::NoSources);
        }
        Ok(sources)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// =============================================================================
// Adapter Trait
// =============================================================================

/// One external lookup service.
///
/// Implementations perform a single request per call, with no retries, and
/// return every failure as `Err`. They must not panic.
pub trait AddressSource: Send + Sync {
    /// Look up `cep` and remap the answer into the common shape.
    fn lookup<'a>(&'a self, cep: &'a str) -> BoxFuture<'a, Result<Address>>;
}

// =============================================================================
// Source Handle
// =============================================================================

/// An adapter paired with the label it races under.
#[derive(Clone)]
pub struct SourceHandle {
    pub label: String,
    pub adapter: Arc<dyn AddressSource>,
}

impl SourceHandle {
    /// Create a handle from any adapter.
    pub fn new(label: impl Into<String>, adapter: impl AddressSource + 'static) -> Self {
        Self {
            label: label.into(),
            adapter: Arc::new(adapter),
        }
    }
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceHandle")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
