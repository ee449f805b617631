//! Core data models.
//!
//! `Address` is what a source adapter produces; `NormalizedAddress` is the
//! same data stamped with the label of the source that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Address
// =============================================================================

/// An address in the common shape, before source attribution.
///
/// Any field may be empty when the source omits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub postal_code: String,
    /// State or province (UF).
    pub region: String,
    pub city: String,
    /// Neighborhood (bairro).
    pub district: String,
    pub street: String,
}

impl Address {
    /// Attach a source label, producing the race's result shape.
    #[must_use]
    pub fn attributed(self, source: impl Into<String>) -> NormalizedAddress {
        NormalizedAddress {
            address: self,
            source: source.into(),
        }
    }
}

// =============================================================================
// Normalized Address
// =============================================================================

/// An address together with the label of the source that answered.
///
/// Only the fetch task constructs these (via [`Address::attributed`]), so
/// adapters never choose their own label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAddress {
    #[serde(flatten)]
    pub address: Address,
    pub source: String,
}

impl NormalizedAddress {
    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.address.postal_code
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.address.region
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.address.city
    }

    #[must_use]
    pub fn district(&self) -> &str {
        &self.address.district
    }

    #[must_use]
    pub fn street(&self) -> &str {
        &self.address.street
    }
}

// =============================================================================
// Lookup Payload
// =============================================================================

/// Status of a lookup as shown to callers.
///
/// Exhausted and timed-out races both surface as `Timeout`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LookupStatus {
    Ok,
    Timeout,
}

/// One source attempt observed before the race resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub source: String,
    pub success: bool,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

/// Result of one CLI lookup, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupPayload {
    pub cep: String,
    pub status: LookupStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<NormalizedAddress>,
    pub elapsed_ms: u64,
    pub deadline_ms: u64,
    #[serde(default)]
    pub attempts: Vec<AttemptRecord>,
}

// =============================================================================
// Robot Output
// =============================================================================

/// Current robot output schema version.
pub const SCHEMA_VERSION: &str = "ceprace.v1";

/// Envelope for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotOutput<T> {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub command: String,
    pub data: T,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl<T> RobotOutput<T> {
    /// Create a new robot output envelope.
    pub fn new(command: &str, data: T) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            command: command.to_string(),
            data,
            errors: Vec::new(),
        }
    }
}

impl RobotOutput<LookupPayload> {
    /// Create a lookup envelope.
    #[must_use]
    pub fn lookup(payload: LookupPayload) -> Self {
        Self::new("lookup", payload)
    }
}
