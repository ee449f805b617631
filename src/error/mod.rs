//! Error types for ceprace.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! - **Network**: timeouts, refused connections, DNS, other transport failures
//! - **Source**: a lookup service answered, but not with a usable address
//! - **Configuration**: config file, environment, or CLI values
//! - **Internal**: I/O, serialization, unclassified
//!
//! Each error has a stable error code (e.g., `CEP-N001`) for programmatic
//! handling. Network and Source errors never reach the user directly: the
//! race absorbs them and only reports the overall outcome.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport issues (timeout, DNS, connection refused).
    Network,
    /// The source answered with a bad status or an unusable body.
    Source,
    /// Configuration issues (parse errors, invalid values, missing files).
    Configuration,
    /// Internal errors (bugs, unexpected state, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network error",
            Self::Source => "Source error",
            Self::Configuration => "Configuration error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Network => "N",
            Self::Source => "S",
            Self::Configuration => "C",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
///
/// A lookup that times out is not an error and exits with `Success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success (including a lookup where no source answered in time)
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Invalid configuration or arguments
    ConfigError = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for ceprace operations.
#[derive(Error, Debug)]
pub enum CepError {
    // ==========================================================================
    // Network errors (Category: Network)
    // ==========================================================================
    /// Request exceeded the per-call timeout.
    #[error("request timeout after {millis}ms")]
    Timeout { millis: u64 },

    /// Connection refused by remote server.
    #[error("connection refused: {host}")]
    ConnectionRefused { host: String },

    /// DNS resolution failed.
    #[error("DNS resolution failed for {host}")]
    DnsFailure { host: String },

    /// Any other transport failure.
    #[error("network error: {0}")]
    Network(String),

    // ==========================================================================
    // Source errors (Category: Source)
    // ==========================================================================
    /// The service answered with a status other than 200 OK.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// The body did not match the source's schema.
    #[error("failed to parse response: {0}")]
    ParseResponse(String),

    /// The service reported that the postal code does not exist.
    #[error("postal code not found: {0}")]
    NotFound(String),

    // ==========================================================================
    // Configuration errors (Category: Configuration)
    // ==========================================================================
    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error parsing configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid value in configuration.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    /// Unknown source name.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// Every source was disabled.
    #[error("no sources enabled")]
    NoSources,

    // ==========================================================================
    // Internal errors (Category: Internal)
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CepError {
    /// Classify a transport error from `reqwest`.
    ///
    /// `timeout` is the per-call timeout that was in force, used to label
    /// timeout errors.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_reqwest(err: &reqwest::Error, timeout: std::time::Duration) -> Self {
        let host = err
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("unknown")
            .to_string();

        if err.is_timeout() {
            return Self::Timeout {
                millis: timeout.as_millis() as u64,
            };
        }

        if err.is_connect() {
            let text = format!("{err:?}").to_lowercase();
            if text.contains("dns") || text.contains("resolve") || text.contains("lookup") {
                return Self::DnsFailure { host };
            }
            return Self::ConnectionRefused { host };
        }

        if err.is_decode() {
            return Self::ParseResponse(err.to_string());
        }

        Self::Network(err.to_string())
    }

    /// Map error to exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self.category() {
            ErrorCategory::Configuration => ExitCode::ConfigError,
            _ => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Timeout { .. }
            | Self::ConnectionRefused { .. }
            | Self::DnsFailure { .. }
            | Self::Network(_) => ErrorCategory::Network,

            Self::HttpStatus { .. } | Self::ParseResponse(_) | Self::NotFound(_) => {
                ErrorCategory::Source
            }

            Self::Config(_)
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::InvalidSource(_)
            | Self::NoSources => ErrorCategory::Configuration,

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `CEP-{category}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            // Network errors (N001-N099)
            Self::Timeout { .. } => "CEP-N001",
            Self::ConnectionRefused { .. } => "CEP-N002",
            Self::DnsFailure { .. } => "CEP-N003",
            Self::Network(_) => "CEP-N099",

            // Source errors (S001-S099)
            Self::HttpStatus { .. } => "CEP-S001",
            Self::ParseResponse(_) => "CEP-S002",
            Self::NotFound(_) => "CEP-S003",

            // Configuration errors (C001-C099)
            Self::Config(_) => "CEP-C001",
            Self::ConfigParse { .. } => "CEP-C002",
            Self::ConfigInvalid { .. } => "CEP-C003",
            Self::InvalidSource(_) => "CEP-C010",
            Self::NoSources => "CEP-C011",

            // Internal errors (X001-X099)
            Self::Io(_) => "CEP-X001",
            Self::Json(_) => "CEP-X002",
            Self::Other(_) => "CEP-X099",
        }
    }

    /// Whether a second attempt could plausibly succeed.
    ///
    /// The race never retries; this only feeds diagnostics.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::ConnectionRefused { .. }
                | Self::DnsFailure { .. }
                | Self::Network(_)
                | Self::HttpStatus { status: 500..=599, .. }
        )
    }
}

/// Result type alias using `CepError`.
pub type Result<T> = std::result::Result<T, CepError>;
