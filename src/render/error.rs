//! Error rendering.
//!
//! Only configuration and internal errors get this far; per-source failures
//! are absorbed by the race.

use crate::cli::args::OutputFormat;
use crate::error::CepError;

/// Render an error for stderr in the requested format.
#[must_use]
pub fn render_error(error: &CepError, format: OutputFormat, pretty: bool) -> String {
    match format {
        OutputFormat::Json => render_error_json(error, pretty),
        OutputFormat::Md => render_error_json(error, true),
        OutputFormat::Human => render_simple(error),
    }
}

/// Render error as structured JSON.
#[must_use]
pub fn render_error_json(error: &CepError, pretty: bool) -> String {
    let error_json = ErrorJson::from_error(error);
    let rendered = if pretty {
        serde_json::to_string_pretty(&error_json)
    } else {
        serde_json::to_string(&error_json)
    };
    rendered.unwrap_or_else(|_| render_simple(error))
}

fn render_simple(error: &CepError) -> String {
    format!("Error [{}]: {}", error.error_code(), error)
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorJson {
    error_code: String,
    category: String,
    message: String,
    is_retryable: bool,
}

impl ErrorJson {
    fn from_error(error: &CepError) -> Self {
        Self {
            error_code: error.error_code().to_string(),
            category: error.category().to_string(),
            message: error.to_string(),
            is_retryable: error.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_render_includes_error_code() {
        let out = render_error(
            &CepError::InvalidSource("correios".to_string()),
            OutputFormat::Human,
            false,
        );
        assert_eq!(out, "Error [CEP-C010]: invalid source: correios");
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render_error(&CepError::NoSources, OutputFormat::Json, false);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["errorCode"], "CEP-C011");
        assert_eq!(value["category"], "Configuration error");
        assert_eq!(value["isRetryable"], false);
    }
}
