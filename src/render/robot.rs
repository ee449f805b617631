//! Robot-mode output (JSON and Markdown).
//!
//! Stable output for scripts and agents.

use std::fmt::Write as _;

use crate::core::models::{LookupPayload, RobotOutput};
use crate::error::Result;

/// Render any serializable value as JSON.
pub fn render_json<T: serde::Serialize>(output: &T) -> Result<String> {
    Ok(serde_json::to_string(output)?)
}

/// Render any serializable value as pretty JSON.
pub fn render_json_pretty<T: serde::Serialize>(output: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

/// Render a lookup inside the robot envelope.
pub fn render_lookup_json(payload: &LookupPayload, pretty: bool) -> Result<String> {
    let output = RobotOutput::lookup(payload.clone());
    if pretty {
        render_json_pretty(&output)
    } else {
        render_json(&output)
    }
}

/// Render a lookup as Markdown.
#[must_use]
pub fn render_lookup_md(payload: &LookupPayload) -> String {
    let mut output = String::new();

    match &payload.address {
        Some(address) => {
            let _ = writeln!(output, "## {}\n", address.source);
            let _ = writeln!(output, "- cep: {}", address.postal_code());
            let _ = writeln!(output, "- state: {}", address.region());
            let _ = writeln!(output, "- city: {}", address.city());
            let _ = writeln!(output, "- neighborhood: {}", address.district());
            let _ = writeln!(output, "- street: {}", address.street());
        }
        None => {
            let _ = writeln!(output, "## Timeout\n");
            let _ = writeln!(output, "- cep: {}", payload.cep);
            let _ = writeln!(output, "- deadline_ms: {}", payload.deadline_ms);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::LookupStatus;
    use crate::test_utils::make_test_address;

    fn ok_payload() -> LookupPayload {
        LookupPayload {
            cep: "01001000".to_string(),
            status: LookupStatus::Ok,
            address: Some(make_test_address().attributed("BrasilAPI")),
            elapsed_ms: 12,
            deadline_ms: 1000,
            attempts: vec![],
        }
    }

    #[test]
    fn json_is_single_line_envelope() {
        let json = render_lookup_json(&ok_payload(), false).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["command"], "lookup");
        assert_eq!(value["data"]["status"], "ok");
        assert_eq!(value["data"]["address"]["source"], "BrasilAPI");
        assert_eq!(value["data"]["address"]["region"], "SP");
    }

    #[test]
    fn pretty_json_is_multiline() {
        let json = render_lookup_json(&ok_payload(), true).unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn markdown_success() {
        let md = render_lookup_md(&ok_payload());
        assert!(md.starts_with("## BrasilAPI"));
        assert!(md.contains("- neighborhood: Sé"));
    }

    #[test]
    fn markdown_timeout() {
        let mut payload = ok_payload();
        payload.address = None;
        payload.status = LookupStatus::Timeout;

        let md = render_lookup_md(&payload);
        assert!(md.starts_with("## Timeout"));
        assert!(md.contains("- deadline_ms: 1000"));
    }
}
