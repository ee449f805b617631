//! Output rendering for human and robot modes.

pub mod error;
pub mod human;
pub mod robot;

use crate::cli::args::OutputFormat;
use crate::core::models::LookupPayload;
use crate::error::Result;

/// Render a lookup result in the requested format.
pub fn render_lookup(
    payload: &LookupPayload,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_lookup(payload, no_color)),
        OutputFormat::Json => robot::render_lookup_json(payload, pretty),
        OutputFormat::Md => Ok(robot::render_lookup_md(payload)),
    }
}
