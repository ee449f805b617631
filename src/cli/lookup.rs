//! Lookup command implementation.

use crate::config::ResolvedConfig;
use crate::core::models::LookupPayload;
use crate::core::race;
use crate::error::Result;
use crate::render;
use crate::sources;
use crate::util::env::should_use_color;

/// Execute a lookup and print the result to stdout.
///
/// A lookup that times out is still a successful run: the timeout is
/// reported on stdout like any other answer.
///
/// # Errors
///
/// Returns an error if no source can be built or rendering fails.
pub async fn execute(cep: &str, config: &ResolvedConfig) -> Result<()> {
    let payload = lookup(cep, config).await?;

    let no_color = !should_use_color(config.no_color);
    let output = render::render_lookup(&payload, config.format, config.pretty, no_color)?;
    println!("{output}");

    Ok(())
}

/// Race the configured sources for `cep`.
///
/// # Errors
///
/// Returns an error if the source registry is empty.
pub async fn lookup(cep: &str, config: &ResolvedConfig) -> Result<LookupPayload> {
    let sources = sources::registry(config)?;

    tracing::debug!(
        cep,
        sources = ?config.sources,
        timeout_ms = u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX),
        deadline_ms = u64::try_from(config.deadline.as_millis()).unwrap_or(u64::MAX),
        "Starting lookup"
    );

    let report = race::resolve(cep, &sources, config.race_options()).await;
    Ok(report.into_payload(cep, config.deadline))
}
