//! ceprace - CEP lookup racing BrasilAPI and ViaCEP
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use ceprace::cli::Cli;
use ceprace::config::ResolvedConfig;
use ceprace::core::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = cli
        .log_level
        .as_deref()
        .and_then(logging::LogLevel::from_arg)
        .or_else(logging::parse_log_level_from_env)
        .unwrap_or_default();
    let log_format = if cli.json_output {
        logging::LogFormat::Json
    } else {
        logging::parse_log_format_from_env().unwrap_or_default()
    };
    let log_file = logging::parse_log_file_from_env();
    logging::init(log_level, log_format, log_file, cli.verbose);

    let format = cli.effective_format();
    let pretty = cli.pretty;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error_code = e.error_code(), "{}", e);
            let error_output = ceprace::render::error::render_error(&e, format, pretty);
            eprintln!("{error_output}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli) -> ceprace::Result<()> {
    let Some(cep) = cli.cep.as_deref() else {
        print_quickstart();
        return Ok(());
    };

    let config = ResolvedConfig::resolve(&cli)?;
    ceprace::cli::lookup::execute(cep, &config).await
}

/// Print quickstart help when no CEP is given.
fn print_quickstart() {
    println!(
        r"ceprace - CEP lookup racing BrasilAPI and ViaCEP

USAGE:
    ceprace [OPTIONS] <CEP>

QUICK START:
    ceprace 01001000                      # First answer wins
    ceprace 01001000 --source viacep      # Query a single service
    ceprace 01001000 --deadline-ms 2000   # Wait up to two seconds

ROBOT MODE (for AI agents):
    ceprace 01001000 --json               # JSON output
    ceprace 01001000 --format md          # Markdown output

For more help: ceprace --help
"
    );

    println!("Version: {}", env!("CARGO_PKG_VERSION"));
}
