//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Look up a Brazilian postal code (CEP) by racing BrasilAPI and ViaCEP.
#[derive(Parser, Debug)]
#[command(name = "ceprace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Postal code to look up (passed to the services as-is)
    #[arg(value_name = "CEP")]
    pub cep: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Sources to race (comma-separated names, or "all")
    #[arg(long, value_name = "LIST")]
    pub source: Option<String>,

    /// Per-source request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Overall deadline in milliseconds
    #[arg(long, value_name = "MS")]
    pub deadline_ms: Option<u64>,

    /// Read settings from this TOML file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Output format requested on the command line, ignoring env and file.
    ///
    /// Used for rendering errors raised before configuration resolves.
    #[must_use]
    pub fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format.unwrap_or_default()
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable panel
    #[default]
    Human,
    /// JSON for scripts and agents
    Json,
    /// Markdown
    Md,
}

impl OutputFormat {
    /// Parse from a config or environment value.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "md" | "markdown" => Some(Self::Md),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_cep_and_flags() {
        let cli = Cli::try_parse_from([
            "ceprace",
            "01001000",
            "--json",
            "--source",
            "viacep",
            "--deadline-ms",
            "500",
        ])
        .unwrap();

        assert_eq!(cli.cep.as_deref(), Some("01001000"));
        assert!(cli.json);
        assert_eq!(cli.source.as_deref(), Some("viacep"));
        assert_eq!(cli.deadline_ms, Some(500));
        assert_eq!(cli.timeout_ms, None);
    }

    #[test]
    fn cep_is_optional() {
        let cli = Cli::try_parse_from(["ceprace"]).unwrap();
        assert!(cli.cep.is_none());
    }

    #[test]
    fn format_value_enum() {
        let cli = Cli::try_parse_from(["ceprace", "--format", "md", "01001000"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Md));
        assert!(Cli::try_parse_from(["ceprace", "--format", "xml"]).is_err());
    }

    #[test]
    fn json_flag_overrides_format() {
        let cli = Cli::try_parse_from(["ceprace", "--format", "md", "--json"]).unwrap();
        assert_eq!(cli.effective_format(), OutputFormat::Json);
    }

    #[test]
    fn output_format_from_arg() {
        assert_eq!(OutputFormat::from_arg("Markdown"), Some(OutputFormat::Md));
        assert_eq!(OutputFormat::from_arg(" json "), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_arg("yaml"), None);
    }
}
