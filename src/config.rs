//! Configuration loading and resolution.
//!
//! Nothing here is required: with no flags, no environment, and no file the
//! lookup races every built-in source with 1 s timeouts.
//!
//! ## Precedence
//!
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file (only when `--config` or `CEPRACE_CONFIG` names one)
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `CEPRACE_TIMEOUT_MS`: per-source request timeout
//! - `CEPRACE_DEADLINE_MS`: overall deadline
//! - `CEPRACE_SOURCES`: comma-separated source list (e.g., "viacep,brasilapi")
//! - `CEPRACE_FORMAT`: output format (human, json, md)
//! - `CEPRACE_BRASILAPI_URL` / `CEPRACE_VIACEP_URL`: base URL overrides
//! - `CEPRACE_NO_COLOR` or `NO_COLOR`: disable colors
//! - `CEPRACE_PRETTY`: pretty-print JSON output
//! - `CEPRACE_CONFIG`: config file path

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::args::{Cli, OutputFormat};
use crate::core::race::RaceOptions;
use crate::core::source::Source;
use crate::error::{CepError, Result};

// =============================================================================
// Environment Variable Names
// =============================================================================

pub const ENV_TIMEOUT_MS: &str = "CEPRACE_TIMEOUT_MS";
pub const ENV_DEADLINE_MS: &str = "CEPRACE_DEADLINE_MS";
pub const ENV_SOURCES: &str = "CEPRACE_SOURCES";
pub const ENV_FORMAT: &str = "CEPRACE_FORMAT";
pub const ENV_BRASILAPI_URL: &str = "CEPRACE_BRASILAPI_URL";
pub const ENV_VIACEP_URL: &str = "CEPRACE_VIACEP_URL";
pub const ENV_NO_COLOR: &str = "CEPRACE_NO_COLOR";
pub const ENV_NO_COLOR_STD: &str = "NO_COLOR";
pub const ENV_PRETTY: &str = "CEPRACE_PRETTY";
pub const ENV_CONFIG: &str = "CEPRACE_CONFIG";

/// Accepted range for both timeouts, in milliseconds.
pub const MILLIS_RANGE: std::ops::RangeInclusive<u64> = 1..=60_000;

const DEFAULT_MILLIS: u64 = 1_000;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Configuration after merging CLI, environment, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Sources to race, in launch order.
    pub sources: Vec<Source>,
    pub brasilapi_base: String,
    pub viacep_base: String,
    pub timeout: Duration,
    pub deadline: Duration,
    pub format: OutputFormat,
    pub no_color: bool,
    pub pretty: bool,
    /// Where each value came from.
    pub origins: ConfigOrigins,
}

/// Tracks where each configuration value came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigOrigins {
    pub sources: ConfigSource,
    pub timeout: ConfigSource,
    pub deadline: ConfigSource,
    pub format: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    Env,
    ConfigFile,
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve the final configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the named config file is missing or invalid, or
    /// any resolved value is out of range or unknown.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config = match Self::config_path(cli) {
            Some(path) => Config::load_from(&path)?,
            None => Config::default(),
        };
        config.validate()?;

        let mut origins = ConfigOrigins::default();

        let sources = Self::resolve_sources(cli, &config, &mut origins.sources)?;
        let timeout = Self::resolve_millis(
            cli.timeout_ms,
            ENV_TIMEOUT_MS,
            config.race.timeout_ms,
            &mut origins.timeout,
        )?;
        let deadline = Self::resolve_millis(
            cli.deadline_ms,
            ENV_DEADLINE_MS,
            config.race.deadline_ms,
            &mut origins.deadline,
        )?;
        let format = Self::resolve_format(cli, &config, &mut origins.format)?;

        if deadline < timeout {
            tracing::warn!(
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                "Deadline is shorter than the per-source timeout"
            );
        }

        let brasilapi_base = env_value(ENV_BRASILAPI_URL)
            .or_else(|| config.sources.brasilapi.api_base.clone())
            .unwrap_or_else(|| Source::BrasilApi.default_base().to_string());
        let viacep_base = env_value(ENV_VIACEP_URL)
            .or_else(|| config.sources.viacep.api_base.clone())
            .unwrap_or_else(|| Source::ViaCep.default_base().to_string());

        let no_color = cli.no_color
            || is_env_truthy(ENV_NO_COLOR)
            || std::env::var_os(ENV_NO_COLOR_STD).is_some()
            || !config.output.color;
        let pretty = cli.pretty || is_env_truthy(ENV_PRETTY) || config.output.pretty;

        tracing::debug!(
            sources_from = %origins.sources,
            timeout_from = %origins.timeout,
            deadline_from = %origins.deadline,
            format_from = %origins.format,
            "Resolved configuration"
        );

        Ok(Self {
            sources,
            brasilapi_base,
            viacep_base,
            timeout,
            deadline,
            format,
            no_color,
            pretty,
            origins,
        })
    }

    /// Race options derived from this configuration.
    #[must_use]
    pub const fn race_options(&self) -> RaceOptions {
        RaceOptions::new(self.timeout, self.deadline)
    }

    /// Base URL for `source`.
    #[must_use]
    pub fn api_base(&self, source: Source) -> &str {
        match source {
            Source::BrasilApi => &self.brasilapi_base,
            Source::ViaCep => &self.viacep_base,
        }
    }

    fn config_path(cli: &Cli) -> Option<PathBuf> {
        cli.config
            .clone()
            .or_else(|| env_value(ENV_CONFIG).map(PathBuf::from))
    }

    fn resolve_sources(
        cli: &Cli,
        config: &Config,
        origin: &mut ConfigSource,
    ) -> Result<Vec<Source>> {
        if let Some(list) = &cli.source {
            *origin = ConfigSource::Cli;
            return Source::parse_list(list);
        }

        if let Some(list) = env_value(ENV_SOURCES) {
            *origin = ConfigSource::Env;
            return Source::parse_list(&list);
        }

        if let Some(enabled) = &config.sources.enabled {
            *origin = ConfigSource::ConfigFile;
            return Source::parse_list(&enabled.join(","));
        }

        *origin = ConfigSource::Default;
        Ok(Source::ALL.to_vec())
    }

    fn resolve_millis(
        cli_value: Option<u64>,
        env_key: &str,
        file_value: Option<u64>,
        origin: &mut ConfigSource,
    ) -> Result<Duration> {
        let millis = if let Some(millis) = cli_value {
            *origin = ConfigSource::Cli;
            millis
        } else if let Some(raw) = env_value(env_key) {
            *origin = ConfigSource::Env;
            raw.parse::<u64>().map_err(|_| CepError::ConfigInvalid {
                key: env_key.to_string(),
                value: raw.clone(),
                message: "expected a whole number of milliseconds".to_string(),
            })?
        } else if let Some(millis) = file_value {
            *origin = ConfigSource::ConfigFile;
            millis
        } else {
            *origin = ConfigSource::Default;
            DEFAULT_MILLIS
        };

        check_millis(env_key, millis)?;
        Ok(Duration::from_millis(millis))
    }

    fn resolve_format(
        cli: &Cli,
        config: &Config,
        origin: &mut ConfigSource,
    ) -> Result<OutputFormat> {
        if cli.json {
            *origin = ConfigSource::Cli;
            return Ok(OutputFormat::Json);
        }
        if let Some(format) = cli.format {
            *origin = ConfigSource::Cli;
            return Ok(format);
        }
        if let Some(raw) = env_value(ENV_FORMAT) {
            *origin = ConfigSource::Env;
            return parse_format(ENV_FORMAT, &raw);
        }
        if let Some(raw) = &config.output.format {
            *origin = ConfigSource::ConfigFile;
            return parse_format("output.format", raw);
        }
        *origin = ConfigSource::Default;
        Ok(OutputFormat::Human)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

fn parse_format(key: &str, raw: &str) -> Result<OutputFormat> {
    OutputFormat::from_arg(raw).ok_or_else(|| CepError::ConfigInvalid {
        key: key.to_string(),
        value: raw.to_string(),
        message: "valid formats: human, json, md".to_string(),
    })
}

fn check_millis(key: &str, millis: u64) -> Result<()> {
    if MILLIS_RANGE.contains(&millis) {
        Ok(())
    } else {
        Err(CepError::ConfigInvalid {
            key: key.to_string(),
            value: millis.to_string(),
            message: format!(
                "must be between {} and {} milliseconds",
                MILLIS_RANGE.start(),
                MILLIS_RANGE.end()
            ),
        })
    }
}

// =============================================================================
// Config File
// =============================================================================

/// Contents of the optional TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub race: RaceConfig,
    pub output: OutputConfig,
    pub sources: SourcesConfig,
}

/// `[race]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Per-source request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Overall deadline in milliseconds.
    pub deadline_ms: Option<u64>,
}

/// `[output]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: Option<String>,
    pub color: bool,
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            pretty: false,
        }
    }
}

/// `[sources]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Sources to race; all of them when absent.
    pub enabled: Option<Vec<String>>,
    pub brasilapi: SourceSettings,
    pub viacep: SourceSettings,
}

/// Per-source settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Base URL override.
    pub api_base: Option<String>,
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// Unlike the defaults, a path that was asked for must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CepError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CepError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate file values.
    ///
    /// # Errors
    ///
    /// Returns an error on unknown source names, empty source list, unknown
    /// output format, or timeouts out of range.
    pub fn validate(&self) -> Result<()> {
        if let Some(enabled) = &self.sources.enabled {
            if enabled.is_empty() {
                return Err(CepError::NoSources);
            }
            for name in enabled {
                Source::from_cli_name(name)?;
            }
        }

        if let Some(format) = &self.output.format {
            parse_format("output.format", format)?;
        }

        if let Some(millis) = self.race.timeout_ms {
            check_millis("race.timeout_ms", millis)?;
        }
        if let Some(millis) = self.race.deadline_ms {
            check_millis("race.deadline_ms", millis)?;
        }

        Ok(())
    }
}
