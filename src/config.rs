//! Generator configuration.
//!
//! Settings are read from an optional TOML file passed with `--config`. Every
//! key is optional; missing keys keep the stock defaults, which reproduce the
//! classic output layout (15 MiB units, 40 values per line, CRLF line endings).
//!
//! ```toml
//! [output]
//! split_threshold = 15728640  # Seal a unit once it reaches this many bytes
//! values_per_line = 40        # Decimal byte literals per source line
//! line_ending = "crlf"        # "crlf" or "lf"
//!
//! [scan]
//! ignored_suffixes = [".scc"] # File/directory name suffixes never embedded
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default size at which an output unit is sealed: 15 MiB.
pub const DEFAULT_SPLIT_THRESHOLD: u64 = 15 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level generator settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// How generated sources are laid out.
    pub output: OutputConfig,
    /// Which files the scanner skips beyond the built-in hidden-file rules.
    pub scan: ScanConfig,
}

impl GeneratorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.split_threshold == 0 {
            return Err(ConfigError::Validation(
                "output.split_threshold must be greater than 0".into(),
            ));
        }
        if self.output.values_per_line == 0 {
            return Err(ConfigError::Validation(
                "output.values_per_line must be greater than 0".into(),
            ));
        }
        if self.scan.ignored_suffixes.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::Validation(
                "scan.ignored_suffixes must not contain empty strings".into(),
            ));
        }
        Ok(())
    }
}

/// Output layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Byte count at or above which the current unit is sealed.
    pub split_threshold: u64,
    /// Number of decimal literals written per line of an array.
    pub values_per_line: usize,
    /// Line terminator for generated files.
    pub line_ending: LineEnding,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            values_per_line: 40,
            line_ending: LineEnding::Crlf,
        }
    }
}

/// Line terminator used in generated sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Crlf,
    Lf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

/// Scanner filter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Name suffixes (ASCII case-insensitive) that exclude a file or directory.
    pub ignored_suffixes: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignored_suffixes: vec![".scc".to_string()],
        }
    }
}

/// Load config from `path`, or return stock defaults when no path is given.
///
/// Unlike a missing optional file, an explicitly named file that cannot be
/// read is an error.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str::<GeneratorConfig>(&content)?
        }
        None => GeneratorConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// A documented config file with every option at its default value.
pub fn stock_config_toml() -> &'static str {
    r#"# binary-builder configuration
#
# All options are optional. Values shown are the defaults.

[output]
# Seal the current .cpp unit and open the next one once it holds at least
# this many bytes (15 MiB).
split_threshold = 15728640

# Number of decimal byte literals per line inside each array.
values_per_line = 40

# Line ending for generated files: "crlf" or "lf".
line_ending = "crlf"

[scan]
# File or directory names ending with any of these suffixes (case-insensitive)
# are never embedded. Names starting with "." are always skipped.
ignored_suffixes = [".scc"]
"#
}
