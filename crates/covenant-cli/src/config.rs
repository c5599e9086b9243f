//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use covenant_extractor::AnalyzerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Analyzer selection and remote-call settings
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".covenant").join("config.toml"))
    }

    /// Load configuration, then apply `COVENANT_*` environment overrides.
    ///
    /// An explicit path must exist. Without one, the default path is used
    /// when present and built-in defaults otherwise.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from(Path::new(path))?,
            None => match Self::path() {
                Ok(path) if path.exists() => Self::load_from(&path)?,
                _ => Self::default(),
            },
        };

        config.analyzer = config.analyzer.with_env_overrides();
        config.analyzer.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Serialize for display, with the API key redacted.
    pub fn to_display_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.analyzer.api_key.is_some() {
            shown.analyzer.api_key = Some("********".to_string());
        }
        toml::to_string_pretty(&shown)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
