//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.casestats.toml` files.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".casestats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Case API settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Report settings.
    #[serde(default)]
    pub report: ReportSettings,
}

/// Case API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version path segment.
    #[serde(default = "default_version")]
    pub version: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_version(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000/api".to_string()
}

fn default_version() -> String {
    "v1.0".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Number of cases listed in detail.
    #[serde(default = "default_sample_cases")]
    pub sample_cases: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            sample_cases: default_sample_cases(),
        }
    }
}

fn default_sample_cases() -> usize {
    5
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line (or via env) override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(ref version) = args.api_version {
            self.api.version = version.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(sample_cases) = args.sample_cases {
            self.report.sample_cases = sample_cases;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000/api");
        assert_eq!(config.api.version, "v1.0");
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert_eq!(config.report.sample_cases, 5);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[api]
base_url = "https://cases.example.org/api"
timeout_seconds = 10

[report]
format = "json"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, "https://cases.example.org/api");
        assert_eq!(config.api.version, "v1.0");
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.report.sample_cases, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[report]\nsample_cases = 2").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.report.sample_cases, 2);
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api.version, "v1.0");
    }
}
