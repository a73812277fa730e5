//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// casestats - use-of-force case dashboard
///
/// Fetches the cases recorded for a year from the case API and summarizes
/// the subjects by race, sex and age group.
///
/// Examples:
///   casestats --list-years
///   casestats --year 2019
///   casestats --year 2019 --format json --output report.json
///   casestats --api-url http://localhost:5000/api --year 2018
///   casestats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Year to summarize
    ///
    /// "None" clears the selection and produces no report.
    #[arg(short, long, value_name = "YEAR")]
    pub year: Option<String>,

    /// List the years available from the API and exit
    #[arg(long, conflicts_with = "year")]
    pub list_years: bool,

    /// Base URL of the case API
    #[arg(long, value_name = "URL", env = "CASESTATS_API_URL")]
    pub api_url: Option<String>,

    /// API version
    #[arg(long, value_name = "VERSION", env = "CASESTATS_API_VERSION")]
    pub api_version: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path for the report
    ///
    /// The report is printed to stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of cases to list in detail
    #[arg(long, value_name = "COUNT")]
    pub sample_cases: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .casestats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Exit with code 2 when any chart has no data
    #[arg(long)]
    pub fail_on_no_data: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .casestats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
