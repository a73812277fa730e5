//! casestats - use-of-force case dashboard
//!
//! A CLI tool that fetches case records for a year from the case API,
//! summarizes subject demographics as pie-chart series and writes a
//! Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, write failure, etc.)
//!   2 - A chart had no data and --fail-on-no-data was set

mod analysis;
mod cli;
mod client;
mod config;
mod dashboard;
mod display;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use client::{ApiClient, ApiConfig};
use config::{Config, DEFAULT_CONFIG_FILE};
use dashboard::{Dashboard, DashboardState, YearSelection};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("casestats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .casestats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", DEFAULT_CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so a report printed to stdout stays clean.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run one dashboard cycle. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let api_config = ApiConfig {
        base_url: config.api.base_url.clone(),
        version: config.api.version.clone(),
        timeout_seconds: config.api.timeout_seconds,
    };
    let client = ApiClient::new(api_config).context("Failed to create HTTP client")?;
    let dashboard = Dashboard::new(client);

    let spinner = loading_spinner(!args.quiet, "Loading available years...");
    let initialized = dashboard.initialize().await;
    spinner.finish_and_clear();

    let state = match initialized {
        Ok(state) => state,
        Err(e) => return Ok(show_error(&e)),
    };

    let selection = match args.year.as_deref() {
        Some(year) if !args.list_years => YearSelection::from(year),
        _ => {
            print_years(&state);
            return Ok(0);
        }
    };

    if let YearSelection::Year(ref year) = selection {
        if !state.available_years.iter().any(|y| y == year) {
            warn!("Year {} is not listed by the API", year);
        }
    }

    let spinner = loading_spinner(!args.quiet, "Loading cases...");
    let applied = dashboard.apply_settings(state, selection).await;
    spinner.finish_and_clear();

    let state = match applied {
        Ok(state) => state,
        Err(e) => return Ok(show_error(&e)),
    };

    let Some(view) = state.view.as_ref() else {
        println!("No year selected.");
        return Ok(0);
    };
    info!("Showing cases for {}", state.year().unwrap_or_default());

    let report = report::Report::from_view(view, &config.api.base_url, config.report.sample_cases);
    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;

            if !args.quiet {
                println!("📊 {} cases for {}", view.total_cases, view.year);
                println!("   Cases with location: {}", view.located_cases);
                println!("✅ Report saved to: {}", path.display());
            }
        }
        None => println!("{}", output),
    }

    let hidden = view.hidden_charts();
    if !hidden.is_empty() {
        info!("Charts without data: {:?}", hidden);
        if args.fail_on_no_data {
            eprintln!("\n⛔ No data for {} chart(s). Failing (exit code 2).", hidden.len());
            return Ok(2);
        }
    }

    Ok(0)
}

/// Print the banner for a failed dashboard operation. Returns exit code 1.
fn show_error(e: &dashboard::DashboardError) -> i32 {
    if let Some(cause) = std::error::Error::source(e) {
        debug!("Cause: {}", cause);
    }
    eprintln!("\n❌ {}", e);
    1
}

fn print_years(state: &DashboardState) {
    if state.available_years.is_empty() {
        println!("No years available.");
        return;
    }

    println!("Available years:");
    for year in &state.available_years {
        println!("  {}", year);
    }
}

/// A spinner shown while a fetch is in flight. Hidden when `visible` is false.
fn loading_spinner(visible: bool, message: &'static str) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
