//! Report generation.
//!
//! Renders a year view as a Markdown or JSON document: one section per
//! pie chart, followed by a sample of case details.

use crate::dashboard::{ChartPanel, YearView};
use crate::display::case_details;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata about the report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Case API the data came from.
    pub api_url: String,
    pub year: String,
    pub generated_at: DateTime<Utc>,
    pub total_cases: usize,
    pub located_cases: usize,
}

/// A complete dashboard report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub metadata: ReportMetadata,
    pub charts: Vec<ChartPanel>,
    /// Detail lines for the first few cases.
    pub sample_cases: Vec<Vec<String>>,
}

impl Report {
    /// Build a report from a year view, keeping at most `sample_cases` case details.
    pub fn from_view(view: &YearView, api_url: &str, sample_cases: usize) -> Self {
        Self {
            metadata: ReportMetadata {
                api_url: api_url.to_string(),
                year: view.year.clone(),
                generated_at: Utc::now(),
                total_cases: view.total_cases,
                located_cases: view.located_cases,
            },
            charts: view.charts.clone(),
            sample_cases: view
                .cases
                .iter()
                .take(sample_cases)
                .map(case_details)
                .collect(),
        }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Use of Force Report: {}\n\n", report.metadata.year));
    output.push_str(&generate_metadata_section(&report.metadata));

    output.push_str("## Subject Demographics\n\n");
    for chart in &report.charts {
        output.push_str(&generate_chart_section(chart));
    }

    output.push_str(&generate_cases_section(&report.sample_cases));

    output.push_str("---\n\n");
    output.push_str("*Report generated by casestats*\n");

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.api_url));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Total Cases:** {}\n", metadata.total_cases));
    section.push_str(&format!(
        "- **Cases with Location:** {}\n",
        metadata.located_cases
    ));
    section.push('\n');

    section
}

/// Generate one chart's table, or a no-data note when the chart is hidden.
fn generate_chart_section(chart: &ChartPanel) -> String {
    let mut section = String::new();

    let title = chart.dimension.to_string();
    section.push_str(&format!("### {}\n\n", title));

    let Some(series) = chart.outcome.series() else {
        section.push_str(&format!("*No {} data.*\n\n", title.to_lowercase()));
        return section;
    };

    let total = series.total();
    section.push_str(&format!("| {} | Count | Share |\n", title));
    section.push_str("|:---|:---:|:---:|\n");
    for entry in &series.data {
        let share = entry.count as f64 / total as f64 * 100.0;
        section.push_str(&format!("| {} | {} | {:.1}% |\n", entry.category, entry.count, share));
    }
    section.push('\n');

    section
}

fn generate_cases_section(cases: &[Vec<String>]) -> String {
    if cases.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Sample Cases\n\n");

    for lines in cases {
        let mut lines = lines.iter();
        if let Some(title) = lines.next() {
            section.push_str(&format!("### {}\n\n", title));
        }
        for line in lines {
            section.push_str(&format!("- {}\n", line));
        }
        section.push('\n');
    }

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
