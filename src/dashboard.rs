//! Dashboard controller.
//!
//! Owns the page state explicitly: every operation takes the current
//! [`DashboardState`] and returns its replacement.

use crate::analysis::{aggregate, located_case_count};
use crate::client::{CaseSource, FetchError};
use crate::models::{CaseRecord, Dimension, SeriesOutcome};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

/// Year selector value meaning "no year chosen".
pub const NO_SELECTION: &str = "None";

/// Failures shown to the user as a single banner message.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Could not initialize page.")]
    Initialize(#[source] FetchError),

    #[error("Could not apply Settings.")]
    ApplySettings(#[source] FetchError),
}

/// The user's year choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearSelection {
    None,
    Year(String),
}

impl From<&str> for YearSelection {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == NO_SELECTION {
            YearSelection::None
        } else {
            YearSelection::Year(value.to_string())
        }
    }
}

/// One pie chart card. Hidden when its series has no data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPanel {
    pub dimension: Dimension,
    pub outcome: SeriesOutcome,
}

impl ChartPanel {
    pub fn is_visible(&self) -> bool {
        !self.outcome.is_no_data()
    }
}

/// Everything displayed for a selected year.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearView {
    pub year: String,
    pub total_cases: usize,
    /// Cases that would be placed on the map.
    pub located_cases: usize,
    pub charts: Vec<ChartPanel>,
    #[serde(skip)]
    pub cases: Vec<CaseRecord>,
}

impl YearView {
    /// Aggregate every dimension for `cases`.
    pub fn build(year: String, cases: Vec<CaseRecord>) -> Self {
        let charts = Dimension::ALL
            .iter()
            .map(|&dimension| {
                let outcome = aggregate(&cases, dimension);
                if outcome.is_no_data() {
                    debug!("No {} data for {}, hiding chart", dimension, year);
                }
                ChartPanel { dimension, outcome }
            })
            .collect();

        Self {
            total_cases: cases.len(),
            located_cases: located_case_count(&cases),
            year,
            charts,
            cases,
        }
    }

    /// Dimensions whose charts are suppressed.
    pub fn hidden_charts(&self) -> Vec<Dimension> {
        self.charts
            .iter()
            .filter(|c| !c.is_visible())
            .map(|c| c.dimension)
            .collect()
    }
}

/// Current page state.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Options offered by the year selector.
    pub available_years: Vec<String>,
    /// Data for the applied year, if any.
    pub view: Option<YearView>,
}

impl DashboardState {
    /// The year currently displayed.
    pub fn year(&self) -> Option<&str> {
        self.view.as_ref().map(|v| v.year.as_str())
    }
}

/// Drives the dashboard against a [`CaseSource`].
pub struct Dashboard<S> {
    source: S,
}

impl<S: CaseSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Load the year options for a fresh page.
    pub async fn initialize(&self) -> Result<DashboardState, DashboardError> {
        let available_years = self.source.available_years().await.map_err(|e| {
            error!("Initialization failed: {}", e);
            DashboardError::Initialize(e)
        })?;

        info!("{} years available", available_years.len());

        Ok(DashboardState {
            available_years,
            view: None,
        })
    }

    /// Replace the displayed data with the cases for `selection`.
    ///
    /// The previous view is always dropped first; selecting no year leaves
    /// the page empty without fetching.
    pub async fn apply_settings(
        &self,
        mut state: DashboardState,
        selection: YearSelection,
    ) -> Result<DashboardState, DashboardError> {
        if let Some(previous) = state.view.take() {
            debug!("Clearing view for {}", previous.year);
        }

        let year = match selection {
            YearSelection::None => {
                debug!("No year selected");
                return Ok(state);
            }
            YearSelection::Year(year) => year,
        };

        let cases = self.source.cases_by_year(&year).await.map_err(|e| {
            error!("Failed to load cases for {}: {}", year, e);
            DashboardError::ApplySettings(e)
        })?;

        state.view = Some(YearView::build(year, cases));
        Ok(state)
    }
}
