//! Case API client.
//!
//! Fetches available years and the cases recorded for a year.

pub mod api;

pub use api::{ApiClient, ApiConfig, CaseSource, FetchError};
