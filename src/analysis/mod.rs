//! Analysis modules.
//!
//! Turns case lists into the per-dimension series shown as pie charts.

pub mod aggregator;

pub use aggregator::*;
