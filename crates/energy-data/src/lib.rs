//! Data layer for the energy reports.
//!
//! Loads `;`-delimited meter files into records, reduces them by calendar
//! period and assembles the finished report text.

pub mod aggregator;
pub mod reader;
pub mod reports;

pub use energy_core as core;
