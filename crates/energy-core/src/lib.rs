//! Core types for the energy reports.
//!
//! Record model, error type, number and report formatting, calendar helpers
//! and command-line settings. Nothing here touches data files.

pub mod error;
pub mod formatting;
pub mod models;
pub mod report_format;
pub mod settings;
pub mod time_utils;

pub use error::{ReportError, Result};
pub use models::{AggregateResult, DatasetVariant, ParsePolicy, Record, UnitScale};
