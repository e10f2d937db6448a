use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while loading meter data and building reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A data file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report file could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data row has a bad timestamp, number or field count.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    /// A user-supplied date is not in `dd.mm.yyyy` form.
    #[error("Invalid date: {0} (expected dd.mm.yyyy)")]
    InvalidDate(String),

    /// A month number outside `1..=12`.
    #[error("Invalid month: {0}. Please enter a number between 1 and 12.")]
    InvalidMonth(u32),

    /// A date range whose end lies before its start.
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// An ISO week number that does not exist in the given year.
    #[error("Invalid week {week} for year {year}")]
    InvalidWeek { year: i32, week: u32 },

    /// No records matched the requested period.
    #[error("No data found for {0}")]
    NoData(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the energy crates.
pub type Result<T> = std::result::Result<T, ReportError>;
