//! Report pipeline: aggregate records for a period and lay the result out as
//! text.

use std::path::Path;

use chrono::NaiveDate;
use energy_core::report_format::{format_day_row, format_no_data, format_summary, format_week_header};
use energy_core::time_utils::{days_inclusive, iso_week_bounds};
use energy_core::{AggregateResult, DatasetVariant, ParsePolicy, Record, ReportError, Result};
use tracing::{debug, info, warn};

use crate::aggregator::RecordAggregator;
use crate::reader::{find_week_files, load_records};

/// Week table: header, then one row per day from Monday to Sunday.
///
/// `records` must be phase records; values are reported in kWh.
pub fn weekly_report(records: &[Record], year: i32, week: u32) -> Result<String> {
    let variant = DatasetVariant::Phases;
    let (monday, sunday) = iso_week_bounds(year, week)?;
    let days = RecordAggregator::aggregate_days(records, monday, sunday, variant.default_scale())?;

    let mut text = format_week_header(week);
    for (result, date) in days.iter().zip(days_inclusive(monday, sunday)) {
        let mut sums = result.sums.clone();
        sums.resize(variant.arity(), 0.0);
        text.push_str(&format_day_row(&result.label, date, &sums));
        text.push('\n');
    }
    Ok(text)
}

/// Week tables for every `week<N>.csv` under `dir`, separated by a blank line.
///
/// Files whose week does not exist in `year` are logged and skipped.
pub fn weekly_reports_from_dir(dir: &Path, year: i32, policy: ParsePolicy) -> Result<String> {
    let files = find_week_files(dir);

    let mut sections = Vec::with_capacity(files.len());
    for (week, path) in &files {
        if let Err(e) = iso_week_bounds(year, *week) {
            warn!("Skipping {}: {}", path.display(), e);
            continue;
        }
        let records = load_records(path, DatasetVariant::Phases, policy)?;
        debug!("Week {}: {} records from {}", week, records.len(), path.display());
        sections.push(weekly_report(&records, year, *week)?);
    }
    if sections.is_empty() {
        return Err(ReportError::NoData(format!("week files in {}", dir.display())));
    }
    info!("Built {} week tables", sections.len());

    Ok(sections.join("\n"))
}

/// Summary of an inclusive date range.
pub fn range_report(
    records: &[Record],
    variant: DatasetVariant,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<String> {
    let result = RecordAggregator::aggregate_by_range(records, start, end, variant.default_scale())?;
    Ok(summary_body(&result, variant))
}

/// Summary of one month.
pub fn monthly_report(records: &[Record], variant: DatasetVariant, year: i32, month: u32) -> Result<String> {
    let result = RecordAggregator::aggregate_by_month(records, year, month, variant.default_scale())?;
    Ok(summary_body(&result, variant))
}

/// Summary of one year.
pub fn yearly_report(records: &[Record], variant: DatasetVariant, year: i32) -> String {
    let result = RecordAggregator::aggregate_by_year(records, year, variant.default_scale());
    summary_body(&result, variant)
}

/// Lay out one aggregate as a summary block, or the no-data body when nothing
/// matched.
pub fn summary_body(result: &AggregateResult, variant: DatasetVariant) -> String {
    let avg_temperature = match variant.temperature_field().map(|f| result.mean(f)).transpose() {
        Ok(avg) => avg,
        Err(_) => return format_no_data(&result.label),
    };
    if result.is_empty() {
        return format_no_data(&result.label);
    }

    format_summary(
        &result.label,
        result.sum_of(variant.consumption_fields()),
        result.sum_of(variant.production_fields()),
        avg_temperature,
    )
}

/// Write a finished report to `path`, replacing any previous content.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| ReportError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Report written to {}", path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
