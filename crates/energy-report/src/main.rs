mod bootstrap;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use energy_core::settings::Settings;
use energy_core::time_utils::{check_month, parse_user_date};
use energy_core::{DatasetVariant, Record};
use energy_data::reader::load_records;
use energy_data::reports;

/// One report, with every user-supplied value already validated.
#[derive(Debug, PartialEq, Eq)]
enum ReportRequest {
    Weekly,
    Range { start: NaiveDate, end: NaiveDate },
    Month(u32),
    Year,
}

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Energy Report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Report: {}, Year: {}", settings.report, settings.year);

    let report = build_report(&settings)?;

    println!("{}", report);

    if let Some(path) = settings.output_path() {
        reports::write_report(&path, &report)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

/// Validate the request, then load and format it.
fn build_report(settings: &Settings) -> Result<String> {
    let request = parse_request(settings)?;
    tracing::debug!("Request: {:?}", request);
    run_report(settings, &request)
}

/// Validate the command line into a [`ReportRequest`] before any data is read.
fn parse_request(settings: &Settings) -> Result<ReportRequest> {
    match settings.report.as_str() {
        "weekly" => Ok(ReportRequest::Weekly),
        "daily" => {
            let (Some(start), Some(end)) = (&settings.start, &settings.end) else {
                bail!("A daily report needs --start and --end (dd.mm.yyyy)");
            };
            let start = parse_user_date(start)?;
            let end = parse_user_date(end)?;
            if end < start {
                return Err(energy_core::ReportError::InvalidRange { start, end }.into());
            }
            Ok(ReportRequest::Range { start, end })
        }
        "monthly" => {
            let Some(month) = settings.month else {
                bail!("A monthly report needs --month (1-12)");
            };
            Ok(ReportRequest::Month(check_month(month)?))
        }
        "yearly" => Ok(ReportRequest::Year),
        unknown => bail!("Unknown report type: {}", unknown),
    }
}

/// Load the data the request needs and build the report text.
fn run_report(settings: &Settings, request: &ReportRequest) -> Result<String> {
    let policy = settings.parse_policy();
    let variant = DatasetVariant::Hourly;

    let report = match *request {
        ReportRequest::Weekly => {
            tracing::info!("Scanning {} for week files", settings.week_dir.display());
            reports::weekly_reports_from_dir(&settings.week_dir, settings.year, policy)?
        }
        ReportRequest::Range { start, end } => {
            let records = load_hourly(settings)?;
            reports::range_report(&records, variant, start, end)?
        }
        ReportRequest::Month(month) => {
            let records = load_hourly(settings)?;
            reports::monthly_report(&records, variant, settings.year, month)?
        }
        ReportRequest::Year => {
            let records = load_hourly(settings)?;
            reports::yearly_report(&records, variant, settings.year)
        }
    };
    Ok(report)
}

fn load_hourly(settings: &Settings) -> Result<Vec<Record>> {
    let records = load_records(
        &settings.data_file,
        DatasetVariant::Hourly,
        settings.parse_policy(),
    )?;
    tracing::info!(
        "Loaded {} records from {}",
        records.len(),
        settings.data_file.display()
    );
    Ok(records)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
