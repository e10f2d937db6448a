//! Meter CSV discovery and loading.
//!
//! Files are `;`-delimited with one header line. The first column is an
//! ISO 8601 timestamp; the remaining columns depend on the
//! [`DatasetVariant`].

use std::path::{Path, PathBuf};

use energy_core::time_utils::parse_timestamp;
use energy_core::{DatasetVariant, ParsePolicy, Record, ReportError, Result};
use regex::Regex;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every data row of `path` into [`Record`]s, in file order.
///
/// With [`ParsePolicy::Abort`] the first bad row fails the whole load; with
/// [`ParsePolicy::Skip`] it is logged and dropped.
pub fn load_records(path: &Path, variant: DatasetVariant, policy: ParsePolicy) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    let mut rows_skipped = 0u64;

    for row in reader.records() {
        let parsed = match row {
            Ok(row) => parse_row(&row, variant),
            Err(e) => Err(csv_error(path, e)?),
        };

        match parsed {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) if policy == ParsePolicy::Skip => {
                warn!("Skipping row in {}: {}", path.display(), e);
                rows_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        "Loaded {} records from {} ({} skipped)",
        records.len(),
        path.display(),
        rows_skipped
    );

    Ok(records)
}

/// Find `week<N>.csv` files under `dir`, sorted by week number.
///
/// Files numbered outside `1..=53` are logged and left out.
pub fn find_week_files(dir: &Path) -> Vec<(u32, PathBuf)> {
    if !dir.exists() {
        warn!("Week directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let pattern = week_file_pattern();

    let mut files: Vec<(u32, PathBuf)> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let week = entry
                .file_name()
                .to_str()
                .and_then(|name| pattern.captures(name))
                .and_then(|caps| caps[1].parse::<u32>().ok())?;
            if !(1..=MAX_ISO_WEEK).contains(&week) {
                warn!("Ignoring {}: no ISO week {}", entry.path().display(), week);
                return None;
            }
            Some((week, entry.into_path()))
        })
        .collect();

    files.sort();
    files
}

// ── Internal helpers ──────────────────────────────────────────────────────────

const MAX_ISO_WEEK: u32 = 53;

fn week_file_pattern() -> Regex {
    Regex::new(r"(?i)^week(\d{1,2})\.csv$").expect("week file pattern is valid")
}

/// Convert one CSV row. Blank rows yield `Ok(None)`.
fn parse_row(row: &csv::StringRecord, variant: DatasetVariant) -> Result<Option<Record>> {
    let line = row.position().map_or(0, |p| p.line());

    if row.iter().all(|field| field.is_empty()) {
        return Ok(None);
    }

    // Columns past the variant's arity, such as a trailing `;`, are ignored.
    let expected = variant.arity() + 1;
    if row.len() < expected {
        return Err(ReportError::Parse {
            line,
            message: format!("expected {} fields, found {}", expected, row.len()),
        });
    }

    let timestamp = parse_timestamp(&row[0]).ok_or_else(|| ReportError::Parse {
        line,
        message: format!("bad timestamp \"{}\"", &row[0]),
    })?;

    let values = row
        .iter()
        .skip(1)
        .take(variant.arity())
        .map(|field| {
            parse_value(field, variant).ok_or_else(|| ReportError::Parse {
                line,
                message: format!("bad number \"{}\"", field),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(Some(Record::new(timestamp, values)))
}

/// Phase files hold whole watt-hours; hourly files use a decimal comma.
fn parse_value(field: &str, variant: DatasetVariant) -> Option<f64> {
    if variant.is_integral() {
        return field.parse::<i64>().ok().map(|v| v as f64);
    }
    field
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Map a reader error onto [`ReportError`]. I/O failures keep the path.
fn csv_error(path: &Path, err: csv::Error) -> Result<ReportError> {
    let line = err.position().map_or(0, |p| p.line());
    match err.into_kind() {
        csv::ErrorKind::Io(source) => Err(ReportError::FileRead {
            path: path.to_path_buf(),
            source,
        }),
        other => Ok(ReportError::Parse {
            line,
            message: format!("{:?}", other),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    const PHASE_HEADER: &str = "Time;Cons v1;Cons v2;Cons v3;Prod v1;Prod v2;Prod v3";
    const HOURLY_HEADER: &str = "Time;Consumption (kWh);Production (kWh);Temperature";

    // ── load_records ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_phase_file() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "week41.csv",
            &[
                PHASE_HEADER,
                "2025-10-06T00:00:00;10;20;30;40;50;60",
                "2025-10-06T01:00:00;1;2;3;4;5;6",
            ],
        );

        let records = load_records(&path, DatasetVariant::Phases, ParsePolicy::Abort).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date(), NaiveDate::from_ymd_opt(2025, 10, 6).unwrap());
        assert_eq!(records[0].values, vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(records[1].values[5], 6.0);
    }

    #[test]
    fn test_load_hourly_file_decimal_comma() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "2025.csv",
            &[
                HOURLY_HEADER,
                "2025-01-01T00:00:00;1,25;0,00;-3,5",
                "2025-01-01T01:00:00; 0,75 ;0,10;-4",
            ],
        );

        let records = load_records(&path, DatasetVariant::Hourly, ParsePolicy::Abort).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].values, vec![1.25, 0.0, -3.5]);
        assert_eq!(records[1].values, vec![0.75, 0.1, -4.0]);
    }

    #[test]
    fn test_load_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "empty.csv", &[HOURLY_HEADER]);
        let records = load_records(&path, DatasetVariant::Hourly, ParsePolicy::Abort).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_file_read_error() {
        let err = load_records(
            Path::new("/tmp/does-not-exist-energy-report/2025.csv"),
            DatasetVariant::Hourly,
            ParsePolicy::Abort,
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::FileRead { .. }));
    }

    #[test]
    fn test_load_bad_number_aborts_with_line() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "2025.csv",
            &[
                HOURLY_HEADER,
                "2025-01-01T00:00:00;1,0;0,0;1,0",
                "2025-01-01T01:00:00;abc;0,0;1,0",
            ],
        );

        let err = load_records(&path, DatasetVariant::Hourly, ParsePolicy::Abort).unwrap_err();
        match err {
            ReportError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_phase_rejects_decimal() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "week41.csv",
            &[PHASE_HEADER, "2025-10-06T00:00:00;1,5;2;3;4;5;6"],
        );
        let err = load_records(&path, DatasetVariant::Phases, ParsePolicy::Abort).unwrap_err();
        assert!(matches!(err, ReportError::Parse { .. }));
    }

    #[test]
    fn test_load_bad_timestamp_aborts() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "2025.csv",
            &[HOURLY_HEADER, "yesterday;1,0;0,0;1,0"],
        );
        let err = load_records(&path, DatasetVariant::Hourly, ParsePolicy::Abort).unwrap_err();
        assert!(matches!(err, ReportError::Parse { message, .. } if message.contains("yesterday")));
    }

    #[test]
    fn test_load_wrong_field_count_aborts() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "2025.csv",
            &[HOURLY_HEADER, "2025-01-01T00:00:00;1,0;0,0"],
        );
        let err = load_records(&path, DatasetVariant::Hourly, ParsePolicy::Abort).unwrap_err();
        assert!(matches!(err, ReportError::Parse { message, .. } if message.contains("expected 4 fields")));
    }

    #[test]
    fn test_load_ignores_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "2025.csv",
            &[
                HOURLY_HEADER,
                "2025-01-01T00:00:00;1,0;0,5;2,0;",
                "2025-01-01T01:00:00;2,0;1,5;4,0;note",
            ],
        );

        let records = load_records(&path, DatasetVariant::Hourly, ParsePolicy::Abort).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].values, vec![1.0, 0.5, 2.0]);
        assert_eq!(records[1].values, vec![2.0, 1.5, 4.0]);
    }

    #[test]
    fn test_load_skip_policy_drops_bad_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "2025.csv",
            &[
                HOURLY_HEADER,
                "2025-01-01T00:00:00;1,0;0,0;1,0",
                "not-a-date;1,0;0,0;1,0",
                "2025-01-01T02:00:00;x;0,0;1,0",
                "2025-01-01T03:00:00;2,0;0,5;3,0",
            ],
        );

        let records = load_records(&path, DatasetVariant::Hourly, ParsePolicy::Skip).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].values[0], 2.0);
    }

    #[test]
    fn test_load_ignores_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "2025.csv",
            &[HOURLY_HEADER, "2025-01-01T00:00:00;1,0;0,0;1,0", ""],
        );
        let records = load_records(&path, DatasetVariant::Hourly, ParsePolicy::Abort).unwrap();
        assert_eq!(records.len(), 1);
    }

    // ── find_week_files ───────────────────────────────────────────────────────

    #[test]
    fn test_find_week_files_sorted_by_week() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "week43.csv", &[PHASE_HEADER]);
        write_csv(dir.path(), "week9.csv", &[PHASE_HEADER]);
        write_csv(dir.path(), "week41.csv", &[PHASE_HEADER]);
        write_csv(dir.path(), "2025.csv", &[HOURLY_HEADER]);
        write_csv(dir.path(), "week41.txt", &["x"]);

        let files = find_week_files(dir.path());
        let weeks: Vec<u32> = files.iter().map(|(w, _)| *w).collect();
        assert_eq!(weeks, vec![9, 41, 43]);
        assert!(files[1].1.ends_with("week41.csv"));
    }

    #[test]
    fn test_find_week_files_ignores_out_of_range_weeks() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "week0.csv", &[PHASE_HEADER]);
        write_csv(dir.path(), "week99.csv", &[PHASE_HEADER]);
        write_csv(dir.path(), "week53.csv", &[PHASE_HEADER]);
        write_csv(dir.path(), "week1.csv", &[PHASE_HEADER]);

        let weeks: Vec<u32> = find_week_files(dir.path()).iter().map(|(w, _)| *w).collect();
        assert_eq!(weeks, vec![1, 53]);
    }

    #[test]
    fn test_find_week_files_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("october");
        std::fs::create_dir_all(&sub).unwrap();
        write_csv(&sub, "Week42.csv", &[PHASE_HEADER]);

        let files = find_week_files(dir.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, 42);
    }

    #[test]
    fn test_find_week_files_nonexistent_dir() {
        assert!(find_week_files(Path::new("/tmp/does-not-exist-energy-weeks")).is_empty());
    }
}
