use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::ParsePolicy;

/// Default output file of the weekly table.
pub const WEEKLY_OUTPUT_FILE: &str = "summary.txt";
/// Default output file of the summary reports.
pub const SUMMARY_OUTPUT_FILE: &str = "report.txt";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Electricity consumption and production reports from meter CSV files
#[derive(Parser, Debug, Clone)]
#[command(
    name = "energy-report",
    about = "Electricity consumption and production reports from meter CSV files",
    version
)]
pub struct Settings {
    /// Report type
    #[arg(long, default_value = "yearly", value_parser = ["daily", "monthly", "yearly", "weekly"])]
    pub report: String,

    /// Hourly data file (timestamp;consumption;production;temperature)
    #[arg(long, default_value = "2025.csv")]
    pub data_file: PathBuf,

    /// Directory searched for weekNN.csv phase files
    #[arg(long, default_value = ".")]
    pub week_dir: PathBuf,

    /// First day of a daily report (dd.mm.yyyy)
    #[arg(long)]
    pub start: Option<String>,

    /// Last day of a daily report (dd.mm.yyyy)
    #[arg(long)]
    pub end: Option<String>,

    /// Month number for a monthly report (1-12)
    #[arg(long)]
    pub month: Option<u32>,

    /// Calendar year of monthly, yearly and weekly reports
    #[arg(long, default_value = "2025")]
    pub year: i32,

    /// Write the report to its default file
    #[arg(long)]
    pub write: bool,

    /// Write the report to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Skip malformed data rows instead of aborting
    #[arg(long)]
    pub skip_invalid_rows: bool,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.energy-report/last_used.json`.
///
/// The report type is never persisted: it needs per-run arguments such as
/// `--month` or `--start` that are not saved either.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".energy-report").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with an explicit argument
    /// list and config path.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return settings.apply_debug_flag();
        }

        let last = LastUsedParams::load_from(config_path);

        // clap stores the arg id under the field name, not the flag spelling.
        if !is_arg_explicitly_set(&matches, "data_file") {
            if let Some(v) = last.data_file {
                settings.data_file = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "week_dir") {
            if let Some(v) = last.week_dir {
                settings.week_dir = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "year") {
            if let Some(v) = last.year {
                settings.year = v;
            }
        }

        settings = settings.apply_debug_flag();

        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// File the report should be written to, if any.
    ///
    /// `--output` wins; `--write` alone picks the report's default file.
    pub fn output_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.output {
            return Some(path.clone());
        }
        if !self.write {
            return None;
        }
        let name = if self.report == "weekly" {
            WEEKLY_OUTPUT_FILE
        } else {
            SUMMARY_OUTPUT_FILE
        };
        Some(PathBuf::from(name))
    }

    /// How malformed data rows are treated while loading.
    pub fn parse_policy(&self) -> ParsePolicy {
        if self.skip_invalid_rows {
            ParsePolicy::Skip
        } else {
            ParsePolicy::Abort
        }
    }

    fn apply_debug_flag(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data_file: Some(s.data_file.clone()),
            week_dir: Some(s.week_dir.clone()),
            year: Some(s.year),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
