//! Fixed-width text layout of the energy reports.
//!
//! Every function here takes already-aggregated numbers; the decimal comma is
//! applied through [`format_decimal`] at the very end.

use chrono::NaiveDate;

use crate::formatting::{fit_column, format_celsius, format_decimal, format_kwh};
use crate::time_utils::format_user_date;

/// Width of the day-name column in the weekly table.
pub const LABEL_WIDTH: usize = 11;
/// Width of the `dd.mm.yyyy` column in the weekly table.
pub const DATE_WIDTH: usize = 13;
/// Width of every value column in the weekly table.
pub const VALUE_WIDTH: usize = 8;

/// One line of the weekly table: day name, date, then one column per value.
///
/// No trailing newline is appended.
pub fn format_day_row(label: &str, date: NaiveDate, sums: &[f64]) -> String {
    let mut row = String::with_capacity(LABEL_WIDTH + DATE_WIDTH + sums.len() * VALUE_WIDTH);
    row.push_str(&fit_column(label, LABEL_WIDTH));
    row.push_str(&format!("{:<DATE_WIDTH$}", format_user_date(date)));
    for value in sums {
        row.push_str(&format!("{:<VALUE_WIDTH$}", format_decimal(*value, 2)));
    }
    row
}

/// Banner and column legend printed above each week's rows.
pub fn format_week_header(week_number: u32) -> String {
    let mut header = format!(
        "Week {} electricity consumption and production (kWh, by phase)\n\n",
        week_number
    );
    header.push_str("Day        Date         Consumption [kWh]               Production [kWh]\n");
    header.push_str("           (dd.mm.yyyy) v1      v2      v3              v1     v2     v3\n");
    header.push_str(&"-".repeat(75));
    header.push('\n');
    header
}

/// Summary block for one period.
///
/// The temperature line is only present when an average is supplied.
pub fn format_summary(
    period_label: &str,
    total_consumption: f64,
    total_production: f64,
    avg_temperature: Option<f64>,
) -> String {
    let mut msg = format!("Report for {}\n", period_label);
    msg.push_str(&format!("- Total consumption: {}\n", format_kwh(total_consumption)));
    msg.push_str(&format!("- Total production: {}\n", format_kwh(total_production)));
    if let Some(temp) = avg_temperature {
        msg.push_str(&format!("- Average temperature: {}\n", format_celsius(temp)));
    }
    msg
}

/// Body printed instead of a summary when nothing matched.
pub fn format_no_data(period_label: &str) -> String {
    format!("Report for {}\nNo data found.\n", period_label)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
