//! Calendar aggregation of meter records.
//!
//! Every public operation is one call to a single reduce-over-filter driver
//! parameterised by a [`CalendarFilter`].

use chrono::{Datelike, NaiveDate};

use energy_core::time_utils::{check_month, days_inclusive, format_user_date, weekday_name};
use energy_core::{AggregateResult, DatasetVariant, Record, ReportError, Result, UnitScale};

// ── CalendarFilter ────────────────────────────────────────────────────────────

/// Calendar predicate selecting the records of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarFilter {
    /// Exactly one calendar date.
    Day(NaiveDate),
    /// Inclusive date range.
    Range { start: NaiveDate, end: NaiveDate },
    /// One month of one year.
    Month { year: i32, month: u32 },
    /// One calendar year.
    Year(i32),
}

impl CalendarFilter {
    /// Build a range filter, rejecting `end < start`.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ReportError::InvalidRange { start, end });
        }
        Ok(CalendarFilter::Range { start, end })
    }

    /// Build a month filter, rejecting months outside `1..=12`.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let month = check_month(month)?;
        Ok(CalendarFilter::Month { year, month })
    }

    /// Whether a record dated `date` belongs to the period.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            CalendarFilter::Day(day) => date == day,
            CalendarFilter::Range { start, end } => start <= date && date <= end,
            CalendarFilter::Month { year, month } => date.year() == year && date.month() == month,
            CalendarFilter::Year(year) => date.year() == year,
        }
    }

    /// Label used as the period name in reports.
    pub fn label(&self) -> String {
        match *self {
            CalendarFilter::Day(day) => weekday_name(day).to_string(),
            CalendarFilter::Range { start, end } => format!(
                "the period {}-{}",
                format_user_date(start),
                format_user_date(end)
            ),
            CalendarFilter::Month { year, month } => format!("the month: {:02}.{}", month, year),
            CalendarFilter::Year(year) => format!("the year: {}", year),
        }
    }
}

// ── RecordAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that reduces records by calendar period.
pub struct RecordAggregator;

impl RecordAggregator {
    /// Sum the records dated exactly `day`. The label is the weekday name.
    pub fn aggregate_by_day(records: &[Record], day: NaiveDate, scale: UnitScale) -> AggregateResult {
        Self::aggregate(records, &CalendarFilter::Day(day), scale)
    }

    /// Sum the records dated within `[start_day, end_day]`.
    pub fn aggregate_by_range(
        records: &[Record],
        start_day: NaiveDate,
        end_day: NaiveDate,
        scale: UnitScale,
    ) -> Result<AggregateResult> {
        let filter = CalendarFilter::range(start_day, end_day)?;
        Ok(Self::aggregate(records, &filter, scale))
    }

    /// Sum the records of `month` in `year`.
    pub fn aggregate_by_month(
        records: &[Record],
        year: i32,
        month: u32,
        scale: UnitScale,
    ) -> Result<AggregateResult> {
        let filter = CalendarFilter::month(year, month)?;
        Ok(Self::aggregate(records, &filter, scale))
    }

    /// Sum the records of `year`.
    pub fn aggregate_by_year(records: &[Record], year: i32, scale: UnitScale) -> AggregateResult {
        Self::aggregate(records, &CalendarFilter::Year(year), scale)
    }

    /// One day result per date of `[start, end]`, days without data included.
    pub fn aggregate_days(
        records: &[Record],
        start: NaiveDate,
        end: NaiveDate,
        scale: UnitScale,
    ) -> Result<Vec<AggregateResult>> {
        CalendarFilter::range(start, end)?;
        Ok(days_inclusive(start, end)
            .into_iter()
            .map(|day| Self::aggregate_by_day(records, day, scale))
            .collect())
    }

    /// Generic aggregation driver.
    ///
    /// Field sums are built in one pass and wrapped into the result at the
    /// end. With no records at all the sums are empty.
    ///
    /// The layout is recognised from the record arity; `scale` only divides
    /// its consumption and production fields. Records of an unknown layout
    /// have every field scaled.
    pub fn aggregate(records: &[Record], filter: &CalendarFilter, scale: UnitScale) -> AggregateResult {
        let arity = records.first().map_or(0, |r| r.values.len());
        let scaled: Vec<bool> = match DatasetVariant::from_arity(arity) {
            Some(variant) => (0..arity).map(|i| variant.is_energy_field(i)).collect(),
            None => vec![true; arity],
        };

        let (matched_count, sums) = records
            .iter()
            .filter(|record| filter.matches(record.date()))
            .fold((0usize, vec![0.0; arity]), |(count, mut sums), record| {
                for ((sum, value), &energy) in sums.iter_mut().zip(&record.values).zip(&scaled) {
                    *sum += if energy { scale.apply(*value) } else { *value };
                }
                (count + 1, sums)
            });

        AggregateResult::new(filter.label(), matched_count, sums)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
