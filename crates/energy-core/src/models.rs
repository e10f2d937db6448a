use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Column layout of a meter data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetVariant {
    /// Weekly files: three consumption phases then three production phases,
    /// integer watt-hours.
    Phases,
    /// Yearly file: consumption (kWh), production (kWh), temperature (°C),
    /// written with a decimal comma.
    Hourly,
}

impl DatasetVariant {
    /// Layout with `arity` numeric fields, if any.
    pub fn from_arity(arity: usize) -> Option<Self> {
        match arity {
            6 => Some(DatasetVariant::Phases),
            3 => Some(DatasetVariant::Hourly),
            _ => None,
        }
    }

    /// Number of numeric fields following the timestamp.
    pub fn arity(self) -> usize {
        match self {
            DatasetVariant::Phases => 6,
            DatasetVariant::Hourly => 3,
        }
    }

    /// Indices of the consumption fields within [`Record::values`].
    pub fn consumption_fields(self) -> &'static [usize] {
        match self {
            DatasetVariant::Phases => &[0, 1, 2],
            DatasetVariant::Hourly => &[0],
        }
    }

    /// Indices of the production fields within [`Record::values`].
    pub fn production_fields(self) -> &'static [usize] {
        match self {
            DatasetVariant::Phases => &[3, 4, 5],
            DatasetVariant::Hourly => &[1],
        }
    }

    /// Index of the temperature field, if the variant records one.
    pub fn temperature_field(self) -> Option<usize> {
        match self {
            DatasetVariant::Phases => None,
            DatasetVariant::Hourly => Some(2),
        }
    }

    /// Whether `field` holds consumption or production, the fields a
    /// [`UnitScale`] converts.
    pub fn is_energy_field(self, field: usize) -> bool {
        self.consumption_fields().contains(&field) || self.production_fields().contains(&field)
    }

    /// Scale that turns the stored units into kWh.
    pub fn default_scale(self) -> UnitScale {
        match self {
            DatasetVariant::Phases => UnitScale::WH_TO_KWH,
            DatasetVariant::Hourly => UnitScale::IDENTITY,
        }
    }

    /// Whether values are stored as whole numbers.
    pub fn is_integral(self) -> bool {
        matches!(self, DatasetVariant::Phases)
    }
}

/// What the loader does with a row it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Stop loading and report the offending line.
    #[default]
    Abort,
    /// Log the row and continue with the next one.
    Skip,
}

/// Divisor applied to the consumption and production values while summing.
///
/// Temperature readings are never scaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitScale {
    divisor: f64,
}

impl UnitScale {
    /// Values are summed as stored.
    pub const IDENTITY: UnitScale = UnitScale { divisor: 1.0 };
    /// Watt-hours reported as kilowatt-hours.
    pub const WH_TO_KWH: UnitScale = UnitScale { divisor: 1000.0 };

    /// Build a scale from an arbitrary divisor.
    ///
    /// Returns `None` unless `divisor` is finite and strictly positive.
    pub fn new(divisor: f64) -> Option<Self> {
        (divisor.is_finite() && divisor > 0.0).then_some(Self { divisor })
    }

    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    pub fn apply(&self, value: f64) -> f64 {
        value / self.divisor
    }
}

/// One timestamped row of meter readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Wall-clock time of the reading.
    pub timestamp: NaiveDateTime,
    /// Numeric fields in file order; length is the variant's arity.
    pub values: Vec<f64>,
}

impl Record {
    pub fn new(timestamp: NaiveDateTime, values: Vec<f64>) -> Self {
        Self { timestamp, values }
    }

    /// Calendar date of the reading.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Sums of every value field over the records matching one calendar filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Human label of the period, e.g. a weekday name or `"the year: 2025"`.
    pub label: String,
    /// Number of records that matched.
    pub matched_count: usize,
    /// Per-field sums, same arity as the input values.
    pub sums: Vec<f64>,
}

impl AggregateResult {
    pub fn new(label: impl Into<String>, matched_count: usize, sums: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            matched_count,
            sums,
        }
    }

    /// `true` when no record matched.
    pub fn is_empty(&self) -> bool {
        self.matched_count == 0
    }

    /// Sum of the given fields' sums. Out-of-range indices count as zero.
    pub fn sum_of(&self, fields: &[usize]) -> f64 {
        fields
            .iter()
            .filter_map(|&i| self.sums.get(i))
            .sum()
    }

    /// Mean of one field over the matched records.
    ///
    /// Fails with [`ReportError::NoData`] when nothing matched.
    pub fn mean(&self, field: usize) -> Result<f64> {
        if self.is_empty() {
            return Err(ReportError::NoData(self.label.clone()));
        }
        let sum = self.sums.get(field).copied().unwrap_or(0.0);
        Ok(sum / self.matched_count as f64)
    }
}
