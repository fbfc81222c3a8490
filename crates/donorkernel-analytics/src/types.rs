//! Aggregation types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record field used as a rollup grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    /// Group by normalized city.
    City,
    /// Group by two-letter state code.
    State,
    /// Group by normalized employer.
    Employer,
    /// Group by normalized occupation.
    Occupation,
}

impl GroupField {
    /// Returns the field name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            GroupField::City => "city",
            GroupField::State => "state",
            GroupField::Employer => "employer",
            GroupField::Occupation => "occupation",
        }
    }
}

impl fmt::Display for GroupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Velocity granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Records per day.
    Day,
    /// Records per week.
    Week,
}

/// One point on a cumulative-total series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// Calendar date of the point.
    pub date: NaiveDate,
    /// Running total through this date.
    pub running_total: f64,
}

/// Distribution bucket labels, in ascending amount order.
///
/// Buckets are half-open on the lower bound and exclusive on the upper:
/// a value exactly at a boundary belongs to the higher bucket.
pub const BUCKET_LABELS: [&str; 7] = [
    "$0-50",
    "$50-100",
    "$100-200",
    "$200-500",
    "$500-1000",
    "$1000-2700",
    "$2700+",
];

/// Upper bounds of the finite distribution buckets.
pub(crate) const BUCKET_BOUNDS: [f64; 6] = [50.0, 100.0, 200.0, 500.0, 1000.0, 2700.0];
