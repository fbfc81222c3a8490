//! Message types for aggregation kernels.

use crate::types::{CumulativePoint, Granularity, GroupField};
use chrono::NaiveDate;
use donorkernel_identity::types::ContributionRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Date rollup input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRollupInput {
    /// Records to total.
    pub records: Vec<ContributionRecord>,
}

/// Date rollup output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRollupOutput {
    /// Amount totals per date.
    pub totals: BTreeMap<NaiveDate, f64>,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}

/// Field rollup input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRollupInput {
    /// Records to total.
    pub records: Vec<ContributionRecord>,
    /// Grouping field.
    pub field: GroupField,
}

/// Field rollup output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRollupOutput {
    /// Amount totals per normalized field value.
    pub totals: HashMap<String, f64>,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}

/// Amount distribution input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionInput {
    /// Amounts to bucket.
    pub amounts: Vec<f64>,
}

/// Amount distribution output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionOutput {
    /// Counts per bucket label; every label is present.
    pub buckets: HashMap<String, usize>,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}

/// Velocity input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityInput {
    /// Records to rate.
    pub records: Vec<ContributionRecord>,
    /// Velocity granularity.
    pub granularity: Granularity,
}

/// Velocity output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityOutput {
    /// Dated records per granularity unit.
    pub velocity: f64,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}

/// Cumulative totals input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CumulativeInput {
    /// Records to accumulate.
    pub records: Vec<ContributionRecord>,
}

/// Cumulative totals output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CumulativeOutput {
    /// Running totals in ascending date order.
    pub points: Vec<CumulativePoint>,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}
