//! Aggregation kernels.
//!
//! Pure reductions over contribution batches: rollups by date and field,
//! the fixed-bucket amount distribution, contribution velocity, and
//! cumulative running totals.

use crate::messages::{
    CumulativeInput, CumulativeOutput, DateRollupInput, DateRollupOutput, DistributionInput,
    DistributionOutput, FieldRollupInput, FieldRollupOutput, VelocityInput, VelocityOutput,
};
use crate::types::{CumulativePoint, Granularity, GroupField, BUCKET_BOUNDS, BUCKET_LABELS};
use async_trait::async_trait;
use chrono::NaiveDate;
use donorkernel_core::error::Result;
use donorkernel_core::traits::{BatchKernel, Kernel};
use donorkernel_core::{domain::Domain, kernel::KernelMetadata};
use donorkernel_identity::normalize;
use donorkernel_identity::types::ContributionRecord;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

// ============================================================================
// Date Rollup Kernel
// ============================================================================

/// Totals contributions by calendar date, skipping undated records.
#[derive(Debug, Clone)]
pub struct DateRollup {
    metadata: KernelMetadata,
}

impl Default for DateRollup {
    fn default() -> Self {
        Self::new()
    }
}

impl DateRollup {
    /// Create a new date rollup kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::new("analytics/date-rollup", Domain::Aggregation)
                .with_description("Contribution totals by calendar date"),
        }
    }

    /// Total amounts per date. Undated records are skipped.
    pub fn compute(records: &[ContributionRecord]) -> BTreeMap<NaiveDate, f64> {
        let mut totals = BTreeMap::new();
        for record in records {
            if let Some(date) = record.date {
                *totals.entry(date).or_insert(0.0) += record.amount;
            }
        }
        totals
    }
}

impl Kernel for DateRollup {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchKernel<DateRollupInput, DateRollupOutput> for DateRollup {
    async fn execute(&self, input: DateRollupInput) -> Result<DateRollupOutput> {
        let start = Instant::now();
        let totals = Self::compute(&input.records);
        Ok(DateRollupOutput {
            totals,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}

// ============================================================================
// Field Rollup Kernel
// ============================================================================

/// Totals contributions by a normalized field value, skipping records whose
/// value is empty.
#[derive(Debug, Clone)]
pub struct FieldRollup {
    metadata: KernelMetadata,
}

impl Default for FieldRollup {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRollup {
    /// Create a new field rollup kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::new("analytics/field-rollup", Domain::Aggregation)
                .with_description("Contribution totals grouped by a normalized field"),
        }
    }

    /// Total amounts per normalized field value.
    pub fn compute(records: &[ContributionRecord], field: GroupField) -> HashMap<String, f64> {
        let mut totals: HashMap<String, f64> = HashMap::new();
        for record in records {
            let key = Self::group_key(record, field);
            if key.is_empty() {
                continue;
            }
            *totals.entry(key).or_insert(0.0) += record.amount;
        }
        totals
    }

    /// Normalized grouping key for a record, empty when the field is absent.
    fn group_key(record: &ContributionRecord, field: GroupField) -> String {
        let key = normalize::normalize(record);
        match field {
            GroupField::City => key.city,
            GroupField::State => key.state.unwrap_or_default(),
            GroupField::Employer => key.employer,
            GroupField::Occupation => key.occupation,
        }
    }
}

impl Kernel for FieldRollup {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchKernel<FieldRollupInput, FieldRollupOutput> for FieldRollup {
    async fn execute(&self, input: FieldRollupInput) -> Result<FieldRollupOutput> {
        let start = Instant::now();
        let totals = Self::compute(&input.records, input.field);
        Ok(FieldRollupOutput {
            totals,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}

// ============================================================================
// Amount Distribution Kernel
// ============================================================================

/// Counts amounts into the fixed ascending buckets.
#[derive(Debug, Clone)]
pub struct AmountDistribution {
    metadata: KernelMetadata,
}

impl Default for AmountDistribution {
    fn default() -> Self {
        Self::new()
    }
}

impl AmountDistribution {
    /// Create a new amount distribution kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::new("analytics/amount-distribution", Domain::Aggregation)
                .with_description("Fixed-bucket contribution amount histogram"),
        }
    }

    /// Bucket counts for the given amounts.
    ///
    /// Every amount lands in exactly one bucket: the cascade compares with
    /// strict `<`, so a value exactly at a boundary belongs to the higher
    /// bucket and anything below $50 (refunds included) lands in the first.
    /// All seven labels are always present.
    pub fn compute(amounts: &[f64]) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> = BUCKET_LABELS
            .iter()
            .map(|label| ((*label).to_string(), 0))
            .collect();

        for &amount in amounts {
            let label = Self::bucket_label(amount);
            *counts.entry(label.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Bucket counts over a record batch.
    pub fn from_records(records: &[ContributionRecord]) -> HashMap<String, usize> {
        let amounts: Vec<f64> = records.iter().map(|r| r.amount).collect();
        Self::compute(&amounts)
    }

    /// Label of the bucket an amount falls into.
    #[must_use]
    pub fn bucket_label(amount: f64) -> &'static str {
        for (idx, bound) in BUCKET_BOUNDS.iter().enumerate() {
            if amount < *bound {
                return BUCKET_LABELS[idx];
            }
        }
        BUCKET_LABELS[6]
    }
}

impl Kernel for AmountDistribution {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchKernel<DistributionInput, DistributionOutput> for AmountDistribution {
    async fn execute(&self, input: DistributionInput) -> Result<DistributionOutput> {
        let start = Instant::now();
        let buckets = Self::compute(&input.amounts);
        Ok(DistributionOutput {
            buckets,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}

// ============================================================================
// Contribution Velocity Kernel
// ============================================================================

/// Contribution velocity: dated records per unit of time.
#[derive(Debug, Clone)]
pub struct ContributionVelocity {
    metadata: KernelMetadata,
}

impl Default for ContributionVelocity {
    fn default() -> Self {
        Self::new()
    }
}

impl ContributionVelocity {
    /// Create a new velocity kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::new("analytics/velocity", Domain::Aggregation)
                .with_description("Contribution rate over the dated span"),
        }
    }

    /// Dated-record count divided by the span between the earliest and
    /// latest dated record, in the given granularity. The span is floored
    /// at one unit, so single-date batches divide by 1 rather than 0.
    pub fn compute(records: &[ContributionRecord], granularity: Granularity) -> f64 {
        let dates: Vec<NaiveDate> = records.iter().filter_map(|r| r.date).collect();
        if dates.is_empty() {
            return 0.0;
        }

        let first = dates.iter().min().copied().unwrap_or_default();
        let last = dates.iter().max().copied().unwrap_or_default();
        let span_days = (last - first).num_days();

        let units = match granularity {
            Granularity::Day => span_days,
            Granularity::Week => span_days / 7,
        }
        .max(1);

        dates.len() as f64 / units as f64
    }
}

impl Kernel for ContributionVelocity {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchKernel<VelocityInput, VelocityOutput> for ContributionVelocity {
    async fn execute(&self, input: VelocityInput) -> Result<VelocityOutput> {
        let start = Instant::now();
        let velocity = Self::compute(&input.records, input.granularity);
        Ok(VelocityOutput {
            velocity,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}

// ============================================================================
// Cumulative Totals Kernel
// ============================================================================

/// Running totals ordered by date, one point per distinct date.
#[derive(Debug, Clone)]
pub struct CumulativeTotals {
    metadata: KernelMetadata,
}

impl Default for CumulativeTotals {
    fn default() -> Self {
        Self::new()
    }
}

impl CumulativeTotals {
    /// Create a new cumulative totals kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::new("analytics/cumulative-totals", Domain::Aggregation)
                .with_description("Running contribution totals by date"),
        }
    }

    /// Ascending `(date, running_total)` points. The date sort is stable,
    /// ties broken by input order; same-date records merge into one point.
    /// Undated records are skipped.
    pub fn compute(records: &[ContributionRecord]) -> Vec<CumulativePoint> {
        let mut dated: Vec<(NaiveDate, f64)> = records
            .iter()
            .filter_map(|r| r.date.map(|d| (d, r.amount)))
            .collect();
        dated.sort_by_key(|(date, _)| *date);

        let mut points: Vec<CumulativePoint> = Vec::new();
        let mut running = 0.0;
        for (date, amount) in dated {
            running += amount;
            match points.last_mut() {
                Some(point) if point.date == date => point.running_total = running,
                _ => points.push(CumulativePoint {
                    date,
                    running_total: running,
                }),
            }
        }
        points
    }
}

impl Kernel for CumulativeTotals {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchKernel<CumulativeInput, CumulativeOutput> for CumulativeTotals {
    async fn execute(&self, input: CumulativeInput) -> Result<CumulativeOutput> {
        let start = Instant::now();
        let points = Self::compute(&input.records);
        Ok(CumulativeOutput {
            points,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}
