//! Temporal pattern detection.
//!
//! Three detectors over contribution timing, all keyed off resolved donor
//! identities:
//! - `TemporalAnomaly` - bursts denser than the donor's normal cadence
//! - `SameDayMultiple` - more than N contributions on one calendar date
//! - `RapidSequential` - runs of contributions on near-consecutive days

use crate::types::{AnalysisBatch, Pattern, PatternKind, Severity};
use chrono::NaiveDate;
use donorkernel_core::error::{AnalysisError, Result};
use donorkernel_core::traits::Kernel;
use donorkernel_core::{domain::Domain, kernel::KernelMetadata};
use donorkernel_identity::types::{ContributionRecord, DonorIdentity};
use std::collections::BTreeMap;

// ============================================================================
// Temporal Anomaly Kernel
// ============================================================================

/// Configuration for temporal anomaly detection.
#[derive(Debug, Clone)]
pub struct TemporalAnomalyConfig {
    /// Sliding window width in days.
    pub window_days: i64,
    /// Minimum contributions inside one window to qualify as a burst.
    pub min_burst: usize,
    /// Factor by which the window rate must exceed the donor's overall
    /// daily rate.
    pub density_ratio: f64,
}

impl Default for TemporalAnomalyConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            min_burst: 3,
            density_ratio: 3.0,
        }
    }
}

/// Temporal anomaly detector.
///
/// Slides a `window_days` window over a donor's dated contributions and
/// flags the densest window when it holds at least `min_burst` records and
/// its per-day rate exceeds the donor's overall rate by `density_ratio`.
/// A donor whose entire history fits one window has no cadence to deviate
/// from and is not flagged.
///
/// Severity rule: High when the burst holds at least twice `min_burst`
/// records, Medium otherwise. Confidence is `burst / (2 * min_burst)`,
/// capped at 1.0.
#[derive(Debug, Clone)]
pub struct TemporalAnomaly {
    metadata: KernelMetadata,
    config: TemporalAnomalyConfig,
}

impl Default for TemporalAnomaly {
    fn default() -> Self {
        Self::new()
    }
}

impl TemporalAnomaly {
    /// Create a detector with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TemporalAnomalyConfig::default())
    }

    /// Create a detector with a custom configuration.
    #[must_use]
    pub fn with_config(config: TemporalAnomalyConfig) -> Self {
        Self {
            metadata: KernelMetadata::new("fraud/temporal-anomaly", Domain::FraudDetection)
                .with_description("Contribution bursts denser than the donor's cadence"),
            config,
        }
    }

    /// Detect cadence anomalies across resolved identities.
    pub fn compute(identities: &[DonorIdentity], config: &TemporalAnomalyConfig) -> Vec<Pattern> {
        let mut patterns = Vec::new();

        for identity in identities {
            let mut dated: Vec<&ContributionRecord> =
                identity.records.iter().filter(|r| r.date.is_some()).collect();
            if dated.len() < config.min_burst {
                continue;
            }
            dated.sort_by_key(|r| r.date);

            let first = dated[0].date.unwrap_or_default();
            let last = dated[dated.len() - 1].date.unwrap_or_default();
            let span_days = (last - first).num_days().max(1);
            let base_rate = dated.len() as f64 / span_days as f64;

            // Densest window wins; one pattern per identity.
            let mut best: Option<Vec<&ContributionRecord>> = None;
            for (i, record) in dated.iter().enumerate() {
                let Some(start) = record.date else { continue };
                let window: Vec<&ContributionRecord> = dated[i..]
                    .iter()
                    .take_while(|r| {
                        r.date
                            .map(|d| (d - start).num_days() < config.window_days)
                            .unwrap_or(false)
                    })
                    .copied()
                    .collect();

                if window.len() >= best.as_ref().map_or(0, Vec::len).max(1) {
                    best = Some(window);
                }
            }

            let Some(burst) = best else { continue };
            let window_rate = burst.len() as f64 / config.window_days as f64;
            if burst.len() < config.min_burst || window_rate < config.density_ratio * base_rate {
                continue;
            }

            let total: f64 = burst.iter().map(|r| r.amount).sum();
            let severity = if burst.len() >= 2 * config.min_burst {
                Severity::High
            } else {
                Severity::Medium
            };
            let confidence = (burst.len() as f64 / (2 * config.min_burst) as f64).min(1.0);

            patterns.push(Pattern {
                kind: PatternKind::TemporalAnomaly,
                severity,
                confidence,
                total_amount: total,
                record_ids: burst.iter().map(|r| r.id.clone()).collect(),
                description: format!(
                    "{} contributions from {} within {} days, against a baseline of {:.2}/day",
                    burst.len(),
                    identity.canonical_name,
                    config.window_days,
                    base_rate
                ),
            });
        }

        patterns
    }
}

impl Kernel for TemporalAnomaly {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn validate(&self) -> Result<()> {
        if self.config.window_days <= 0 {
            return Err(AnalysisError::validation("window_days must be positive"));
        }
        if self.config.density_ratio <= 0.0 {
            return Err(AnalysisError::validation("density_ratio must be positive"));
        }
        Ok(())
    }
}

impl crate::detector::PatternDetector for TemporalAnomaly {
    fn kind(&self) -> PatternKind {
        PatternKind::TemporalAnomaly
    }

    fn detect(&self, batch: &AnalysisBatch) -> Result<Vec<Pattern>> {
        Ok(Self::compute(&batch.identities, &self.config))
    }
}

// ============================================================================
// Same-Day Multiple Kernel
// ============================================================================

/// Configuration for same-day multiple detection.
#[derive(Debug, Clone)]
pub struct SameDayMultipleConfig {
    /// Contributions per calendar date above which an identity is flagged.
    pub max_per_day: usize,
}

impl Default for SameDayMultipleConfig {
    fn default() -> Self {
        Self { max_per_day: 3 }
    }
}

/// Same-day multiple contribution detector.
///
/// Severity rule: High when a date holds at least twice `max_per_day`
/// contributions, Medium otherwise. Confidence is
/// `count / (2 * max_per_day)`, capped at 1.0.
#[derive(Debug, Clone)]
pub struct SameDayMultiple {
    metadata: KernelMetadata,
    config: SameDayMultipleConfig,
}

impl Default for SameDayMultiple {
    fn default() -> Self {
        Self::new()
    }
}

impl SameDayMultiple {
    /// Create a detector with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SameDayMultipleConfig::default())
    }

    /// Create a detector with a custom configuration.
    #[must_use]
    pub fn with_config(config: SameDayMultipleConfig) -> Self {
        Self {
            metadata: KernelMetadata::new("fraud/same-day-multiple", Domain::FraudDetection)
                .with_description("Donors with many contributions on one date"),
            config,
        }
    }

    /// Detect same-day multiples across resolved identities.
    pub fn compute(identities: &[DonorIdentity], config: &SameDayMultipleConfig) -> Vec<Pattern> {
        let mut patterns = Vec::new();

        for identity in identities {
            let mut by_date: BTreeMap<NaiveDate, Vec<&ContributionRecord>> = BTreeMap::new();
            for record in &identity.records {
                if let Some(date) = record.date {
                    by_date.entry(date).or_default().push(record);
                }
            }

            for (date, day_records) in by_date {
                if day_records.len() <= config.max_per_day {
                    continue;
                }

                let total: f64 = day_records.iter().map(|r| r.amount).sum();
                let severity = if day_records.len() >= 2 * config.max_per_day {
                    Severity::High
                } else {
                    Severity::Medium
                };
                let confidence =
                    (day_records.len() as f64 / (2 * config.max_per_day) as f64).min(1.0);

                patterns.push(Pattern {
                    kind: PatternKind::SameDayMultiple,
                    severity,
                    confidence,
                    total_amount: total,
                    record_ids: day_records.iter().map(|r| r.id.clone()).collect(),
                    description: format!(
                        "{} contributions from {} on {}",
                        day_records.len(),
                        identity.canonical_name,
                        date
                    ),
                });
            }
        }

        patterns
    }
}

impl Kernel for SameDayMultiple {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn validate(&self) -> Result<()> {
        if self.config.max_per_day == 0 {
            return Err(AnalysisError::validation("max_per_day must be positive"));
        }
        Ok(())
    }
}

impl crate::detector::PatternDetector for SameDayMultiple {
    fn kind(&self) -> PatternKind {
        PatternKind::SameDayMultiple
    }

    fn detect(&self, batch: &AnalysisBatch) -> Result<Vec<Pattern>> {
        Ok(Self::compute(&batch.identities, &self.config))
    }
}

// ============================================================================
// Rapid Sequential Kernel
// ============================================================================

/// Configuration for rapid sequential detection.
#[derive(Debug, Clone)]
pub struct RapidSequentialConfig {
    /// Minimum run length to flag.
    pub min_run: usize,
    /// Maximum gap in days between consecutive contributions of a run.
    pub max_gap_days: i64,
    /// Run length at which severity escalates to High.
    pub high_severity_at: usize,
}

impl Default for RapidSequentialConfig {
    fn default() -> Self {
        Self {
            min_run: 3,
            max_gap_days: 2,
            high_severity_at: 5,
        }
    }
}

/// Rapid sequential contribution detector.
///
/// Flags the longest run of contributions from one donor where each dated
/// contribution follows the previous within `max_gap_days`. A run must span
/// at least two distinct dates; single-date pileups belong to
/// [`SameDayMultiple`].
///
/// Severity rule: High when the run reaches `high_severity_at`, Medium
/// otherwise. Confidence is `run_length / 8`, capped at 1.0.
#[derive(Debug, Clone)]
pub struct RapidSequential {
    metadata: KernelMetadata,
    config: RapidSequentialConfig,
}

impl Default for RapidSequential {
    fn default() -> Self {
        Self::new()
    }
}

impl RapidSequential {
    /// Create a detector with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RapidSequentialConfig::default())
    }

    /// Create a detector with a custom configuration.
    #[must_use]
    pub fn with_config(config: RapidSequentialConfig) -> Self {
        Self {
            metadata: KernelMetadata::new("fraud/rapid-sequential", Domain::FraudDetection)
                .with_description("Runs of contributions on near-consecutive days"),
            config,
        }
    }

    /// Detect rapid sequential runs across resolved identities.
    pub fn compute(identities: &[DonorIdentity], config: &RapidSequentialConfig) -> Vec<Pattern> {
        let mut patterns = Vec::new();

        for identity in identities {
            let mut dated: Vec<&ContributionRecord> =
                identity.records.iter().filter(|r| r.date.is_some()).collect();
            if dated.len() < config.min_run {
                continue;
            }
            dated.sort_by_key(|r| r.date);

            // Longest qualifying run wins; one pattern per identity.
            let mut best: Vec<&ContributionRecord> = Vec::new();
            let mut run: Vec<&ContributionRecord> = Vec::new();
            for record in dated {
                let extend = match (run.last().and_then(|r| r.date), record.date) {
                    (Some(prev), Some(next)) => (next - prev).num_days() <= config.max_gap_days,
                    _ => false,
                };
                if extend {
                    run.push(record);
                } else {
                    run = vec![record];
                }
                if Self::qualifies(&run, config) && run.len() > best.len() {
                    best = run.clone();
                }
            }

            if best.is_empty() {
                continue;
            }

            let total: f64 = best.iter().map(|r| r.amount).sum();
            let severity = if best.len() >= config.high_severity_at {
                Severity::High
            } else {
                Severity::Medium
            };
            let confidence = (best.len() as f64 / 8.0).min(1.0);

            patterns.push(Pattern {
                kind: PatternKind::RapidSequential,
                severity,
                confidence,
                total_amount: total,
                record_ids: best.iter().map(|r| r.id.clone()).collect(),
                description: format!(
                    "{} contributions from {} within {} days of each other",
                    best.len(),
                    identity.canonical_name,
                    config.max_gap_days
                ),
            });
        }

        patterns
    }

    /// A run qualifies at `min_run` records across two or more dates.
    fn qualifies(run: &[&ContributionRecord], config: &RapidSequentialConfig) -> bool {
        if run.len() < config.min_run {
            return false;
        }
        let mut dates: Vec<NaiveDate> = run.iter().filter_map(|r| r.date).collect();
        dates.dedup();
        dates.len() >= 2
    }
}

impl Kernel for RapidSequential {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn validate(&self) -> Result<()> {
        if self.config.min_run == 0 {
            return Err(AnalysisError::validation("min_run must be positive"));
        }
        if self.config.max_gap_days < 0 {
            return Err(AnalysisError::validation(
                "max_gap_days must be non-negative",
            ));
        }
        Ok(())
    }
}

impl crate::detector::PatternDetector for RapidSequential {
    fn kind(&self) -> PatternKind {
        PatternKind::RapidSequential
    }

    fn detect(&self, batch: &AnalysisBatch) -> Result<Vec<Pattern>> {
        Ok(Self::compute(&batch.identities, &self.config))
    }
}
