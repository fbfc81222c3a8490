//! Round-number amount detection.
//!
//! Flags donors whose contributions are exact multiples of a round unit at
//! a frequency above the donor population's baseline.

use crate::types::{AnalysisBatch, Pattern, PatternKind, Severity};
use donorkernel_core::error::{AnalysisError, Result};
use donorkernel_core::traits::Kernel;
use donorkernel_core::{domain::Domain, kernel::KernelMetadata};
use donorkernel_identity::types::{ContributionRecord, DonorIdentity};

/// Tolerance for the round-multiple remainder check.
const ROUND_EPSILON: f64 = 1e-6;

/// Configuration for round-number detection.
#[derive(Debug, Clone)]
pub struct RoundNumberConfig {
    /// Round unit; amounts that are exact multiples qualify.
    pub unit: f64,
    /// Minimum contribution count before a donor is considered.
    pub min_contributions: usize,
    /// The donor's round fraction must be at least this value.
    pub min_fraction: f64,
    /// The donor's round fraction must also exceed the population baseline
    /// by this factor.
    pub baseline_multiplier: f64,
}

impl Default for RoundNumberConfig {
    fn default() -> Self {
        Self {
            unit: 100.0,
            min_contributions: 4,
            min_fraction: 0.9,
            baseline_multiplier: 1.25,
        }
    }
}

/// Round-number pattern detector.
///
/// The population baseline is the fraction of all positive amounts in the
/// batch that are round multiples; a donor is flagged when their own round
/// fraction clears both `min_fraction` and `baseline_multiplier` times the
/// baseline.
///
/// Severity rule: Medium when the fraction is at least 0.95 over six or
/// more contributions, Low otherwise - round amounts alone are a weak
/// signal. Confidence is `(fraction - baseline) / (1 - baseline)`, clamped
/// to [0, 1]; a baseline of 1 yields confidence 0.
#[derive(Debug, Clone)]
pub struct RoundNumber {
    metadata: KernelMetadata,
    config: RoundNumberConfig,
}

impl Default for RoundNumber {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundNumber {
    /// Create a detector with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RoundNumberConfig::default())
    }

    /// Create a detector with a custom configuration.
    #[must_use]
    pub fn with_config(config: RoundNumberConfig) -> Self {
        Self {
            metadata: KernelMetadata::new("fraud/round-number", Domain::FraudDetection)
                .with_description("Round-amount frequency above the population baseline"),
            config,
        }
    }

    /// Detect round-number donors against the population baseline.
    pub fn compute(
        records: &[ContributionRecord],
        identities: &[DonorIdentity],
        config: &RoundNumberConfig,
    ) -> Vec<Pattern> {
        let positive: Vec<f64> = records
            .iter()
            .map(|r| r.amount)
            .filter(|a| *a > 0.0)
            .collect();
        if positive.is_empty() {
            return Vec::new();
        }

        let round_count = positive
            .iter()
            .filter(|a| Self::is_round(**a, config.unit))
            .count();
        let baseline = round_count as f64 / positive.len() as f64;

        let mut patterns = Vec::new();
        for identity in identities {
            let donor_positive: Vec<&ContributionRecord> = identity
                .records
                .iter()
                .filter(|r| r.amount > 0.0)
                .collect();
            if donor_positive.len() < config.min_contributions {
                continue;
            }

            let round: Vec<&&ContributionRecord> = donor_positive
                .iter()
                .filter(|r| Self::is_round(r.amount, config.unit))
                .collect();
            let fraction = round.len() as f64 / donor_positive.len() as f64;

            if fraction < config.min_fraction || fraction < baseline * config.baseline_multiplier {
                continue;
            }

            let confidence = if baseline >= 1.0 {
                0.0
            } else {
                ((fraction - baseline) / (1.0 - baseline)).clamp(0.0, 1.0)
            };
            let severity = if fraction >= 0.95 && donor_positive.len() >= 6 {
                Severity::Medium
            } else {
                Severity::Low
            };
            let total: f64 = round.iter().map(|r| r.amount).sum();

            patterns.push(Pattern {
                kind: PatternKind::RoundNumberPattern,
                severity,
                confidence,
                total_amount: total,
                record_ids: round.iter().map(|r| r.id.clone()).collect(),
                description: format!(
                    "{:.0}% of {} contributions from {} are ${:.0} multiples (population baseline {:.0}%)",
                    fraction * 100.0,
                    donor_positive.len(),
                    identity.canonical_name,
                    config.unit,
                    baseline * 100.0
                ),
            });
        }

        patterns
    }

    /// Whether an amount is an exact multiple of the unit.
    fn is_round(amount: f64, unit: f64) -> bool {
        let remainder = (amount % unit).abs();
        remainder < ROUND_EPSILON || (unit - remainder).abs() < ROUND_EPSILON
    }
}

impl Kernel for RoundNumber {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn validate(&self) -> Result<()> {
        if self.config.unit <= 0.0 {
            return Err(AnalysisError::validation("unit must be positive"));
        }
        if !(0.0..=1.0).contains(&self.config.min_fraction) {
            return Err(AnalysisError::validation(
                "min_fraction must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

impl crate::detector::PatternDetector for RoundNumber {
    fn kind(&self) -> PatternKind {
        PatternKind::RoundNumberPattern
    }

    fn detect(&self, batch: &AnalysisBatch) -> Result<Vec<Pattern>> {
        Ok(Self::compute(&batch.records, &batch.identities, &self.config))
    }
}
