//! Composite risk scoring.
//!
//! Combines detector findings into a single bounded score.

use crate::types::{Pattern, Severity};
use donorkernel_core::traits::Kernel;
use donorkernel_core::{domain::Domain, kernel::KernelMetadata};

/// Severity base weights.
const HIGH_WEIGHT: f64 = 25.0;
const MEDIUM_WEIGHT: f64 = 15.0;
const LOW_WEIGHT: f64 = 8.0;

/// Weight of the implicated-amount fraction.
const AMOUNT_WEIGHT: f64 = 30.0;

/// Risk scoring kernel.
///
/// The score is the sum of per-pattern severity weights (High 25,
/// Medium 15, Low 8) plus 30 times the implicated fraction of the batch
/// total, saturating at 100. Both terms are additive and non-negative, so
/// the score is monotonically non-decreasing in the number of high-severity
/// patterns and in the implicated fraction; an empty pattern list scores 0.
#[derive(Debug, Clone)]
pub struct RiskScoring {
    metadata: KernelMetadata,
}

impl Default for RiskScoring {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskScoring {
    /// Create a new risk scoring kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::new("fraud/risk-scoring", Domain::FraudDetection)
                .with_description("Composite 0-100 risk score over detected patterns"),
        }
    }

    /// Score a pattern list against the batch's total contribution amount.
    ///
    /// The implicated fraction is the capped sum of pattern amounts over the
    /// total; a non-positive total contributes nothing.
    pub fn compute(patterns: &[Pattern], total_amount: f64) -> f64 {
        if patterns.is_empty() {
            return 0.0;
        }

        let severity_points: f64 = patterns
            .iter()
            .map(|p| match p.severity {
                Severity::High => HIGH_WEIGHT,
                Severity::Medium => MEDIUM_WEIGHT,
                Severity::Low => LOW_WEIGHT,
            })
            .sum();

        let implicated: f64 = patterns.iter().map(|p| p.total_amount.max(0.0)).sum();
        let fraction = if total_amount > 0.0 {
            (implicated / total_amount).min(1.0)
        } else {
            0.0
        };

        (severity_points + AMOUNT_WEIGHT * fraction).min(100.0)
    }
}

impl Kernel for RiskScoring {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PatternKind;

    fn pattern(severity: Severity, amount: f64) -> Pattern {
        Pattern {
            kind: PatternKind::ThresholdClustering,
            severity,
            confidence: 0.5,
            total_amount: amount,
            record_ids: vec!["1".into()],
            description: String::new(),
        }
    }

    #[test]
    fn test_empty_pattern_list_scores_zero() {
        assert_eq!(RiskScoring::compute(&[], 10_000.0), 0.0);
        assert_eq!(RiskScoring::compute(&[], 0.0), 0.0);
    }

    #[test]
    fn test_score_bounded() {
        let patterns: Vec<Pattern> = (0..20).map(|_| pattern(Severity::High, 1000.0)).collect();
        let score = RiskScoring::compute(&patterns, 1000.0);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_monotone_in_high_severity_count() {
        let total = 100_000.0;
        let mut patterns = vec![pattern(Severity::Medium, 500.0)];
        let before = RiskScoring::compute(&patterns, total);
        patterns.push(pattern(Severity::High, 500.0));
        let after = RiskScoring::compute(&patterns, total);
        assert!(after >= before);
    }

    #[test]
    fn test_doubling_implicated_amount_never_decreases() {
        let total = 100_000.0;
        let base = vec![pattern(Severity::Medium, 1000.0)];
        let doubled = vec![pattern(Severity::Medium, 2000.0)];
        assert!(RiskScoring::compute(&doubled, total) >= RiskScoring::compute(&base, total));
    }

    #[test]
    fn test_zero_total_uses_severity_only() {
        let patterns = vec![pattern(Severity::Low, 100.0)];
        assert_eq!(RiskScoring::compute(&patterns, 0.0), 8.0);
    }

    #[test]
    fn test_severity_weights() {
        let total = 1_000_000.0; // fraction negligible but nonzero
        let high = RiskScoring::compute(&[pattern(Severity::High, 0.0)], total);
        let medium = RiskScoring::compute(&[pattern(Severity::Medium, 0.0)], total);
        let low = RiskScoring::compute(&[pattern(Severity::Low, 0.0)], total);
        assert_eq!(high, 25.0);
        assert_eq!(medium, 15.0);
        assert_eq!(low, 8.0);
    }
}
