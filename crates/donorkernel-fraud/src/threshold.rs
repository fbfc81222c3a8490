//! Threshold clustering detection.
//!
//! Flags repeated contributions whose amount falls in a window just under
//! a legal reporting threshold, grouped by resolved donor identity.

use crate::types::{AnalysisBatch, Pattern, PatternKind, Severity};
use donorkernel_core::error::{AnalysisError, Result};
use donorkernel_core::traits::Kernel;
use donorkernel_core::{domain::Domain, kernel::KernelMetadata};
use donorkernel_identity::types::DonorIdentity;

/// Configuration for threshold clustering.
#[derive(Debug, Clone)]
pub struct ThresholdClusteringConfig {
    /// Reporting threshold the window sits under. $200 is the itemization
    /// threshold for campaign contributions.
    pub threshold: f64,
    /// Window width: amounts in `[threshold - window, threshold)` qualify.
    pub window: f64,
    /// Minimum qualifying contributions for a group to be flagged.
    pub min_cluster: usize,
    /// Group size at which severity escalates to High.
    pub high_severity_at: usize,
}

impl Default for ThresholdClusteringConfig {
    fn default() -> Self {
        Self {
            threshold: 200.0,
            window: 10.0,
            min_cluster: 3,
            high_severity_at: 5,
        }
    }
}

/// Threshold clustering detector.
///
/// Severity rule: High when a group holds `high_severity_at` or more
/// qualifying contributions, Medium otherwise. Confidence scales with group
/// size (`count / 10`), capped at 1.0.
#[derive(Debug, Clone)]
pub struct ThresholdClustering {
    metadata: KernelMetadata,
    config: ThresholdClusteringConfig,
}

impl Default for ThresholdClustering {
    fn default() -> Self {
        Self::new()
    }
}

impl ThresholdClustering {
    /// Create a detector with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ThresholdClusteringConfig::default())
    }

    /// Create a detector with a custom configuration.
    #[must_use]
    pub fn with_config(config: ThresholdClusteringConfig) -> Self {
        Self {
            metadata: KernelMetadata::new("fraud/threshold-clustering", Domain::FraudDetection)
                .with_description("Contribution clusters just under a reporting threshold"),
            config,
        }
    }

    /// Detect threshold clusters across resolved identities.
    pub fn compute(
        identities: &[DonorIdentity],
        config: &ThresholdClusteringConfig,
    ) -> Vec<Pattern> {
        let lower = config.threshold - config.window;
        let mut patterns = Vec::new();

        for identity in identities {
            let in_window: Vec<_> = identity
                .records
                .iter()
                .filter(|r| r.amount >= lower && r.amount < config.threshold)
                .collect();

            if in_window.len() < config.min_cluster {
                continue;
            }

            let total: f64 = in_window.iter().map(|r| r.amount).sum();
            let severity = if in_window.len() >= config.high_severity_at {
                Severity::High
            } else {
                Severity::Medium
            };
            let confidence = (in_window.len() as f64 / 10.0).min(1.0);

            patterns.push(Pattern {
                kind: PatternKind::ThresholdClustering,
                severity,
                confidence,
                total_amount: total,
                record_ids: in_window.iter().map(|r| r.id.clone()).collect(),
                description: format!(
                    "{} contributions from {} between ${:.2} and ${:.2}, just under the ${:.2} reporting threshold",
                    in_window.len(),
                    identity.canonical_name,
                    lower,
                    config.threshold,
                    config.threshold
                ),
            });
        }

        patterns
    }
}

impl Kernel for ThresholdClustering {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn validate(&self) -> Result<()> {
        if self.config.threshold <= 0.0 {
            return Err(AnalysisError::validation(
                "threshold must be positive",
            ));
        }
        if self.config.window < 0.0 {
            return Err(AnalysisError::validation("window must be non-negative"));
        }
        Ok(())
    }
}

impl crate::detector::PatternDetector for ThresholdClustering {
    fn kind(&self) -> PatternKind {
        PatternKind::ThresholdClustering
    }

    fn detect(&self, batch: &AnalysisBatch) -> Result<Vec<Pattern>> {
        Ok(Self::compute(&batch.identities, &self.config))
    }
}
