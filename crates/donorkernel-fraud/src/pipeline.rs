//! Fraud analysis pipeline.
//!
//! Resolves donor identities, fork-joins the pattern detectors over one
//! immutable batch snapshot, and scores the merged findings. All
//! intermediate state is scoped to the invocation: dropping the returned
//! future abandons in-flight detector tasks without touching concurrently
//! running batches.

use crate::detector::{default_detectors, PatternDetector};
use crate::messages::{AnalysisInput, AnalysisOutput};
use crate::scoring::RiskScoring;
use crate::types::{AnalysisBatch, AnalysisResult, DetectorDiagnostic, Pattern};
use async_trait::async_trait;
use donorkernel_core::error::Result;
use donorkernel_core::traits::{BatchKernel, Kernel};
use donorkernel_core::{domain::Domain, kernel::KernelMetadata};
use donorkernel_identity::resolve::IdentityResolution;
use donorkernel_identity::similarity::PrefixSimilarity;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Fraud analysis pipeline kernel.
///
/// Detectors run independently and order-insensitively; the merged pattern
/// list preserves detector-registration order so results are reproducible.
/// A failing detector contributes a diagnostic instead of aborting its
/// siblings.
#[derive(Debug, Clone)]
pub struct FraudAnalysis {
    metadata: KernelMetadata,
    detectors: Vec<Arc<dyn PatternDetector>>,
}

impl Default for FraudAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

impl FraudAnalysis {
    /// Create a pipeline with the default detector set.
    #[must_use]
    pub fn new() -> Self {
        Self::with_detectors(default_detectors())
    }

    /// Create a pipeline with a custom detector set.
    #[must_use]
    pub fn with_detectors(detectors: Vec<Arc<dyn PatternDetector>>) -> Self {
        Self {
            metadata: KernelMetadata::new("fraud/analysis", Domain::FraudDetection)
                .with_description("Identity resolution, fork-joined detectors, risk scoring"),
            detectors,
        }
    }

    /// The configured detectors, in registration order.
    #[must_use]
    pub fn detectors(&self) -> &[Arc<dyn PatternDetector>] {
        &self.detectors
    }

    /// Run the full analysis over a batch of records.
    ///
    /// Invalid detector configuration rejects here, before any processing
    /// begins. Empty input is not an error: it yields a zero result.
    pub async fn analyze(
        &self,
        records: Vec<donorkernel_identity::types::ContributionRecord>,
        resolve_identities: bool,
    ) -> Result<AnalysisResult> {
        for detector in &self.detectors {
            detector.validate()?;
        }

        if records.is_empty() {
            return Ok(AnalysisResult::empty(resolve_identities));
        }

        let identities = if resolve_identities {
            IdentityResolution::compute(&records, &PrefixSimilarity::default())
        } else {
            Vec::new()
        };
        let identity_count = identities.len();
        let batch = Arc::new(AnalysisBatch::new(records, identities));

        info!(
            records = batch.records.len(),
            identities = identity_count,
            detectors = self.detectors.len(),
            "running fraud analysis"
        );

        // Fork-join: one task per detector over the shared snapshot. The
        // JoinSet aborts outstanding tasks on drop, so an abandoned
        // invocation takes its in-flight work down with it.
        let mut tasks: JoinSet<(usize, Result<Vec<Pattern>>)> = JoinSet::new();
        for (index, detector) in self.detectors.iter().enumerate() {
            if detector.requires_identities() && !resolve_identities {
                debug!(detector = detector.id(), "skipped without identity resolution");
                continue;
            }
            let detector = Arc::clone(detector);
            let batch = Arc::clone(&batch);
            tasks.spawn(async move { (index, detector.detect(&batch)) });
        }

        let mut slots: Vec<Option<Result<Vec<Pattern>>>> =
            (0..self.detectors.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(join_error) => {
                    // A panicking detector is isolated like a failing one;
                    // the slot it owned stays empty and is reported below.
                    warn!(error = %join_error, "detector task did not complete");
                }
            }
        }

        let mut patterns = Vec::new();
        let mut diagnostics = Vec::new();
        for (index, slot) in slots.into_iter().enumerate() {
            let detector_id = self.detectors[index].id().to_string();
            match slot {
                Some(Ok(found)) => patterns.extend(found),
                Some(Err(error)) => {
                    warn!(detector = %detector_id, error = %error, "detector failed");
                    diagnostics.push(DetectorDiagnostic {
                        detector: detector_id,
                        message: error.to_string(),
                    });
                }
                None => {
                    let skipped =
                        self.detectors[index].requires_identities() && !resolve_identities;
                    if !skipped {
                        diagnostics.push(DetectorDiagnostic {
                            detector: detector_id,
                            message: "detector task did not complete".to_string(),
                        });
                    }
                }
            }
        }

        let risk_score = RiskScoring::compute(&patterns, batch.total_amount());

        Ok(AnalysisResult {
            risk_score,
            patterns,
            identity_resolved: resolve_identities,
            identity_count,
            diagnostics,
        })
    }
}

impl Kernel for FraudAnalysis {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn validate(&self) -> Result<()> {
        for detector in &self.detectors {
            detector.validate()?;
        }
        Ok(())
    }
}

#[async_trait]
impl BatchKernel<AnalysisInput, AnalysisOutput> for FraudAnalysis {
    async fn execute(&self, input: AnalysisInput) -> Result<AnalysisOutput> {
        let start = Instant::now();
        let result = self.analyze(input.records, input.resolve_identities).await?;
        Ok(AnalysisOutput {
            result,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::record;
    use crate::types::{PatternKind, Severity};
    use donorkernel_core::error::AnalysisError;
    use donorkernel_identity::types::ContributionRecord;

    #[tokio::test]
    async fn test_empty_batch_yields_zero_result() {
        let pipeline = FraudAnalysis::new();
        let result = pipeline.analyze(Vec::new(), true).await.unwrap();

        assert_eq!(result.risk_score, 0.0);
        assert!(result.patterns.is_empty());
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.identity_count, 0);
    }

    #[tokio::test]
    async fn test_structuring_scenario_end_to_end() {
        let records = vec![
            record("1", "Jon A Smith", 195.0, "2024-01-01"),
            record("2", "JON A. SMITH", 196.0, "2024-01-03"),
            record("3", "Jonathan Smith", 198.0, "2024-01-05"),
        ];

        let pipeline = FraudAnalysis::new();
        let result = pipeline.analyze(records, true).await.unwrap();

        assert!(result.identity_resolved);
        assert_eq!(result.identity_count, 1);
        assert!(result.risk_score > 0.0 && result.risk_score <= 100.0);

        let threshold: Vec<_> = result
            .patterns
            .iter()
            .filter(|p| p.kind == PatternKind::ThresholdClustering)
            .collect();
        assert_eq!(threshold.len(), 1);
        assert_eq!(threshold[0].severity, Severity::Medium);
        assert_eq!(threshold[0].total_amount, 589.0);
    }

    #[tokio::test]
    async fn test_identity_detectors_skipped_without_resolution() {
        let records = vec![
            record("1", "Jon A Smith", 195.0, "2024-01-01"),
            record("2", "JON A. SMITH", 196.0, "2024-01-03"),
            record("3", "Jonathan Smith", 198.0, "2024-01-05"),
        ];

        let pipeline = FraudAnalysis::new();
        let result = pipeline.analyze(records, false).await.unwrap();

        assert!(!result.identity_resolved);
        assert_eq!(result.identity_count, 0);
        // Identity-keyed detectors are skipped without diagnostics.
        assert!(result.diagnostics.is_empty());
        // The raw-record smurfing detector still fires.
        assert!(result
            .patterns
            .iter()
            .all(|p| p.kind == PatternKind::NameVariationFraud));
        assert!(!result.patterns.is_empty());
    }

    #[tokio::test]
    async fn test_failing_detector_is_isolated() {
        #[derive(Debug)]
        struct Exploding {
            metadata: KernelMetadata,
        }

        impl Kernel for Exploding {
            fn metadata(&self) -> &KernelMetadata {
                &self.metadata
            }
        }

        impl PatternDetector for Exploding {
            fn kind(&self) -> PatternKind {
                PatternKind::TemporalAnomaly
            }

            fn requires_identities(&self) -> bool {
                false
            }

            fn detect(&self, _batch: &AnalysisBatch) -> Result<Vec<Pattern>> {
                Err(AnalysisError::internal("synthetic failure"))
            }
        }

        let mut detectors = default_detectors();
        detectors.push(Arc::new(Exploding {
            metadata: KernelMetadata::new("fraud/exploding", Domain::FraudDetection),
        }));

        let records = vec![
            record("1", "Jon A Smith", 195.0, "2024-01-01"),
            record("2", "JON A. SMITH", 196.0, "2024-01-03"),
            record("3", "Jonathan Smith", 198.0, "2024-01-05"),
        ];

        let pipeline = FraudAnalysis::with_detectors(detectors);
        let result = pipeline.analyze(records, true).await.unwrap();

        // Siblings still produced their findings.
        assert!(!result.patterns.is_empty());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].detector, "fraud/exploding");
    }

    #[tokio::test]
    async fn test_invalid_config_rejects_before_processing() {
        let detectors: Vec<Arc<dyn PatternDetector>> = vec![Arc::new(
            crate::threshold::ThresholdClustering::with_config(
                crate::threshold::ThresholdClusteringConfig {
                    threshold: -5.0,
                    ..Default::default()
                },
            ),
        )];

        let pipeline = FraudAnalysis::with_detectors(detectors);
        let records = vec![record("1", "Jon A Smith", 195.0, "2024-01-01")];
        let err = pipeline.analyze(records, true).await.unwrap_err();
        assert!(matches!(err, AnalysisError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_quiet_batch_produces_no_patterns() {
        let records: Vec<ContributionRecord> = vec![
            record("1", "Maria Garcia", 35.0, "2024-01-10"),
            record("2", "Wei Chen", 410.0, "2024-02-20"),
            record("3", "Dana Lee", 87.0, "2024-04-02"),
        ];

        let pipeline = FraudAnalysis::new();
        let result = pipeline.analyze(records, true).await.unwrap();

        assert!(result.patterns.is_empty());
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.identity_count, 3);
    }
}
