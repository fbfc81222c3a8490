//! Name-variation (smurfing) detection.
//!
//! Groups raw records by name similarity inside the threshold window,
//! without requiring prior identity resolution. This catches structuring
//! through name variants in cases where resolution confidence was low.

use crate::types::{AnalysisBatch, Pattern, PatternKind, Severity};
use donorkernel_core::error::{AnalysisError, Result};
use donorkernel_core::traits::Kernel;
use donorkernel_core::{domain::Domain, kernel::KernelMetadata};
use donorkernel_identity::similarity::{match_key, PrefixSimilarity, SimilarityStrategy};
use donorkernel_identity::types::ContributionRecord;

/// Configuration for name-variation detection.
#[derive(Debug, Clone)]
pub struct NameVariationConfig {
    /// Reporting threshold the window sits under.
    pub threshold: f64,
    /// Window width: amounts in `[threshold - window, threshold)` qualify.
    pub window: f64,
    /// Minimum qualifying records for a similarity group to be flagged.
    pub min_group: usize,
    /// Record count at which severity escalates to High.
    pub high_severity_at: usize,
}

impl Default for NameVariationConfig {
    fn default() -> Self {
        Self {
            threshold: 200.0,
            window: 10.0,
            min_group: 3,
            high_severity_at: 5,
        }
    }
}

/// Name-variation fraud detector.
///
/// Uses the same prefix-substring heuristic as the identity resolver, but
/// over raw records restricted to the threshold window. A group qualifies
/// with `min_group` or more records spanning at least two distinct name
/// spellings (a single exact spelling is the resolver's full-confidence
/// case, not a name-variation signal).
///
/// Severity rule: High when the group holds `high_severity_at` or more
/// records, Medium otherwise. Confidence scales with the number of distinct
/// spellings (`variants / 5`), capped at 1.0.
#[derive(Debug, Clone)]
pub struct NameVariationFraud {
    metadata: KernelMetadata,
    config: NameVariationConfig,
}

impl Default for NameVariationFraud {
    fn default() -> Self {
        Self::new()
    }
}

impl NameVariationFraud {
    /// Create a detector with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(NameVariationConfig::default())
    }

    /// Create a detector with a custom configuration.
    #[must_use]
    pub fn with_config(config: NameVariationConfig) -> Self {
        Self {
            metadata: KernelMetadata::new("fraud/name-variation", Domain::FraudDetection)
                .with_description("Similar-name groups contributing inside the threshold window"),
            config,
        }
    }

    /// Detect name-variation groups in the threshold window.
    pub fn compute(records: &[ContributionRecord], config: &NameVariationConfig) -> Vec<Pattern> {
        let lower = config.threshold - config.window;
        let strategy = PrefixSimilarity::default();

        // Greedy grouping over window records, first similar key wins -
        // the same fold the resolver runs, minus identity construction.
        let mut groups: Vec<(String, Vec<&ContributionRecord>)> = Vec::new();
        for record in records {
            if record.amount < lower || record.amount >= config.threshold {
                continue;
            }
            let key = match_key(&record.contributor_name);
            if key.is_empty() {
                continue;
            }

            match groups
                .iter_mut()
                .find(|(existing, _)| strategy.similar(existing, &key))
            {
                Some((_, members)) => members.push(record),
                None => groups.push((key, vec![record])),
            }
        }

        let mut patterns = Vec::new();
        for (_, members) in groups {
            if members.len() < config.min_group {
                continue;
            }

            let mut variants: Vec<&str> = Vec::new();
            for member in &members {
                if !variants.contains(&member.contributor_name.as_str()) {
                    variants.push(&member.contributor_name);
                }
            }
            if variants.len() < 2 {
                continue;
            }

            let total: f64 = members.iter().map(|r| r.amount).sum();
            let severity = if members.len() >= config.high_severity_at {
                Severity::High
            } else {
                Severity::Medium
            };
            let confidence = (variants.len() as f64 / 5.0).min(1.0);

            patterns.push(Pattern {
                kind: PatternKind::NameVariationFraud,
                severity,
                confidence,
                total_amount: total,
                record_ids: members.iter().map(|r| r.id.clone()).collect(),
                description: format!(
                    "{} contributions under {} name variants of \"{}\" inside the ${:.2}-${:.2} window",
                    members.len(),
                    variants.len(),
                    variants[0],
                    lower,
                    config.threshold
                ),
            });
        }

        patterns
    }
}

impl Kernel for NameVariationFraud {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn validate(&self) -> Result<()> {
        if self.config.threshold <= 0.0 {
            return Err(AnalysisError::validation("threshold must be positive"));
        }
        if self.config.window < 0.0 {
            return Err(AnalysisError::validation("window must be non-negative"));
        }
        Ok(())
    }
}

impl crate::detector::PatternDetector for NameVariationFraud {
    fn kind(&self) -> PatternKind {
        PatternKind::NameVariationFraud
    }

    fn requires_identities(&self) -> bool {
        false
    }

    fn detect(&self, batch: &AnalysisBatch) -> Result<Vec<Pattern>> {
        Ok(Self::compute(&batch.records, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::record;

    #[test]
    fn test_flags_variant_group_in_window() {
        let records = vec![
            record("1", "Jon A Smith", 195.0, "2024-01-01"),
            record("2", "JON A. SMITH", 196.0, "2024-01-03"),
            record("3", "Jonathan Smith", 198.0, "2024-01-05"),
        ];

        let patterns = NameVariationFraud::compute(&records, &NameVariationConfig::default());
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].kind, PatternKind::NameVariationFraud);
        assert_eq!(patterns[0].severity, Severity::Medium);
        assert_eq!(patterns[0].record_ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_identical_spellings_not_flagged() {
        let records = vec![
            record("1", "Jon A Smith", 195.0, "2024-01-01"),
            record("2", "Jon A Smith", 196.0, "2024-01-03"),
            record("3", "Jon A Smith", 198.0, "2024-01-05"),
        ];

        let patterns = NameVariationFraud::compute(&records, &NameVariationConfig::default());
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_records_outside_window_ignored() {
        let records = vec![
            record("1", "Jon A Smith", 50.0, "2024-01-01"),
            record("2", "JON A. SMITH", 120.0, "2024-01-03"),
            record("3", "Jonathan Smith", 400.0, "2024-01-05"),
        ];

        let patterns = NameVariationFraud::compute(&records, &NameVariationConfig::default());
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_unrelated_names_stay_separate() {
        let records = vec![
            record("1", "Jon A Smith", 195.0, "2024-01-01"),
            record("2", "Maria Garcia", 196.0, "2024-01-02"),
            record("3", "Wei Chen", 197.0, "2024-01-03"),
        ];

        let patterns = NameVariationFraud::compute(&records, &NameVariationConfig::default());
        assert!(patterns.is_empty());
    }
}
