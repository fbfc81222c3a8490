//! Coordinated contribution detection.
//!
//! Flags groups of distinct donor identities sharing an employer that
//! contribute near-identical amounts within a short date window - the
//! classic straw-donor reimbursement shape.

use crate::types::{AnalysisBatch, Pattern, PatternKind, Severity};
use chrono::NaiveDate;
use donorkernel_core::error::{AnalysisError, Result};
use donorkernel_core::traits::Kernel;
use donorkernel_core::{domain::Domain, kernel::KernelMetadata};
use donorkernel_identity::normalize;
use donorkernel_identity::types::DonorIdentity;
use std::collections::{HashMap, HashSet};

/// Configuration for coordinated contribution detection.
#[derive(Debug, Clone)]
pub struct CoordinationConfig {
    /// Minimum distinct donor identities for a group to be flagged.
    pub min_donors: usize,
    /// Maximum spread in dollars between amounts of a coordinated group.
    pub amount_tolerance: f64,
    /// Maximum spread in days between contributions of a coordinated group.
    pub window_days: i64,
    /// Donor count at which severity escalates to High.
    pub high_severity_at: usize,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            min_donors: 3,
            amount_tolerance: 1.0,
            window_days: 3,
            high_severity_at: 5,
        }
    }
}

/// Coordinated contribution detector.
///
/// Groups identities by normalized employer, then scans each employer's
/// dated contributions for clusters whose amounts sit within
/// `amount_tolerance` and whose dates sit within `window_days`, counting
/// distinct donors per cluster. One pattern per employer: the cluster with
/// the most distinct donors wins.
///
/// Severity rule: High at `high_severity_at` or more donors, Medium
/// otherwise. Confidence is `donors / 8`, capped at 1.0.
#[derive(Debug, Clone)]
pub struct CoordinatedContributions {
    metadata: KernelMetadata,
    config: CoordinationConfig,
}

impl Default for CoordinatedContributions {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinatedContributions {
    /// Create a detector with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CoordinationConfig::default())
    }

    /// Create a detector with a custom configuration.
    #[must_use]
    pub fn with_config(config: CoordinationConfig) -> Self {
        Self {
            metadata: KernelMetadata::new("fraud/coordinated-contributions", Domain::FraudDetection)
                .with_description("Distinct donors with one employer giving matched amounts"),
            config,
        }
    }

    /// Detect coordinated groups across resolved identities.
    pub fn compute(identities: &[DonorIdentity], config: &CoordinationConfig) -> Vec<Pattern> {
        // (employer, donor index, record position, date, amount)
        struct Entry {
            donor: usize,
            record_id: String,
            date: NaiveDate,
            amount: f64,
        }

        let mut by_employer: HashMap<String, Vec<Entry>> = HashMap::new();
        for (donor, identity) in identities.iter().enumerate() {
            let employer = normalize::normalize_org(&identity.employer);
            if employer.is_empty() {
                continue;
            }
            for record in &identity.records {
                if let Some(date) = record.date {
                    by_employer.entry(employer.clone()).or_default().push(Entry {
                        donor,
                        record_id: record.id.clone(),
                        date,
                        amount: record.amount,
                    });
                }
            }
        }

        let mut employers: Vec<(String, Vec<Entry>)> = by_employer.into_iter().collect();
        employers.sort_by(|a, b| a.0.cmp(&b.0));

        let mut patterns = Vec::new();
        for (employer, mut entries) in employers {
            let donor_count = entries.iter().map(|e| e.donor).collect::<HashSet<_>>().len();
            if donor_count < config.min_donors {
                continue;
            }

            entries.sort_by(|a, b| {
                a.date
                    .cmp(&b.date)
                    .then(a.amount.partial_cmp(&b.amount).unwrap_or(std::cmp::Ordering::Equal))
            });

            // Anchor on each entry; collect matches inside both windows.
            let mut best: Vec<&Entry> = Vec::new();
            let mut best_donors = 0usize;
            for anchor in &entries {
                let cluster: Vec<&Entry> = entries
                    .iter()
                    .filter(|e| {
                        (e.date - anchor.date).num_days().abs() <= config.window_days
                            && (e.amount - anchor.amount).abs() <= config.amount_tolerance
                    })
                    .collect();
                let donors = cluster.iter().map(|e| e.donor).collect::<HashSet<_>>().len();
                if donors > best_donors {
                    best_donors = donors;
                    best = cluster;
                }
            }

            if best_donors < config.min_donors {
                continue;
            }

            let total: f64 = best.iter().map(|e| e.amount).sum();
            let severity = if best_donors >= config.high_severity_at {
                Severity::High
            } else {
                Severity::Medium
            };
            let confidence = (best_donors as f64 / 8.0).min(1.0);

            patterns.push(Pattern {
                kind: PatternKind::CoordinatedContributions,
                severity,
                confidence,
                total_amount: total,
                record_ids: best.iter().map(|e| e.record_id.clone()).collect(),
                description: format!(
                    "{} donors employed by \"{}\" gave within ${:.2} of each other inside {} days",
                    best_donors, employer, config.amount_tolerance, config.window_days
                ),
            });
        }

        patterns
    }
}

impl Kernel for CoordinatedContributions {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn validate(&self) -> Result<()> {
        if self.config.min_donors == 0 {
            return Err(AnalysisError::validation("min_donors must be positive"));
        }
        if self.config.amount_tolerance < 0.0 {
            return Err(AnalysisError::validation(
                "amount_tolerance must be non-negative",
            ));
        }
        if self.config.window_days < 0 {
            return Err(AnalysisError::validation(
                "window_days must be non-negative",
            ));
        }
        Ok(())
    }
}

impl crate::detector::PatternDetector for CoordinatedContributions {
    fn kind(&self) -> PatternKind {
        PatternKind::CoordinatedContributions
    }

    fn detect(&self, batch: &AnalysisBatch) -> Result<Vec<Pattern>> {
        Ok(Self::compute(&batch.identities, &self.config))
    }
}
