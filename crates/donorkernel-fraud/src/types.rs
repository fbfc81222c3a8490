//! Fraud detection types.

use donorkernel_identity::types::{ContributionRecord, DonorIdentity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Pattern Types
// ============================================================================

/// Fraud pattern categories.
///
/// Each detector produces exactly one kind; detectors never share or mutate
/// each other's findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Repeated contributions just under a reporting threshold, grouped by
    /// resolved donor identity.
    ThresholdClustering,
    /// Name-variant groups contributing inside the threshold window without
    /// requiring prior identity resolution.
    NameVariationFraud,
    /// Contribution timing denser than the donor's normal cadence.
    TemporalAnomaly,
    /// Round-number amounts at a frequency above the population baseline.
    RoundNumberPattern,
    /// More than the allowed number of contributions on one calendar date.
    SameDayMultiple,
    /// Distinct donors sharing an employer contributing near-identical
    /// amounts within a short window.
    CoordinatedContributions,
    /// A run of contributions on consecutive or near-consecutive days.
    RapidSequential,
}

impl PatternKind {
    /// Returns the pattern kind as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PatternKind::ThresholdClustering => "threshold_clustering",
            PatternKind::NameVariationFraud => "name_variation_fraud",
            PatternKind::TemporalAnomaly => "temporal_anomaly",
            PatternKind::RoundNumberPattern => "round_number_pattern",
            PatternKind::SameDayMultiple => "same_day_multiple",
            PatternKind::CoordinatedContributions => "coordinated_contributions",
            PatternKind::RapidSequential => "rapid_sequential",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Low severity.
    Low,
    /// Medium severity.
    Medium,
    /// High severity.
    High,
}

/// A detected fraud pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    /// Pattern category.
    pub kind: PatternKind,
    /// Severity, derived from the detector's documented rule.
    pub severity: Severity,
    /// Detector confidence in [0, 1]. Exactly 0 and exactly 1 are valid
    /// values, not missing markers.
    pub confidence: f64,
    /// Total amount implicated by the pattern.
    pub total_amount: f64,
    /// IDs of the affected contribution records, in input order.
    pub record_ids: Vec<String>,
    /// Human-readable description of the finding.
    pub description: String,
}

/// Diagnostic attached when a detector fails.
///
/// A failed detector contributes zero findings; siblings are unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorDiagnostic {
    /// Kernel id of the failing detector.
    pub detector: String,
    /// Failure description.
    pub message: String,
}

/// Result of a full fraud analysis pass.
///
/// Derived value, recomputed per request; never incrementally updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Composite risk score in [0, 100].
    pub risk_score: f64,
    /// Detected patterns, in detector-registration order.
    pub patterns: Vec<Pattern>,
    /// Whether identity resolution was used as the basis for detection.
    pub identity_resolved: bool,
    /// Number of resolved identities when resolution ran.
    pub identity_count: usize,
    /// Per-detector failure diagnostics.
    pub diagnostics: Vec<DetectorDiagnostic>,
}

impl AnalysisResult {
    /// Well-defined result for an empty batch.
    #[must_use]
    pub fn empty(identity_resolved: bool) -> Self {
        Self {
            risk_score: 0.0,
            patterns: Vec::new(),
            identity_resolved,
            identity_count: 0,
            diagnostics: Vec::new(),
        }
    }
}

// ============================================================================
// Analysis Batch
// ============================================================================

/// Immutable input snapshot shared by the detectors of one pipeline
/// invocation.
///
/// All intermediate state is scoped to the invocation that built the batch;
/// abandoning the invocation drops the batch without touching concurrently
/// running unrelated batches.
#[derive(Debug, Clone)]
pub struct AnalysisBatch {
    /// Contribution records, in input order.
    pub records: Arc<Vec<ContributionRecord>>,
    /// Resolved donor identities; empty when resolution was not requested.
    pub identities: Arc<Vec<DonorIdentity>>,
}

impl AnalysisBatch {
    /// Create a batch from records and resolved identities.
    #[must_use]
    pub fn new(records: Vec<ContributionRecord>, identities: Vec<DonorIdentity>) -> Self {
        Self {
            records: Arc::new(records),
            identities: Arc::new(identities),
        }
    }

    /// Sum of all record amounts.
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        self.records.iter().map(|r| r.amount).sum()
    }
}
