//! Message types for the fraud analysis pipeline.

use crate::types::AnalysisResult;
use donorkernel_identity::types::ContributionRecord;
use serde::{Deserialize, Serialize};

/// Fraud analysis input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Contribution records for the requested scope, in input order.
    pub records: Vec<ContributionRecord>,
    /// Whether to resolve donor identities before detection. Detectors that
    /// key off identities are skipped when disabled.
    #[serde(default = "default_resolve")]
    pub resolve_identities: bool,
}

fn default_resolve() -> bool {
    true
}

impl AnalysisInput {
    /// Create an input with identity resolution enabled.
    pub fn new(records: Vec<ContributionRecord>) -> Self {
        Self {
            records,
            resolve_identities: true,
        }
    }

    /// Disable identity resolution for this invocation.
    #[must_use]
    pub fn without_resolution(mut self) -> Self {
        self.resolve_identities = false;
        self
    }
}

/// Fraud analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// The analysis result.
    pub result: AnalysisResult,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}
