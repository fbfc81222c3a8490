//! Message types for identity kernels.

use crate::types::{ContributionRecord, DonorIdentity};
use serde::{Deserialize, Serialize};

/// Identity resolution input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveInput {
    /// Contribution records to cluster, in input order.
    pub records: Vec<ContributionRecord>,
}

impl ResolveInput {
    /// Create a new resolution input.
    pub fn new(records: Vec<ContributionRecord>) -> Self {
        Self { records }
    }
}

/// Identity resolution output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveOutput {
    /// Resolved donor identities, in cluster-creation order.
    pub identities: Vec<DonorIdentity>,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}
