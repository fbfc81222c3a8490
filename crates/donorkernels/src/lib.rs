//! # DonorKernels
//!
//! Analysis kernels for campaign-contribution data: donor deduplication
//! through identity resolution, aggregation rollups for dashboards, and
//! fraud-pattern detection with a composite risk score.
//!
//! The core is a pure, synchronous batch computation over one immutable
//! input snapshot. An external data-access collaborator supplies the
//! records; an external presentation layer consumes the results. Nothing
//! here paginates, caches, refetches, or renders.
//!
//! ## Kernel Catalog
//!
//! | Kernel | Domain | Description |
//! |--------|--------|-------------|
//! | `identity/resolution` | IdentityResolution | Greedy donor clustering |
//! | `analytics/date-rollup` | Aggregation | Totals by calendar date |
//! | `analytics/field-rollup` | Aggregation | Totals by normalized field |
//! | `analytics/amount-distribution` | Aggregation | Fixed-bucket histogram |
//! | `analytics/velocity` | Aggregation | Records per day/week |
//! | `analytics/cumulative-totals` | Aggregation | Running totals by date |
//! | `fraud/analysis` | FraudDetection | Full detector pipeline + risk score |
//!
//! The seven fraud detectors run inside `fraud/analysis` and are also
//! independently invocable through their own types.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use donorkernels::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let records: Vec<ContributionRecord> =
//!         raw_rows.iter().map(ContributionRecord::from).collect();
//!
//!     let pipeline = FraudAnalysis::new();
//!     let result = pipeline.analyze(records, true).await?;
//!     println!("risk score: {}", result.risk_score);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub use donorkernel_analytics as analytics;
pub use donorkernel_core as core;
pub use donorkernel_fraud as fraud;
pub use donorkernel_identity as identity;

use donorkernel_core::registry::KernelRegistry;

/// Commonly used types and traits.
pub mod prelude {
    pub use donorkernel_analytics::{
        AmountDistribution, ContributionVelocity, CumulativeTotals, DateRollup, FieldRollup,
        Granularity, GroupField,
    };
    pub use donorkernel_core::{
        AnalysisError, BatchKernel, Domain, Kernel, KernelMetadata, KernelRegistry, Result,
    };
    pub use donorkernel_fraud::{
        AnalysisResult, FraudAnalysis, Pattern, PatternDetector, PatternKind, RiskScoring,
        Severity,
    };
    pub use donorkernel_identity::{
        ContributionRecord, DonorIdentity, IdentityResolution, NormalizedKey, PrefixSimilarity,
        RawContribution, SimilarityStrategy,
    };
}

/// Register every kernel in the workspace.
pub fn register_all(registry: &KernelRegistry) -> donorkernel_core::Result<()> {
    tracing::info!("Registering all DonorKernels kernels");
    donorkernel_identity::register_all(registry)?;
    donorkernel_analytics::register_all(registry)?;
    donorkernel_fraud::register_all(registry)?;
    Ok(())
}

/// Library version.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_populates_registry() {
        let registry = KernelRegistry::new();
        register_all(&registry).unwrap();

        let stats = registry.stats();
        assert_eq!(stats.total, 7);
        assert!(registry.contains("identity/resolution"));
        assert!(registry.contains("fraud/analysis"));
        assert!(registry.contains("analytics/amount-distribution"));
    }

    #[test]
    fn test_version_is_set() {
        assert!(!version().is_empty());
    }
}
