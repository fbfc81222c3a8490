//! # DonorKernel Fraud
//!
//! Fraud-pattern detectors, composite risk scoring, and the analysis
//! pipeline.
//!
//! ## Detectors
//!
//! - `ThresholdClustering` - contribution clusters just under a reporting threshold
//! - `NameVariationFraud` - similar-name groups inside the threshold window
//! - `TemporalAnomaly` - bursts denser than the donor's cadence
//! - `RoundNumber` - round amounts above the population baseline
//! - `SameDayMultiple` - many contributions on one calendar date
//! - `CoordinatedContributions` - matched amounts across one employer's donors
//! - `RapidSequential` - runs on near-consecutive days
//!
//! ## Pipeline
//!
//! [`pipeline::FraudAnalysis`] resolves identities, fork-joins the detector
//! set over one immutable batch snapshot, isolates per-detector failures,
//! and scores the merged findings with [`scoring::RiskScoring`].

#![warn(missing_docs)]

pub mod amounts;
pub mod coordination;
pub mod detector;
pub mod messages;
pub mod pipeline;
pub mod scoring;
pub mod smurfing;
pub mod temporal;
pub mod threshold;
pub mod types;

#[cfg(test)]
mod testutil;

pub use amounts::RoundNumber;
pub use coordination::CoordinatedContributions;
pub use detector::{default_detectors, PatternDetector};
pub use pipeline::FraudAnalysis;
pub use scoring::RiskScoring;
pub use smurfing::NameVariationFraud;
pub use temporal::{RapidSequential, SameDayMultiple, TemporalAnomaly};
pub use threshold::ThresholdClustering;
pub use types::{AnalysisBatch, AnalysisResult, Pattern, PatternKind, Severity};

use crate::messages::{AnalysisInput, AnalysisOutput};
use donorkernel_core::registry::{BatchKernelEntry, KernelRegistry};
use donorkernel_core::traits::{Kernel, TypeErasedBatchKernel};
use std::sync::Arc;

/// Register all fraud kernels.
pub fn register_all(registry: &KernelRegistry) -> donorkernel_core::Result<()> {
    registry.register_batch(BatchKernelEntry::new(
        FraudAnalysis::new().metadata().clone(),
        || {
            Arc::new(TypeErasedBatchKernel::<_, AnalysisInput, AnalysisOutput>::new(
                FraudAnalysis::new(),
            ))
        },
    ))?;
    Ok(())
}
