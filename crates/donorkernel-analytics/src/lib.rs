//! # DonorKernel Analytics
//!
//! Aggregation kernels over contribution batches.
//!
//! ## Kernels
//!
//! - `DateRollup` - totals by calendar date
//! - `FieldRollup` - totals by normalized field value
//! - `AmountDistribution` - fixed-bucket amount histogram
//! - `ContributionVelocity` - records per day/week over the dated span
//! - `CumulativeTotals` - running totals ordered by date
//!
//! Every kernel is a side-effect-free reduction: empty input yields an
//! empty or zero result, never an error.

#![warn(missing_docs)]

pub mod aggregate;
pub mod messages;
pub mod types;

pub use aggregate::{
    AmountDistribution, ContributionVelocity, CumulativeTotals, DateRollup, FieldRollup,
};
pub use types::{CumulativePoint, Granularity, GroupField, BUCKET_LABELS};

use crate::messages::{
    CumulativeInput, CumulativeOutput, DateRollupInput, DateRollupOutput, DistributionInput,
    DistributionOutput, FieldRollupInput, FieldRollupOutput, VelocityInput, VelocityOutput,
};
use donorkernel_core::registry::{BatchKernelEntry, KernelRegistry};
use donorkernel_core::traits::{Kernel, TypeErasedBatchKernel};
use std::sync::Arc;

/// Register all aggregation kernels.
pub fn register_all(registry: &KernelRegistry) -> donorkernel_core::Result<()> {
    registry.register_batch(BatchKernelEntry::new(
        DateRollup::new().metadata().clone(),
        || {
            Arc::new(TypeErasedBatchKernel::<_, DateRollupInput, DateRollupOutput>::new(
                DateRollup::new(),
            ))
        },
    ))?;
    registry.register_batch(BatchKernelEntry::new(
        FieldRollup::new().metadata().clone(),
        || {
            Arc::new(TypeErasedBatchKernel::<_, FieldRollupInput, FieldRollupOutput>::new(
                FieldRollup::new(),
            ))
        },
    ))?;
    registry.register_batch(BatchKernelEntry::new(
        AmountDistribution::new().metadata().clone(),
        || {
            Arc::new(TypeErasedBatchKernel::<_, DistributionInput, DistributionOutput>::new(
                AmountDistribution::new(),
            ))
        },
    ))?;
    registry.register_batch(BatchKernelEntry::new(
        ContributionVelocity::new().metadata().clone(),
        || {
            Arc::new(TypeErasedBatchKernel::<_, VelocityInput, VelocityOutput>::new(
                ContributionVelocity::new(),
            ))
        },
    ))?;
    registry.register_batch(BatchKernelEntry::new(
        CumulativeTotals::new().metadata().clone(),
        || {
            Arc::new(TypeErasedBatchKernel::<_, CumulativeInput, CumulativeOutput>::new(
                CumulativeTotals::new(),
            ))
        },
    ))?;
    Ok(())
}
