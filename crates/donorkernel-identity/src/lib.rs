//! # DonorKernel Identity
//!
//! Contribution record normalization and donor identity resolution.
//!
//! ## Kernels
//!
//! - `IdentityResolution` - single-pass greedy donor clustering
//!
//! ## Modules
//!
//! - [`normalize`] - canonicalization of raw text fields into comparable forms
//! - [`similarity`] - pluggable name-similarity strategies
//!
//! Resolution partitions a batch: every contribution record lands in exactly
//! one [`types::DonorIdentity`], and identity totals sum to the batch total.

#![warn(missing_docs)]

pub mod messages;
pub mod normalize;
pub mod resolve;
pub mod similarity;
pub mod types;

pub use resolve::IdentityResolution;
pub use similarity::{PrefixSimilarity, SimilarityStrategy};
pub use types::{ContributionRecord, DonorIdentity, NormalizedKey, RawContribution};

use crate::messages::{ResolveInput, ResolveOutput};
use donorkernel_core::registry::{BatchKernelEntry, KernelRegistry};
use donorkernel_core::traits::{Kernel, TypeErasedBatchKernel};
use std::sync::Arc;

/// Register all identity kernels.
pub fn register_all(registry: &KernelRegistry) -> donorkernel_core::Result<()> {
    tracing::info!("Registering identity kernels");
    registry.register_batch(BatchKernelEntry::new(
        IdentityResolution::new().metadata().clone(),
        || {
            Arc::new(TypeErasedBatchKernel::<_, ResolveInput, ResolveOutput>::new(
                IdentityResolution::new(),
            ))
        },
    ))?;
    Ok(())
}
