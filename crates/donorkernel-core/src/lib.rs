//! # DonorKernel Core
//!
//! Core framework for the DonorKernels analysis library: kernel metadata,
//! execution traits, the kernel registry, and the shared error taxonomy.
//!
//! Every analysis kernel in the workspace follows the same shape:
//! a struct carrying [`kernel::KernelMetadata`], a pure static `compute`
//! function over an immutable input batch, and a [`traits::BatchKernel`]
//! implementation that wraps `compute` for async callers. Kernels are
//! registered into a [`registry::KernelRegistry`] behind a type-erased
//! JSON interface so the presentation layer can dispatch by kernel id
//! without compile-time knowledge of input/output types.

#![warn(missing_docs)]

pub mod domain;
pub mod error;
pub mod kernel;
pub mod registry;
pub mod traits;

pub use domain::Domain;
pub use error::{AnalysisError, Result};
pub use kernel::KernelMetadata;
pub use registry::KernelRegistry;
pub use traits::{BatchKernel, BatchKernelDyn, Kernel, TypeErasedBatchKernel};
