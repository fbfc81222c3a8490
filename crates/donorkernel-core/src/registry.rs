//! Kernel registry.
//!
//! The registry manages all registered kernels and provides lookup and
//! type-erased execution by kernel id. It is the seam an external
//! presentation or reporting layer dispatches through.

use crate::domain::Domain;
use crate::error::{AnalysisError, Result};
use crate::kernel::KernelMetadata;
use crate::traits::BatchKernelDyn;
use hashbrown::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Registry statistics.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    /// Total number of registered kernels.
    pub total: usize,
    /// Kernels by domain.
    pub by_domain: HashMap<Domain, usize>,
}

/// Entry for a batch kernel in the registry.
#[derive(Clone)]
pub struct BatchKernelEntry {
    /// Kernel metadata.
    pub metadata: KernelMetadata,
    /// Factory function to create the kernel.
    factory: Arc<dyn Fn() -> Arc<dyn BatchKernelDyn> + Send + Sync>,
}

impl BatchKernelEntry {
    /// Create a new batch kernel entry.
    pub fn new<F>(metadata: KernelMetadata, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn BatchKernelDyn> + Send + Sync + 'static,
    {
        Self {
            metadata,
            factory: Arc::new(factory),
        }
    }

    /// Create an instance of the kernel.
    #[must_use]
    pub fn create(&self) -> Arc<dyn BatchKernelDyn> {
        (self.factory)()
    }
}

impl std::fmt::Debug for BatchKernelEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchKernelEntry")
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Central registry for all kernels.
#[derive(Debug, Default)]
pub struct KernelRegistry {
    /// Batch kernel entries by ID.
    batch_kernels: RwLock<HashMap<String, BatchKernelEntry>>,
}

impl KernelRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            batch_kernels: RwLock::new(HashMap::new()),
        }
    }

    /// Register a batch kernel.
    pub fn register_batch(&self, entry: BatchKernelEntry) -> Result<()> {
        let id = entry.metadata.id.clone();
        let mut kernels = self.batch_kernels.write().unwrap();

        if kernels.contains_key(&id) {
            return Err(AnalysisError::KernelAlreadyRegistered(id));
        }

        debug!(kernel = %id, domain = %entry.metadata.domain, "registered batch kernel");
        kernels.insert(id, entry);
        Ok(())
    }

    /// Look up a batch kernel entry by ID.
    #[must_use]
    pub fn get_batch(&self, id: &str) -> Option<BatchKernelEntry> {
        self.batch_kernels.read().unwrap().get(id).cloned()
    }

    /// Returns true if a kernel with the given ID is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.batch_kernels.read().unwrap().contains_key(id)
    }

    /// List metadata for all registered kernels, sorted by ID.
    #[must_use]
    pub fn list(&self) -> Vec<KernelMetadata> {
        let kernels = self.batch_kernels.read().unwrap();
        let mut metadata: Vec<KernelMetadata> =
            kernels.values().map(|e| e.metadata.clone()).collect();
        metadata.sort_by(|a, b| a.id.cmp(&b.id));
        metadata
    }

    /// List metadata for kernels in the given domain, sorted by ID.
    #[must_use]
    pub fn by_domain(&self, domain: Domain) -> Vec<KernelMetadata> {
        let kernels = self.batch_kernels.read().unwrap();
        let mut metadata: Vec<KernelMetadata> = kernels
            .values()
            .filter(|e| e.metadata.domain == domain)
            .map(|e| e.metadata.clone())
            .collect();
        metadata.sort_by(|a, b| a.id.cmp(&b.id));
        metadata
    }

    /// Registry statistics.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let kernels = self.batch_kernels.read().unwrap();
        let mut by_domain: HashMap<Domain, usize> = HashMap::new();
        for entry in kernels.values() {
            *by_domain.entry(entry.metadata.domain).or_default() += 1;
        }
        RegistryStats {
            total: kernels.len(),
            by_domain,
        }
    }

    /// Execute a registered kernel by ID with a JSON-encoded input.
    ///
    /// Instantiates the kernel via its factory and dispatches through the
    /// type-erased interface; the output is the kernel's JSON-encoded result.
    pub async fn execute(&self, id: &str, input: &[u8]) -> Result<Vec<u8>> {
        let entry = self
            .get_batch(id)
            .ok_or_else(|| AnalysisError::not_found(id))?;

        info!(kernel = %id, bytes = input.len(), "dispatching kernel");
        let kernel = entry.create();
        kernel.validate()?;
        kernel.execute_dyn(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{BatchKernel, Kernel, TypeErasedBatchKernel};
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};

    #[derive(Debug)]
    struct Echo {
        metadata: KernelMetadata,
    }

    impl Echo {
        fn new() -> Self {
            Self {
                metadata: KernelMetadata::new("core/echo", Domain::Core)
                    .with_description("Echo test kernel"),
            }
        }
    }

    impl Kernel for Echo {
        fn metadata(&self) -> &KernelMetadata {
            &self.metadata
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct EchoPayload {
        message: String,
    }

    #[async_trait]
    impl BatchKernel<EchoPayload, EchoPayload> for Echo {
        async fn execute(&self, input: EchoPayload) -> Result<EchoPayload> {
            Ok(input)
        }
    }

    fn echo_entry() -> BatchKernelEntry {
        BatchKernelEntry::new(Echo::new().metadata().clone(), || {
            Arc::new(TypeErasedBatchKernel::<_, EchoPayload, EchoPayload>::new(
                Echo::new(),
            ))
        })
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = KernelRegistry::new();
        registry.register_batch(echo_entry()).unwrap();

        assert!(registry.contains("core/echo"));
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.by_domain(Domain::Core).len(), 1);
        assert_eq!(registry.by_domain(Domain::FraudDetection).len(), 0);
        assert_eq!(registry.stats().total, 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = KernelRegistry::new();
        registry.register_batch(echo_entry()).unwrap();
        let err = registry.register_batch(echo_entry()).unwrap_err();
        assert!(matches!(err, AnalysisError::KernelAlreadyRegistered(_)));
    }

    #[tokio::test]
    async fn test_execute_by_id() {
        let registry = KernelRegistry::new();
        registry.register_batch(echo_entry()).unwrap();

        let out = registry
            .execute("core/echo", b"{\"message\": \"hi\"}")
            .await
            .unwrap();
        let parsed: EchoPayload = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.message, "hi");
    }

    #[tokio::test]
    async fn test_execute_unknown_kernel() {
        let registry = KernelRegistry::new();
        let err = registry.execute("core/missing", b"{}").await.unwrap_err();
        assert!(matches!(err, AnalysisError::KernelNotFound(_)));
    }
}
