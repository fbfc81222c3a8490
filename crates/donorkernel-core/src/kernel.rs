//! Kernel metadata.
//!
//! Every kernel carries a [`KernelMetadata`] describing its identity,
//! domain, and version for registry lookup and diagnostics.

use crate::domain::Domain;
use serde::{Deserialize, Serialize};

/// Kernel metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KernelMetadata {
    /// Unique kernel identifier (e.g., "identity/resolution").
    pub id: String,

    /// Analytical domain for organization.
    pub domain: Domain,

    /// Human-readable description.
    pub description: String,

    /// Version of the kernel implementation.
    pub version: u32,
}

impl KernelMetadata {
    /// Create new kernel metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, domain: Domain) -> Self {
        Self {
            id: id.into(),
            domain,
            description: String::new(),
            version: 1,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Returns the feature string used for registry grouping.
    ///
    /// Format: `Domain.KernelName` where KernelName is extracted from the ID.
    #[must_use]
    pub fn feature_string(&self) -> String {
        let name = self.id.rsplit('/').next().unwrap_or(&self.id);
        let name = to_pascal_case(name);
        format!("{}.{}", self.domain, name)
    }
}

impl Default for KernelMetadata {
    fn default() -> Self {
        Self::new("unnamed", Domain::Core)
    }
}

/// Convert a kebab-case or snake_case string to PascalCase.
fn to_pascal_case(s: &str) -> String {
    s.split(|c| c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_metadata() {
        let meta = KernelMetadata::new("identity/resolution", Domain::IdentityResolution)
            .with_description("Greedy donor clustering")
            .with_version(2);

        assert_eq!(meta.id, "identity/resolution");
        assert_eq!(meta.domain, Domain::IdentityResolution);
        assert_eq!(meta.version, 2);
    }

    #[test]
    fn test_feature_string() {
        let meta = KernelMetadata::new("fraud/threshold-clustering", Domain::FraudDetection);
        assert_eq!(meta.feature_string(), "FraudDetection.ThresholdClustering");

        let meta = KernelMetadata::new("velocity", Domain::Aggregation);
        assert_eq!(meta.feature_string(), "Aggregation.Velocity");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("resolution"), "Resolution");
        assert_eq!(to_pascal_case("round-number"), "RoundNumber");
        assert_eq!(to_pascal_case("same_day_multiple"), "SameDayMultiple");
    }
}
