//! Domain definitions for kernel categorization.
//!
//! Kernels are organized into domains representing the analytical areas
//! of the pipeline. Domains are used for kernel discovery, registry
//! statistics, and feature grouping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Analytical domain for kernel categorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Domain {
    /// Identity resolution: normalization, similarity, donor clustering
    IdentityResolution,

    /// Aggregation: date/field rollups, distributions, velocity, cumulative totals
    Aggregation,

    /// Fraud detection: pattern detectors and risk scoring
    FraudDetection,

    /// Core: test kernels and infrastructure validation
    Core,
}

impl Domain {
    /// All available domains.
    pub const ALL: &'static [Domain] = &[
        Domain::IdentityResolution,
        Domain::Aggregation,
        Domain::FraudDetection,
        Domain::Core,
    ];

    /// Returns the domain name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Domain::IdentityResolution => "IdentityResolution",
            Domain::Aggregation => "Aggregation",
            Domain::FraudDetection => "FraudDetection",
            Domain::Core => "Core",
        }
    }

    /// Parse a domain from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IdentityResolution" => Some(Domain::IdentityResolution),
            "Aggregation" => Some(Domain::Aggregation),
            "FraudDetection" => Some(Domain::FraudDetection),
            "Core" => Some(Domain::Core),
            _ => None,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_all_count() {
        assert_eq!(Domain::ALL.len(), 4);
    }

    #[test]
    fn test_domain_parse() {
        assert_eq!(
            Domain::parse("IdentityResolution"),
            Some(Domain::IdentityResolution)
        );
        assert_eq!(Domain::parse("Unknown"), None);
    }

    #[test]
    fn test_domain_display() {
        assert_eq!(Domain::FraudDetection.to_string(), "FraudDetection");
        assert_eq!(Domain::Aggregation.to_string(), "Aggregation");
    }
}
