//! Pattern detector interface.
//!
//! Each fraud pattern maps to one detector implementing [`PatternDetector`].
//! The pipeline iterates a list of detector objects and fork-joins them;
//! detectors are independently invocable and independently testable.

use crate::amounts::RoundNumber;
use crate::coordination::CoordinatedContributions;
use crate::smurfing::NameVariationFraud;
use crate::temporal::{RapidSequential, SameDayMultiple, TemporalAnomaly};
use crate::threshold::ThresholdClustering;
use crate::types::{AnalysisBatch, Pattern, PatternKind};
use donorkernel_core::error::Result;
use donorkernel_core::traits::Kernel;
use std::sync::Arc;

/// A fraud pattern detector.
///
/// `detect` is a pure function of the batch: no detector holds mutable
/// state, so detectors have no ordering dependency on one another and may
/// run in parallel.
pub trait PatternDetector: Kernel {
    /// The pattern kind this detector produces.
    fn kind(&self) -> PatternKind;

    /// Whether this detector keys off resolved donor identities.
    ///
    /// Detectors returning false operate on raw records and may run without
    /// identity resolution.
    fn requires_identities(&self) -> bool {
        true
    }

    /// Detect patterns in the batch.
    fn detect(&self, batch: &AnalysisBatch) -> Result<Vec<Pattern>>;
}

/// The default detector set, in registration order.
#[must_use]
pub fn default_detectors() -> Vec<Arc<dyn PatternDetector>> {
    vec![
        Arc::new(ThresholdClustering::new()),
        Arc::new(NameVariationFraud::new()),
        Arc::new(TemporalAnomaly::new()),
        Arc::new(RoundNumber::new()),
        Arc::new(SameDayMultiple::new()),
        Arc::new(CoordinatedContributions::new()),
        Arc::new(RapidSequential::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_detectors_cover_every_kind() {
        let detectors = default_detectors();
        assert_eq!(detectors.len(), 7);

        let kinds: Vec<PatternKind> = detectors.iter().map(|d| d.kind()).collect();
        for kind in [
            PatternKind::ThresholdClustering,
            PatternKind::NameVariationFraud,
            PatternKind::TemporalAnomaly,
            PatternKind::RoundNumberPattern,
            PatternKind::SameDayMultiple,
            PatternKind::CoordinatedContributions,
            PatternKind::RapidSequential,
        ] {
            assert!(kinds.contains(&kind), "missing detector for {kind}");
        }
    }

    #[test]
    fn test_raw_record_detectors_do_not_require_identities() {
        let detectors = default_detectors();
        let smurfing = detectors
            .iter()
            .find(|d| d.kind() == PatternKind::NameVariationFraud)
            .unwrap();
        assert!(!smurfing.requires_identities());
    }
}
