//! Donor identity resolution.
//!
//! Single-pass greedy clustering of contribution records into donor
//! identities. Deterministic for a fixed input order: ties in similarity
//! are broken by cluster-creation order, never by hashing, so repeated
//! runs against the same batch are reproducible.

use crate::messages::{ResolveInput, ResolveOutput};
use crate::similarity::{match_key, PrefixSimilarity, SimilarityStrategy};
use crate::types::{ContributionRecord, DonorIdentity};
use async_trait::async_trait;
use donorkernel_core::error::Result;
use donorkernel_core::traits::{BatchKernel, Kernel};
use donorkernel_core::{domain::Domain, kernel::KernelMetadata};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

// ============================================================================
// Identity Resolution Kernel
// ============================================================================

/// Identity resolution kernel.
///
/// Clusters records by surname-first match key: an identical key attaches
/// directly; otherwise the record is compared against existing cluster keys
/// in creation order through the similarity strategy, attaching to the first
/// match or opening a new cluster.
#[derive(Debug, Clone)]
pub struct IdentityResolution {
    metadata: KernelMetadata,
    strategy: Arc<dyn SimilarityStrategy>,
}

impl Default for IdentityResolution {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityResolution {
    /// Create a new identity resolution kernel with the default
    /// prefix-substring similarity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_strategy(Arc::new(PrefixSimilarity::default()))
    }

    /// Create a kernel with a custom similarity strategy.
    #[must_use]
    pub fn with_strategy(strategy: Arc<dyn SimilarityStrategy>) -> Self {
        Self {
            metadata: KernelMetadata::new("identity/resolution", Domain::IdentityResolution)
                .with_description("Greedy donor clustering over name-similarity keys"),
            strategy,
        }
    }

    /// Resolve a batch of records into donor identities.
    ///
    /// The cluster state is an explicit accumulator local to this call, so
    /// resolution is reentrant and independent batches can run in parallel.
    pub fn compute(
        records: &[ContributionRecord],
        strategy: &dyn SimilarityStrategy,
    ) -> Vec<DonorIdentity> {
        let mut acc = ClusterAccumulator::default();

        for (index, record) in records.iter().enumerate() {
            let key = match_key(&record.contributor_name);
            if key.is_empty() {
                // Empty-name records each get their own sentinel cluster and
                // are never merged, not even with each other.
                acc.push_sentinel(index);
                continue;
            }
            acc.attach(index, key, strategy);
        }

        acc.clusters
            .iter()
            .map(|cluster| build_identity(records, &cluster.members))
            .collect()
    }
}

impl Kernel for IdentityResolution {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[async_trait]
impl BatchKernel<ResolveInput, ResolveOutput> for IdentityResolution {
    async fn execute(&self, input: ResolveInput) -> Result<ResolveOutput> {
        let start = Instant::now();
        let identities = Self::compute(&input.records, self.strategy.as_ref());
        tracing::debug!(
            records = input.records.len(),
            identities = identities.len(),
            "resolved donor identities"
        );
        Ok(ResolveOutput {
            identities,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}

// ============================================================================
// Clustering Accumulator
// ============================================================================

/// One in-progress cluster: its match key and member record indices.
#[derive(Debug)]
struct Cluster {
    key: String,
    sentinel: bool,
    members: Vec<usize>,
}

/// Accumulator threaded through the resolution fold.
#[derive(Debug, Default)]
struct ClusterAccumulator {
    clusters: Vec<Cluster>,
    by_key: HashMap<String, usize>,
}

impl ClusterAccumulator {
    /// Open a sentinel cluster for an empty-name record.
    fn push_sentinel(&mut self, index: usize) {
        self.clusters.push(Cluster {
            key: String::new(),
            sentinel: true,
            members: vec![index],
        });
    }

    /// Attach a record to an existing cluster or open a new one.
    fn attach(&mut self, index: usize, key: String, strategy: &dyn SimilarityStrategy) {
        if let Some(&cluster_idx) = self.by_key.get(&key) {
            self.clusters[cluster_idx].members.push(index);
            return;
        }

        // First similar cluster in creation order wins.
        let found = self
            .clusters
            .iter()
            .position(|c| !c.sentinel && strategy.similar(&c.key, &key));

        match found {
            Some(cluster_idx) => {
                self.clusters[cluster_idx].members.push(index);
                self.by_key.insert(key, cluster_idx);
            }
            None => {
                let cluster_idx = self.clusters.len();
                self.clusters.push(Cluster {
                    key: key.clone(),
                    sentinel: false,
                    members: vec![index],
                });
                self.by_key.insert(key, cluster_idx);
            }
        }
    }
}

// ============================================================================
// Canonical Field Computation
// ============================================================================

/// Build the immutable identity for a finished cluster.
fn build_identity(records: &[ContributionRecord], members: &[usize]) -> DonorIdentity {
    let cluster_records: Vec<ContributionRecord> =
        members.iter().map(|&i| records[i].clone()).collect();

    let names: Vec<&str> = cluster_records
        .iter()
        .map(|r| r.contributor_name.as_str())
        .collect();
    let canonical_name = mode_value(&names).unwrap_or_default();
    let name_variants = distinct_in_order(&names);

    let total_amount: f64 = cluster_records.iter().map(|r| r.amount).sum();
    let dates: Vec<_> = cluster_records.iter().filter_map(|r| r.date).collect();

    let distinct_names = name_variants.len().max(1);
    let count = cluster_records.len();
    let confidence = 1.0 - (distinct_names - 1) as f64 / count as f64;

    DonorIdentity {
        canonical_name,
        name_variants,
        city: mode_nonempty(cluster_records.iter().map(|r| r.city.as_str())),
        state: mode_nonempty(cluster_records.iter().map(|r| r.state.as_str())).to_uppercase(),
        employer: mode_nonempty(cluster_records.iter().map(|r| r.employer.as_str())),
        occupation: mode_nonempty(cluster_records.iter().map(|r| r.occupation.as_str())),
        total_amount,
        contribution_count: count,
        first_date: dates.iter().min().copied(),
        last_date: dates.iter().max().copied(),
        confidence,
        records: cluster_records,
    }
}

/// Most frequent value, ties broken by first occurrence.
fn mode_value(values: &[&str]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(*v).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for v in values {
        let count = counts[*v];
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((*v, count)),
        }
    }
    best.map(|(v, _)| v.to_string())
}

/// Most frequent non-empty value, or empty when every value is empty.
fn mode_nonempty<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let nonempty: Vec<&str> = values.filter(|v| !v.trim().is_empty()).collect();
    mode_value(&nonempty).unwrap_or_default()
}

/// Distinct values in first-occurrence order.
fn distinct_in_order(values: &[&str]) -> Vec<String> {
    let mut seen = Vec::new();
    for v in values {
        if !seen.iter().any(|s: &String| s == v) {
            seen.push((*v).to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: &str, name: &str, amount: f64, date: &str) -> ContributionRecord {
        ContributionRecord {
            id: id.into(),
            contributor_name: name.into(),
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            employer: String::new(),
            occupation: String::new(),
            amount,
            date: crate::normalize::parse_date(date),
            committee_id: "C001".into(),
        }
    }

    fn smith_variants() -> Vec<ContributionRecord> {
        vec![
            record("1", "Jon A Smith", 195.0, "2024-01-01"),
            record("2", "JON A. SMITH", 196.0, "2024-01-03"),
            record("3", "Jonathan Smith", 198.0, "2024-01-05"),
        ]
    }

    #[test]
    fn test_name_variants_merge_into_one_identity() {
        let records = smith_variants();
        let identities = IdentityResolution::compute(&records, &PrefixSimilarity::default());

        assert_eq!(identities.len(), 1);
        let identity = &identities[0];
        assert_eq!(identity.contribution_count, 3);
        assert_eq!(identity.total_amount, 589.0);
        assert_eq!(identity.canonical_name, "Jon A Smith");
        assert_eq!(identity.name_variants.len(), 3);
        assert_eq!(
            identity.first_date,
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(identity.last_date, NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    #[test]
    fn test_resolution_is_a_partition() {
        let records = vec![
            record("1", "Jon A Smith", 195.0, "2024-01-01"),
            record("2", "Maria Garcia", 50.0, "2024-01-02"),
            record("3", "JON A. SMITH", 196.0, "2024-01-03"),
            record("4", "", 25.0, "2024-01-04"),
            record("5", "Maria Garcia", -10.0, ""),
        ];

        let identities = IdentityResolution::compute(&records, &PrefixSimilarity::default());

        let total: f64 = identities.iter().map(|i| i.total_amount).sum();
        let expected: f64 = records.iter().map(|r| r.amount).sum();
        assert_eq!(total, expected);

        let member_count: usize = identities.iter().map(|i| i.contribution_count).sum();
        assert_eq!(member_count, records.len());

        let mut seen_ids: Vec<String> = identities.iter().flat_map(|i| i.record_ids()).collect();
        seen_ids.sort();
        assert_eq!(seen_ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_idempotent_membership() {
        let records = smith_variants();
        let strategy = PrefixSimilarity::default();

        let first = IdentityResolution::compute(&records, &strategy);
        let second = IdentityResolution::compute(&records, &strategy);

        let ids_first: Vec<Vec<String>> = first.iter().map(|i| i.record_ids()).collect();
        let ids_second: Vec<Vec<String>> = second.iter().map(|i| i.record_ids()).collect();
        assert_eq!(ids_first, ids_second);
        assert_eq!(first[0].confidence, second[0].confidence);
    }

    #[test]
    fn test_empty_names_never_merge() {
        let records = vec![
            record("1", "", 10.0, "2024-01-01"),
            record("2", "", 20.0, "2024-01-01"),
            record("3", "  ", 30.0, "2024-01-01"),
        ];

        let identities = IdentityResolution::compute(&records, &PrefixSimilarity::default());
        assert_eq!(identities.len(), 3);
        for identity in &identities {
            assert_eq!(identity.contribution_count, 1);
            assert_eq!(identity.confidence, 1.0);
        }
    }

    #[test]
    fn test_single_variant_has_full_confidence() {
        let records = vec![
            record("1", "Maria Garcia", 100.0, "2024-01-01"),
            record("2", "Maria Garcia", 100.0, "2024-02-01"),
        ];

        let identities = IdentityResolution::compute(&records, &PrefixSimilarity::default());
        assert_eq!(identities.len(), 1);
        assert_eq!(identities[0].confidence, 1.0);
    }

    #[test]
    fn test_more_variants_lower_confidence() {
        let records = smith_variants();
        let identities = IdentityResolution::compute(&records, &PrefixSimilarity::default());

        // 3 variants over 3 records
        let confidence = identities[0].confidence;
        assert!(confidence > 0.0 && confidence < 1.0);
        assert!((confidence - (1.0 - 2.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_short_names_stay_separate() {
        let records = vec![
            record("1", "Li Na", 100.0, "2024-01-01"),
            record("2", "Li Nathan", 100.0, "2024-01-02"),
        ];

        let identities = IdentityResolution::compute(&records, &PrefixSimilarity::default());
        assert_eq!(identities.len(), 2);
    }

    #[test]
    fn test_canonical_fields_use_mode_of_nonempty() {
        let mut a = record("1", "Maria Garcia", 10.0, "2024-01-01");
        a.city = "Austin".into();
        a.state = "tx".into();
        let mut b = record("2", "Maria Garcia", 10.0, "2024-01-02");
        b.city = String::new();
        b.state = "tx".into();
        let mut c = record("3", "Maria Garcia", 10.0, "2024-01-03");
        c.city = "Austin".into();
        c.state = String::new();
        c.employer = "Initech".into();

        let identities = IdentityResolution::compute(&[a, b, c], &PrefixSimilarity::default());
        assert_eq!(identities.len(), 1);
        assert_eq!(identities[0].city, "Austin");
        assert_eq!(identities[0].state, "TX");
        assert_eq!(identities[0].employer, "Initech");
    }

    #[tokio::test]
    async fn test_execute_reports_identity_count() {
        let kernel = IdentityResolution::new();
        let out = kernel
            .execute(ResolveInput::new(smith_variants()))
            .await
            .unwrap();
        assert_eq!(out.identities.len(), 1);
    }
}
