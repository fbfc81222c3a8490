//! Shared fixtures for detector tests.

use crate::types::AnalysisBatch;
use donorkernel_identity::normalize;
use donorkernel_identity::resolve::IdentityResolution;
use donorkernel_identity::similarity::PrefixSimilarity;
use donorkernel_identity::types::ContributionRecord;

/// Build a record with the fields detectors care about.
pub(crate) fn record(id: &str, name: &str, amount: f64, date: &str) -> ContributionRecord {
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
        date: normalize::parse_date(date),
        committee_id: "C001".into(),
    }
}

/// Build a record with an employer attached.
pub(crate) fn record_with_employer(
    id: &str,
    name: &str,
    amount: f64,
    date: &str,
    employer: &str,
) -> ContributionRecord {
    let mut record = record(id, name, amount, date);
    record.employer = employer.into();
    record
}

/// Resolve the records and wrap everything into a batch.
pub(crate) fn batch_with_identities(records: Vec<ContributionRecord>) -> AnalysisBatch {
    let identities = IdentityResolution::compute(&records, &PrefixSimilarity::default());
    AnalysisBatch::new(records, identities)
}
