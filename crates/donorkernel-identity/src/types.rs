//! Contribution and donor identity types.

use crate::normalize;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Contribution Types
// ============================================================================

/// A campaign contribution as it arrives from a bulk filing or upstream API.
///
/// All fields are raw text; conversion into a [`ContributionRecord`] is
/// lenient and total - unparsable amounts become zero, unparsable dates
/// become absent, and no field ever aborts the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawContribution {
    /// Filing-assigned record identifier.
    pub id: String,
    /// Contributor name as filed (typically `LAST, FIRST MIDDLE`).
    pub contributor_name: String,
    /// Street address.
    pub street: String,
    /// City.
    pub city: String,
    /// State or territory.
    pub state: String,
    /// ZIP code.
    pub zip: String,
    /// Employer as filed.
    pub employer: String,
    /// Occupation as filed.
    pub occupation: String,
    /// Contribution amount as filed (may carry `$`, thousands separators,
    /// or accounting-style parentheses for refunds).
    pub amount: String,
    /// Contribution date as filed.
    pub date: String,
    /// Receiving committee or candidate identifier.
    pub committee_id: String,
}

/// A validated, immutable contribution record.
///
/// Records are never mutated by the analysis core; every derived structure
/// (identities, rollups, patterns) is computed fresh from a batch of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRecord {
    /// Unique record identifier.
    pub id: String,
    /// Contributor name as filed.
    pub contributor_name: String,
    /// Street address.
    pub street: String,
    /// City.
    pub city: String,
    /// State or territory.
    pub state: String,
    /// ZIP code.
    pub zip: String,
    /// Employer as filed.
    pub employer: String,
    /// Occupation as filed.
    pub occupation: String,
    /// Contribution amount in dollars; negative values are refunds.
    pub amount: f64,
    /// Calendar date of the contribution, when known. Records without a
    /// date are excluded from date-keyed aggregations but not from totals.
    pub date: Option<NaiveDate>,
    /// Receiving committee or candidate identifier.
    pub committee_id: String,
}

impl From<&RawContribution> for ContributionRecord {
    fn from(raw: &RawContribution) -> Self {
        Self {
            id: raw.id.clone(),
            contributor_name: raw.contributor_name.trim().to_string(),
            street: raw.street.trim().to_string(),
            city: raw.city.trim().to_string(),
            state: raw.state.trim().to_string(),
            zip: raw.zip.trim().to_string(),
            employer: raw.employer.trim().to_string(),
            occupation: raw.occupation.trim().to_string(),
            amount: normalize::parse_amount(&raw.amount),
            date: normalize::parse_date(&raw.date),
            committee_id: raw.committee_id.trim().to_string(),
        }
    }
}

impl From<RawContribution> for ContributionRecord {
    fn from(raw: RawContribution) -> Self {
        (&raw).into()
    }
}

// ============================================================================
// Normalized Key
// ============================================================================

/// Canonicalized comparison form of a contribution record's text fields.
///
/// Pure function of the record it annotates; never persisted independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedKey {
    /// Lower-cased, punctuation-stripped, whitespace-collapsed name.
    pub name: String,
    /// Normalized city.
    pub city: String,
    /// Two-letter upper-case state code, or absent.
    pub state: Option<String>,
    /// Normalized employer with corporate suffixes stripped.
    pub employer: String,
    /// Normalized occupation with corporate suffixes stripped.
    pub occupation: String,
}

// ============================================================================
// Donor Identity
// ============================================================================

/// A resolved cluster of contribution records believed to originate from
/// the same real contributor.
///
/// Created by the identity resolver in a single pass over a fixed batch and
/// never mutated afterwards; a new pass produces a new set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorIdentity {
    /// Most frequent exact name variant (ties broken by first occurrence).
    pub canonical_name: String,
    /// All observed name variants, in first-occurrence order.
    pub name_variants: Vec<String>,
    /// Mode of non-empty city values.
    pub city: String,
    /// Mode of non-empty state values, upper-cased.
    pub state: String,
    /// Mode of non-empty employer values.
    pub employer: String,
    /// Mode of non-empty occupation values.
    pub occupation: String,
    /// Sum of member record amounts.
    pub total_amount: f64,
    /// Number of member records.
    pub contribution_count: usize,
    /// Earliest present contribution date.
    pub first_date: Option<NaiveDate>,
    /// Latest present contribution date.
    pub last_date: Option<NaiveDate>,
    /// Merge confidence in [0, 1]: 1.0 for a single distinct name variant,
    /// decreasing as the variant-to-record ratio grows.
    pub confidence: f64,
    /// Member records, in input order.
    pub records: Vec<ContributionRecord>,
}

impl DonorIdentity {
    /// IDs of the member records, in input order.
    #[must_use]
    pub fn record_ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_conversion_recovers_bad_fields() {
        let raw = RawContribution {
            id: "SA17-1".into(),
            contributor_name: "  SMITH, JON A  ".into(),
            amount: "not-a-number".into(),
            date: "junk".into(),
            ..Default::default()
        };

        let record: ContributionRecord = raw.into();
        assert_eq!(record.contributor_name, "SMITH, JON A");
        assert_eq!(record.amount, 0.0);
        assert_eq!(record.date, None);
    }

    #[test]
    fn test_conversion_parses_formatted_amount() {
        let raw = RawContribution {
            id: "SA17-2".into(),
            amount: "$2,700.00".into(),
            date: "2024-03-15".into(),
            ..Default::default()
        };

        let record: ContributionRecord = raw.into();
        assert_eq!(record.amount, 2700.0);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }
}
