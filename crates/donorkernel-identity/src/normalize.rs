//! Field normalization.
//!
//! Canonicalizes raw text fields into comparable forms. Every function here
//! is pure and total: missing or malformed input normalizes to an explicit
//! empty value rather than failing.

use crate::types::{ContributionRecord, NormalizedKey};
use chrono::NaiveDate;

/// Corporate suffixes stripped from employer and occupation values.
/// Retaining them fragments otherwise-identical employer groups.
const ORG_SUFFIXES: &[&str] = &[
    "inc",
    "llc",
    "corp",
    "co",
    "ltd",
    "llp",
    "company",
    "corporation",
    "incorporated",
];

/// Derive the normalized comparison key for a record.
pub fn normalize(record: &ContributionRecord) -> NormalizedKey {
    NormalizedKey {
        name: normalize_name(&record.contributor_name),
        city: normalize_text(&record.city),
        state: normalize_state(&record.state),
        employer: normalize_org(&record.employer),
        occupation: normalize_org(&record.occupation),
    }
}

/// Normalize a contributor name: lower-case, strip punctuation, collapse
/// whitespace.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    normalize_text(raw)
}

/// Lower-case, strip punctuation, and collapse internal whitespace.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a state value to a two-letter upper-case code, or `None` when
/// the value is not a two-letter code.
#[must_use]
pub fn normalize_state(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(trimmed.to_ascii_uppercase())
    } else {
        None
    }
}

/// Normalize an employer or occupation value, stripping trailing corporate
/// suffixes.
#[must_use]
pub fn normalize_org(raw: &str) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    let normalized = normalize_text(raw);
    tokens.extend(normalized.split(' ').filter(|t| !t.is_empty()));

    while tokens.len() > 1 {
        match tokens.last() {
            Some(last) if ORG_SUFFIXES.contains(last) => {
                tokens.pop();
            }
            _ => break,
        }
    }
    tokens.join(" ")
}

/// Leniently parse a dollar amount.
///
/// Accepts `$` signs, thousands separators, and accounting-style parentheses
/// for negatives. Unparsable or non-finite input yields 0.0.
#[must_use]
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let negated = trimmed.starts_with('(') && trimmed.ends_with(')');
    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if negated {
                -value.abs()
            } else {
                value
            }
        }
        _ => 0.0,
    }
}

/// Leniently parse a contribution date.
///
/// Tries the formats seen in bulk filings; anything else is absent.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    const FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y%m%d"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_name(name: &str) -> ContributionRecord {
        ContributionRecord {
            id: "1".into(),
            contributor_name: name.into(),
            street: String::new(),
            city: "  San  Francisco ".into(),
            state: "ca".into(),
            zip: String::new(),
            employer: "Acme Widgets, Inc.".into(),
            occupation: "Engineer".into(),
            amount: 100.0,
            date: None,
            committee_id: "C001".into(),
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  JON A. SMITH  "), "jon a smith");
        assert_eq!(normalize_name("Smith,   Jon"), "smith jon");
        assert_eq!(normalize_name("O'Brien"), "o brien");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_normalize_key() {
        let key = normalize(&record_with_name("Jon Smith"));
        assert_eq!(key.name, "jon smith");
        assert_eq!(key.city, "san francisco");
        assert_eq!(key.state.as_deref(), Some("CA"));
        assert_eq!(key.employer, "acme widgets");
        assert_eq!(key.occupation, "engineer");
    }

    #[test]
    fn test_normalize_state() {
        assert_eq!(normalize_state("ny").as_deref(), Some("NY"));
        assert_eq!(normalize_state(" TX ").as_deref(), Some("TX"));
        assert_eq!(normalize_state("New York"), None);
        assert_eq!(normalize_state(""), None);
    }

    #[test]
    fn test_normalize_org_strips_suffixes() {
        assert_eq!(normalize_org("Initech LLC"), "initech");
        assert_eq!(normalize_org("Globex Corp."), "globex");
        assert_eq!(normalize_org("Acme Widgets, Inc."), "acme widgets");
        // Repeated suffixes peel off one at a time
        assert_eq!(normalize_org("Hooli Co Inc"), "hooli");
        // A bare suffix word is a real value, not a suffix
        assert_eq!(normalize_org("Co"), "co");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("195"), 195.0);
        assert_eq!(parse_amount("$2,700.00"), 2700.0);
        assert_eq!(parse_amount("-50"), -50.0);
        assert_eq!(parse_amount("(500.00)"), -500.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("refunded"), 0.0);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-05"), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(parse_date("01/05/2024"), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(parse_date("20240105"), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("sometime"), None);
    }
}
