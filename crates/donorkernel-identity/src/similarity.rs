//! Name similarity strategies.
//!
//! The resolver compares surname-first match keys through a pluggable
//! [`SimilarityStrategy`]. The default [`PrefixSimilarity`] is a cheap
//! prefix-substring heuristic: O(n·k) over the current cluster count
//! instead of O(n²) full edit distance, which is acceptable because donor
//! lists per candidate are bounded in the tens of thousands.

use crate::normalize;
use std::fmt::Debug;

/// Decides whether two normalized name keys belong to the same donor.
///
/// Implementations must be symmetric and reflexive. A bounded edit-distance
/// or phonetic algorithm can be substituted here without changing any
/// resolver caller.
pub trait SimilarityStrategy: Send + Sync + Debug {
    /// Returns true when the two keys are considered the same donor.
    fn similar(&self, a: &str, b: &str) -> bool;
}

/// Default prefix-substring similarity.
///
/// Two keys match when they are identical, or when both are longer than
/// `prefix_len` characters and one's first-`prefix_len`-character prefix is
/// a substring of the other. Keys of `prefix_len` or fewer characters never
/// match anything but themselves.
#[derive(Debug, Clone)]
pub struct PrefixSimilarity {
    /// Prefix length used for the substring check.
    prefix_len: usize,
}

impl PrefixSimilarity {
    /// Create a prefix similarity with the given prefix length.
    #[must_use]
    pub fn new(prefix_len: usize) -> Self {
        Self { prefix_len }
    }
}

impl Default for PrefixSimilarity {
    fn default() -> Self {
        Self::new(5)
    }
}

impl SimilarityStrategy for PrefixSimilarity {
    fn similar(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        if a.chars().count() <= self.prefix_len || b.chars().count() <= self.prefix_len {
            return false;
        }

        let prefix_a: String = a.chars().take(self.prefix_len).collect();
        let prefix_b: String = b.chars().take(self.prefix_len).collect();
        b.contains(&prefix_a) || a.contains(&prefix_b)
    }
}

/// Build the surname-first match key for a raw contributor name.
///
/// Bulk filings carry names in `LAST, FIRST MIDDLE` order, which is the
/// order the prefix heuristic operates on. Names filed with a comma are
/// already surname-first; names without one are rotated so the final token
/// leads.
#[must_use]
pub fn match_key(raw_name: &str) -> String {
    let normalized = normalize::normalize_name(raw_name);
    if raw_name.contains(',') {
        return normalized;
    }

    let mut tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.len() < 2 {
        return normalized;
    }
    let Some(last) = tokens.pop() else {
        return normalized;
    };
    format!("{} {}", last, tokens.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_key_rotates_natural_order() {
        assert_eq!(match_key("Jon A Smith"), "smith jon a");
        assert_eq!(match_key("Jonathan Smith"), "smith jonathan");
    }

    #[test]
    fn test_match_key_keeps_filed_order() {
        assert_eq!(match_key("SMITH, JON A"), "smith jon a");
        assert_eq!(match_key("SMITH, JONATHAN"), "smith jonathan");
    }

    #[test]
    fn test_match_key_single_token() {
        assert_eq!(match_key("Madonna"), "madonna");
    }

    #[test]
    fn test_prefix_similarity_matches_variants() {
        let strategy = PrefixSimilarity::default();
        assert!(strategy.similar("smith jon a", "smith jonathan"));
        assert!(strategy.similar("smith jon a", "smith jon a"));
    }

    #[test]
    fn test_prefix_similarity_rejects_different_surnames() {
        let strategy = PrefixSimilarity::default();
        assert!(!strategy.similar("smith jon", "jones jon"));
    }

    #[test]
    fn test_short_keys_only_match_themselves() {
        let strategy = PrefixSimilarity::default();
        assert!(strategy.similar("li na", "li na"));
        // "li na" is 5 chars: never merged with a longer key that contains it
        assert!(!strategy.similar("li na", "li nathan"));
        assert!(!strategy.similar("ng bo", "ng bob"));
    }
}
