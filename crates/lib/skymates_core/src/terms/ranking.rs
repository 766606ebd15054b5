//! Three-tier keyword ranking for term suggestions.
//!
//! Matching is case-insensitive substring containment on the term name.
//! Matches are ordered by tier (exact, prefix, contains), then by name
//! length in characters, then by term id so equal-length names always come
//! back in the same order.

use std::cmp::Ordering;

use crate::models::term::TermSummary;

/// Maximum number of suggestions returned by a search.
pub const SEARCH_RESULT_CAP: usize = 20;

/// Match class of a name against a keyword, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    Exact,
    Prefix,
    Contains,
}

/// Lower-cased keyword, computed once per search.
#[derive(Debug, Clone)]
pub struct Keyword {
    folded: String,
}

impl Keyword {
    pub fn new(raw: &str) -> Self {
        Self {
            folded: raw.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.folded
    }

    /// Classify `name`, or `None` when it does not contain the keyword.
    pub fn tier(&self, name: &str) -> Option<MatchTier> {
        let name = name.to_lowercase();
        if name == self.folded {
            Some(MatchTier::Exact)
        } else if name.starts_with(&self.folded) {
            Some(MatchTier::Prefix)
        } else if name.contains(&self.folded) {
            Some(MatchTier::Contains)
        } else {
            None
        }
    }
}

struct Ranked {
    tier: MatchTier,
    len: usize,
    term: TermSummary,
}

fn compare(a: &Ranked, b: &Ranked) -> Ordering {
    a.tier
        .cmp(&b.tier)
        .then(a.len.cmp(&b.len))
        .then(a.term.id.cmp(&b.term.id))
}

/// Rank `candidates` against `keyword` and keep the best `cap`.
///
/// Candidates that do not contain the keyword are dropped, so the store may
/// over-approximate the match set.
pub fn rank(keyword: &Keyword, candidates: Vec<TermSummary>, cap: usize) -> Vec<TermSummary> {
    let mut ranked: Vec<Ranked> = candidates
        .into_iter()
        .filter_map(|term| {
            keyword.tier(&term.name).map(|tier| Ranked {
                tier,
                len: term.name.chars().count(),
                term,
            })
        })
        .collect();
    ranked.sort_by(compare);
    ranked.truncate(cap);
    ranked.into_iter().map(|r| r.term).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(terms: &[TermSummary]) -> Vec<&str> {
        terms.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn tiers_then_length() {
        let candidates = vec![
            TermSummary::new(1, "concatenate"),
            TermSummary::new(2, "bobcat"),
            TermSummary::new(3, "category"),
            TermSummary::new(4, "cat"),
        ];
        let out = rank(&Keyword::new("cat"), candidates, SEARCH_RESULT_CAP);
        assert_eq!(names(&out), ["cat", "category", "bobcat", "concatenate"]);
    }

    #[test]
    fn matching_ignores_case() {
        let kw = Keyword::new("CaT");
        assert_eq!(kw.tier("cAt"), Some(MatchTier::Exact));
        assert_eq!(kw.tier("Catalog"), Some(MatchTier::Prefix));
        assert_eq!(kw.tier("WildCat"), Some(MatchTier::Contains));
        assert_eq!(kw.tier("dog"), None);
    }

    #[test]
    fn equal_length_breaks_ties_by_id() {
        let candidates = vec![
            TermSummary::new(9, "catz"),
            TermSummary::new(2, "caty"),
            TermSummary::new(5, "catx"),
        ];
        let out = rank(&Keyword::new("cat"), candidates, SEARCH_RESULT_CAP);
        let ids: Vec<i64> = out.iter().map(|t| t.id).collect();
        assert_eq!(ids, [2, 5, 9]);
    }

    #[test]
    fn non_matching_candidates_are_dropped() {
        let candidates = vec![TermSummary::new(1, "dog"), TermSummary::new(2, "cat")];
        let out = rank(&Keyword::new("cat"), candidates, SEARCH_RESULT_CAP);
        assert_eq!(names(&out), ["cat"]);
    }

    #[test]
    fn result_is_capped() {
        let candidates = (1..=50)
            .map(|i| TermSummary::new(i, format!("term{i}")))
            .collect();
        let out = rank(&Keyword::new("term"), candidates, SEARCH_RESULT_CAP);
        assert_eq!(out.len(), SEARCH_RESULT_CAP);
        // "term1".."term9" are shortest, then two-digit names by id.
        assert_eq!(out[0].name, "term1");
        assert_eq!(out[9].name, "term10");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let candidates = vec![
            TermSummary::new(1, "abcdé"),
            TermSummary::new(2, "abcdef"),
        ];
        let out = rank(&Keyword::new("abc"), candidates, SEARCH_RESULT_CAP);
        assert_eq!(names(&out), ["abcdé", "abcdef"]);
    }
}
