//! Fuzzy menu search.
//!
//! Ranks flattened menu items against a free-text query on their `name`.
//! Ranking is a discrete tier ladder rather than a graded similarity score:
//! an item either matches at some tier or is excluded outright. Flattening
//! descends exactly one level (each top item plus its direct children);
//! deeper nesting is not searchable.

use std::cmp::Reverse;

use crate::menu::MenuNode;

/// Match quality tier, worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    /// The query shares no in-order subsequence with the candidate.
    NoMatch,
    /// Query characters appear in the candidate in order, with gaps.
    Subsequence,
    /// The query appears in the acronym of the candidate's words.
    Acronym,
    /// The query appears somewhere in the candidate.
    Contains,
    /// Some word of the candidate starts with the query.
    WordStartsWith,
    /// The candidate starts with the query.
    StartsWith,
    /// Case-insensitive equality.
    Equal,
    /// Exact equality.
    CaseSensitiveEqual,
}

/// Rank `candidate` against `query`.
///
/// Comparisons other than the top tier are case-insensitive.
#[must_use]
pub fn rank(query: &str, candidate: &str) -> MatchRank {
    if candidate == query {
        return MatchRank::CaseSensitiveEqual;
    }

    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();

    if candidate == query {
        return MatchRank::Equal;
    }
    if candidate.starts_with(&query) {
        return MatchRank::StartsWith;
    }
    if words(&candidate).any(|word| word.starts_with(&query)) {
        return MatchRank::WordStartsWith;
    }
    if candidate.contains(&query) {
        return MatchRank::Contains;
    }
    let acronym: String = words(&candidate).filter_map(|word| word.chars().next()).collect();
    if acronym.contains(&query) {
        return MatchRank::Acronym;
    }
    if is_subsequence(&query, &candidate) {
        return MatchRank::Subsequence;
    }
    MatchRank::NoMatch
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
}

/// Whether every character of `needle` appears in `haystack` in order.
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut haystack = haystack.chars();
    needle.chars().all(|wanted| haystack.any(|c| c == wanted))
}

/// Search menu items by name.
///
/// Flattens `items` one level deep (each item followed by its direct
/// children), drops non-matches and returns the rest best-match-first.
/// Equal ranks keep their flattened order. The caller decides what an
/// empty query means; this helper ranks whatever it is given.
#[must_use]
pub fn search(query: &str, items: &[MenuNode]) -> Vec<MenuNode> {
    let mut flattened: Vec<&MenuNode> = Vec::new();
    for item in items {
        flattened.push(item);
        flattened.extend(item.children());
    }

    let mut ranked: Vec<(MatchRank, &MenuNode)> = flattened
        .into_iter()
        .map(|item| (rank(query, item.name()), item))
        .filter(|(rank, _)| *rank != MatchRank::NoMatch)
        .collect();
    ranked.sort_by_key(|(rank, _)| Reverse(*rank));

    ranked.into_iter().map(|(_, item)| item.clone()).collect()
}
