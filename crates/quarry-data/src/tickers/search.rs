//! Tiered fuzzy ranking of directory entries.
//!
//! Queries are matched against both the ticker and the company name using
//! four relevance tiers, lower is better:
//!
//! | Tier | Match |
//! |------|-------|
//! | 0 | ticker starts with the query |
//! | 1 | name equals the query, or starts with `"{query} "` |
//! | 2 | name starts with the query |
//! | 3 | name contains the query |
//!
//! Name comparisons are case-insensitive. Ties within a tier break on the
//! length of the matched field, shortest first: shorter identifiers are
//! usually the primary listing. An exact ticker match bypasses scoring
//! entirely and yields that single record.

use crate::tickers::Company;

/// Relevance tier plus tie-break length for one candidate.
fn match_tier(company: &Company, query_upper: &str, query_lower: &str) -> Option<(u8, usize)> {
    let name_lower = company.name.to_lowercase();

    if company.ticker.starts_with(query_upper) {
        Some((0, company.ticker.len()))
    } else if name_lower == query_lower || name_lower.starts_with(&format!("{query_lower} ")) {
        Some((1, company.name.len()))
    } else if name_lower.starts_with(query_lower) {
        Some((2, company.name.len()))
    } else if name_lower.contains(query_lower) {
        Some((3, company.name.len()))
    } else {
        None
    }
}

/// Rank directory entries against a free-text query.
///
/// Returns at most `limit` companies, most relevant first. An exact ticker
/// match short-circuits to exactly that record regardless of `limit`.
pub fn rank(companies: &[Company], query: &str, limit: usize) -> Vec<Company> {
    let query_upper = query.trim().to_uppercase();
    if query_upper.is_empty() {
        return Vec::new();
    }

    if let Some(exact) = companies.iter().find(|c| c.ticker == query_upper) {
        return vec![exact.clone()];
    }

    let query_lower = query_upper.to_lowercase();

    let mut scored: Vec<((u8, usize), &Company)> = companies
        .iter()
        .filter_map(|c| match_tier(c, &query_upper, &query_lower).map(|key| (key, c)))
        .collect();

    // Stable sort: within equal (tier, length) keys, directory order holds.
    scored.sort_by_key(|(key, _)| *key);

    scored
        .into_iter()
        .take(limit)
        .map(|(_, c)| c.clone())
        .collect()
}
