use crate::matcher::similarity::{distance, similarity};

/// One ranked catalog candidate for a query.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    pub candidate: String,
    pub score: f64,
    pub distance: usize,
}

/// Ranks `catalog` against `query` and returns the `n` best candidates,
/// highest similarity first.
///
/// An empty or whitespace-only query short-circuits to an empty vec without
/// scoring anything. Ties keep the catalog's relative order (the sort is
/// stable), so the first catalog entry wins a tie.
pub fn top_matches(query: &str, catalog: &[String], n: usize) -> Vec<MatchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<MatchResult> = catalog
        .iter()
        .map(|item| MatchResult {
            candidate: item.clone(),
            score: similarity(query, item),
            distance: distance(query, item),
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches.truncate(n);
    matches
}
