//! Ranked neighbor discovery.
//!
//! Scores a query entity against every other entity in the matrix and
//! returns the top matches, descending by score. Pairs whose correlation is
//! undefined (zero variance on one side) are excluded from the ranking
//! instead of failing the whole query.

use crate::error::{RecomendarError, Result};
use crate::matrix::{RatingMatrix, Ratings};
use crate::similarity::Metric;
use std::cmp::Ordering;

/// Rank every other entity by similarity to `key`, truncated to the `n` best.
///
/// The sort is stable and descending; entities with equal scores keep the
/// matrix's enumeration order (lexicographic). Cost is
/// O(entities × shared-key size). Inputs are not mutated.
///
/// # Errors
///
/// Returns [`RecomendarError::UnknownKey`] if `key` is not in the matrix.
///
/// # Examples
///
/// ```
/// use recomendar::matrix::RatingMatrix;
/// use recomendar::neighbors::top_matches;
/// use recomendar::similarity::Metric;
///
/// let m: RatingMatrix = [
///     ("ana", "x", 1.0),
///     ("ana", "y", 5.0),
///     ("beto", "x", 1.0),
///     ("beto", "y", 4.0),
///     ("carla", "x", 5.0),
///     ("carla", "y", 1.0),
/// ]
/// .into_iter()
/// .collect();
///
/// let matches = top_matches(&m, "ana", 2, Metric::Distance).unwrap();
/// assert_eq!(matches[0].0, "beto");
/// ```
pub fn top_matches(
    matrix: &RatingMatrix,
    key: &str,
    n: usize,
    metric: Metric,
) -> Result<Vec<(String, f64)>> {
    let query = matrix.ratings(key)?;
    Ok(rank_against(matrix, key, query, n, metric))
}

/// Scoring core shared with the item index builder: infallible because the
/// query ratings are already resolved and undefined correlations are
/// excluded rather than raised.
pub(crate) fn rank_against(
    matrix: &RatingMatrix,
    key: &str,
    query: &Ratings,
    n: usize,
    metric: Metric,
) -> Vec<(String, f64)> {
    let mut scores: Vec<(String, f64)> = matrix
        .iter()
        .filter(|(other, _)| other.as_str() != key)
        .filter_map(|(other, ratings)| match metric.between(query, ratings) {
            Ok(score) => Some((other.clone(), score)),
            Err(RecomendarError::UndefinedSimilarity { .. }) => None,
            // No other error can arise from a pair scorer.
            Err(_) => None,
        })
        .collect();

    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scores.truncate(n);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> RatingMatrix {
        [
            ("ana", "x", 1.0),
            ("ana", "y", 5.0),
            ("beto", "x", 1.0),
            ("beto", "y", 4.0),
            ("carla", "x", 5.0),
            ("carla", "y", 1.0),
            ("dora", "x", 1.0),
            ("dora", "y", 5.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_excludes_query_itself() {
        let matches = top_matches(&matrix(), "ana", 10, Metric::Distance).unwrap();
        assert!(matches.iter().all(|(k, _)| k != "ana"));
    }

    #[test]
    fn test_descending_and_truncated() {
        let m = matrix();
        let matches = top_matches(&m, "ana", 2, Metric::Distance).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches[0].1 >= matches[1].1);
        // dora's ratings equal ana's exactly.
        assert_eq!(matches[0].0, "dora");
        assert!((matches[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_capped_by_entity_count() {
        let m = matrix();
        let matches = top_matches(&m, "ana", 50, Metric::Distance).unwrap();
        assert_eq!(matches.len(), m.len() - 1);
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        let m: RatingMatrix = [
            ("q", "x", 2.0),
            ("a", "x", 2.0),
            ("b", "x", 2.0),
            ("c", "x", 2.0),
        ]
        .into_iter()
        .collect();
        let matches = top_matches(&m, "q", 3, Metric::Distance).unwrap();
        let keys: Vec<_> = matches.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_undefined_correlation_neighbors_are_skipped() {
        // "flat" rates everything 3.0, so its variance against anyone is 0.
        let m: RatingMatrix = [
            ("ana", "x", 1.0),
            ("ana", "y", 5.0),
            ("beto", "x", 2.0),
            ("beto", "y", 4.0),
            ("flat", "x", 3.0),
            ("flat", "y", 3.0),
        ]
        .into_iter()
        .collect();
        let matches = top_matches(&m, "ana", 10, Metric::Correlation).unwrap();
        assert!(matches.iter().all(|(k, _)| k != "flat"));
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_unknown_key() {
        let err = top_matches(&matrix(), "ghost", 3, Metric::Distance).unwrap_err();
        assert!(matches!(err, RecomendarError::UnknownKey { .. }));
    }
}
