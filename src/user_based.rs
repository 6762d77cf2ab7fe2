//! User-based collaborative filtering.
//!
//! Predicts scores for items the query entity has not rated by taking a
//! weighted average of every other entity's ratings, weighted by that
//! entity's similarity to the query. Entities with similarity ≤ 0 are
//! skipped entirely: the 0.0 no-overlap sentinel and negative correlations
//! are both excluded by design, so every accumulated weight is positive and
//! the final division can never be by zero.

use crate::error::{RecomendarError, Result};
use crate::matrix::{RatingMatrix, Ratings};
use crate::similarity::Metric;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Which of the query entity's items count as "unseen" when collecting
/// recommendation candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnseenPolicy {
    /// An item is unseen if the query has not rated it, or rated it
    /// exactly 0.0. This conflation of "unrated" and "rated zero" matches
    /// the system this crate models and is the default.
    #[default]
    AbsentOrZero,
    /// An item is unseen only if the query has not rated it at all. Use
    /// this when 0 is a meaningful rating in your domain.
    AbsentOnly,
}

impl UnseenPolicy {
    fn is_unseen(self, ratings: &Ratings, item: &str) -> bool {
        match self {
            UnseenPolicy::AbsentOrZero => ratings.get(item).map_or(true, |&r| r == 0.0),
            UnseenPolicy::AbsentOnly => !ratings.contains_key(item),
        }
    }
}

/// Recommend items for `key` with the default [`UnseenPolicy`].
///
/// Returns (item, predicted score) pairs, descending by score. A query
/// entity sharing no items with anyone yields an empty list: no contributor
/// passes the similarity > 0 filter. Cost is O(entities × average items per
/// entity).
///
/// # Errors
///
/// Returns [`RecomendarError::UnknownKey`] if `key` is not in the matrix.
///
/// # Examples
///
/// ```
/// use recomendar::matrix::RatingMatrix;
/// use recomendar::similarity::Metric;
/// use recomendar::user_based::recommend_user_based;
///
/// let m: RatingMatrix = [
///     ("ana", "x", 4.0),
///     ("beto", "x", 4.5),
///     ("beto", "y", 3.0),
/// ]
/// .into_iter()
/// .collect();
///
/// let recs = recommend_user_based(&m, "ana", Metric::Distance).unwrap();
/// assert_eq!(recs[0].0, "y"); // the only item ana has not rated
/// ```
pub fn recommend_user_based(
    matrix: &RatingMatrix,
    key: &str,
    metric: Metric,
) -> Result<Vec<(String, f64)>> {
    recommend_user_based_with(matrix, key, metric, UnseenPolicy::default())
}

/// Recommend items for `key` under an explicit [`UnseenPolicy`].
///
/// # Errors
///
/// Returns [`RecomendarError::UnknownKey`] if `key` is not in the matrix.
pub fn recommend_user_based_with(
    matrix: &RatingMatrix,
    key: &str,
    metric: Metric,
    policy: UnseenPolicy,
) -> Result<Vec<(String, f64)>> {
    let query = matrix.ratings(key)?;

    let mut weighted_sums: BTreeMap<String, f64> = BTreeMap::new();
    let mut weight_totals: BTreeMap<String, f64> = BTreeMap::new();

    for (other, ratings) in matrix.iter() {
        if other == key {
            continue;
        }

        let sim = match metric.between(query, ratings) {
            Ok(sim) => sim,
            Err(RecomendarError::UndefinedSimilarity { .. }) => continue,
            Err(e) => return Err(e),
        };
        if sim <= 0.0 {
            continue;
        }

        for (item, &rating) in ratings {
            if !policy.is_unseen(query, item) {
                continue;
            }
            *weighted_sums.entry(item.clone()).or_insert(0.0) += rating * sim;
            *weight_totals.entry(item.clone()).or_insert(0.0) += sim;
        }
    }

    // Every accumulated item was touched only under sim > 0, so its weight
    // total is strictly positive.
    let mut rankings: Vec<(String, f64)> = weighted_sums
        .into_iter()
        .map(|(item, sum)| {
            let weight = weight_totals[&item];
            (item, sum / weight)
        })
        .collect();
    rankings.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    Ok(rankings)
}
