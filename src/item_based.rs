//! Item-based collaborative filtering with an offline similarity index.
//!
//! The expensive step — comparing every item to every other item over the
//! transposed matrix — runs once, offline, producing an
//! [`ItemSimilarityIndex`]. Per-query recommendation then touches only the
//! query entity's own ratings and each rated item's precomputed neighbor
//! list: O(items rated × k), independent of catalog and rater-population
//! size.
//!
//! The index uses the distance metric specifically. Item vectors are
//! typically much sparser than rater vectors, and the distance metric
//! degrades more gracefully with few shared raters than the correlation
//! metric does.
//!
//! # Examples
//!
//! ```
//! use recomendar::item_based::{recommend_item_based, ItemSimilarityIndex};
//! use recomendar::matrix::RatingMatrix;
//!
//! let m: RatingMatrix = [
//!     ("ana", "alien", 4.0),
//!     ("ana", "brazil", 2.0),
//!     ("beto", "alien", 4.5),
//!     ("beto", "brazil", 2.5),
//!     ("beto", "casablanca", 5.0),
//! ]
//! .into_iter()
//! .collect();
//!
//! let index = ItemSimilarityIndex::build(&m, 5);
//! let recs = recommend_item_based(&m, &index, "ana").unwrap();
//! assert_eq!(recs[0].0, "casablanca");
//! ```

use crate::error::{RecomendarError, Result};
use crate::matrix::RatingMatrix;
use crate::neighbors::rank_against;
use crate::similarity::Metric;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Progress callback invoked during index construction.
pub type ProgressCallback = Box<dyn Fn(BuildProgress) + Send + Sync>;

/// Snapshot of index construction progress.
#[derive(Debug, Clone, Copy)]
pub struct BuildProgress {
    /// Items whose neighbor lists are complete
    pub items_processed: usize,
    /// Total items in the transposed matrix
    pub total_items: usize,
}

/// Items between progress callback invocations.
const PROGRESS_STRIDE: usize = 100;

/// Precomputed mapping from item to its top-k most similar items.
///
/// Built once over the transposed matrix and immutable afterward; to pick
/// up new ratings, build a new index and replace the old value wholesale.
/// Serializes as a mapping from item key to an ordered (key, score) list,
/// so [`save`](Self::save)/[`load`](Self::load) give a cache across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSimilarityIndex {
    neighbors: BTreeMap<String, Vec<(String, f64)>>,
    k: usize,
}

impl ItemSimilarityIndex {
    /// Build an index with `k` neighbors per item and no progress reporting.
    ///
    /// This is the dominant cost of the whole system for large catalogs:
    /// O(items² × average raters per item). Use [`ItemIndexBuilder`] to
    /// attach a progress callback, or enable the `parallel` feature to
    /// fan the per-item work out across threads.
    #[must_use]
    pub fn build(matrix: &RatingMatrix, k: usize) -> Self {
        ItemIndexBuilder::new(k).build(matrix)
    }

    /// An item's neighbor list, descending by similarity.
    ///
    /// `None` for items never seen during construction; callers treat that
    /// as "no similar items", not an error.
    #[must_use]
    pub fn neighbors(&self, item: &str) -> Option<&[(String, f64)]> {
        self.neighbors.get(item).map(Vec::as_slice)
    }

    /// Number of indexed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether the index holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Indexed item keys in lexicographic order.
    pub fn items(&self) -> impl Iterator<Item = &String> {
        self.neighbors.keys()
    }

    /// The neighbor count the index was built with.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Write the index to a JSON file.
    ///
    /// # Errors
    ///
    /// [`RecomendarError::Serialization`] if encoding fails,
    /// [`RecomendarError::Io`] if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RecomendarError::Serialization(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read an index previously written by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// [`RecomendarError::Io`] if the file cannot be read,
    /// [`RecomendarError::Serialization`] if it does not decode.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| RecomendarError::Serialization(e.to_string()))
    }
}

/// Builder for [`ItemSimilarityIndex`] with optional progress reporting.
///
/// # Examples
///
/// ```
/// use recomendar::item_based::ItemIndexBuilder;
/// use recomendar::matrix::RatingMatrix;
///
/// let m: RatingMatrix = [("ana", "x", 3.0), ("beto", "x", 4.0)]
///     .into_iter()
///     .collect();
///
/// let index = ItemIndexBuilder::new(10)
///     .with_progress(|p| println!("{}/{}", p.items_processed, p.total_items))
///     .build(&m);
/// assert_eq!(index.len(), 1);
/// ```
pub struct ItemIndexBuilder {
    k: usize,
    progress: Option<ProgressCallback>,
}

impl ItemIndexBuilder {
    /// Create a builder producing `k` neighbors per item.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self { k, progress: None }
    }

    /// Report progress every 100 items and at completion.
    /// With the `parallel` feature the callback runs on worker threads.
    #[must_use]
    pub fn with_progress(mut self, callback: impl Fn(BuildProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Transpose the matrix and rank each item's neighbors with the
    /// distance metric.
    ///
    /// Infallible: every scored key is enumerated from the matrix itself,
    /// and the distance metric has no undefined cases.
    #[must_use]
    pub fn build(&self, matrix: &RatingMatrix) -> ItemSimilarityIndex {
        let by_item = matrix.transpose();
        let total_items = by_item.len();

        let neighbors = self.rank_all(&by_item, total_items);

        if let Some(callback) = &self.progress {
            callback(BuildProgress {
                items_processed: total_items,
                total_items,
            });
        }

        ItemSimilarityIndex {
            neighbors,
            k: self.k,
        }
    }

    #[cfg(feature = "parallel")]
    fn rank_all(
        &self,
        by_item: &RatingMatrix,
        total_items: usize,
    ) -> BTreeMap<String, Vec<(String, f64)>> {
        let processed = AtomicUsize::new(0);
        by_item
            .iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(item, ratings)| {
                let list = rank_against(by_item, item, ratings, self.k, Metric::Distance);
                let done = processed.fetch_add(1, AtomicOrdering::Relaxed) + 1;
                if done % PROGRESS_STRIDE == 0 {
                    if let Some(callback) = &self.progress {
                        callback(BuildProgress {
                            items_processed: done,
                            total_items,
                        });
                    }
                }
                (item.clone(), list)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn rank_all(
        &self,
        by_item: &RatingMatrix,
        total_items: usize,
    ) -> BTreeMap<String, Vec<(String, f64)>> {
        let mut processed = 0usize;
        by_item
            .iter()
            .map(|(item, ratings)| {
                let list = rank_against(by_item, item, ratings, self.k, Metric::Distance);
                processed += 1;
                if processed % PROGRESS_STRIDE == 0 {
                    if let Some(callback) = &self.progress {
                        callback(BuildProgress {
                            items_processed: processed,
                            total_items,
                        });
                    }
                }
                (item.clone(), list)
            })
            .collect()
    }
}

/// Recommend items for `key` using only its own ratings and the index.
///
/// For every item the query rated, each positively-similar neighbor not
/// already rated by the query accumulates `similarity × query rating`;
/// predictions are the similarity-weighted averages, descending. Items
/// missing from the index contribute nothing. The candidate filter is
/// membership-only: a 0.0 rating by the query still counts as rated here.
///
/// # Errors
///
/// Returns [`RecomendarError::UnknownKey`] if `key` is not in the matrix.
pub fn recommend_item_based(
    matrix: &RatingMatrix,
    index: &ItemSimilarityIndex,
    key: &str,
) -> Result<Vec<(String, f64)>> {
    let query = matrix.ratings(key)?;

    let mut scores: BTreeMap<String, f64> = BTreeMap::new();
    let mut weights: BTreeMap<String, f64> = BTreeMap::new();

    for (item, &rating) in query {
        let Some(neighbors) = index.neighbors(item) else {
            continue;
        };
        for (candidate, sim) in neighbors {
            // A stored 0.0 is the no-overlap sentinel; excluded from
            // aggregation like any non-positive similarity.
            if *sim <= 0.0 || query.contains_key(candidate) {
                continue;
            }
            *scores.entry(candidate.clone()).or_insert(0.0) += sim * rating;
            *weights.entry(candidate.clone()).or_insert(0.0) += sim;
        }
    }

    let mut rankings: Vec<(String, f64)> = scores
        .into_iter()
        .map(|(item, sum)| {
            let weight = weights[&item];
            (item, sum / weight)
        })
        .collect();
    rankings.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    Ok(rankings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Arc;

    fn dense_3x3() -> RatingMatrix {
        [
            ("ana", "alien", 4.0),
            ("ana", "brazil", 2.0),
            ("ana", "casablanca", 5.0),
            ("beto", "alien", 4.5),
            ("beto", "brazil", 2.5),
            ("beto", "casablanca", 4.5),
            ("carla", "alien", 1.0),
            ("carla", "brazil", 4.0),
            ("carla", "casablanca", 2.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_dense_index_shape() {
        let index = ItemSimilarityIndex::build(&dense_3x3(), 2);
        assert_eq!(index.len(), 3);
        assert_eq!(index.k(), 2);
        for item in ["alien", "brazil", "casablanca"] {
            let list = index.neighbors(item).unwrap();
            assert_eq!(list.len(), 2);
            assert!(list.iter().all(|(neighbor, _)| neighbor != item));
        }
    }

    #[test]
    fn test_neighbor_lists_descend() {
        let index = ItemSimilarityIndex::build(&dense_3x3(), 3);
        for item in index.items() {
            let list = index.neighbors(item).unwrap();
            for pair in list.windows(2) {
                assert!(pair[0].1 >= pair[1].1);
            }
        }
    }

    #[test]
    fn test_unindexed_item_lookup_is_none() {
        let index = ItemSimilarityIndex::build(&dense_3x3(), 2);
        assert!(index.neighbors("dune").is_none());
    }

    #[test]
    fn test_recommend_skips_rated_items() {
        let mut m = dense_3x3();
        m.insert("dora", "alien", 4.0);
        let index = ItemSimilarityIndex::build(&m, 5);
        let recs = recommend_item_based(&m, &index, "dora").unwrap();
        let items: Vec<_> = recs.iter().map(|(i, _)| i.as_str()).collect();
        assert!(!items.contains(&"alien"));
        assert!(items.contains(&"brazil"));
        assert!(items.contains(&"casablanca"));
    }

    #[test]
    fn test_single_rating_prediction_is_that_rating() {
        // One rated item: every candidate's weighted average collapses to
        // dora's one rating.
        let mut m = dense_3x3();
        m.insert("dora", "alien", 4.0);
        let index = ItemSimilarityIndex::build(&m, 5);
        let recs = recommend_item_based(&m, &index, "dora").unwrap();
        for (_, score) in recs {
            assert!((score - 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_recommend_fully_rated_is_empty() {
        let m = dense_3x3();
        let index = ItemSimilarityIndex::build(&m, 5);
        let recs = recommend_item_based(&m, &index, "ana").unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_recommend_unknown_key() {
        let m = dense_3x3();
        let index = ItemSimilarityIndex::build(&m, 2);
        let err = recommend_item_based(&m, &index, "ghost").unwrap_err();
        assert!(matches!(err, RecomendarError::UnknownKey { .. }));
    }

    #[test]
    fn test_progress_reports_completion() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let index = ItemIndexBuilder::new(2)
            .with_progress(move |p| {
                seen.fetch_add(1, AtomicOrdering::Relaxed);
                assert_eq!(p.total_items, 3);
                assert!(p.items_processed <= p.total_items);
            })
            .build(&dense_3x3());
        assert_eq!(index.len(), 3);
        // 3 items < stride, so only the completion callback fires.
        assert_eq!(calls.load(AtomicOrdering::Relaxed), 1);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let index = ItemSimilarityIndex::build(&dense_3x3(), 2);
        index.save(&path).unwrap();
        let loaded = ItemSimilarityIndex::load(&path).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn test_load_garbage_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "not json").unwrap();
        let err = ItemSimilarityIndex::load(&path).unwrap_err();
        assert!(matches!(err, RecomendarError::Serialization(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = ItemSimilarityIndex::load("/nonexistent/index.json").unwrap_err();
        assert!(matches!(err, RecomendarError::Io(_)));
    }
}
