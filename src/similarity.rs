//! Similarity metrics over partially-overlapping rating vectors.
//!
//! Both metrics score a pair of entities over the intersection of their
//! rated keys only. Two entities with no shared keys score the defined
//! sentinel 0.0 ("no relation"); that is not an error.
//!
//! # Mathematical Background
//!
//! ## Distance similarity
//!
//! Euclidean distance over the shared-key vectors, squashed into (0, 1]:
//!
//! ```text
//! sim(a, b) = 1 / (1 + sqrt(Σ (a_k - b_k)²))    for k in shared keys
//! ```
//!
//! Identical shared ratings score 1; the score decays toward 0 as the
//! vectors move apart. Symmetric and monotonic in the distance.
//!
//! ## Correlation similarity
//!
//! A Pearson-style coefficient with one deliberate twist: each entity is
//! centered on the mean of its *entire* rating map, while the variance and
//! cross terms run over the shared keys only:
//!
//! ```text
//! sim(a, b) = Σ (a_k - ā)(b_k - b̄) / (σ_a σ_b)
//!   ā, b̄  over all of a's / b's ratings
//!   σ, Σ  over shared keys, centered on ā / b̄
//! ```
//!
//! This matches the behavior of the system this crate models rather than
//! textbook Pearson; swapping in shared-key means changes numeric output.
//! Nominally in [-1, 1], though the whole-map centering can push a score
//! outside that range when an entity's shared ratings sit far from its
//! overall mean.
//!
//! # Examples
//!
//! ```
//! use recomendar::matrix::RatingMatrix;
//! use recomendar::similarity::{similarity, Metric};
//!
//! let m: RatingMatrix = [
//!     ("ana", "x", 1.0),
//!     ("ana", "y", 5.0),
//!     ("beto", "x", 1.0),
//!     ("beto", "y", 4.0),
//! ]
//! .into_iter()
//! .collect();
//!
//! let sim = similarity(&m, "ana", "beto", Metric::Distance).unwrap();
//! assert!((sim - 0.5).abs() < 1e-12); // distance 1 -> 1/(1+1)
//! ```

use crate::error::{RecomendarError, Result};
use crate::matrix::{RatingMatrix, Ratings};
use serde::{Deserialize, Serialize};

/// Similarity metric variant.
///
/// A small closed set; recommenders take the variant as a parameter rather
/// than an open-ended strategy object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Metric {
    /// Inverted Euclidean distance over shared keys, in (0, 1].
    /// Degrades gracefully with few shared raters, which is why the
    /// item similarity index uses it.
    #[default]
    Distance,
    /// Pearson-style correlation with whole-map centering (see module docs).
    Correlation,
}

impl Metric {
    /// Score two rating sub-mappings over their shared keys.
    ///
    /// Returns the 0.0 sentinel when the maps share no keys. Pure,
    /// O(|shared keys|) beyond the intersection walk.
    ///
    /// # Errors
    ///
    /// [`RecomendarError::UndefinedSimilarity`] for the correlation metric
    /// when either side has zero variance over the shared keys; callers
    /// exclude such a pair from aggregation rather than propagate NaN.
    pub fn between(self, a: &Ratings, b: &Ratings) -> Result<f64> {
        match self {
            Metric::Distance => Ok(distance_similarity(a, b)),
            Metric::Correlation => correlation_similarity(a, b),
        }
    }
}

/// Score two entities of a matrix under the given metric.
///
/// # Errors
///
/// [`RecomendarError::UnknownKey`] if `a` or `b` is not in the matrix;
/// [`RecomendarError::UndefinedSimilarity`] as described on
/// [`Metric::between`].
pub fn similarity(matrix: &RatingMatrix, a: &str, b: &str, metric: Metric) -> Result<f64> {
    let ratings_a = matrix.ratings(a)?;
    let ratings_b = matrix.ratings(b)?;
    metric.between(ratings_a, ratings_b)
}

/// Pairs of ratings over the shared keys, in key order.
fn shared_ratings<'a>(a: &'a Ratings, b: &'a Ratings) -> impl Iterator<Item = (f64, f64)> + 'a {
    a.iter()
        .filter_map(|(key, &va)| b.get(key).map(|&vb| (va, vb)))
}

fn distance_similarity(a: &Ratings, b: &Ratings) -> f64 {
    let mut shared = 0usize;
    let mut sum_of_squares = 0.0;
    for (va, vb) in shared_ratings(a, b) {
        shared += 1;
        let d = va - vb;
        sum_of_squares += d * d;
    }
    if shared == 0 {
        return 0.0;
    }
    1.0 / (1.0 + sum_of_squares.sqrt())
}

fn correlation_similarity(a: &Ratings, b: &Ratings) -> Result<f64> {
    let pairs: Vec<(f64, f64)> = shared_ratings(a, b).collect();
    if pairs.is_empty() {
        return Ok(0.0);
    }

    // Means over each entity's entire rating map, not just the shared keys.
    let mean_a = a.values().sum::<f64>() / a.len() as f64;
    let mean_b = b.values().sum::<f64>() / b.len() as f64;

    let mut var_a = 0.0;
    let mut var_b = 0.0;
    let mut cross = 0.0;
    for &(va, vb) in &pairs {
        let da = va - mean_a;
        let db = vb - mean_b;
        var_a += da * da;
        var_b += db * db;
        cross += da * db;
    }

    let std_a = var_a.sqrt();
    let std_b = var_b.sqrt();
    if std_a == 0.0 || std_b == 0.0 {
        return Err(RecomendarError::UndefinedSimilarity {
            shared: pairs.len(),
        });
    }

    Ok(cross / (std_a * std_b))
}
