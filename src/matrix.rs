//! Sparse rating matrix keyed by string identifiers.
//!
//! A [`RatingMatrix`] maps each entity (a rater, or after [`transpose`] an
//! item) to its rating sub-mapping over counterpart keys. Absence of an inner
//! key means "unrated", which is distinct from a rating of 0.0 everywhere
//! except the documented candidate filter in user-based recommendation
//! (see [`crate::user_based::UnseenPolicy`]).
//!
//! Keys are stored in `BTreeMap`s so enumeration order is deterministic
//! (lexicographic); ranked results break score ties by this order.
//!
//! [`transpose`]: RatingMatrix::transpose
//!
//! # Examples
//!
//! ```
//! use recomendar::matrix::RatingMatrix;
//!
//! let mut m = RatingMatrix::new();
//! m.insert("Lisa", "Superman Returns", 3.5);
//! m.insert("Lisa", "The Night Listener", 3.0);
//! m.insert("Gene", "Superman Returns", 5.0);
//!
//! assert_eq!(m.len(), 2);
//!
//! let by_item = m.transpose();
//! assert_eq!(by_item.ratings("Superman Returns").unwrap().len(), 2);
//! ```

use crate::error::{RecomendarError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entity's rating sub-mapping: counterpart key to rating value.
pub type Ratings = BTreeMap<String, f64>;

/// Sparse entity-to-ratings matrix.
///
/// Every core operation borrows the matrix immutably; nothing in this crate
/// mutates a matrix it did not construct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingMatrix(BTreeMap<String, Ratings>);

impl RatingMatrix {
    /// Create an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a single rating, creating the entity's sub-mapping if needed.
    /// Re-inserting an (entity, item) pair overwrites the previous value.
    pub fn insert(&mut self, entity: impl Into<String>, item: impl Into<String>, rating: f64) {
        self.0
            .entry(entity.into())
            .or_default()
            .insert(item.into(), rating);
    }

    /// Look up an entity's ratings, failing on unknown keys.
    ///
    /// # Errors
    ///
    /// Returns [`RecomendarError::UnknownKey`] if `key` is not an outer key.
    /// An unknown key never silently produces an empty result, since that
    /// would be indistinguishable from "zero similarity to everyone".
    pub fn ratings(&self, key: &str) -> Result<&Ratings> {
        self.0
            .get(key)
            .ok_or_else(|| RecomendarError::unknown_key(key))
    }

    /// Look up an entity's ratings, returning `None` on unknown keys.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Ratings> {
        self.0.get(key)
    }

    /// Whether `key` is an outer key of the matrix.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the matrix has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entity keys in lexicographic order.
    pub fn entities(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Iterate (entity, ratings) pairs in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Ratings)> {
        self.0.iter()
    }

    /// Swap entity and item roles: every (outer, inner, value) triple of
    /// `self` becomes (inner, outer, value) in the result.
    ///
    /// Pure structural inversion, O(total rating count). Inner keys that
    /// never appeared as outer keys simply become new outer keys; that is
    /// the point of the transform.
    ///
    /// # Examples
    ///
    /// ```
    /// use recomendar::matrix::RatingMatrix;
    ///
    /// let m: RatingMatrix = [("a", "x", 1.0), ("b", "x", 2.0)]
    ///     .into_iter()
    ///     .collect();
    /// let t = m.transpose();
    /// assert_eq!(t.ratings("x").unwrap().len(), 2);
    /// assert_eq!(t.transpose(), m);
    /// ```
    #[must_use]
    pub fn transpose(&self) -> RatingMatrix {
        let mut result = RatingMatrix::new();
        for (entity, ratings) in &self.0 {
            for (item, &value) in ratings {
                result.insert(item.clone(), entity.clone(), value);
            }
        }
        result
    }
}

impl<E, I> FromIterator<(E, I, f64)> for RatingMatrix
where
    E: Into<String>,
    I: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (E, I, f64)>>(iter: T) -> Self {
        let mut matrix = RatingMatrix::new();
        for (entity, item, rating) in iter {
            matrix.insert(entity, item, rating);
        }
        matrix
    }
}
