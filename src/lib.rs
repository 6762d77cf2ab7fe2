//! Recomendar: collaborative filtering in pure Rust.
//!
//! Recomendar computes personalized recommendations from sparse,
//! partially-overlapping rating data. It supports two symmetric modes:
//! user-based filtering ("find items for a person" by aggregating similar
//! raters' opinions) and item-based filtering ("find items similar to an
//! item" over a precomputed similarity index, which scales to large
//! catalogs because the expensive pairwise work runs offline).
//!
//! # Quick Start
//!
//! ```
//! use recomendar::prelude::*;
//!
//! // Ratings: rater -> item -> score.
//! let matrix: RatingMatrix = [
//!     ("Lisa", "Lady in the Water", 2.5),
//!     ("Lisa", "Snakes on a Plane", 3.5),
//!     ("Lisa", "Superman Returns", 3.5),
//!     ("Gene", "Lady in the Water", 3.0),
//!     ("Gene", "Snakes on a Plane", 3.5),
//!     ("Gene", "Superman Returns", 5.0),
//!     ("Toby", "Snakes on a Plane", 4.5),
//!     ("Toby", "Superman Returns", 4.0),
//! ]
//! .into_iter()
//! .collect();
//!
//! // Who rates most like Toby?
//! let matches = top_matches(&matrix, "Toby", 2, Metric::Distance).unwrap();
//! assert_eq!(matches.len(), 2);
//!
//! // What should Toby watch next?
//! let recs = recommend_user_based(&matrix, "Toby", Metric::Distance).unwrap();
//! assert_eq!(recs[0].0, "Lady in the Water");
//!
//! // Item-based: precompute once, recommend cheaply per query.
//! let index = ItemSimilarityIndex::build(&matrix, 10);
//! let recs = recommend_item_based(&matrix, &index, "Toby").unwrap();
//! assert_eq!(recs[0].0, "Lady in the Water");
//! ```
//!
//! # Modules
//!
//! - [`matrix`]: Sparse [`RatingMatrix`] and the rater/item transpose
//! - [`similarity`]: Distance and correlation metrics over shared keys
//! - [`neighbors`]: Ranked top-N neighbor discovery
//! - [`user_based`]: Weighted-average user-based recommendations
//! - [`item_based`]: Offline [`ItemSimilarityIndex`] and item-based recommendations
//! - [`dataset`]: MovieLens-style CSV ingestion
//! - [`error`]: Error types
//!
//! Enable the `parallel` feature to fan index construction out across
//! threads with rayon.

pub mod dataset;
pub mod error;
pub mod item_based;
pub mod matrix;
pub mod neighbors;
pub mod prelude;
pub mod similarity;
pub mod user_based;

pub use error::{RecomendarError, Result};
pub use item_based::{recommend_item_based, ItemIndexBuilder, ItemSimilarityIndex};
pub use matrix::{RatingMatrix, Ratings};
pub use neighbors::top_matches;
pub use similarity::{similarity, Metric};
pub use user_based::{recommend_user_based, recommend_user_based_with, UnseenPolicy};
