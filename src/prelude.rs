//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use recomendar::prelude::*;
//! ```

pub use crate::dataset::load_movielens;
pub use crate::error::{RecomendarError, Result};
pub use crate::item_based::{recommend_item_based, ItemIndexBuilder, ItemSimilarityIndex};
pub use crate::matrix::{RatingMatrix, Ratings};
pub use crate::neighbors::top_matches;
pub use crate::similarity::{similarity, Metric};
pub use crate::user_based::{recommend_user_based, recommend_user_based_with, UnseenPolicy};
