//! Error types for Recomendar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Recomendar operations.
///
/// Distinguishes lookup failures from numerically undefined similarities:
/// querying a key that is not in the matrix is always an error, while two
/// entities sharing zero rated items is not (that pair scores the 0.0
/// "no relation" sentinel instead).
///
/// # Examples
///
/// ```
/// use recomendar::error::RecomendarError;
///
/// let err = RecomendarError::UnknownKey {
///     key: "Toby".to_string(),
/// };
/// assert!(err.to_string().contains("Toby"));
/// ```
#[derive(Debug)]
pub enum RecomendarError {
    /// Query key not present in the rating matrix.
    UnknownKey {
        /// The key that was looked up
        key: String,
    },

    /// Correlation is undefined: one side has zero rating variance over the
    /// shared items. Distinct from the 0.0 no-overlap sentinel; rankers and
    /// aggregators exclude the pair instead of propagating NaN.
    UndefinedSimilarity {
        /// Number of shared items the pair was scored over
        shared: usize,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Malformed or inconsistent record in a dataset file.
    DatasetError {
        /// File the record came from
        path: String,
        /// 1-based line number of the offending record
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Index serialization/deserialization error.
    Serialization(String),
}

impl fmt::Display for RecomendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecomendarError::UnknownKey { key } => {
                write!(f, "Unknown key: '{key}' is not in the rating matrix")
            }
            RecomendarError::UndefinedSimilarity { shared } => {
                write!(
                    f,
                    "Undefined similarity: zero rating variance over {shared} shared items"
                )
            }
            RecomendarError::Io(e) => write!(f, "I/O error: {e}"),
            RecomendarError::DatasetError {
                path,
                line,
                message,
            } => {
                write!(f, "Dataset error in {path} at line {line}: {message}")
            }
            RecomendarError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for RecomendarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecomendarError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RecomendarError {
    fn from(err: std::io::Error) -> Self {
        RecomendarError::Io(err)
    }
}

impl RecomendarError {
    /// Create an unknown-key error from any key type.
    #[must_use]
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownKey { key: key.into() }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, RecomendarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_display() {
        let err = RecomendarError::UnknownKey {
            key: "ghost".to_string(),
        };
        assert!(err.to_string().contains("Unknown key"));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_undefined_similarity_display() {
        let err = RecomendarError::UndefinedSimilarity { shared: 3 };
        let msg = err.to_string();
        assert!(msg.contains("Undefined similarity"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_dataset_error_display() {
        let err = RecomendarError::DatasetError {
            path: "ratings.csv".to_string(),
            line: 42,
            message: "movieId 999 not in catalog".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ratings.csv"));
        assert!(msg.contains("42"));
        assert!(msg.contains("999"));
    }

    #[test]
    fn test_serialization_display() {
        let err = RecomendarError::Serialization("invalid JSON".to_string());
        assert!(err.to_string().contains("Serialization"));
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RecomendarError = io_err.into();
        assert!(matches!(err, RecomendarError::Io(_)));
    }

    #[test]
    fn test_error_source_io() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = RecomendarError::Io(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_source_other() {
        use std::error::Error;
        let err = RecomendarError::unknown_key("x");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_unknown_key_helper() {
        let err = RecomendarError::unknown_key("Toby");
        assert!(matches!(err, RecomendarError::UnknownKey { .. }));
    }
}
