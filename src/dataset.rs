//! MovieLens-style dataset ingestion.
//!
//! Builds a [`RatingMatrix`] from two CSV files in a directory:
//!
//! - `movies.csv`: item catalog, `movieId,title,genres`. Titles may contain
//!   commas, so fields are parsed with full quoting rules.
//! - `ratings.csv`: `userId,movieId,rating,timestamp`. The header row is
//!   skipped and the timestamp ignored.
//!
//! Ratings are joined to display titles, so the resulting matrix is keyed
//! rater id → {title → rating}. A rating referencing a movie id absent from
//! the catalog is a data-integrity error and fails the load immediately.

use crate::error::{RecomendarError, Result};
use crate::matrix::RatingMatrix;
use std::collections::HashMap;
use std::path::Path;

/// Load `movies.csv` + `ratings.csv` from `dir` into a rating matrix.
///
/// # Errors
///
/// [`RecomendarError::Io`] if either file cannot be opened;
/// [`RecomendarError::DatasetError`] with file and line context for
/// malformed records, unparseable ratings, or ratings whose movie id is
/// missing from the catalog.
pub fn load_movielens<P: AsRef<Path>>(dir: P) -> Result<RatingMatrix> {
    let dir = dir.as_ref();
    let catalog = load_catalog(&dir.join("movies.csv"))?;
    load_ratings(&dir.join("ratings.csv"), &catalog)
}

/// movieId → display title.
fn load_catalog(path: &Path) -> Result<HashMap<String, String>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_open_error(path, &e))?;

    let mut catalog = HashMap::new();
    // Line 1 is the header.
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = result.map_err(|e| dataset_error(path, line, format!("bad record: {e}")))?;
        let movie_id = field(&record, 0, path, line, "movieId")?;
        let title = field(&record, 1, path, line, "title")?;
        catalog.insert(movie_id.to_string(), title.to_string());
    }
    Ok(catalog)
}

fn load_ratings(path: &Path, catalog: &HashMap<String, String>) -> Result<RatingMatrix> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_open_error(path, &e))?;

    let mut matrix = RatingMatrix::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = result.map_err(|e| dataset_error(path, line, format!("bad record: {e}")))?;
        let user_id = field(&record, 0, path, line, "userId")?;
        let movie_id = field(&record, 1, path, line, "movieId")?;
        let rating_raw = field(&record, 2, path, line, "rating")?;
        // Field 3 is the timestamp, ignored.

        let rating: f64 = rating_raw.trim().parse().map_err(|_| {
            dataset_error(path, line, format!("unparseable rating '{rating_raw}'"))
        })?;
        let title = catalog.get(movie_id).ok_or_else(|| {
            dataset_error(path, line, format!("movieId {movie_id} not in catalog"))
        })?;

        matrix.insert(user_id, title.clone(), rating);
    }
    Ok(matrix)
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    path: &Path,
    line: usize,
    name: &str,
) -> Result<&'r str> {
    record
        .get(idx)
        .ok_or_else(|| dataset_error(path, line, format!("missing {name} field")))
}

fn csv_open_error(path: &Path, err: &csv::Error) -> RecomendarError {
    RecomendarError::DatasetError {
        path: path.display().to_string(),
        line: 0,
        message: format!("cannot open: {err}"),
    }
}

fn dataset_error(path: &Path, line: usize, message: String) -> RecomendarError {
    RecomendarError::DatasetError {
        path: path.display().to_string(),
        line,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_joins_titles() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "movies.csv",
            "movieId,title,genres\n1,Toy Story (1995),Animation\n2,\"American President, The (1995)\",Drama\n",
        );
        write_file(
            dir.path(),
            "ratings.csv",
            "userId,movieId,rating,timestamp\n7,1,4.0,964982703\n7,2,3.5,964981247\n9,1,5.0,847434962\n",
        );

        let matrix = load_movielens(dir.path()).unwrap();
        assert_eq!(matrix.len(), 2);
        let user7 = matrix.ratings("7").unwrap();
        assert_eq!(user7["Toy Story (1995)"], 4.0);
        // The quoted title keeps its embedded comma.
        assert_eq!(user7["American President, The (1995)"], 3.5);
        assert_eq!(matrix.ratings("9").unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_movie_id_fails_with_line_context() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "movies.csv", "movieId,title,genres\n1,Toy Story (1995),Animation\n");
        write_file(
            dir.path(),
            "ratings.csv",
            "userId,movieId,rating,timestamp\n7,1,4.0,964982703\n7,99,3.5,964981247\n",
        );

        let err = load_movielens(dir.path()).unwrap_err();
        match err {
            RecomendarError::DatasetError { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("99"));
            }
            other => panic!("expected DatasetError, got {other}"),
        }
    }

    #[test]
    fn test_unparseable_rating() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "movies.csv", "movieId,title,genres\n1,Toy Story (1995),Animation\n");
        write_file(
            dir.path(),
            "ratings.csv",
            "userId,movieId,rating,timestamp\n7,1,great,964982703\n",
        );

        let err = load_movielens(dir.path()).unwrap_err();
        assert!(matches!(err, RecomendarError::DatasetError { line: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_movielens(dir.path()).unwrap_err();
        assert!(matches!(err, RecomendarError::DatasetError { line: 0, .. }));
    }
}
