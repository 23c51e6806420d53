//! A validated pairing of [`Catalog`] and [`SimilarityMatrix`].

use std::path::Path;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::matrix::SimilarityMatrix;
use crate::model::Item;

/// The loaded, read-only state every recommendation query runs against.
///
/// Catalog position `i` and matrix row `i` describe the same movie. That
/// coupling is checked once here, so downstream code can index either side
/// with the same index.
#[derive(Debug, Clone)]
pub struct Library {
    catalog: Catalog,
    matrix: SimilarityMatrix,
}

impl Library {
    /// Bind a catalog to its similarity matrix.
    ///
    /// Fails with [`Error::DimensionMismatch`] unless the matrix is exactly
    /// `N`x`N` for a catalog of `N` items.
    pub fn new(catalog: Catalog, matrix: SimilarityMatrix) -> Result<Self> {
        if catalog.len() != matrix.dim() {
            return Err(Error::DimensionMismatch {
                catalog: catalog.len(),
                matrix: matrix.dim(),
            });
        }
        Ok(Self { catalog, matrix })
    }

    /// Load and validate both artifacts.
    pub fn load(catalog_path: impl AsRef<Path>, similarity_path: impl AsRef<Path>) -> Result<Self> {
        let catalog = Catalog::load(catalog_path.as_ref())?;
        let matrix = SimilarityMatrix::load(similarity_path.as_ref())?;
        let library = Self::new(catalog, matrix)?;

        log::info!(
            "Loaded library of {} movies ({}, {})",
            library.len(),
            catalog_path.as_ref().display(),
            similarity_path.as_ref().display()
        );

        Ok(library)
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Resolve a title to its catalog item by exact match.
    #[must_use]
    pub fn find(&self, title: &str) -> Option<&Item> {
        self.catalog
            .index_of(title)
            .and_then(|index| self.catalog.get(index))
    }

    /// The similarity row for the item at `index`.
    #[must_use]
    pub fn scores(&self, index: usize) -> Option<&[f64]> {
        self.matrix.row(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Library {
        let catalog = Catalog::from_titles(["A", "B", "C"]).unwrap();
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.5, 0.1],
            vec![0.5, 1.0, 0.2],
            vec![0.1, 0.2, 1.0],
        ])
        .unwrap();
        Library::new(catalog, matrix).unwrap()
    }

    #[test]
    fn test_new_binds_matching_dimensions() {
        let library = sample();
        assert_eq!(library.len(), 3);
        assert_eq!(library.find("B").map(|item| item.index), Some(1));
        assert_eq!(library.scores(2), Some(&[0.1, 0.2, 1.0][..]));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let catalog = Catalog::from_titles(["A", "B", "C"]).unwrap();
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5, 1.0]]).unwrap();

        let err = Library::new(catalog, matrix).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                catalog: 3,
                matrix: 2
            }
        ));
        assert_eq!(
            err.to_string(),
            "similarity matrix is 2x2 but the catalog has 3 items"
        );
    }

    #[test]
    fn test_find_unknown_title() {
        assert!(sample().find("Z").is_none());
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("movies.json");
        let similarity_path = dir.path().join("similarity.json");
        std::fs::write(&catalog_path, r#"{"title": {"0": "A", "1": "B"}}"#).unwrap();
        std::fs::write(&similarity_path, "[[1, 0.3], [0.3, 1]]").unwrap();

        let library = Library::load(&catalog_path, &similarity_path).unwrap();
        assert_eq!(library.len(), 2);
        assert_eq!(library.matrix().get(1, 0), Some(0.3));
    }

    #[test]
    fn test_load_mismatched_files() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("movies.json");
        let similarity_path = dir.path().join("similarity.json");
        std::fs::write(&catalog_path, r#"[{"title": "A"}]"#).unwrap();
        std::fs::write(&similarity_path, "[[1, 0.3], [0.3, 1]]").unwrap();

        let result = Library::load(&catalog_path, &similarity_path);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }
}
