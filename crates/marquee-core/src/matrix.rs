//! Precomputed pairwise similarity scores.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};

/// Tolerance used when checking symmetry.
const SYMMETRY_EPSILON: f64 = 1e-9;

/// A square matrix where cell `(i, j)` is the similarity of item `i` to
/// item `j`.
///
/// Scores are stored row-major in a single buffer. No range is enforced,
/// but every score must be finite so rows can be totally ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Build a matrix from nested rows.
    ///
    /// Fails if there are no rows, the rows are not all `N` long for `N`
    /// rows, or any score is NaN or infinite.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let dim = rows.len();
        if dim == 0 {
            return Err(Error::InvalidData("similarity matrix is empty".into()));
        }

        let mut scores = Vec::with_capacity(dim * dim);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(Error::InvalidData(format!(
                    "similarity matrix is not square: row {i} has {} columns, expected {dim}",
                    row.len()
                )));
            }
            if let Some(j) = row.iter().position(|score| !score.is_finite()) {
                return Err(Error::InvalidData(format!(
                    "similarity matrix has a non-finite score at ({i}, {j})"
                )));
            }
            scores.extend(row);
        }

        Ok(Self { dim, scores })
    }

    /// Parse a matrix from a JSON array of rows.
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<Vec<f64>> = serde_json::from_str(json)?;
        Self::from_rows(rows)
    }

    /// Load a matrix from a JSON file holding an array of rows.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let rows: Vec<Vec<f64>> = serde_json::from_reader(reader)?;
        let matrix = Self::from_rows(rows)?;
        log::debug!(
            "Loaded {0}x{0} similarity matrix from {1}",
            matrix.dim(),
            path.as_ref().display()
        );
        Ok(matrix)
    }

    /// Number of rows (and columns).
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Scores of item `i` against every item, in catalog order.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i >= self.dim {
            return None;
        }
        let start = i * self.dim;
        self.scores.get(start..start + self.dim)
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if j >= self.dim {
            return None;
        }
        self.row(i).map(|row| row[j])
    }

    /// Whether `(i, j)` and `(j, i)` agree for every pair.
    ///
    /// Lookups never rely on this; it is reported for diagnostics.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.dim).all(|i| {
            (i + 1..self.dim).all(|j| {
                let upper = self.scores[i * self.dim + j];
                let lower = self.scores[j * self.dim + i];
                (upper - lower).abs() <= SYMMETRY_EPSILON
            })
        })
    }
}
