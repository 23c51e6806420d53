//! Top-K recommendation lookup.
//!
//! Given a query title, the recommender reads the title's row of the
//! similarity matrix, drops the query's own column, and ranks the rest:
//!
//! 1. higher score first;
//! 2. on equal scores, lower catalog index first.
//!
//! The query is excluded by index, not by position in the ranking, so a
//! matrix whose self-similarity is not the row maximum still never
//! recommends a movie to itself.

use serde::Serialize;
use std::cmp::Ordering;

use marquee_core::Library;

use crate::error::{Error, Result};

/// Number of recommendations returned when the caller does not ask for a
/// specific count.
pub const DEFAULT_TOP_K: usize = 5;

/// One ranked recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Catalog index of the recommended movie.
    pub index: usize,
    pub title: String,
    /// Similarity to the query movie.
    pub score: f64,
}

/// Answers recommendation queries against a loaded [`Library`].
///
/// The recommender only borrows the library, so any number of them can
/// share one library across threads without locking.
#[derive(Debug, Clone, Copy)]
pub struct Recommender<'a> {
    library: &'a Library,
    top_k: usize,
}

impl<'a> Recommender<'a> {
    #[must_use]
    pub const fn new(library: &'a Library) -> Self {
        Self {
            library,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the result count used by [`Recommender::recommend_default`].
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    #[must_use]
    pub const fn library(&self) -> &'a Library {
        self.library
    }

    /// Titles of the `k` movies most similar to `title`, best first.
    ///
    /// Returns fewer than `k` titles when the catalog has fewer than
    /// `k + 1` movies. An unknown title is an error, never an empty list.
    pub fn recommend(&self, title: &str, k: usize) -> Result<Vec<String>> {
        Ok(self
            .recommend_scored(title, k)?
            .into_iter()
            .map(|rec| rec.title)
            .collect())
    }

    /// [`Recommender::recommend`] with the configured `top_k`.
    pub fn recommend_default(&self, title: &str) -> Result<Vec<String>> {
        self.recommend(title, self.top_k)
    }

    /// Like [`Recommender::recommend`], keeping index and score.
    pub fn recommend_scored(&self, title: &str, k: usize) -> Result<Vec<Recommendation>> {
        let catalog = self.library.catalog();
        let query = catalog
            .index_of(title)
            .ok_or_else(|| Error::TitleNotFound {
                title: title.to_string(),
            })?;

        let scores = self.library.scores(query).ok_or_else(|| {
            marquee_core::Error::InvalidData(format!("no similarity row for index {query}"))
        })?;

        let ranked = rank(scores, query, k);
        log::debug!(
            "Ranked {} of {} candidates for '{}' (index {})",
            ranked.len(),
            scores.len().saturating_sub(1),
            title,
            query
        );

        ranked
            .into_iter()
            .map(|(index, score)| {
                catalog
                    .get(index)
                    .map(|item| Recommendation {
                        index,
                        title: item.title.clone(),
                        score,
                    })
                    .ok_or_else(|| {
                        Error::Core(marquee_core::Error::InvalidData(format!(
                            "no catalog item at index {index}"
                        )))
                    })
            })
            .collect()
    }
}

/// Recommend `k` titles for `title` from `library`.
pub fn recommend(library: &Library, title: &str, k: usize) -> Result<Vec<String>> {
    Recommender::new(library).recommend(title, k)
}

/// Order two candidates: higher score first, then lower index.
fn by_score_then_index(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// The `k` best `(index, score)` pairs of `scores`, excluding `exclude`.
fn rank(scores: &[f64], exclude: usize, k: usize) -> Vec<(usize, f64)> {
    let mut candidates: Vec<(usize, f64)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|&(index, _)| index != exclude)
        .collect();

    if k < candidates.len() {
        candidates.select_nth_unstable_by(k, by_score_then_index);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(by_score_then_index);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::{Catalog, SimilarityMatrix};

    fn library(titles: &[&str], rows: Vec<Vec<f64>>) -> Library {
        let catalog = Catalog::from_titles(titles.iter().copied()).unwrap();
        let matrix = SimilarityMatrix::from_rows(rows).unwrap();
        Library::new(catalog, matrix).unwrap()
    }

    /// Catalog [A, B, C, D] where A's row ties B and D at 0.9.
    fn abcd() -> Library {
        library(
            &["A", "B", "C", "D"],
            vec![
                vec![1.0, 0.9, 0.3, 0.9],
                vec![0.9, 1.0, 0.2, 0.4],
                vec![0.3, 0.2, 1.0, 0.6],
                vec![0.9, 0.4, 0.6, 1.0],
            ],
        )
    }

    #[test]
    fn test_ties_break_by_ascending_index() {
        let library = abcd();
        assert_eq!(recommend(&library, "A", 5).unwrap(), vec!["B", "D", "C"]);
    }

    #[test]
    fn test_k_limits_results() {
        let library = abcd();
        assert_eq!(recommend(&library, "A", 1).unwrap(), vec!["B"]);
        assert_eq!(recommend(&library, "A", 2).unwrap(), vec!["B", "D"]);
    }

    #[test]
    fn test_k_zero_is_empty() {
        assert!(recommend(&abcd(), "A", 0).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_title_is_not_found() {
        let err = recommend(&abcd(), "Z", 5).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "title not found: Z");
    }

    #[test]
    fn test_lookup_is_exact() {
        assert!(recommend(&abcd(), "a", 5).unwrap_err().is_not_found());
        assert!(recommend(&abcd(), " A", 5).unwrap_err().is_not_found());
    }

    #[test]
    fn test_single_item_catalog_is_empty_success() {
        let library = library(&["Solo"], vec![vec![1.0]]);
        assert_eq!(recommend(&library, "Solo", 5).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_self_excluded_when_not_row_maximum() {
        // B outscores A's self-similarity; dropping the first ranked entry
        // would lose B and leak A into the results.
        let library = library(
            &["A", "B", "C"],
            vec![
                vec![0.5, 0.8, 0.1],
                vec![0.8, 1.0, 0.3],
                vec![0.1, 0.3, 1.0],
            ],
        );
        assert_eq!(recommend(&library, "A", 5).unwrap(), vec!["B", "C"]);
    }

    #[test]
    fn test_self_excluded_when_tied_with_row_maximum() {
        // C ties A's self-score and sits after it by index.
        let library = library(
            &["X", "A", "C"],
            vec![
                vec![1.0, 0.2, 0.2],
                vec![0.2, 1.0, 1.0],
                vec![0.2, 1.0, 1.0],
            ],
        );
        assert_eq!(recommend(&library, "A", 5).unwrap(), vec!["C", "X"]);
    }

    #[test]
    fn test_duplicate_title_queries_first_occurrence() {
        let library = library(
            &["Heat", "Alien", "Heat"],
            vec![
                vec![1.0, 0.1, 0.9],
                vec![0.1, 1.0, 0.5],
                vec![0.9, 0.5, 1.0],
            ],
        );
        // Row 0 is used; the other "Heat" is a distinct item and may appear.
        assert_eq!(recommend(&library, "Heat", 5).unwrap(), vec!["Heat", "Alien"]);
    }

    #[test]
    fn test_scored_results_are_ordered() {
        let library = abcd();
        let recs = Recommender::new(&library).recommend_scored("D", 5).unwrap();

        let indices: Vec<usize> = recs.iter().map(|rec| rec.index).collect();
        assert_eq!(indices, vec![0, 2, 1]);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(recs[0].score, 0.9);
    }

    #[test]
    fn test_negative_scores_rank_below_zero() {
        let library = library(
            &["A", "B", "C"],
            vec![
                vec![1.0, -0.5, 0.0],
                vec![-0.5, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
        );
        assert_eq!(recommend(&library, "A", 5).unwrap(), vec!["C", "B"]);
    }

    #[test]
    fn test_recommend_default_uses_top_k() {
        let titles: Vec<String> = (0..10).map(|i| format!("M{i}")).collect();
        let rows = (0..10)
            .map(|i| {
                (0..10)
                    .map(|j| if i == j { 1.0 } else { 1.0 / (1.0 + (i as f64 - j as f64).abs()) })
                    .collect()
            })
            .collect();
        let catalog = Catalog::from_titles(titles).unwrap();
        let library = Library::new(catalog, SimilarityMatrix::from_rows(rows).unwrap()).unwrap();

        let recommender = Recommender::new(&library);
        assert_eq!(recommender.top_k(), DEFAULT_TOP_K);
        assert_eq!(
            recommender.recommend_default("M0").unwrap(),
            vec!["M1", "M2", "M3", "M4", "M5"]
        );

        let recommender = recommender.with_top_k(2);
        assert_eq!(recommender.recommend_default("M5").unwrap(), vec!["M4", "M6"]);
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let library = abcd();
        let recommender = Recommender::new(&library);
        let first = recommender.recommend("C", 3).unwrap();
        for _ in 0..5 {
            assert_eq!(recommender.recommend("C", 3).unwrap(), first);
        }
    }

    #[test]
    fn test_rank_partial_selection_matches_full_sort() {
        let scores = [0.4, 0.9, 0.4, 0.1, 0.9, 0.7, 0.4, 1.0];
        for k in 0..scores.len() + 2 {
            let mut full = rank(&scores, 7, usize::MAX);
            full.truncate(k);
            assert_eq!(rank(&scores, 7, k), full, "k = {k}");
        }
    }
}
