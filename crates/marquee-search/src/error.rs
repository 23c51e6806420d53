//! Recommendation error types.

use thiserror::Error;

/// Errors that can occur while answering a recommendation query.
#[derive(Debug, Error)]
pub enum Error {
    /// No catalog item has exactly this title.
    #[error("title not found: {title}")]
    TitleNotFound { title: String },

    /// An error propagated from the core data layer.
    #[error(transparent)]
    Core(#[from] marquee_core::Error),
}

impl Error {
    /// Returns `true` when the query title is not in the catalog.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TitleNotFound { .. })
    }
}

/// Convenience alias for recommendation results.
pub type Result<T> = std::result::Result<T, Error>;
