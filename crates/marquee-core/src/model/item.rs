use serde::{Deserialize, Serialize};

/// A single recommendable movie.
///
/// `index` is the item's position in the [`Catalog`](crate::Catalog) and
/// doubles as its row and column in the
/// [`SimilarityMatrix`](crate::SimilarityMatrix).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub index: usize,
    pub title: String,

    /// External movie identifier carried by the source table, if any.
    pub movie_id: Option<u64>,

    /// Free-form descriptive tags the similarity scores were built from.
    pub tags: Option<String>,
}

impl Item {
    #[must_use]
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            movie_id: None,
            tags: None,
        }
    }

    #[must_use]
    pub fn with_movie_id(mut self, movie_id: u64) -> Self {
        self.movie_id = Some(movie_id);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_new() {
        let item = Item::new(3, "Avatar");
        assert_eq!(item.index, 3);
        assert_eq!(item.title, "Avatar");
        assert!(item.movie_id.is_none());
        assert!(item.tags.is_none());
    }

    #[test]
    fn test_item_builder() {
        let item = Item::new(0, "Spectre")
            .with_movie_id(206_647)
            .with_tags("spy action sequel");

        assert_eq!(item.movie_id, Some(206_647));
        assert_eq!(item.tags, Some("spy action sequel".to_string()));
    }
}
