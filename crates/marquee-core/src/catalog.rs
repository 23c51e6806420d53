//! The movie catalog: an ordered, frozen table of [`Item`]s.
//!
//! Catalogs are loaded from JSON in one of two layouts:
//!
//! - a record list, one object per movie in index order:
//!
//!   ```json
//!   [{"title": "Avatar", "movie_id": 19995}, {"title": "Spectre"}]
//!   ```
//!
//! - a column table keyed by row label, the shape a dataframe produces
//!   when exported as a dictionary:
//!
//!   ```json
//!   {"title": {"0": "Avatar", "1": "Spectre"}, "movie_id": {"0": 19995, "1": 206647}}
//!   ```
//!
//! Row labels in the column layout must cover exactly `0..N`.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Item;

// ---------------------------------------------------------------------------
// On-disk layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Records(Vec<Record>),
    Columns(Columns),
}

#[derive(Debug, Deserialize)]
struct Record {
    title: String,
    #[serde(default)]
    movie_id: Option<u64>,
    #[serde(default)]
    tags: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Columns {
    title: BTreeMap<String, String>,
    #[serde(default)]
    movie_id: BTreeMap<String, Option<u64>>,
    #[serde(default)]
    tags: BTreeMap<String, Option<String>>,
}

impl CatalogFile {
    fn into_items(self) -> Result<Vec<Item>> {
        match self {
            Self::Records(records) => Ok(records
                .into_iter()
                .enumerate()
                .map(|(index, record)| Item {
                    index,
                    title: record.title,
                    movie_id: record.movie_id,
                    tags: record.tags,
                })
                .collect()),
            Self::Columns(columns) => columns.into_items(),
        }
    }
}

impl Columns {
    fn into_items(self) -> Result<Vec<Item>> {
        let mut rows = self
            .title
            .into_iter()
            .map(|(label, title)| parse_label(&label).map(|index| (index, label, title)))
            .collect::<Result<Vec<_>>>()?;
        rows.sort_by_key(|(index, _, _)| *index);

        let mut movie_ids = self.movie_id;
        let mut tags = self.tags;
        let mut items = Vec::with_capacity(rows.len());

        for (position, (index, label, title)) in rows.into_iter().enumerate() {
            if index != position {
                return Err(Error::InvalidData(format!(
                    "catalog row labels must be contiguous from 0; expected {position}, found {index}"
                )));
            }
            items.push(Item {
                index,
                title,
                movie_id: movie_ids.remove(&label).flatten(),
                tags: tags.remove(&label).flatten(),
            });
        }

        // Leftover labels mean the columns are misaligned with `title`.
        let orphaned: Vec<&str> = movie_ids
            .keys()
            .chain(tags.keys())
            .map(String::as_str)
            .collect();
        if !orphaned.is_empty() {
            return Err(Error::InvalidData(format!(
                "catalog columns have {} row label(s) with no title: {}",
                orphaned.len(),
                orphaned.join(", ")
            )));
        }

        Ok(items)
    }
}

fn parse_label(label: &str) -> Result<usize> {
    label
        .trim()
        .parse()
        .map_err(|_| Error::InvalidData(format!("catalog row label '{label}' is not an index")))
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// An ordered, non-empty sequence of movies.
///
/// The position of each item is its index into the similarity matrix. The
/// order is fixed at construction and never changes afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    by_title: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from items already in index order.
    ///
    /// Fails if `items` is empty or any item's `index` differs from its
    /// position.
    pub fn from_items(items: Vec<Item>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let mut by_title = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if item.index != position {
                return Err(Error::InvalidData(format!(
                    "item '{}' has index {} but sits at position {position}",
                    item.title, item.index
                )));
            }
            // First occurrence wins for duplicate titles.
            by_title.entry(item.title.clone()).or_insert(position);
        }

        Ok(Self { items, by_title })
    }

    /// Build a catalog of bare titles, indexed by position.
    pub fn from_titles<I, S>(titles: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = titles
            .into_iter()
            .enumerate()
            .map(|(index, title)| Item::new(index, title))
            .collect();
        Self::from_items(items)
    }

    /// Parse a catalog from JSON text in either supported layout.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_items(file.into_items()?)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let file: CatalogFile = serde_json::from_reader(reader)?;
        let catalog = Self::from_items(file.into_items()?)?;
        log::debug!(
            "Loaded {} catalog items from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`: an empty catalog cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Resolve a title to its index by exact match.
    #[must_use]
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.by_title.get(title).copied()
    }

    /// Titles in index order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.title.as_str())
    }

    /// Items whose title contains `query`, ignoring case, in index order.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Item> + 'a {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(move |item| item.title.to_lowercase().contains(&needle))
    }

    /// Up to `limit` titles resembling `query`, for "did you mean" hints.
    #[must_use]
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&str> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        self.search(query)
            .take(limit)
            .map(|item| item.title.as_str())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
