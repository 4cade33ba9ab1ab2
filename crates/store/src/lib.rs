//! Document store adapter for the folio catalog.
//!
//! The [`BookStore`] trait is the capability boundary between the catalog
//! handlers and whatever document database backs the service. Every
//! operation is individually atomic at single-document granularity; the
//! catalog never relies on multi-document transactions.

use serde::{Deserialize, Serialize};

mod memory;

pub use memory::MemoryStore;

/// A book document as persisted by the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Server-generated identity; assigned once, never mutated.
    pub book_id: String,
    pub name: String,
    pub author: String,
    pub description: String,
    pub published_year: i32,
    pub genres: Vec<String>,
    /// Content fingerprint. `None` marks a legacy document written before
    /// fingerprints existed; conditional semantics are disabled for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Optional constraints narrowing list and count queries.
///
/// An absent component means "no constraint on that dimension". A book
/// matches when every present component matches: author membership,
/// non-empty genre intersection, year equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub authors: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub published_year: Option<i32>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.authors.is_none() && self.genres.is_none() && self.published_year.is_none()
    }

    pub fn matches(&self, book: &BookRecord) -> bool {
        if let Some(authors) = &self.authors {
            if !authors.iter().any(|author| author == &book.author) {
                return false;
            }
        }
        if let Some(genres) = &self.genres {
            if !genres.iter().any(|genre| book.genres.contains(genre)) {
                return false;
            }
        }
        if let Some(year) = self.published_year {
            if book.published_year != year {
                return false;
            }
        }
        true
    }

    /// Canonical form of this filter: author and genre sets sorted and
    /// deduplicated. Two filters that constrain the same documents share
    /// one canonical key regardless of how their parameters were spelled.
    pub fn canonical(&self) -> FilterKey {
        fn normalize(values: &Option<Vec<String>>) -> Vec<String> {
            let mut values = values.clone().unwrap_or_default();
            values.sort();
            values.dedup();
            values
        }

        FilterKey {
            authors: normalize(&self.authors),
            genres: normalize(&self.genres),
            published_year: self.published_year,
        }
    }
}

/// Hashable canonical filter identity, used as the count cache key.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FilterKey {
    authors: Vec<String>,
    genres: Vec<String>,
    published_year: Option<i32>,
}

/// Failures surfaced by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A document with the same unique name already exists.
    #[error("book '{name}' already exists")]
    ResourceExists { name: String },

    /// Any other backend failure; propagated unmodified to the caller's
    /// generic error handling.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Capability interface over the document-oriented backing store.
///
/// A production deployment plugs a database driver in behind this trait;
/// [`MemoryStore`] provides the in-process implementation used for tests
/// and local runs. Retry policy, if any, belongs to the implementation.
#[async_trait::async_trait]
pub trait BookStore: Send + Sync {
    /// Number of documents matching `filter`.
    async fn count_matching(&self, filter: &Filter) -> Result<u64, StoreError>;

    /// The matching documents in stable insertion order, sliced by
    /// `skip`/`limit`.
    async fn list_matching(
        &self,
        filter: &Filter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<BookRecord>, StoreError>;

    async fn get_by_id(&self, book_id: &str) -> Result<Option<BookRecord>, StoreError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<BookRecord>, StoreError>;

    /// Insert a new document. Fails with [`StoreError::ResourceExists`]
    /// when the unique name is already taken.
    async fn insert(&self, book: BookRecord) -> Result<(), StoreError>;

    /// Replace the document with identity `book_id`. Replacing an absent
    /// id is a no-op; handlers check existence first.
    async fn replace(&self, book_id: &str, book: BookRecord) -> Result<(), StoreError>;

    /// Delete the document with identity `book_id`. Deleting an absent id
    /// is a no-op.
    async fn delete(&self, book_id: &str) -> Result<(), StoreError>;

    /// Record that an author exists. Idempotent; the registry is
    /// append-only.
    async fn register_author(&self, name: &str) -> Result<(), StoreError>;

    /// Record that a genre exists. Idempotent; the registry is
    /// append-only.
    async fn register_genre(&self, name: &str) -> Result<(), StoreError>;

    async fn list_authors(&self) -> Result<Vec<String>, StoreError>;

    async fn list_genres(&self) -> Result<Vec<String>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, author: &str, year: i32, genres: &[&str]) -> BookRecord {
        BookRecord {
            book_id: format!("id-{name}"),
            name: name.to_string(),
            author: author.to_string(),
            description: "Some description".to_string(),
            published_year: year,
            genres: genres.iter().map(|genre| genre.to_string()).collect(),
            etag: None,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = Filter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&record("a", "X", 1997, &["Fiction"])));
    }

    #[test]
    fn filter_components_combine_conjunctively() {
        let filter = Filter {
            authors: Some(vec!["Sidney Sheldon".to_string()]),
            genres: Some(vec!["Thriller".to_string()]),
            published_year: Some(1997),
        };

        let matching = record("a", "Sidney Sheldon", 1997, &["Fiction", "Thriller"]);
        assert!(filter.matches(&matching));

        let wrong_year = record("b", "Sidney Sheldon", 2000, &["Thriller"]);
        assert!(!filter.matches(&wrong_year));

        let wrong_genre = record("c", "Sidney Sheldon", 1997, &["Romance"]);
        assert!(!filter.matches(&wrong_genre));
    }

    #[test]
    fn canonical_key_ignores_ordering_and_duplicates() {
        let spelled_one_way = Filter {
            authors: Some(vec!["B".to_string(), "A".to_string()]),
            genres: Some(vec!["G".to_string(), "G".to_string()]),
            published_year: Some(1997),
        };
        let spelled_another = Filter {
            authors: Some(vec!["A".to_string(), "B".to_string(), "A".to_string()]),
            genres: Some(vec!["G".to_string()]),
            published_year: Some(1997),
        };

        assert_eq!(spelled_one_way.canonical(), spelled_another.canonical());
    }
}
