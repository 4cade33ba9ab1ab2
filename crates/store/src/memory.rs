//! In-process document backend.

use std::collections::BTreeSet;

use parking_lot::Mutex;

use crate::{BookRecord, BookStore, Filter, StoreError};

#[derive(Default)]
struct Inner {
    /// Documents in insertion order; list pagination depends on a stable
    /// ordering across calls.
    books: Vec<BookRecord>,
    authors: BTreeSet<String>,
    genres: BTreeSet<String>,
}

/// In-memory [`BookStore`] with the same observable semantics as a
/// document database carrying a unique index on `name`: used for tests
/// and local runs, swapped for a driver-backed implementation in
/// production.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing documents, registering their facets.
    /// Fingerprints on the seeded records are taken as-is, which keeps
    /// legacy documents without one representable.
    pub fn seeded(books: Vec<BookRecord>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock();
            for book in books {
                inner.authors.insert(book.author.clone());
                inner.genres.extend(book.genres.iter().cloned());
                inner.books.push(book);
            }
        }
        store
    }
}

#[async_trait::async_trait]
impl BookStore for MemoryStore {
    async fn count_matching(&self, filter: &Filter) -> Result<u64, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.books.iter().filter(|book| filter.matches(book)).count() as u64)
    }

    async fn list_matching(
        &self,
        filter: &Filter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<BookRecord>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .books
            .iter()
            .filter(|book| filter.matches(book))
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, book_id: &str) -> Result<Option<BookRecord>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.books.iter().find(|book| book.book_id == book_id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<BookRecord>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.books.iter().find(|book| book.name == name).cloned())
    }

    async fn insert(&self, book: BookRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.books.iter().any(|existing| existing.name == book.name) {
            return Err(StoreError::ResourceExists { name: book.name });
        }
        tracing::debug!(book_id = %book.book_id, name = %book.name, "inserting book");
        inner.books.push(book);
        Ok(())
    }

    async fn replace(&self, book_id: &str, book: BookRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if let Some(slot) = inner.books.iter_mut().find(|existing| existing.book_id == book_id) {
            *slot = book;
        }
        Ok(())
    }

    async fn delete(&self, book_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.books.retain(|book| book.book_id != book_id);
        Ok(())
    }

    async fn register_author(&self, name: &str) -> Result<(), StoreError> {
        self.inner.lock().authors.insert(name.to_string());
        Ok(())
    }

    async fn register_genre(&self, name: &str) -> Result<(), StoreError> {
        self.inner.lock().genres.insert(name.to_string());
        Ok(())
    }

    async fn list_authors(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.inner.lock().authors.iter().cloned().collect())
    }

    async fn list_genres(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.inner.lock().genres.iter().cloned().collect())
    }
}
