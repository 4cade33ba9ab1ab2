//! Shared state for the books module handlers.

use std::sync::Arc;

use folio_store::BookStore;

use super::cache::CountCache;

/// Builds the absolute URLs the catalog hands out: resource links and
/// pagination links. Constructed once from the configured public base URL.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    pub fn new(public_base_url: &str) -> Self {
        Self {
            base: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Link to a single book resource.
    pub fn book(&self, book_id: &str) -> String {
        format!("{}/book/{}", self.base, book_id)
    }

    /// Link to a page of the book list, carrying `query` verbatim.
    pub fn books_page(&self, query: &str) -> String {
        format!("{}/books?{}", self.base, query)
    }
}

/// State injected into the books router: the store handle, the count
/// cache, and the link builder. Constructed at service start and passed
/// to handlers explicitly; there are no module-level singletons.
#[derive(Clone)]
pub struct CatalogState {
    pub store: Arc<dyn BookStore>,
    pub counts: Arc<CountCache>,
    pub links: LinkBuilder,
}

impl CatalogState {
    pub fn new(store: Arc<dyn BookStore>, public_base_url: &str) -> Self {
        Self {
            store,
            counts: Arc::new(CountCache::new()),
            links: LinkBuilder::new(public_base_url),
        }
    }
}
