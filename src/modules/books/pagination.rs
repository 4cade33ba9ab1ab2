//! Page planning for the book list.

use folio_store::{BookStore, Filter, StoreError};

use super::cache::CountCache;
use super::state::LinkBuilder;

/// Books per page. The wire contract fixes this; clients steer with the
/// `page` parameter only.
pub const PAGE_SIZE: u64 = 3;

/// The computed slice bounds and navigation links for one list request.
#[derive(Debug, PartialEq, Eq)]
pub struct PagePlan {
    pub skip: u64,
    pub limit: u64,
    pub total: u64,
    pub prev_page: Option<String>,
    pub next_page: Option<String>,
}

/// Plan a page: slice arithmetic plus prev/next links.
///
/// The total always comes through the count cache for the same filter;
/// counts are never assumed monotonic across requests, so a neighbor link
/// reflects whatever the cache knew after the latest completed write.
/// Non-positive pages clamp to page 1.
pub async fn plan(
    filter: &Filter,
    page: u64,
    counts: &CountCache,
    store: &dyn BookStore,
    links: &LinkBuilder,
) -> Result<PagePlan, StoreError> {
    let page = page.max(1);
    let skip = PAGE_SIZE * (page - 1);
    let total = counts.get_count(store, filter).await?;

    let prev_page = (page > 1).then(|| links.books_page(&page_query(filter, page - 1)));
    let next_page =
        (skip + PAGE_SIZE < total).then(|| links.books_page(&page_query(filter, page + 1)));

    Ok(PagePlan {
        skip,
        limit: PAGE_SIZE,
        total,
        prev_page,
        next_page,
    })
}

/// Encode the filter plus a page number as a query string. Multi-valued
/// dimensions join with commas so the dimension separator (`&`) stays
/// unambiguous, and a returned link replays to the identical filtered,
/// paged result.
fn page_query(filter: &Filter, page: u64) -> String {
    let mut params = Vec::new();
    if let Some(authors) = &filter.authors {
        params.push(format!("authors={}", join_values(authors)));
    }
    if let Some(genres) = &filter.genres {
        params.push(format!("genres={}", join_values(genres)));
    }
    if let Some(year) = filter.published_year {
        params.push(format!("published_year={year}"));
    }
    params.push(format!("page={page}"));
    params.join("&")
}

fn join_values(values: &[String]) -> String {
    values
        .iter()
        .map(|value| encode_value(value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Percent-encode one query value. The comma stays reserved as the
/// multi-value delimiter, so a literal comma inside a value is escaped.
fn encode_value(value: &str) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use folio_store::{BookRecord, BookStore, MemoryStore};

    fn record(name: &str) -> BookRecord {
        BookRecord {
            book_id: format!("id-{name}"),
            name: name.to_string(),
            author: "Sidney Sheldon".to_string(),
            description: "Some description".to_string(),
            published_year: 1997,
            genres: vec!["Fiction".to_string()],
            etag: None,
        }
    }

    async fn seeded_store(count: usize) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        for index in 0..count {
            store.insert(record(&format!("book-{index}"))).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn first_page_of_four_has_next_but_no_prev() {
        let store = seeded_store(4).await;
        let counts = CountCache::new();
        let links = LinkBuilder::new("http://testserver");

        let plan = plan(&Filter::default(), 1, &counts, store.as_ref(), &links)
            .await
            .unwrap();

        assert_eq!(plan.skip, 0);
        assert_eq!(plan.limit, PAGE_SIZE);
        assert_eq!(plan.total, 4);
        assert!(plan.prev_page.is_none());
        assert_eq!(
            plan.next_page.as_deref(),
            Some("http://testserver/books?page=2")
        );
    }

    #[tokio::test]
    async fn last_page_of_four_has_prev_but_no_next() {
        let store = seeded_store(4).await;
        let counts = CountCache::new();
        let links = LinkBuilder::new("http://testserver");

        let plan = plan(&Filter::default(), 2, &counts, store.as_ref(), &links)
            .await
            .unwrap();

        assert_eq!(plan.skip, 3);
        assert!(plan.next_page.is_none());
        assert_eq!(
            plan.prev_page.as_deref(),
            Some("http://testserver/books?page=1")
        );
    }

    #[tokio::test]
    async fn exact_multiple_of_page_size_has_no_trailing_page() {
        let store = seeded_store(3).await;
        let counts = CountCache::new();
        let links = LinkBuilder::new("http://testserver");

        let plan = plan(&Filter::default(), 1, &counts, store.as_ref(), &links)
            .await
            .unwrap();
        assert!(plan.next_page.is_none());
    }

    #[tokio::test]
    async fn links_preserve_filter_parameters_exactly() {
        let store = seeded_store(7).await;
        let counts = CountCache::new();
        let links = LinkBuilder::new("http://testserver");

        let filter = Filter {
            authors: Some(vec!["Sidney Sheldon".to_string(), "Ken Follet".to_string()]),
            genres: Some(vec!["Fiction".to_string()]),
            published_year: Some(1997),
        };

        let plan = plan(&filter, 2, &counts, store.as_ref(), &links).await.unwrap();

        assert_eq!(
            plan.prev_page.as_deref(),
            Some(
                "http://testserver/books?authors=Sidney%20Sheldon,Ken%20Follet&genres=Fiction&published_year=1997&page=1"
            )
        );
        assert_eq!(
            plan.next_page.as_deref(),
            Some(
                "http://testserver/books?authors=Sidney%20Sheldon,Ken%20Follet&genres=Fiction&published_year=1997&page=3"
            )
        );
    }

    #[test]
    fn values_with_reserved_characters_are_escaped() {
        assert_eq!(encode_value("Sidney Sheldon"), "Sidney%20Sheldon");
        assert_eq!(encode_value("Sci-Fi"), "Sci-Fi");
        assert_eq!(encode_value("Crime, true"), "Crime%2C%20true");
    }

    #[tokio::test]
    async fn page_zero_clamps_to_page_one() {
        let store = seeded_store(4).await;
        let counts = CountCache::new();
        let links = LinkBuilder::new("http://testserver");

        let plan = plan(&Filter::default(), 0, &counts, store.as_ref(), &links)
            .await
            .unwrap();
        assert_eq!(plan.skip, 0);
        assert!(plan.prev_page.is_none());
    }

    #[tokio::test]
    async fn concatenated_pages_cover_every_book_once() {
        let store = seeded_store(7).await;
        let counts = CountCache::new();
        let links = LinkBuilder::new("http://testserver");
        let filter = Filter::default();

        let mut seen = Vec::new();
        let mut page = 1;
        loop {
            let plan = plan(&filter, page, &counts, store.as_ref(), &links)
                .await
                .unwrap();
            let books = store
                .list_matching(&filter, plan.skip, plan.limit)
                .await
                .unwrap();
            seen.extend(books.into_iter().map(|book| book.name));
            if plan.next_page.is_none() {
                break;
            }
            page += 1;
        }

        let expected: Vec<String> = (0..7).map(|index| format!("book-{index}")).collect();
        assert_eq!(seen, expected);
    }
}
