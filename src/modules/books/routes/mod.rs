//! HTTP handlers for the books module.
//!
//! Handlers orchestrate the store adapter, the pagination planner, the
//! count cache, and the conditional request mediator; every outcome is a
//! typed response struct or a typed [`AppError`].

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::{NoContext, Timestamp, Uuid};

use folio_http::error::{AppError, MessageBody};
use folio_store::{BookStore, Filter, StoreError};

use super::conditional::{self, ReadDisposition, WriteDisposition};
use super::fingerprint;
use super::models::{BookListResponse, BookPayload, BookResponse, BookSummary};
use super::pagination;
use super::state::CatalogState;

const NO_SUCH_BOOK: &str = "No such book exist!!";
const BOOK_DELETED: &str = "Book deleted !!";
const ETAG_MISMATCH: &str = "The If-Match token does not match the stored book";

/// Build the books router with its injected state.
pub fn routes(state: CatalogState) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/book/{book_id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/authors", get(list_authors))
        .route("/genres", get(list_genres))
        .with_state(state)
}

/// Query parameters accepted by `GET /books`. Multi-valued dimensions
/// arrive comma-joined inside a single parameter.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    authors: Option<String>,
    genres: Option<String>,
    published_year: Option<i32>,
    page: Option<u64>,
}

impl ListQuery {
    fn filter(&self) -> Filter {
        Filter {
            authors: split_csv(self.authors.as_deref()),
            genres: split_csv(self.genres.as_deref()),
            published_year: self.published_year,
        }
    }
}

fn split_csv(value: Option<&str>) -> Option<Vec<String>> {
    let values: Vec<String> = value?
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect();
    (!values.is_empty()).then_some(values)
}

fn map_store_error(err: StoreError) -> AppError {
    match err {
        StoreError::ResourceExists { name } => {
            AppError::bad_request(format!("Book {name} already exists!!"))
        }
        StoreError::Backend(err) => AppError::Internal(err),
    }
}

fn header_token(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
}

fn with_etag(mut response: Response, etag: Option<&str>) -> Response {
    if let Some(etag) = etag {
        if let Ok(value) = HeaderValue::from_str(etag) {
            response.headers_mut().insert(header::ETAG, value);
        }
    }
    response
}

async fn list_books(
    State(state): State<CatalogState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<BookListResponse>, AppError> {
    let filter = query.filter();
    let page = query.page.unwrap_or(1);

    let plan = pagination::plan(
        &filter,
        page,
        &state.counts,
        state.store.as_ref(),
        &state.links,
    )
    .await
    .map_err(map_store_error)?;

    let records = state
        .store
        .list_matching(&filter, plan.skip, plan.limit)
        .await
        .map_err(map_store_error)?;

    let books = records
        .iter()
        .map(|record| BookSummary {
            name: record.name.clone(),
            author: record.author.clone(),
            link: state.links.book(&record.book_id),
        })
        .collect();

    Ok(Json(BookListResponse {
        total_results: plan.total,
        prev_page: plan.prev_page,
        next_page: plan.next_page,
        books,
    }))
}

async fn create_book(
    State(state): State<CatalogState>,
    Json(payload): Json<BookPayload>,
) -> Result<Response, AppError> {
    payload
        .validate()
        .map_err(|details| AppError::validation(details, "invalid book payload"))?;

    let book_id = Uuid::new_v7(Timestamp::now(NoContext)).to_string();
    let mut record = payload.into_record(book_id);
    let etag = fingerprint::fingerprint(&record).map_err(anyhow::Error::from)?;
    record.etag = Some(etag);

    state
        .store
        .insert(record.clone())
        .await
        .map_err(map_store_error)?;
    register_facets(&state, &record).await?;
    state.counts.invalidate_all();

    tracing::info!(book_id = %record.book_id, name = %record.name, "created book");

    let stored = state
        .store
        .get_by_name(&record.name)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| anyhow::anyhow!("book '{}' vanished after insert", record.name))?;

    let body = BookResponse::from_record(&stored, state.links.book(&stored.book_id));
    Ok(with_etag(
        (StatusCode::CREATED, Json(body)).into_response(),
        stored.etag.as_deref(),
    ))
}

async fn get_book(
    State(state): State<CatalogState>,
    Path(book_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let record = state
        .store
        .get_by_id(&book_id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| AppError::bad_request(NO_SUCH_BOOK))?;

    let token = header_token(&headers, header::IF_NONE_MATCH);
    match conditional::read_disposition(record.etag.as_deref(), token.as_deref()) {
        ReadDisposition::NotModified => Ok(with_etag(
            StatusCode::NOT_MODIFIED.into_response(),
            record.etag.as_deref(),
        )),
        ReadDisposition::Fresh => {
            let body = BookResponse::from_record(&record, state.links.book(&record.book_id));
            Ok(with_etag(
                (StatusCode::OK, Json(body)).into_response(),
                record.etag.as_deref(),
            ))
        }
    }
}

async fn update_book(
    State(state): State<CatalogState>,
    Path(book_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<BookPayload>,
) -> Result<Response, AppError> {
    let current = state
        .store
        .get_by_id(&book_id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| AppError::bad_request(NO_SUCH_BOOK))?;

    let token = header_token(&headers, header::IF_MATCH);
    if conditional::write_disposition(current.etag.as_deref(), token.as_deref())
        == WriteDisposition::PreconditionFailed
    {
        return Err(AppError::precondition_failed(ETAG_MISMATCH));
    }

    payload
        .validate()
        .map_err(|details| AppError::validation(details, "invalid book payload"))?;

    // Identity is preserved; everything else is replaced and the
    // fingerprint recomputed from the new content.
    let mut record = payload.into_record(current.book_id.clone());
    let etag = fingerprint::fingerprint(&record).map_err(anyhow::Error::from)?;
    record.etag = Some(etag);

    state
        .store
        .replace(&current.book_id, record.clone())
        .await
        .map_err(map_store_error)?;
    register_facets(&state, &record).await?;
    state.counts.invalidate_all();

    tracing::info!(book_id = %record.book_id, name = %record.name, "replaced book");

    let body = BookResponse::from_record(&record, state.links.book(&record.book_id));
    Ok(with_etag(
        (StatusCode::OK, Json(body)).into_response(),
        record.etag.as_deref(),
    ))
}

async fn delete_book(
    State(state): State<CatalogState>,
    Path(book_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<MessageBody>, AppError> {
    let current = state
        .store
        .get_by_id(&book_id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| AppError::bad_request(NO_SUCH_BOOK))?;

    let token = header_token(&headers, header::IF_MATCH);
    if conditional::write_disposition(current.etag.as_deref(), token.as_deref())
        == WriteDisposition::PreconditionFailed
    {
        return Err(AppError::precondition_failed(ETAG_MISMATCH));
    }

    state
        .store
        .delete(&current.book_id)
        .await
        .map_err(map_store_error)?;
    // Facets are never retracted; the registries are append-only.
    state.counts.invalidate_all();

    tracing::info!(book_id = %current.book_id, name = %current.name, "deleted book");

    Ok(Json(MessageBody {
        message: BOOK_DELETED.to_string(),
    }))
}

async fn list_authors(State(state): State<CatalogState>) -> Result<Json<Vec<String>>, AppError> {
    let authors = state.store.list_authors().await.map_err(map_store_error)?;
    Ok(Json(authors))
}

async fn list_genres(State(state): State<CatalogState>) -> Result<Json<Vec<String>>, AppError> {
    let genres = state.store.list_genres().await.map_err(map_store_error)?;
    Ok(Json(genres))
}

async fn register_facets(
    state: &CatalogState,
    record: &folio_store::BookRecord,
) -> Result<(), AppError> {
    state
        .store
        .register_author(&record.author)
        .await
        .map_err(map_store_error)?;
    for genre in &record.genres {
        state
            .store
            .register_genre(genre)
            .await
            .map_err(map_store_error)?;
    }
    Ok(())
}
