//! Book routes:
//! - GET /books - List books, paginated
//! - POST /books - Add a book
//! - GET /books/{id} - Fetch a book
//! - PUT /books/{id} - Update a book
//! - DELETE /books/{id} - Delete a book
//!
//! Handlers only translate between HTTP and [`BookService`]; parsing failures
//! are answered with `InvalidInput` before the service is called. Every
//! outcome is written by [`crate::response`].
//!
//! [`BookService`]: crate::service::BookService

use axum::{
    Router,
    extract::{RawQuery, State},
    routing::get,
};
use bookshelf_core::{
    AddBookRequest, AddBookResponse, Book, DeleteBookResponse, Error, GetBooksResponse,
    PageRequest, SortDirection, UpdateBookRequest,
};

use crate::context::RequestContext;
use crate::extract::{BookIdPath, JsonBody};
use crate::response::{ApiResult, Reply, WithContext};
use crate::state::AppState;

// ============================================================================
// Parameter parsing
// ============================================================================

/// Parse a numeric query parameter. Absent or empty means zero, which the
/// page request later replaces with its default.
fn parse_number(name: &str, value: Option<&str>) -> Result<i64, Error> {
    match value {
        None | Some("") => Ok(0),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::invalid_input(format!("invalid {}: {}", name, raw))),
    }
}

/// Build a page request from the raw query string of GET /books.
///
/// When a parameter repeats, its first value is used.
pub fn parse_page_request(query: Option<&str>) -> Result<PageRequest, Error> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query.unwrap_or(""))
        .map_err(|err| Error::invalid_input(format!("invalid query: {}", err)))?;

    let first = |name: &str| {
        pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    let page = parse_number("page", first("page"))?;
    let limit = parse_number("limit", first("limit"))?;
    let sort = SortDirection::parse(first("sort_type").unwrap_or(""));

    Ok(PageRequest::new(page, limit, sort))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /books/{id}
async fn get_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    BookIdPath(id): BookIdPath,
) -> ApiResult<Book> {
    let book = state.books().get_book(&ctx, id).await.with_ctx(&ctx)?;
    Ok(Reply::ok(ctx, book))
}

/// GET /books?page=&limit=&sort_type=
async fn list_books(
    State(state): State<AppState>,
    ctx: RequestContext,
    RawQuery(query): RawQuery,
) -> ApiResult<GetBooksResponse> {
    let request = parse_page_request(query.as_deref()).with_ctx(&ctx)?;
    let books = state.books().get_books(&ctx, request).await.with_ctx(&ctx)?;
    Ok(Reply::ok(ctx, books))
}

/// POST /books
async fn add_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(request): JsonBody<AddBookRequest>,
) -> ApiResult<AddBookResponse> {
    let added = state.books().add_book(&ctx, request).await.with_ctx(&ctx)?;
    Ok(Reply::created(ctx, added))
}

/// PUT /books/{id}
async fn update_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    BookIdPath(id): BookIdPath,
    JsonBody(request): JsonBody<UpdateBookRequest>,
) -> ApiResult<Book> {
    let book = state
        .books()
        .update_book(&ctx, id, request)
        .await
        .with_ctx(&ctx)?;
    Ok(Reply::ok(ctx, book))
}

/// DELETE /books/{id}
async fn delete_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    BookIdPath(id): BookIdPath,
) -> ApiResult<DeleteBookResponse> {
    let deleted = state.books().delete_book(&ctx, id).await.with_ctx(&ctx)?;
    Ok(Reply::ok(ctx, deleted))
}

// ============================================================================
// Router
// ============================================================================

/// Build book routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books).post(add_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
}
