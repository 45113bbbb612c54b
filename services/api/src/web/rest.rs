//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    error::{ErrorResponse, HttpError},
    payload::BookPayload,
    state::AppState,
    validation::ValidationError,
};
use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use reading_list_core::domain::{Book, BookId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "reading-list-api";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        list_books_handler,
        get_book_handler,
        create_book_handler,
        update_book_handler,
        delete_book_handler,
    ),
    components(
        schemas(
            BookResponse,
            BookPayload,
            BookEnvelope,
            BookListResponse,
            BookMutationResponse,
            DeletedBookResponse,
            HealthResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "Reading List API", description = "Track a personal book collection.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

/// A book as returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    id: i64,
    title: String,
    author: String,
    #[schema(example = "want-to-read")]
    status: String,
    rating: Option<f64>,
    notes: String,
    date_added: DateTime<Utc>,
    date_updated: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            status: book.status.to_string(),
            rating: book.rating,
            notes: book.notes,
            date_added: book.date_added,
            date_updated: book.date_updated,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct BookEnvelope {
    book: BookResponse,
}

#[derive(Serialize, ToSchema)]
pub struct BookListResponse {
    books: Vec<BookResponse>,
    total_count: usize,
}

#[derive(Serialize, ToSchema)]
pub struct BookMutationResponse {
    message: String,
    book: BookResponse,
}

#[derive(Serialize, ToSchema)]
pub struct DeletedBookResponse {
    message: String,
    deleted_book: BookResponse,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    status: String,
    service: String,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_books: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

//=========================================================================================
// Extractors
//=========================================================================================

/// The `{id}` path segment of `/books/{id}`.
///
/// Only non-negative integers match; anything else is answered as an unknown
/// route rather than a bad request.
pub struct BookIdParam(pub BookId);

impl<S> FromRequestParts<S> for BookIdParam
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| HttpError::RouteNotFound)?;
        parse_book_id(&raw)
            .map(BookIdParam)
            .ok_or(HttpError::RouteNotFound)
    }
}

fn parse_book_id(raw: &str) -> Option<BookId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Turns a missing or unparseable JSON body into a validation error.
fn read_payload(
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<BookPayload, ValidationError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        info!("Rejected request body: {}", rejection.body_text());
        ValidationError::NoData
    })
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Report service status and the number of stored books.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and storage are reachable", body = HealthResponse),
        (status = 500, description = "Storage backend is unreachable", body = HealthResponse)
    )
)]
pub async fn health_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    match app_state.books.count().await {
        Ok(total_books) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                service: SERVICE_NAME.to_string(),
                timestamp: Utc::now(),
                total_books: Some(total_books),
                error: None,
            }),
        ),
        Err(e) => {
            error!("Health check error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    service: SERVICE_NAME.to_string(),
                    timestamp: Utc::now(),
                    total_books: None,
                    error: Some("Database connection failed".to_string()),
                }),
            )
        }
    }
}

/// List every book, newest first.
#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "All books", body = BookListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_books_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<BookListResponse>, HttpError> {
    let books = app_state.books.list_all().await?;
    info!("GET /books - Returning {} books", books.len());

    Ok(Json(BookListResponse {
        total_count: books.len(),
        books: books.into_iter().map(BookResponse::from).collect(),
    }))
}

/// Fetch a single book.
#[utoipa::path(
    get,
    path = "/books/{id}",
    params(("id" = i64, Path, description = "The book id.")),
    responses(
        (status = 200, description = "The book", body = BookEnvelope),
        (status = 404, description = "No book with this id", body = ErrorResponse)
    )
)]
pub async fn get_book_handler(
    State(app_state): State<Arc<AppState>>,
    BookIdParam(id): BookIdParam,
) -> Result<Json<BookEnvelope>, HttpError> {
    info!("GET /books/{}", id);
    let book = app_state.books.get(id).await?;
    Ok(Json(BookEnvelope { book: book.into() }))
}

/// Add a new book.
///
/// `title` and `author` are required; `status` defaults to `want-to-read`.
#[utoipa::path(
    post,
    path = "/books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = BookMutationResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_book_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    info!("POST /books - Adding new book");
    let new_book = read_payload(payload)?.into_new_book()?;

    let book = app_state.books.create(new_book).await?;
    info!("Added book: {} by {}", book.title, book.author);

    Ok((
        StatusCode::CREATED,
        Json(BookMutationResponse {
            message: "Book added successfully".to_string(),
            book: book.into(),
        }),
    ))
}

/// Update the supplied fields of an existing book.
///
/// Existence is checked before the body is looked at, so an unknown id is
/// always a 404.
#[utoipa::path(
    put,
    path = "/books/{id}",
    params(("id" = i64, Path, description = "The book id.")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = BookMutationResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "No book with this id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_book_handler(
    State(app_state): State<Arc<AppState>>,
    BookIdParam(id): BookIdParam,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Json<BookMutationResponse>, HttpError> {
    info!("PUT /books/{} - Updating book", id);
    app_state.books.get(id).await?;

    let patch = read_payload(payload)?.into_patch()?;
    let book = app_state.books.update(id, patch).await?;
    info!("Updated book: {} by {}", book.title, book.author);

    Ok(Json(BookMutationResponse {
        message: "Book updated successfully".to_string(),
        book: book.into(),
    }))
}

/// Delete a book and return what was removed.
#[utoipa::path(
    delete,
    path = "/books/{id}",
    params(("id" = i64, Path, description = "The book id.")),
    responses(
        (status = 200, description = "Book deleted", body = DeletedBookResponse),
        (status = 404, description = "No book with this id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_book_handler(
    State(app_state): State<Arc<AppState>>,
    BookIdParam(id): BookIdParam,
) -> Result<Json<DeletedBookResponse>, HttpError> {
    info!("DELETE /books/{} - Deleting book", id);
    app_state.books.get(id).await?;

    let book = app_state.books.delete(id).await?;
    info!("Deleted book: {} by {}", book.title, book.author);

    Ok(Json(DeletedBookResponse {
        message: "Book deleted successfully".to_string(),
        deleted_book: book.into(),
    }))
}

/// Fallback for paths that match no route.
pub async fn not_found_handler() -> HttpError {
    HttpError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(1))]
    #[case("0042", Some(42))]
    #[case("abc", None)]
    #[case("-3", None)]
    #[case("+3", None)]
    #[case("1.5", None)]
    #[case("", None)]
    #[case("99999999999999999999", None)]
    fn book_ids_must_be_plain_integers(#[case] raw: &str, #[case] expected: Option<BookId>) {
        assert_eq!(parse_book_id(raw), expected);
    }
}
