pub mod error;
pub mod payload;
pub mod rest;
pub mod state;
pub mod validation;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use rest::{
    create_book_handler, delete_book_handler, get_book_handler, health_handler,
    list_books_handler, not_found_handler, update_book_handler, ApiDoc,
};
pub use state::AppState;

/// Builds the book API router on top of the given state.
///
/// Deployment layers such as CORS and Swagger UI are added by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/books", get(list_books_handler).post(create_book_handler))
        .route(
            "/books/{id}",
            get(get_book_handler)
                .put(update_book_handler)
                .delete(delete_book_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
