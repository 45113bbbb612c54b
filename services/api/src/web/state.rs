//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use reading_list_core::ports::BookRepository;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Handlers only see the `BookRepository` port; which backend sits behind it
/// is decided when the state is built.
#[derive(Clone)]
pub struct AppState {
    pub books: Arc<dyn BookRepository>,
}

impl AppState {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}
