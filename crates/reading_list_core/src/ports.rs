//! crates/reading_list_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete storage behind it.

use async_trait::async_trait;
use crate::domain::{Book, BookId, BookPatch, NewBook};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("{0}")]
    NotFound(String),
    #[error("No valid fields to update")]
    EmptyUpdate,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    pub fn book_not_found(id: BookId) -> Self {
        PortError::NotFound(format!("Book with ID {} not found", id))
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Storage for the book collection.
///
/// Every implementation must behave identically: ids are unique and never
/// reused, listings are newest-first, and updates only touch present fields.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Persists a new book, assigning its id and both timestamps.
    async fn create(&self, book: NewBook) -> PortResult<Book>;

    async fn get(&self, id: BookId) -> PortResult<Book>;

    /// All books ordered by `date_added` descending (newest first).
    async fn list_all(&self) -> PortResult<Vec<Book>>;

    /// Applies `patch` and refreshes `date_updated`.
    ///
    /// Fails with `EmptyUpdate` when the patch carries no field, and with
    /// `NotFound` when `id` does not exist.
    async fn update(&self, id: BookId, patch: BookPatch) -> PortResult<Book>;

    /// Removes the book and returns it as it was immediately before removal.
    async fn delete(&self, id: BookId) -> PortResult<Book>;

    async fn count(&self) -> PortResult<i64>;
}
