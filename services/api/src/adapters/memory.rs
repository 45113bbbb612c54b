//! services/api/src/adapters/memory.rs
//!
//! A process-local implementation of the `BookRepository` port. All state lives
//! behind a single lock and is lost when the process exits.

use async_trait::async_trait;
use chrono::Utc;
use reading_list_core::domain::{Book, BookId, BookPatch, NewBook};
use reading_list_core::ports::{BookRepository, PortError, PortResult};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

struct Shelf {
    books: BTreeMap<BookId, Book>,
    /// Next id to hand out. Only ever grows, so ids of deleted books are not reused.
    next_id: BookId,
}

/// An in-memory adapter that implements the `BookRepository` port.
pub struct InMemoryBookRepository {
    shelf: RwLock<Shelf>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self {
            shelf: RwLock::new(Shelf {
                books: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn create(&self, book: NewBook) -> PortResult<Book> {
        let mut shelf = self.shelf.write().await;
        let id = shelf.next_id;
        shelf.next_id += 1;

        let now = Utc::now();
        let book = Book {
            id,
            title: book.title,
            author: book.author,
            status: book.status,
            rating: book.rating,
            notes: book.notes,
            date_added: now,
            date_updated: now,
        };
        shelf.books.insert(id, book.clone());
        Ok(book)
    }

    async fn get(&self, id: BookId) -> PortResult<Book> {
        self.shelf
            .read()
            .await
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::book_not_found(id))
    }

    async fn list_all(&self) -> PortResult<Vec<Book>> {
        let shelf = self.shelf.read().await;
        let mut books: Vec<Book> = shelf.books.values().cloned().collect();
        // Books created within the same clock tick fall back to id order.
        books.sort_by(|a, b| {
            b.date_added
                .cmp(&a.date_added)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(books)
    }

    async fn update(&self, id: BookId, patch: BookPatch) -> PortResult<Book> {
        if patch.is_empty() {
            return Err(PortError::EmptyUpdate);
        }
        let mut shelf = self.shelf.write().await;
        let book = shelf
            .books
            .get_mut(&id)
            .ok_or_else(|| PortError::book_not_found(id))?;
        book.apply(patch, Utc::now());
        Ok(book.clone())
    }

    async fn delete(&self, id: BookId) -> PortResult<Book> {
        self.shelf
            .write()
            .await
            .books
            .remove(&id)
            .ok_or_else(|| PortError::book_not_found(id))
    }

    async fn count(&self) -> PortResult<i64> {
        let shelf = self.shelf.read().await;
        i64::try_from(shelf.books.len()).map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reading_list_core::domain::ReadingStatus;

    #[tokio::test]
    async fn create_fills_defaults_and_timestamps() {
        let repo = InMemoryBookRepository::new();
        let book = repo.create(NewBook::new("Dune", "Herbert")).await.unwrap();

        assert_eq!(book.id, 1);
        assert_eq!(book.status, ReadingStatus::WantToRead);
        assert_eq!(book.rating, None);
        assert_eq!(book.notes, "");
        assert_eq!(book.date_added, book.date_updated);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryBookRepository::new();
        let first = repo.create(NewBook::new("A", "a")).await.unwrap();
        repo.delete(first.id).await.unwrap();
        let second = repo.create(NewBook::new("B", "b")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let repo = InMemoryBookRepository::new();
        let a = repo.create(NewBook::new("A", "a")).await.unwrap();
        let b = repo.create(NewBook::new("B", "b")).await.unwrap();
        let c = repo.create(NewBook::new("C", "c")).await.unwrap();

        let ids: Vec<BookId> = repo.list_all().await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn update_rejects_empty_patch_before_lookup() {
        let repo = InMemoryBookRepository::new();
        assert!(matches!(
            repo.update(42, BookPatch::default()).await,
            Err(PortError::EmptyUpdate)
        ));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() {
        let repo = InMemoryBookRepository::new();
        let patch = BookPatch {
            notes: Some("x".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            repo.update(9999, patch).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(repo.delete(9999).await, Err(PortError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_returns_prior_state_and_removes() {
        let repo = InMemoryBookRepository::new();
        let book = repo.create(NewBook::new("Dune", "Herbert")).await.unwrap();

        let deleted = repo.delete(book.id).await.unwrap();
        assert_eq!(deleted, book);
        assert!(matches!(repo.get(book.id).await, Err(PortError::NotFound(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let repo = std::sync::Arc::new(InMemoryBookRepository::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(NewBook::new(format!("Book {i}"), "Anon"))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(repo.count().await.unwrap(), 16);
    }
}
