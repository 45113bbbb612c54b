//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `BookRepository` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Each operation is a single statement run on a connection borrowed from the
//! pool; the connection goes back to the pool when the statement future
//! completes or is dropped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reading_list_core::domain::{Book, BookId, BookPatch, NewBook, ReadingStatus};
use reading_list_core::ports::{BookRepository, PortError, PortResult};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;

/// Column list shared by every statement that returns a full book.
/// `rating` is NUMERIC(2,1) in the table and read back as a float.
const BOOK_COLUMNS: &str =
    "id, title, author, status, rating::FLOAT8 AS rating, notes, date_added, date_updated";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `BookRepository` port.
#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    /// Creates a new `PgBookRepository`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct BookRecord {
    id: i64,
    title: String,
    author: String,
    status: String,
    rating: Option<f64>,
    notes: String,
    date_added: DateTime<Utc>,
    date_updated: DateTime<Utc>,
}
impl BookRecord {
    fn to_domain(self) -> PortResult<Book> {
        let status = self
            .status
            .parse::<ReadingStatus>()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(Book {
            id: self.id,
            title: self.title,
            author: self.author,
            status,
            rating: self.rating,
            notes: self.notes,
            date_added: self.date_added,
            date_updated: self.date_updated,
        })
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `BookRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn create(&self, book: NewBook) -> PortResult<Book> {
        let query = format!(
            "INSERT INTO books (title, author, status, rating, notes) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            BOOK_COLUMNS
        );
        let record = sqlx::query_as::<_, BookRecord>(&query)
            .bind(book.title)
            .bind(book.author)
            .bind(book.status.as_str())
            .bind(book.rating)
            .bind(book.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        record.to_domain()
    }

    async fn get(&self, id: BookId) -> PortResult<Book> {
        let query = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        let record = sqlx::query_as::<_, BookRecord>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => PortError::book_not_found(id),
                _ => unexpected(e),
            })?;
        record.to_domain()
    }

    async fn list_all(&self) -> PortResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books ORDER BY date_added DESC, id DESC",
            BOOK_COLUMNS
        );
        let records = sqlx::query_as::<_, BookRecord>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        records.into_iter().map(BookRecord::to_domain).collect()
    }

    async fn update(&self, id: BookId, patch: BookPatch) -> PortResult<Book> {
        if patch.is_empty() {
            return Err(PortError::EmptyUpdate);
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE books SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(title) = patch.title {
                set.push("title = ").push_bind_unseparated(title);
            }
            if let Some(author) = patch.author {
                set.push("author = ").push_bind_unseparated(author);
            }
            if let Some(status) = patch.status {
                set.push("status = ").push_bind_unseparated(status.as_str());
            }
            if let Some(rating) = patch.rating {
                set.push("rating = ").push_bind_unseparated(rating);
            }
            if let Some(notes) = patch.notes {
                set.push("notes = ").push_bind_unseparated(notes);
            }
            set.push("date_updated = GREATEST(NOW(), date_added)");
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(BOOK_COLUMNS);

        debug!(sql = builder.sql(), "Updating book {}", id);

        let record = builder
            .build_query_as::<BookRecord>()
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::book_not_found(id))?;
        record.to_domain()
    }

    async fn delete(&self, id: BookId) -> PortResult<Book> {
        let query = format!("DELETE FROM books WHERE id = $1 RETURNING {}", BOOK_COLUMNS);
        let record = sqlx::query_as::<_, BookRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::book_not_found(id))?;
        record.to_domain()
    }

    async fn count(&self) -> PortResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }
}
