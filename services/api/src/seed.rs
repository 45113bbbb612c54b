//! services/api/src/seed.rs
//!
//! Sample books loaded into an empty store at startup, so a fresh deployment
//! has something to show.

use reading_list_core::domain::{NewBook, ReadingStatus};
use reading_list_core::ports::{BookRepository, PortResult};
use tracing::info;

fn sample_books() -> Vec<NewBook> {
    vec![
        NewBook {
            title: "Flask Web Development".to_string(),
            author: "Miguel Grinberg".to_string(),
            status: ReadingStatus::Reading,
            rating: None,
            notes: "Learning Flask for microservices".to_string(),
        },
        NewBook {
            title: "Clean Code".to_string(),
            author: "Robert C. Martin".to_string(),
            status: ReadingStatus::Completed,
            rating: Some(5.0),
            notes: "Excellent book on writing maintainable code".to_string(),
        },
        NewBook {
            title: "Docker Deep Dive".to_string(),
            author: "Nigel Poulton".to_string(),
            status: ReadingStatus::WantToRead,
            rating: None,
            notes: "Next on my containerization learning path".to_string(),
        },
    ]
}

/// Inserts the sample books when the store is empty.
///
/// Returns how many books were added; an existing collection is left alone.
pub async fn seed_if_empty(books: &dyn BookRepository) -> PortResult<usize> {
    let existing = books.count().await?;
    if existing > 0 {
        info!("Database already has {} books", existing);
        return Ok(0);
    }

    info!("Database is empty, adding sample data...");
    let samples = sample_books();
    let added = samples.len();
    for book in samples {
        books.create(book).await?;
    }
    info!("Added {} sample books to database", added);
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryBookRepository;

    #[tokio::test]
    async fn seeds_an_empty_store() {
        let repo = InMemoryBookRepository::new();
        assert_eq!(seed_if_empty(&repo).await.unwrap(), 3);
        assert_eq!(repo.count().await.unwrap(), 3);

        let newest = repo.list_all().await.unwrap();
        assert_eq!(newest[0].title, "Docker Deep Dive");
    }

    #[tokio::test]
    async fn leaves_existing_collection_alone() {
        let repo = InMemoryBookRepository::new();
        repo.create(NewBook::new("Dune", "Herbert")).await.unwrap();

        assert_eq!(seed_if_empty(&repo).await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
