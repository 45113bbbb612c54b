//! crates/reading_list_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned to a book by the storage backend.
pub type BookId = i64;

/// Where a book sits on the reader's shelf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReadingStatus {
    #[default]
    WantToRead,
    Reading,
    Completed,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::WantToRead,
        ReadingStatus::Reading,
        ReadingStatus::Completed,
    ];

    /// The canonical label used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "want-to-read",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reading status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ReadingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A book in the collection, as persisted by a storage backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub status: ReadingStatus,
    pub rating: Option<f64>,
    pub notes: String,
    pub date_added: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl Book {
    /// Applies the present fields of `patch` and refreshes `date_updated`.
    ///
    /// `date_updated` never moves behind `date_added`, even if the clock does.
    pub fn apply(&mut self, patch: BookPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        self.date_updated = now.max(self.date_added);
    }
}

/// The caller-supplied part of a new book. Id and timestamps belong to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub status: ReadingStatus,
    pub rating: Option<f64>,
    pub notes: String,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            status: ReadingStatus::default(),
            rating: None,
            notes: String::new(),
        }
    }
}

/// A partial update. `None` leaves the field untouched; for `rating`,
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub status: Option<ReadingStatus>,
    pub rating: Option<Option<f64>>,
    pub notes: Option<String>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.status.is_none()
            && self.rating.is_none()
            && self.notes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    fn sample_book() -> Book {
        let added = Utc::now();
        Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            status: ReadingStatus::Reading,
            rating: Some(4.5),
            notes: "spice".to_string(),
            date_added: added,
            date_updated: added,
        }
    }

    #[rstest]
    #[case("want-to-read", ReadingStatus::WantToRead)]
    #[case("reading", ReadingStatus::Reading)]
    #[case("completed", ReadingStatus::Completed)]
    fn status_round_trips_through_its_label(#[case] label: &str, #[case] status: ReadingStatus) {
        assert_eq!(label.parse::<ReadingStatus>(), Ok(status));
        assert_eq!(status.to_string(), label);
    }

    #[rstest]
    #[case("Reading")]
    #[case("want_to_read")]
    #[case("")]
    fn status_rejects_unknown_labels(#[case] label: &str) {
        assert_eq!(
            label.parse::<ReadingStatus>(),
            Err(UnknownStatus(label.to_string()))
        );
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut book = sample_book();
        let before = book.clone();
        let later = before.date_added + Duration::seconds(5);

        book.apply(
            BookPatch {
                notes: Some("great".to_string()),
                ..Default::default()
            },
            later,
        );

        assert_eq!(book.notes, "great");
        assert_eq!(book.title, before.title);
        assert_eq!(book.author, before.author);
        assert_eq!(book.status, before.status);
        assert_eq!(book.rating, before.rating);
        assert_eq!(book.date_added, before.date_added);
        assert_eq!(book.date_updated, later);
    }

    #[test]
    fn apply_can_clear_rating() {
        let mut book = sample_book();
        book.apply(
            BookPatch {
                rating: Some(None),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(book.rating, None);
    }

    #[test]
    fn apply_keeps_date_updated_after_date_added() {
        let mut book = sample_book();
        let earlier = book.date_added - Duration::seconds(30);
        book.apply(BookPatch::default(), earlier);
        assert_eq!(book.date_updated, book.date_added);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(BookPatch::default().is_empty());
        let patch = BookPatch {
            rating: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
