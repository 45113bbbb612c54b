//! services/api/src/web/payload.rs
//!
//! The inbound request body for creating and updating books, and its
//! conversion into core domain types.

use crate::web::validation::{parse_rating, parse_status, validate, ValidationError, ValidationMode};
use reading_list_core::domain::{BookPatch, NewBook, ReadingStatus};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use utoipa::ToSchema;

/// A request field that distinguishes "omitted" from "explicitly null".
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> Field<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }
}

impl<'de, T> Deserialize<'de> for Field<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called for keys that are present; absent keys take `Default`.
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Field::Null, Field::Value))
    }
}

/// The JSON body accepted by `POST /books` and `PUT /books/{id}`.
///
/// Unknown keys are ignored. `status` and `rating` are kept as raw JSON so
/// that a value of the wrong type is reported against that field instead of
/// failing the whole body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookPayload {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Dune")]
    pub title: Field<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Frank Herbert")]
    pub author: Field<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "reading")]
    pub status: Field<Value>,
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 4.5)]
    pub rating: Field<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub notes: Field<String>,
}

impl BookPayload {
    /// True when none of the recognized fields was supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_missing()
            && self.author.is_missing()
            && self.status.is_missing()
            && self.rating.is_missing()
            && self.notes.is_missing()
    }

    /// Validates the payload as a complete book and converts it.
    pub fn into_new_book(self) -> Result<NewBook, ValidationError> {
        validate(&self, ValidationMode::Full)?;

        let title = required_text(self.title, "title")?;
        let author = required_text(self.author, "author")?;
        let status = match self.status {
            Field::Missing => ReadingStatus::default(),
            Field::Null => return Err(ValidationError::InvalidStatus),
            Field::Value(raw) => parse_status(&raw)?,
        };
        let rating = match self.rating {
            Field::Value(raw) => Some(parse_rating(&raw)?),
            Field::Missing | Field::Null => None,
        };
        let notes = match self.notes {
            Field::Value(notes) => notes.trim().to_string(),
            Field::Missing | Field::Null => String::new(),
        };

        Ok(NewBook {
            title,
            author,
            status,
            rating,
            notes,
        })
    }

    /// Validates the payload as a partial update and converts the fields
    /// that are present.
    pub fn into_patch(self) -> Result<BookPatch, ValidationError> {
        validate(&self, ValidationMode::Partial)?;

        let patch = BookPatch {
            title: optional_text(self.title, "title")?,
            author: optional_text(self.author, "author")?,
            status: match self.status {
                Field::Missing => None,
                Field::Null => return Err(ValidationError::InvalidStatus),
                Field::Value(raw) => Some(parse_status(&raw)?),
            },
            rating: match self.rating {
                Field::Missing => None,
                Field::Null => Some(None),
                Field::Value(raw) => Some(Some(parse_rating(&raw)?)),
            },
            notes: match self.notes {
                Field::Missing => None,
                Field::Null => Some(String::new()),
                Field::Value(notes) => Some(notes.trim().to_string()),
            },
        };

        if patch.is_empty() {
            return Err(ValidationError::NoFields);
        }
        Ok(patch)
    }
}

fn required_text(field: Field<String>, name: &'static str) -> Result<String, ValidationError> {
    match field {
        Field::Value(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(ValidationError::MissingField(name)),
    }
}

fn optional_text(
    field: Field<String>,
    name: &'static str,
) -> Result<Option<String>, ValidationError> {
    match field {
        Field::Missing => Ok(None),
        Field::Value(text) if !text.trim().is_empty() => Ok(Some(text.trim().to_string())),
        _ => Err(ValidationError::EmptyField(name)),
    }
}
