//! services/api/src/web/error.rs
//!
//! Maps request failures onto HTTP status codes and the `{ "error": ... }` body.
//! Backend detail is logged here and never sent to the client.

use crate::web::validation::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use reading_list_core::ports::PortError;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// The body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A book id that does not exist.
    #[error("{0}")]
    BookNotFound(String),

    /// A path that matches no route, including non-integer book ids.
    #[error("Not found")]
    RouteNotFound,

    #[error("Internal server error")]
    Internal,
}

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::Validation(_) => StatusCode::BAD_REQUEST,
            HttpError::BookNotFound(_) | HttpError::RouteNotFound => StatusCode::NOT_FOUND,
            HttpError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PortError> for HttpError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(message) => HttpError::BookNotFound(message),
            PortError::EmptyUpdate => HttpError::Validation(ValidationError::NoFields),
            PortError::Unexpected(detail) => {
                error!(error = %detail, "storage backend failure");
                HttpError::Internal
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
