//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. The [`Error`]
//! enum covers the full taxonomy the HTTP layer needs to translate: input
//! validation, missing entities, bad credentials, inventory shortfalls,
//! file-type rejection, and the storage/database failures underneath them.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// All errors produced by configuration, core logic, and the API layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A request payload is missing a field or carries a malformed value.
    #[error("{message}")]
    Validation {
        /// Human-readable description naming the offending field
        message: String,
    },

    /// The referenced entity (or its stored file) does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Entity kind, e.g. `"user"`, `"reagent"`, `"file"`
        entity: &'static str,
    },

    /// Login failed: unknown username or mismatched password hash.
    #[error("invalid username or password")]
    Unauthorized,

    /// A reagent request asked for more than the reagent currently holds.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        /// Quantity currently in stock
        available: f64,
        /// Quantity the request asked for
        requested: f64,
    },

    /// An uploaded file's extension is outside the allowed set.
    #[error("file type '{extension}' not allowed; use one of: pdf, doc, docx, jpg, jpeg, png")]
    InvalidFileType {
        /// The rejected extension (may be empty when the name has none)
        extension: String,
    },

    /// Configuration loading or startup failure.
    #[error("configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// Database error surfaced by SeaORM or the underlying driver.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem error while saving, deleting, or reading an attachment.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The HTTP status this error translates to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. }
            | Self::InsufficientStock { .. }
            | Self::InvalidFileType { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let validation = Error::Validation {
            message: "missing field".to_string(),
        };
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let not_found = Error::NotFound { entity: "reagent" };
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        assert_eq!(Error::Unauthorized.status(), StatusCode::UNAUTHORIZED);

        let stock = Error::InsufficientStock {
            available: 10.0,
            requested: 25.0,
        };
        assert_eq!(stock.status(), StatusCode::BAD_REQUEST);

        let file_type = Error::InvalidFileType {
            extension: "exe".to_string(),
        };
        assert_eq!(file_type.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let err = Error::NotFound { entity: "task" };
        assert_eq!(err.to_string(), "task not found");
    }
}
