use crate::db::errors::DbError;
use crate::export::ExportError;
use crate::media::normalize::NormalizeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided
    #[error("Not authenticated")]
    Unauthenticated,

    /// Invalid request data, e.g. a malformed multipart body
    #[error("{message}")]
    BadRequest { message: String },

    /// A submitted field is missing or invalid
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// A photo could not be decoded or re-encoded
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// The guest list could not be serialized
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Table or object storage operation error
    #[error(transparent)]
    Database(#[from] DbError),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::BadRequest { .. } | Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Normalize(NormalizeError::Decode(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Normalize(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated => "Authentication required".to_string(),
            Error::BadRequest { message } => message.clone(),
            Error::Validation { field, message } => format!("Invalid {field}: {message}"),
            Error::NotFound { resource, id } => {
                format!("{resource} with ID {id} not found")
            }
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Normalize(NormalizeError::Decode(_)) => "The file is not a readable image".to_string(),
            Error::Normalize(_) => "The image could not be processed".to_string(),
            Error::Export(_) => "The guest list could not be exported".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { .. } => "Resource already exists".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Storage error occurred".to_string(),
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Export(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) | Error::Normalize(_) => {
                tracing::warn!("Processing error: {}", self);
            }
            Error::Unauthenticated => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::Validation { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        (status, self.user_message()).into_response()
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
