//! Error types for the HTTP server.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use wiki_storage::{StorageError, StorageErrorKind};

/// Server error type.
///
/// Responses carry the raw error text as `text/plain`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Request path does not name a valid operation and title.
    #[error("404 page not found")]
    InvalidPath(String),

    /// Page store failure.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Template rendering failure.
    #[error("{0}")]
    Template(#[from] minijinja::Error),

    /// Save payload is not a valid form.
    #[error("Invalid form payload: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    /// Multipart save payload could not be read.
    #[error("Invalid multipart payload: {0}")]
    Multipart(#[from] MultipartError),

    /// Request body could not be read.
    #[error("{0}")]
    Body(String),

    /// Save payload has a content type other than a form.
    #[error("Unsupported content type: {0}")]
    UnsupportedMediaType(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPath(_) => StatusCode::NOT_FOUND,
            Self::Storage(e) if e.kind == StorageErrorKind::InvalidPath => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Form(_) | Self::Multipart(_) | Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        (status, format!("{self}\n")).into_response()
    }
}
