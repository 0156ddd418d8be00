//! HTTP request handlers.

pub(crate) mod pages;

use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;

/// Issue a `302 Found` redirect.
///
/// `axum::response::Redirect` has no 302 constructor.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Fallback for every path outside the route table.
pub(crate) async fn not_found(uri: Uri) -> ServerError {
    ServerError::InvalidPath(uri.path().to_owned())
}
