//! View, edit and save endpoints.
//!
//! Each handler validates the captured title, talks to the page store and
//! answers with rendered HTML, a redirect or an error.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use wiki_storage::{Page, Title};

use crate::error::ServerError;
use crate::handlers::found;
use crate::state::AppState;
use crate::templates::{EDIT_TEMPLATE, VIEW_TEMPLATE};

/// Form field holding the page content.
const BODY_FIELD: &str = "body";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const FORM_MULTIPART: &str = "multipart/form-data";

/// Validate a title captured from the URL.
fn parse_title(raw: &str) -> Result<Title, ServerError> {
    Title::parse(raw).map_err(|_| ServerError::InvalidPath(raw.to_owned()))
}

/// Validate the wildcard capture, treating undecodable captures as unknown paths.
fn title_from_path(path: Result<Path<String>, PathRejection>) -> Result<Title, ServerError> {
    let Path(raw) = path.map_err(|e| ServerError::InvalidPath(e.body_text()))?;
    parse_title(&raw)
}

/// Render a template into an HTML response.
fn render(state: &AppState, template: &str, page: &Page) -> Result<Response, ServerError> {
    let html = state.templates.render(template, page)?;
    Ok(Html(html).into_response())
}

/// Lowercased media type of the request, without parameters.
fn media_type(request: &Request) -> Option<String> {
    let value = request.headers().get(header::CONTENT_TYPE)?;
    let value = String::from_utf8_lossy(value.as_bytes());
    let essence = value.split(';').next().unwrap_or_default().trim();
    Some(essence.to_ascii_lowercase())
}

/// First `body` value of a URL-encoded form, if any.
fn form_body(encoded: &[u8]) -> Result<Option<Vec<u8>>, ServerError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(encoded)?;
    Ok(pairs
        .into_iter()
        .find(|(name, _)| name == BODY_FIELD)
        .map(|(_, value)| value.into_bytes()))
}

/// First non-file `body` part of a multipart form, if any.
async fn multipart_body(mut multipart: Multipart) -> Result<Option<Vec<u8>>, ServerError> {
    while let Some(field) = multipart.next_field().await? {
        let is_body = field.name() == Some(BODY_FIELD) && field.file_name().is_none();
        if is_body {
            return Ok(Some(field.bytes().await?.to_vec()));
        }
    }
    Ok(None)
}

/// Handle GET /.
pub(crate) async fn front_page(State(state): State<Arc<AppState>>) -> Response {
    found(&format!("/view/{}", state.front_page))
}

/// Handle GET /view/{title}.
///
/// Missing pages redirect to the edit form so they can be created.
pub(crate) async fn view_page(
    path: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let title = title_from_path(path)?;

    match state.store.load(&title) {
        Ok(page) => render(&state, VIEW_TEMPLATE, &page),
        Err(err) if err.is_not_found() => {
            tracing::debug!(title = %title, "Page missing, redirecting to editor");
            Ok(found(&format!("/edit/{title}")))
        }
        Err(err) => Err(err.into()),
    }
}

/// Handle GET /edit/{title}.
pub(crate) async fn edit_page(
    path: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let title = title_from_path(path)?;

    let page = match state.store.load(&title) {
        Ok(page) => page,
        Err(err) if err.is_not_found() => Page::empty(title),
        Err(err) => return Err(err.into()),
    };

    render(&state, EDIT_TEMPLATE, &page)
}

/// Handle POST /save/{title}.
///
/// The content is the first `body` field of a URL-encoded or multipart form.
/// A request without a content type is read as URL-encoded. When the form has
/// no `body` field the query string is consulted, and failing that the page
/// is saved empty. Any other content type is rejected without touching the
/// stored page.
pub(crate) async fn save_page(
    path: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ServerError> {
    let title = title_from_path(path)?;
    let query = request.uri().query().map(str::to_owned);

    let posted = match media_type(&request).as_deref() {
        None | Some(FORM_URLENCODED) => {
            let payload = Bytes::from_request(request, &())
                .await
                .map_err(|e| ServerError::Body(e.body_text()))?;
            form_body(&payload)?
        }
        Some(FORM_MULTIPART) => {
            let multipart = Multipart::from_request(request, &())
                .await
                .map_err(|e| ServerError::Body(e.body_text()))?;
            multipart_body(multipart).await?
        }
        Some(other) => return Err(ServerError::UnsupportedMediaType(other.to_owned())),
    };

    let body = match (posted, query) {
        (Some(body), _) => body,
        (None, Some(query)) => form_body(query.as_bytes())?.unwrap_or_default(),
        (None, None) => Vec::new(),
    };

    let page = Page::new(title, body);
    state.store.save(&page)?;
    tracing::info!(title = %page.title, bytes = page.body.len(), "Saved page");

    Ok(found(&format!("/view/{}", page.title)))
}
