//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use wiki_storage::{PageStore, Title};

use crate::templates::Templates;

/// Application state shared across all handlers.
///
/// Built once at startup and never mutated afterwards.
pub(crate) struct AppState {
    /// Page store backend.
    pub(crate) store: Arc<dyn PageStore>,
    /// Parsed view and edit templates.
    pub(crate) templates: Templates,
    /// Page that `/` redirects to.
    pub(crate) front_page: Title,
}
