//! HTML templates.
//!
//! Both views are minijinja templates named `view.html` and `edit.html`.
//! The `.html` suffix turns on HTML auto-escaping, so page bodies are always
//! escaped before they reach the browser.

use std::path::{Path, PathBuf};

use minijinja::{Environment, context};
use wiki_storage::Page;

/// Template for read mode.
pub const VIEW_TEMPLATE: &str = "view.html";

/// Template for edit mode.
pub const EDIT_TEMPLATE: &str = "edit.html";

/// Bundled read mode template, written by `wiki init`.
pub const DEFAULT_VIEW_TEMPLATE: &str = include_str!("../templates/view.html");

/// Bundled edit mode template, written by `wiki init`.
pub const DEFAULT_EDIT_TEMPLATE: &str = include_str!("../templates/edit.html");

/// Template loading error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Template file could not be read.
    #[error("Failed to read template {}: {source}", path.display())]
    Io {
        /// Template file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Template failed to parse.
    #[error("Template syntax error: {0}")]
    Syntax(#[from] minijinja::Error),
}

/// Parsed view and edit templates.
///
/// Loaded once at startup and shared read-only by all requests.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Load `view.html` and `edit.html` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if either file is missing, unreadable or
    /// fails to parse.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| TemplateError::Io { path, source })
        };

        let view = read(VIEW_TEMPLATE)?;
        let edit = read(EDIT_TEMPLATE)?;
        tracing::debug!(dir = %dir.display(), "Loaded templates");

        Self::from_sources(view, edit)
    }

    /// Build templates from in-memory sources.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Syntax`] if either source fails to parse.
    pub fn from_sources(
        view: impl Into<String>,
        edit: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.add_template_owned(VIEW_TEMPLATE, view.into())?;
        env.add_template_owned(EDIT_TEMPLATE, edit.into())?;
        Ok(Self { env })
    }

    /// Templates bundled with the server.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Syntax`] if a bundled template fails to parse.
    pub fn bundled() -> Result<Self, TemplateError> {
        Self::from_sources(DEFAULT_VIEW_TEMPLATE, DEFAULT_EDIT_TEMPLATE)
    }

    /// Render a named template with the page's title and body.
    pub(crate) fn render(&self, name: &str, page: &Page) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(context! {
            title => page.title.as_str(),
            body => page.body_text(),
        })
    }
}
