//! Page store trait and error types.
//!
//! Provides the core [`PageStore`] trait for loading and saving pages,
//! along with [`StorageError`] for unified error handling across backends.

use std::borrow::Cow;
use std::path::PathBuf;

use crate::title::Title;

/// A titled unit of content.
///
/// Pages are transient values: the store owns the persisted copy and every
/// load reads it again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Page title.
    pub title: Title,
    /// Raw page content, possibly empty.
    pub body: Vec<u8>,
}

impl Page {
    /// Create a page from a title and body.
    #[must_use]
    pub fn new(title: Title, body: Vec<u8>) -> Self {
        Self { title, body }
    }

    /// Create a page with no content.
    #[must_use]
    pub fn empty(title: Title) -> Self {
        Self::new(title, Vec::new())
    }

    /// Body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Page does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid title or path.
    InvalidPath,
    /// Operation timed out.
    Timeout,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create an invalid path error for a rejected title.
    #[must_use]
    pub fn invalid_title(raw: &str) -> Self {
        Self::new(StorageErrorKind::InvalidPath).with_path(raw)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => StorageErrorKind::Timeout,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }

    /// True if the page simply does not exist yet.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Timeout => "Timeout",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Page storage abstraction.
///
/// Implementations own the mapping from [`Title`] to their storage location.
/// Nothing is cached between calls: every `load` observes the latest `save`.
///
/// Concurrent saves of the same title are not coordinated; the last writer wins.
pub trait PageStore: Send + Sync {
    /// Location a title maps to.
    ///
    /// Pure function of the title and the store root. The title is trusted to
    /// have passed [`Title::parse`].
    fn resolve_path(&self, title: &Title) -> PathBuf;

    /// Read a page.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`StorageError`] if the page was never saved, or
    /// another kind if the content cannot be read.
    fn load(&self, title: &Title) -> Result<Page, StorageError>;

    /// Write a page, replacing any existing content.
    ///
    /// Creates intermediate directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if directory creation or the write fails.
    fn save(&self, page: &Page) -> Result<(), StorageError>;

    /// Check if a page exists.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, title: &Title) -> bool;
}
