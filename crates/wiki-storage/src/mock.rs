//! Mock page store for testing.
//!
//! Provides [`MockPageStore`] for unit testing without filesystem access.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::storage::{Page, PageStore, StorageError, StorageErrorKind};
use crate::title::Title;

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock page store for testing.
///
/// Stores page bodies in memory. Use the builder methods to seed pages or
/// to make every operation fail with a given error kind.
///
/// # Example
///
/// ```ignore
/// use wiki_storage::{MockPageStore, PageStore, Title};
///
/// let store = MockPageStore::new().with_page("FrontPage", "Welcome");
/// let page = store.load(&Title::parse("FrontPage")?)?;
/// ```
#[derive(Debug, Default)]
pub struct MockPageStore {
    pages: RwLock<HashMap<String, Vec<u8>>>,
    failure: Option<StorageErrorKind>,
}

impl MockPageStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(title.into(), body.into());
        self
    }

    /// Make every load and save fail with `kind`.
    #[must_use]
    pub fn fail_with(mut self, kind: StorageErrorKind) -> Self {
        self.failure = Some(kind);
        self
    }

    /// Raw body stored for a title, bypassing failure injection.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn body(&self, title: &str) -> Option<Vec<u8>> {
        self.pages.read().unwrap().get(title).cloned()
    }

    fn injected_failure(&self, title: &Title) -> Result<(), StorageError> {
        match self.failure {
            Some(kind) => Err(StorageError::new(kind)
                .with_path(self.resolve_path(title))
                .with_backend(BACKEND)),
            None => Ok(()),
        }
    }
}

impl PageStore for MockPageStore {
    fn resolve_path(&self, title: &Title) -> PathBuf {
        PathBuf::from(format!("{title}.txt"))
    }

    fn load(&self, title: &Title) -> Result<Page, StorageError> {
        self.injected_failure(title)?;
        self.pages
            .read()
            .unwrap()
            .get(title.as_str())
            .map(|body| Page::new(title.clone(), body.clone()))
            .ok_or_else(|| StorageError::not_found(self.resolve_path(title)).with_backend(BACKEND))
    }

    fn save(&self, page: &Page) -> Result<(), StorageError> {
        self.injected_failure(&page.title)?;
        self.pages
            .write()
            .unwrap()
            .insert(page.title.as_str().to_owned(), page.body.clone());
        Ok(())
    }

    fn exists(&self, title: &Title) -> bool {
        self.pages.read().unwrap().contains_key(title.as_str())
    }
}
