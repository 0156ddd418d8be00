//! Filesystem page store.
//!
//! Provides [`FsPageStore`] which keeps every page as a single file
//! `<root>/<title>.txt`. Titles containing `/` become nested directories.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::storage::{Page, PageStore, StorageError};
use crate::title::Title;

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// File extension appended to every title.
const PAGE_EXTENSION: &str = ".txt";

/// Filesystem page store.
///
/// Stateless apart from its configuration: there is no cache, every load
/// reads the file again.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use wiki_storage::{FsPageStore, PageStore, Title};
///
/// let store = FsPageStore::new(PathBuf::from("data"));
/// let path = store.resolve_path(&Title::parse("dir/page")?);
/// assert_eq!(path, PathBuf::from("data/dir/page.txt"));
/// ```
#[derive(Debug, Clone)]
pub struct FsPageStore {
    /// Data root under which all pages live.
    root: PathBuf,
    /// Write through a temporary file and rename it into place.
    atomic_writes: bool,
}

impl FsPageStore {
    /// Create a store rooted at `root` with atomic writes enabled.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            atomic_writes: true,
        }
    }

    /// Enable or disable atomic (temp file + rename) writes.
    #[must_use]
    pub fn with_atomic_writes(mut self, atomic_writes: bool) -> Self {
        self.atomic_writes = atomic_writes;
        self
    }

    /// Data root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_atomic(dir: &Path, path: &Path, body: &[u8]) -> Result<(), StorageError> {
        let io_err = |e: std::io::Error| {
            StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND)
        };

        // The temp file must share the target's filesystem for the rename to be atomic.
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(body).map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn write_in_place(path: &Path, body: &[u8]) -> Result<(), StorageError> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        options
            .open(path)
            .and_then(|mut file| file.write_all(body))
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))
    }
}

impl PageStore for FsPageStore {
    fn resolve_path(&self, title: &Title) -> PathBuf {
        let file_name = format!("{title}{PAGE_EXTENSION}");
        let mut path = self.root.clone();
        // Empty segments would turn "/x" into an absolute path and escape the root.
        path.extend(file_name.split('/').filter(|segment| !segment.is_empty()));
        path
    }

    fn load(&self, title: &Title) -> Result<Page, StorageError> {
        let path = self.resolve_path(title);
        tracing::debug!(title = %title, path = %path.display(), "Loading page");

        let body = fs::read(&path)
            .map_err(|e| StorageError::io(e, Some(path.clone())).with_backend(BACKEND))?;

        Ok(Page::new(title.clone(), body))
    }

    fn save(&self, page: &Page) -> Result<(), StorageError> {
        let path = self.resolve_path(&page.title);
        tracing::debug!(
            title = %page.title,
            path = %path.display(),
            bytes = page.body.len(),
            "Saving page"
        );

        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)
            .map_err(|e| StorageError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?;

        if self.atomic_writes {
            Self::write_atomic(dir, &path, &page.body)
        } else {
            Self::write_in_place(&path, &page.body)
        }
    }

    fn exists(&self, title: &Title) -> bool {
        self.resolve_path(title).is_file()
    }
}
