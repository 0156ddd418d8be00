//! Page storage for tinywiki.
//!
//! This crate provides a [`PageStore`] trait for loading and saving wiki pages,
//! keyed by a validated [`Title`]. This enables:
//!
//! - **Unit testing** of the HTTP layer without touching the real filesystem
//! - **Clean separation** between request handling and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Title`] newtype that only admits `[a-zA-Z0-9/\-_]+`
//! - [`PageStore`] trait with `resolve_path()`, `load()`, `save()` and `exists()`
//! - [`FsPageStore`] storing each page as `<root>/<title>.txt`
//! - [`MockPageStore`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use wiki_storage::{FsPageStore, Page, PageStore, Title};
//!
//! let store = FsPageStore::new(PathBuf::from("data"));
//! let title = Title::parse("notes/today")?;
//! store.save(&Page::new(title.clone(), b"Hello".to_vec()))?;
//! let page = store.load(&title)?;
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;
mod title;

pub use fs::FsPageStore;
#[cfg(feature = "mock")]
pub use mock::MockPageStore;
pub use storage::{Page, PageStore, StorageError, StorageErrorKind};
pub use title::Title;
