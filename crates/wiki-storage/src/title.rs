//! Page titles.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::storage::StorageError;

/// Characters allowed in a title: ASCII letters, digits, `/`, `-` and `_`.
static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9/\-_]+$").unwrap());

/// Validated page title.
///
/// A title is the unique identifier of a page. It may contain `/`, in which
/// case the page lives in a nested directory under the data root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    /// Parse a title, rejecting anything outside the allowed charset.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidPath` [`StorageError`] if `raw` is empty or contains
    /// a character other than `[a-zA-Z0-9/\-_]`.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        if TITLE_PATTERN.is_match(raw) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(StorageError::invalid_title(raw))
        }
    }

    /// Title text as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
