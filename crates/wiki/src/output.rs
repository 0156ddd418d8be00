//! Terminal output for the wiki commands.
//!
//! Everything goes to stderr so stdout stays free for piping.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};

/// Width of the label column in startup summaries.
const LABEL_WIDTH: usize = 12;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    label: Style,
    created: Style,
    warn: Style,
    failed: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().bold(),
            created: Style::new().green(),
            warn: Style::new().yellow(),
            failed: Style::new().red(),
        }
    }

    fn line(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a plain message.
    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    /// Print one `label: value` row of the server startup summary.
    pub(crate) fn setting(&self, label: &str, value: impl Display) {
        self.line(&format!("  {} {value}", self.label.apply_to(label_cell(label))));
    }

    /// Report a file written by `wiki init`.
    pub(crate) fn created(&self, path: &Path) {
        self.line(&format!(
            "{} {}",
            self.created.apply_to("created"),
            path.display()
        ));
    }

    /// Report an existing file that `wiki init` left alone.
    pub(crate) fn kept(&self, path: &Path) {
        self.line(&format!(
            "{} {} (use --force to overwrite)",
            self.warn.apply_to("kept"),
            path.display()
        ));
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.warn.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.failed.apply_to(msg).to_string());
    }
}

/// Pad `label:` to the summary's label column.
fn label_cell(label: &str) -> String {
    format!("{:<width$}", format!("{label}:"), width = LABEL_WIDTH)
}
