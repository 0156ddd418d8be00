//! `wiki init` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use wiki_config::CONFIG_FILENAME;
use wiki_server::{DEFAULT_EDIT_TEMPLATE, DEFAULT_VIEW_TEMPLATE, EDIT_TEMPLATE, VIEW_TEMPLATE};

use crate::error::CliError;
use crate::output::Output;

/// Starter configuration written next to the data and template directories.
const STARTER_CONFIG: &str = r#"[server]
host = "127.0.0.1"
port = 8080

[storage]
data_dir = "data"
atomic_writes = true

[templates]
dir = "tmpl"

[wiki]
front_page = "FrontPage"
"#;

/// Arguments for the init command.
#[derive(Args)]
pub(crate) struct InitArgs {
    /// Directory to initialize (default: current directory).
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Overwrite existing templates and config.
    #[arg(long)]
    force: bool,
}

/// What happened to a scaffolded file.
#[derive(Debug, PartialEq, Eq)]
enum FileStatus {
    Written,
    Kept,
}

impl InitArgs {
    /// Execute the init command.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be created.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        for (path, status) in scaffold(&self.dir, self.force)? {
            match status {
                FileStatus::Written => output.created(&path),
                FileStatus::Kept => output.kept(&path),
            }
        }
        output.info(&format!(
            "Run `wiki serve -c {}` to start the server",
            self.dir.join(CONFIG_FILENAME).display()
        ));

        Ok(())
    }
}

/// Create the data directory, templates and config under `dir`.
fn scaffold(dir: &Path, force: bool) -> Result<Vec<(PathBuf, FileStatus)>, CliError> {
    std::fs::create_dir_all(dir.join("data"))?;
    std::fs::create_dir_all(dir.join("tmpl"))?;

    let files = [
        (dir.join("tmpl").join(VIEW_TEMPLATE), DEFAULT_VIEW_TEMPLATE),
        (dir.join("tmpl").join(EDIT_TEMPLATE), DEFAULT_EDIT_TEMPLATE),
        (dir.join(CONFIG_FILENAME), STARTER_CONFIG),
    ];

    let mut report = Vec::with_capacity(files.len());
    for (path, content) in files {
        let status = write_file(&path, content, force)?;
        report.push((path, status));
    }
    Ok(report)
}

fn write_file(path: &Path, content: &str, force: bool) -> Result<FileStatus, CliError> {
    if path.exists() && !force {
        return Ok(FileStatus::Kept);
    }
    std::fs::write(path, content)?;
    Ok(FileStatus::Written)
}
