//! `wiki serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use wiki_config::{CliSettings, Config};
use wiki_server::{run_server, server_config_from_wiki_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover wiki.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page data directory (overrides config).
    #[arg(short, long, env = "WIKI_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Templates directory (overrides config).
    #[arg(short, long, env = "WIKI_TEMPLATES_DIR")]
    templates_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "WIKI_PORT")]
    port: Option<u16>,

    /// Write pages in place instead of via temp file and rename.
    #[arg(long)]
    no_atomic_writes: bool,

    /// Enable verbose output (request and storage logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            data_dir: self.data_dir,
            templates_dir: self.templates_dir,
            atomic_writes: self.no_atomic_writes.then_some(false),
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting wiki on http://{}:{}/",
            config.server.host, config.server.port
        ));
        output.setting("Pages", config.storage_resolved.data_dir.display());
        output.setting("Templates", config.templates_resolved.dir.display());
        output.setting("Front page", &config.wiki.front_page);
        if !config.storage_resolved.atomic_writes {
            output.warning("Atomic writes disabled: a crash mid-save can truncate a page");
        }

        let server_config = server_config_from_wiki_config(&config)?;
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
