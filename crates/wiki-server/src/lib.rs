//! HTTP server for tinywiki.
//!
//! This crate provides the axum server behind the wiki:
//! - `GET /view/{title}` renders a page, or redirects to the editor if absent
//! - `GET /edit/{title}` renders the edit form
//! - `POST /save/{title}` stores the form's `body` field and redirects back
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use wiki_server::{ServerConfig, run_server};
//! use wiki_storage::Title;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 8080,
//!         data_dir: PathBuf::from("data"),
//!         templates_dir: PathBuf::from("tmpl"),
//!         atomic_writes: true,
//!         front_page: Title::parse("FrontPage").unwrap(),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (wiki-server)
//!                        │
//!                        ├─► title validation ──► 404 on mismatch
//!                        │
//!                        ├─► PageStore (wiki-storage) ──► <data_dir>/<title>.txt
//!                        │
//!                        └─► minijinja templates (view.html / edit.html)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod templates;

use std::path::PathBuf;
use std::sync::Arc;

use state::AppState;
use wiki_storage::{FsPageStore, PageStore, Title};

pub use error::ServerError;
pub use templates::{
    DEFAULT_EDIT_TEMPLATE, DEFAULT_VIEW_TEMPLATE, EDIT_TEMPLATE, TemplateError, Templates,
    VIEW_TEMPLATE,
};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding page files.
    pub data_dir: PathBuf,
    /// Directory holding `view.html` and `edit.html`.
    pub templates_dir: PathBuf,
    /// Replace page files via temp file and rename.
    pub atomic_writes: bool,
    /// Page that `/` redirects to.
    pub front_page: Title,
}

/// Run the server.
///
/// Templates are loaded before the listener is bound, so a missing or broken
/// template aborts startup.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if templates fail to load or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let templates = Templates::load(&config.templates_dir)?;

    let store: Arc<dyn PageStore> = Arc::new(
        FsPageStore::new(config.data_dir.clone()).with_atomic_writes(config.atomic_writes),
    );

    let state = Arc::new(AppState {
        store,
        templates,
        front_page: config.front_page.clone(),
    });

    let app = app::create_router(state);

    let listener = bind(&config.host, config.port).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        data_dir = %config.data_dir.display(),
        templates_dir = %config.templates_dir.display(),
        "Starting server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Bind a listener on `host`, which may be an IP literal or a hostname.
async fn bind(host: &str, port: u16) -> std::io::Result<tokio::net::TcpListener> {
    // Bracketed IPv6 literals are accepted as well as bare ones
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    tokio::net::TcpListener::bind((host, port)).await
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from wiki config.
///
/// # Errors
///
/// Returns an error if `wiki.front_page` is not a valid title.
pub fn server_config_from_wiki_config(
    config: &wiki_config::Config,
) -> Result<ServerConfig, wiki_config::ConfigError> {
    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        data_dir: config.storage_resolved.data_dir.clone(),
        templates_dir: config.templates_resolved.dir.clone(),
        atomic_writes: config.storage_resolved.atomic_writes,
        front_page: config.front_page()?,
    })
}
