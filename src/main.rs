//! Blogedit - editor for XML blog articles kept on a file server
//!
//! Keeps a buffer in sync with the article directory, auto-indents on line
//! breaks and re-renders an HTML preview after every edit.

mod app;
mod core;
mod store;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::BlogEditApp;
use crate::core::config::AppConfig;
use crate::core::session::EditSession;
use crate::store::LocalDirStore;

fn main() -> Result<()> {
    let mut config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize logging; stdout carries the command protocol
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(config.level_filter())
        .init();

    tracing::info!("Starting Blogedit...");

    let root = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.store.root.clone())
        .context("No article directory given; pass one as the first argument or set store.root")?;

    let store = LocalDirStore::open(&root)?;
    let session = EditSession::start(store)
        .with_context(|| format!("Failed to list articles in {}", root.display()))?;

    if config.remember_root(&root) {
        if let Err(e) = config.save() {
            tracing::warn!("Could not remember {}: {}", root.display(), e);
        }
    }

    let mut app = BlogEditApp::new(session, config);
    if let Err(e) = app.open_index(0) {
        tracing::warn!("Nothing opened at startup: {}", e);
    }

    let stdin = std::io::stdin();
    app.run(stdin.lock(), std::io::stdout().lock())
}
