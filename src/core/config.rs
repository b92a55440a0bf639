//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::session::DEFAULT_CATEGORY;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the articles live
    pub store: StoreConfig,
    /// Editing behavior
    pub editor: EditorConfig,
    /// Preview output
    pub preview: PreviewConfig,
    /// Log level for the stderr logger (`error`..`trace`)
    pub log_level: String,
}

/// Article store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the articles
    pub root: Option<PathBuf>,
    /// Command run in the store directory to rebuild the site data
    pub regenerate_command: String,
}

/// Editor-specific settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Columns added after a line ending in `>`
    pub indent_width: usize,
    /// Save on every line break
    pub autosave_on_newline: bool,
    /// Category written into new articles
    pub default_category: String,
}

/// Preview settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// File the rendered preview is written to after every change
    pub output: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            editor: EditorConfig::default(),
            preview: PreviewConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: None,
            regenerate_command: "./generate_blog_data.py".to_string(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            autosave_on_newline: true,
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "blogedit", "BlogEdit")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`, falling back to defaults when it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Record `root` as the last opened store. Returns whether it changed.
    pub fn remember_root(&mut self, root: &Path) -> bool {
        if self.store.root.as_deref() == Some(root) {
            return false;
        }
        self.store.root = Some(root.to_path_buf());
        true
    }

    /// Log level filter, defaulting to `INFO` for unknown names
    pub fn level_filter(&self) -> tracing_subscriber::filter::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO)
    }
}
