//! CLI subcommands.

pub mod config;
pub mod export;
pub mod extract;

use std::path::{Path, PathBuf};

use tracing::debug;

use docsift_core::models::config::DocsiftConfig;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docsift")
        .join("config.json")
}

/// Resolve the configuration file: the explicit path if given, else the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicitly requested file must exist.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<DocsiftConfig> {
    if let Some(path) = explicit {
        return load_from(Path::new(path));
    }

    let path = default_config_path();
    if path.exists() {
        load_from(&path)
    } else {
        debug!("No config file at {}, using defaults", path.display());
        Ok(DocsiftConfig::default())
    }
}

fn load_from(path: &Path) -> anyhow::Result<DocsiftConfig> {
    DocsiftConfig::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
}
