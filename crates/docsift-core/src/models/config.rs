//! Configuration structures for the extraction and export pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{DocsiftError, Result};
use crate::export::ExportFormat;
use crate::extract::rules::tables::RowAlignment;

/// Main configuration for docsift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsiftConfig {
    /// Structured data extraction configuration.
    pub extraction: ExtractionConfig,

    /// Artifact export configuration.
    pub export: ExportConfig,

    /// Document text source configuration.
    pub source: SourceConfig,
}

/// Structured data extraction configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How reconstructed rows are reconciled with the fixed table header.
    pub row_alignment: RowAlignment,
}

/// Artifact export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving rendered artifacts.
    pub output_dir: PathBuf,

    /// Format used when none is requested.
    pub default_format: ExportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
            default_format: ExportFormat::Spreadsheet,
        }
    }
}

/// Document text source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Largest document accepted, in bytes.
    pub max_file_size: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
        }
    }
}

impl DocsiftConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| DocsiftError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| DocsiftError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
