//! Multi-format export of extraction results.
//!
//! Each render call turns an [`ExportBundle`] into bytes with a format
//! specific [`Renderer`] and publishes them atomically into the output
//! directory under a unique name.

pub mod chunking;
pub mod delimited;
pub mod output;
pub mod plain_text;
pub mod spreadsheet;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub use delimited::DelimitedRenderer;
pub use output::OutputDirectory;
pub use plain_text::PlainTextRenderer;
pub use spreadsheet::SpreadsheetRenderer;

use crate::error::ExportError;
use crate::models::export::ExportBundle;

/// Fallback base name when sanitizing leaves nothing.
const DEFAULT_BASE_NAME: &str = "document";

/// Artifact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Two-sheet XLSX workbook.
    Spreadsheet,
    /// Sectioned CSV.
    Delimited,
    /// UTF-8 text report.
    PlainText,
}

impl ExportFormat {
    /// File extension of artifacts in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Spreadsheet => "xlsx",
            Self::Delimited => "csv",
            Self::PlainText => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spreadsheet => f.write_str("spreadsheet"),
            Self::Delimited => f.write_str("CSV"),
            Self::PlainText => f.write_str("text"),
        }
    }
}

/// Serializes a bundle into one artifact format.
pub trait Renderer {
    /// Format produced by this renderer.
    fn format(&self) -> ExportFormat;

    /// Render the bundle to the artifact's bytes.
    fn render(&self, bundle: &ExportBundle) -> Result<Vec<u8>, ExportError>;
}

/// Reduce a name to lowercase `[a-z0-9_]`, one underscore per other character.
pub fn sanitize_base_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        DEFAULT_BASE_NAME.to_string()
    } else {
        sanitized
    }
}

/// Renders bundles into spreadsheet, CSV and text artifacts.
#[derive(Debug, Clone)]
pub struct MultiFormatExporter {
    output: OutputDirectory,
}

impl MultiFormatExporter {
    /// Create an exporter writing into `output_dir`, created if absent.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        Ok(Self {
            output: OutputDirectory::open(output_dir)?,
        })
    }

    pub fn output_dir(&self) -> &Path {
        self.output.path()
    }

    /// Render a two-sheet workbook.
    pub fn render_spreadsheet(
        &self,
        bundle: &ExportBundle,
        base_name: &str,
    ) -> Result<PathBuf, ExportError> {
        self.publish(&SpreadsheetRenderer, bundle, base_name)
    }

    /// Render sectioned CSV.
    pub fn render_delimited(
        &self,
        bundle: &ExportBundle,
        base_name: &str,
    ) -> Result<PathBuf, ExportError> {
        self.publish(&DelimitedRenderer, bundle, base_name)
    }

    /// Render a plain text report.
    pub fn render_plain_text(
        &self,
        bundle: &ExportBundle,
        base_name: &str,
    ) -> Result<PathBuf, ExportError> {
        self.publish(&PlainTextRenderer, bundle, base_name)
    }

    /// Render in the requested format.
    pub fn export(
        &self,
        format: ExportFormat,
        bundle: &ExportBundle,
        base_name: &str,
    ) -> Result<PathBuf, ExportError> {
        match format {
            ExportFormat::Spreadsheet => self.render_spreadsheet(bundle, base_name),
            ExportFormat::Delimited => self.render_delimited(bundle, base_name),
            ExportFormat::PlainText => self.render_plain_text(bundle, base_name),
        }
    }

    fn publish(
        &self,
        renderer: &dyn Renderer,
        bundle: &ExportBundle,
        base_name: &str,
    ) -> Result<PathBuf, ExportError> {
        let format = renderer.format();
        let safe_name = sanitize_base_name(base_name);

        info!(
            "Generating {} file for {} ({} characters, edited: {})",
            format,
            safe_name,
            bundle.text_length(),
            bundle.metadata.is_edited
        );

        let result = renderer.render(bundle).and_then(|bytes| {
            self.output
                .publish(&safe_name, format.extension(), &bytes, Utc::now())
                .map(|path| (path, bytes.len()))
        });

        match result {
            Ok((path, size)) => {
                info!("{} file created: {} ({} KB)", format, path.display(), size.div_ceil(1024));
                Ok(path)
            }
            Err(e) => {
                error!("{} generation failed: {}", format, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{StructuredDataExtractor, StructuredExtractor};
    use crate::models::export::ExportPayload;
    use std::sync::Arc;

    fn sample_bundle() -> ExportBundle {
        let result = StructuredDataExtractor::new().extract(
            "Invoice #: INV-2024-001\n\
             Widget   2   $10.00   $20.00\n\
             Total: $20.00",
        );
        ExportBundle::prepare(ExportPayload::from(result), "Scan 01.PDF")
    }

    #[test]
    fn test_sanitize_base_name() {
        assert_eq!(sanitize_base_name("Invoice-2024 (copy)"), "invoice_2024__copy_");
        assert_eq!(sanitize_base_name("résumé"), "r_sum_");
        assert_eq!(sanitize_base_name(""), "document");
        assert_eq!(sanitize_base_name("../etc/passwd"), "___etc_passwd");
    }

    #[test]
    fn test_each_format_lands_in_output_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = MultiFormatExporter::new(tmp.path().join("exports")).unwrap();
        let bundle = sample_bundle();

        for format in [ExportFormat::Spreadsheet, ExportFormat::Delimited, ExportFormat::PlainText] {
            let path = exporter.export(format, &bundle, "Scan 01").unwrap();

            assert!(path.is_absolute());
            assert!(path.exists());
            assert_eq!(path.extension().unwrap(), format.extension());
            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(name.starts_with("scan_01_"), "unexpected name {}", name);
        }
    }

    #[test]
    fn test_concurrent_exports_get_distinct_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = Arc::new(MultiFormatExporter::new(tmp.path()).unwrap());
        let bundle = Arc::new(sample_bundle());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let exporter = Arc::clone(&exporter);
                let bundle = Arc::clone(&bundle);
                std::thread::spawn(move || exporter.render_delimited(&bundle, "report").unwrap())
            })
            .collect();

        let mut paths: Vec<PathBuf> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        paths.sort();
        paths.dedup();

        assert_eq!(paths.len(), 8);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 8);
    }

    #[test]
    fn test_missing_output_dir_is_recreated() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("gone");
        let exporter = MultiFormatExporter::new(&out).unwrap();
        std::fs::remove_dir(&out).unwrap();

        let path = exporter.render_plain_text(&sample_bundle(), "x").unwrap();
        assert!(path.starts_with(out.canonicalize().unwrap()));
    }

    struct BrokenRenderer;

    impl Renderer for BrokenRenderer {
        fn format(&self) -> ExportFormat {
            ExportFormat::Spreadsheet
        }

        fn render(&self, _bundle: &ExportBundle) -> Result<Vec<u8>, ExportError> {
            Err(ExportError::render(ExportFormat::Spreadsheet, "cell overflow"))
        }
    }

    #[test]
    fn test_failed_render_leaves_no_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = MultiFormatExporter::new(tmp.path()).unwrap();

        let err = exporter
            .publish(&BrokenRenderer, &sample_bundle(), "broken")
            .unwrap_err();

        assert!(matches!(
            err,
            ExportError::Render { format: ExportFormat::Spreadsheet, .. }
        ));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_format_serde_names() {
        assert_eq!(serde_json::to_string(&ExportFormat::PlainText).unwrap(), "\"plain-text\"");
        let format: ExportFormat = serde_json::from_str("\"delimited\"").unwrap();
        assert_eq!(format, ExportFormat::Delimited);
    }
}
