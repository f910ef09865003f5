//! Error types for the docsift-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::export::ExportFormat;

/// Main error type for the docsift library.
#[derive(Error, Debug)]
pub enum DocsiftError {
    /// Structured data extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Artifact export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Document text source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to structured data extraction.
///
/// Absence of a pattern match is never an error; only input that cannot be
/// treated as text ends up here.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The input could not be interpreted as document text.
    #[error("invalid extraction input: {reason}")]
    InvalidInput { reason: String },
}

/// Errors related to rendering and publishing export artifacts.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Format-specific serialization failed.
    #[error("failed to render {format} artifact: {reason}")]
    Render { format: ExportFormat, reason: String },

    /// The output directory could not be created or accessed.
    #[error("output directory {} is not usable: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or publishing the artifact failed.
    #[error("failed to write artifact {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Spreadsheet serialization error.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// Delimited text serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ExportError {
    pub(crate) fn render(format: ExportFormat, reason: impl Into<String>) -> Self {
        Self::Render {
            format,
            reason: reason.into(),
        }
    }
}

/// Errors related to reading text out of uploaded documents.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The document does not exist.
    #[error("document not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The document kind has no text reader.
    #[error("unsupported document type: {kind}")]
    Unsupported { kind: String },

    /// The document exceeds the configured size limit.
    #[error("document too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    /// Failed to read the document.
    #[error("failed to read document: {0}")]
    Read(#[from] std::io::Error),

    /// PDF text extraction failed.
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// Word document text extraction failed.
    #[error("Word document extraction failed: {0}")]
    Docx(String),
}

/// Result type for the docsift library.
pub type Result<T> = std::result::Result<T, DocsiftError>;
