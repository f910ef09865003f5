//! Core library for document data extraction and export.
//!
//! This crate provides:
//! - Rule-based extraction of invoice fields and line-item tables from raw text
//! - Normalization of extraction results and user edits into export bundles
//! - Spreadsheet (XLSX), delimited (CSV) and plain text renderers
//! - Atomic, collision-free publication of rendered artifacts
//! - Text readers for plain text, PDF and DOCX documents

pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod source;

pub use error::{DocsiftError, ExportError, ExtractionError, Result, SourceError};
pub use export::{ExportFormat, MultiFormatExporter, Renderer};
pub use extract::rules::RowAlignment;
pub use extract::{StructuredDataExtractor, StructuredExtractor};
pub use models::{
    DocsiftConfig, Entity, EntityKind, ExportBundle, ExportPayload, ExtractionResult,
    StructuredFields, Table,
};
pub use source::{DocumentKind, FileTextSource, TextSource};
