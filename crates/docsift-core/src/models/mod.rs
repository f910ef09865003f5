//! Data models shared by the extractor and the exporter.

pub mod config;
pub mod document;
pub mod export;

pub use config::{DocsiftConfig, ExportConfig, ExtractionConfig, SourceConfig};
pub use document::{Entity, EntityKind, ExtractionResult, StructuredFields, Table};
pub use export::{ExportBundle, ExportMetadata, ExportPayload, PayloadMetadata};
