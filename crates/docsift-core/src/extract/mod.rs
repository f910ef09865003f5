//! Structured data extraction from raw document text.

mod parser;
pub mod rules;

pub use parser::StructuredDataExtractor;

use crate::error::ExtractionError;
use crate::models::document::ExtractionResult;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for structured data extractors.
pub trait StructuredExtractor {
    /// Extract entities, structured fields and tables from document text.
    ///
    /// Finding nothing is a normal, empty result.
    fn extract(&self, text: &str) -> ExtractionResult;
}
