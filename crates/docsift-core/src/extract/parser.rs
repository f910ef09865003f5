//! Structured data extractor combining entity rules and table reconstruction.

use std::time::Instant;

use tracing::info;

use super::rules::{default_matchers, extract_entities, EntityMatcher, RowAlignment, TableReconstructor};
use super::{Result, StructuredExtractor};
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::document::ExtractionResult;

/// Pattern-based extractor for invoice-like documents.
pub struct StructuredDataExtractor {
    matchers: Vec<EntityMatcher>,
    tables: TableReconstructor,
}

impl StructuredDataExtractor {
    /// Create an extractor with the default entity rules and ragged rows.
    pub fn new() -> Self {
        Self {
            matchers: default_matchers(),
            tables: TableReconstructor::new(),
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_row_alignment(config.row_alignment)
    }

    /// Set how table rows are reconciled with the header.
    pub fn with_row_alignment(mut self, alignment: RowAlignment) -> Self {
        self.tables = self.tables.with_alignment(alignment);
        self
    }

    /// Extract from raw bytes, rejecting input that is not UTF-8 text.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<ExtractionResult> {
        let text = std::str::from_utf8(bytes).map_err(|e| ExtractionError::InvalidInput {
            reason: format!("document text is not valid UTF-8: {}", e),
        })?;
        Ok(self.extract(text))
    }
}

impl Default for StructuredDataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredExtractor for StructuredDataExtractor {
    fn extract(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        let entities = extract_entities(&self.matchers, text);
        let tables: Vec<_> = self.tables.reconstruct(text).into_iter().collect();

        info!(
            "Extracted {} entities and {} table rows from {} characters in {:?}",
            entities.len(),
            tables.iter().map(|t| t.rows.len()).sum::<usize>(),
            text.chars().count(),
            start.elapsed()
        );

        ExtractionResult::new(text, entities, tables)
    }
}
