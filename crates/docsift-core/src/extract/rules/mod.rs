//! Rule-based extractors for invoice-like documents.

pub mod entities;
pub mod patterns;
pub mod tables;

pub use entities::{default_matchers, extract_entities, EntityMatcher};
pub use tables::{RowAlignment, TableReconstructor, LINE_ITEM_HEADERS};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A matched value with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span of the value in the source text.
    pub position: Option<(usize, usize)>,
    /// Full text matched by the rule, marker included.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
