//! Ordered table of typed entity matchers.

use regex::Regex;
use tracing::debug;

use super::patterns::{INVOICE_NUMBER, ISSUE_DATE, SUBTOTAL, TAX, TOTAL};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::document::{Entity, EntityKind};

/// A single entity rule: tag, compiled pattern and the capture group holding
/// the value.
pub struct EntityMatcher {
    pub kind: EntityKind,
    pattern: &'static Regex,
    group: usize,
}

impl EntityMatcher {
    pub fn new(kind: EntityKind, pattern: &'static Regex, group: usize) -> Self {
        Self {
            kind,
            pattern,
            group,
        }
    }

    /// Convert the first match into an entity.
    pub fn find_entity(&self, text: &str) -> Option<Entity> {
        let found = self.extract(text)?;
        debug!(
            "Matched {} = {:?} from {:?} at {:?}",
            self.kind, found.value, found.source, found.position
        );
        Some(Entity::new(self.kind.as_str(), found.value))
    }
}

impl FieldExtractor for EntityMatcher {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = self.pattern.captures(text)?;
        let value = caps.get(self.group)?;
        Some(
            ExtractionMatch::new(value.as_str().to_string(), &caps[0])
                .with_position(value.start(), value.end()),
        )
    }
}

/// The entity rules in declaration order. Entities are reported in this
/// order regardless of where they occur in the text.
pub fn default_matchers() -> Vec<EntityMatcher> {
    vec![
        EntityMatcher::new(EntityKind::InvoiceNumber, &INVOICE_NUMBER, 1),
        EntityMatcher::new(EntityKind::Date, &ISSUE_DATE, 1),
        EntityMatcher::new(EntityKind::Total, &TOTAL, 1),
        EntityMatcher::new(EntityKind::Tax, &TAX, 1),
        EntityMatcher::new(EntityKind::Subtotal, &SUBTOTAL, 1),
    ]
}

/// Extract at most one entity per matcher, first match wins.
pub fn extract_entities(matchers: &[EntityMatcher], text: &str) -> Vec<Entity> {
    matchers
        .iter()
        .filter_map(|matcher| matcher.find_entity(text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_match_wins() {
        let matcher = EntityMatcher::new(EntityKind::Tax, &TAX, 1);
        let text = "VAT: 10.00\nTax: 20.00";

        let found = matcher.extract(text).unwrap();
        assert_eq!(found.value, "10.00");
        assert_eq!(found.source, "VAT: 10.00");
        assert_eq!(found.position, Some((5, 10)));
        assert_eq!(matcher.find_entity(text), Some(Entity::new("tax", "10.00")));
    }

    #[test]
    fn test_entities_follow_declaration_order() {
        let text = "Total: 120.00\nInvoice No: X-9\nDate: 01/02/2024";
        let entities = extract_entities(&default_matchers(), text);

        let kinds: Vec<&str> = entities.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec!["invoiceNumber", "date", "total"]);
    }

    #[test]
    fn test_no_markers_no_entities() {
        assert!(extract_entities(&default_matchers(), "hello world").is_empty());
    }
}
