//! Extraction data model: entities, structured fields and reconstructed tables.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kind of entity the extractor knows how to detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// Invoice or bill number.
    InvoiceNumber,
    /// Issue date.
    Date,
    /// Total / amount due.
    Total,
    /// Tax, VAT or GST amount.
    Tax,
    /// Subtotal before tax.
    Subtotal,
}

impl EntityKind {
    /// Tag used in entity lists and as the structured field key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvoiceNumber => "invoiceNumber",
            Self::Date => "date",
            Self::Total => "total",
            Self::Tax => "tax",
            Self::Subtotal => "subtotal",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed field detected in document text.
///
/// `kind` is kept as a string so that payloads edited by a client may carry
/// types outside the extractor vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity type tag (e.g. `invoiceNumber`).
    #[serde(rename = "type")]
    pub kind: String,

    /// Captured value.
    pub value: String,
}

impl Entity {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Key-value projection of the entity list.
///
/// Keys are unique and iteration follows insertion order, so rendering lists
/// fields in the order the extractor declared them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredFields {
    entries: Vec<(String, String)>,
}

impl StructuredFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the projection of an entity list. Later duplicates overwrite
    /// earlier values but keep the original position.
    pub fn from_entities(entities: &[Entity]) -> Self {
        let mut fields = Self::new();
        for entity in entities {
            fields.insert(entity.kind.clone(), entity.value.clone());
        }
        fields
    }

    /// Insert a field, returning the previous value if the key existed.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for StructuredFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StructuredFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = StructuredFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut fields = StructuredFields::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    fields.insert(key, value);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// A heuristically reconstructed table.
///
/// Rows are not validated against the header; a row may hold more or fewer
/// cells than there are headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    /// Column headers.
    pub headers: Vec<String>,

    /// Data rows in source order.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// Output of the structured data extractor.
///
/// Built once per document and read-only afterwards. `structured_data` is
/// always derived from `entities`, so both carry the same keys and values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    raw_text: String,
    structured_data: StructuredFields,
    entities: Vec<Entity>,
    tables: Vec<Table>,
}

impl ExtractionResult {
    /// Assemble a result, deriving the structured fields from the entities.
    pub fn new(raw_text: impl Into<String>, entities: Vec<Entity>, tables: Vec<Table>) -> Self {
        Self {
            raw_text: raw_text.into(),
            structured_data: StructuredFields::from_entities(&entities),
            entities,
            tables,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn structured_data(&self) -> &StructuredFields {
        &self.structured_data
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Decompose into `(raw_text, structured_data, entities, tables)`.
    pub fn into_parts(self) -> (String, StructuredFields, Vec<Entity>, Vec<Table>) {
        (self.raw_text, self.structured_data, self.entities, self.tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_structured_fields_keep_insertion_order() {
        let mut fields = StructuredFields::new();
        fields.insert("total", "10.00");
        fields.insert("date", "01/02/2024");
        assert_eq!(fields.insert("total", "12.00"), Some("10.00".to_string()));

        let pairs: Vec<_> = fields.iter().collect();
        assert_eq!(pairs, vec![("total", "12.00"), ("date", "01/02/2024")]);
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("date"));
        assert!(!fields.contains_key("tax"));
    }

    #[test]
    fn test_structured_fields_serialize_as_ordered_map() {
        let mut fields = StructuredFields::new();
        fields.insert("invoiceNumber", "INV-1");
        fields.insert("date", "1/2/24");

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"invoiceNumber":"INV-1","date":"1/2/24"}"#);

        let back: StructuredFields = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fields);
    }

    #[test]
    fn test_extraction_result_derives_fields_from_entities() {
        let result = ExtractionResult::new(
            "Total: 5",
            vec![Entity::new(EntityKind::Total.as_str(), "5")],
            Vec::new(),
        );

        assert_eq!(result.structured_data().get("total"), Some("5"));
        assert_eq!(result.structured_data().len(), result.entities().len());
    }

    #[test]
    fn test_extraction_result_json_shape() {
        let result = ExtractionResult::new(
            "Invoice INV-7",
            vec![Entity::new("invoiceNumber", "INV-7")],
            Vec::new(),
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["rawText"], "Invoice INV-7");
        assert_eq!(value["structuredData"]["invoiceNumber"], "INV-7");
        assert_eq!(value["entities"][0]["type"], "invoiceNumber");
        assert!(value["tables"].as_array().unwrap().is_empty());
    }
}
