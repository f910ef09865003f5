//! Export bundle: an extraction result enriched with export metadata.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::document::{Entity, ExtractionResult, StructuredFields, Table};

/// Version stamped into every exported artifact.
pub const EXPORT_VERSION: &str = "2.0";

/// Application name shown in artifact headers.
pub const APPLICATION_NAME: &str = "Docsift Document Processor";

/// Metadata attached to a bundle for one export request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// Name of the uploaded document, as given by the request.
    pub original_filename: String,

    /// Whether the text was edited by the user after extraction.
    pub is_edited: bool,

    /// When the edit happened. Always `None` unless `is_edited` is set.
    pub edited_at: Option<DateTime<Utc>>,

    /// When the bundle was prepared.
    pub export_date: DateTime<Utc>,

    /// Export format version.
    pub version: String,
}

/// The unit of work for a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    pub raw_text: String,
    pub structured_data: StructuredFields,
    pub entities: Vec<Entity>,
    pub tables: Vec<Table>,
    pub metadata: ExportMetadata,
}

impl ExportBundle {
    /// Normalize a caller-supplied payload, stamping the current time.
    pub fn prepare(payload: ExportPayload, original_filename: &str) -> Self {
        Self::prepare_at(payload, original_filename, Utc::now())
    }

    /// Normalize a caller-supplied payload with an explicit export date.
    ///
    /// Missing parts become empty containers and metadata falls back to the
    /// defaults. Preparing the payload of an already prepared bundle with the
    /// same arguments yields the same bundle.
    pub fn prepare_at(
        payload: ExportPayload,
        original_filename: &str,
        export_date: DateTime<Utc>,
    ) -> Self {
        let meta = payload.metadata.unwrap_or_default();
        let is_edited = meta.is_edited.unwrap_or(false);
        let edited_at = if is_edited { meta.edited_at } else { None };

        Self {
            raw_text: payload.raw_text.unwrap_or_default(),
            structured_data: payload.structured_data.unwrap_or_default(),
            entities: payload.entities.unwrap_or_default(),
            tables: payload.tables.unwrap_or_default(),
            metadata: ExportMetadata {
                original_filename: original_filename.to_string(),
                is_edited,
                edited_at,
                export_date,
                version: EXPORT_VERSION.to_string(),
            },
        }
    }

    /// Length of the raw text in characters.
    pub fn text_length(&self) -> usize {
        self.raw_text.chars().count()
    }

    /// Status line shown in every artifact header.
    pub fn status_label(&self) -> &'static str {
        if self.metadata.is_edited {
            "EDITED BY USER"
        } else {
            "ORIGINAL EXTRACTION"
        }
    }

    /// Edit timestamp, only when the bundle is edited and the time is known.
    pub fn edited_at_label(&self) -> Option<String> {
        if !self.metadata.is_edited {
            return None;
        }
        self.metadata.edited_at.map(format_timestamp)
    }

    pub fn export_date_label(&self) -> String {
        format_timestamp(self.metadata.export_date)
    }
}

/// Render a timestamp the way every artifact shows it.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Caller-supplied export data, possibly edited by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<StructuredFields>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<Entity>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PayloadMetadata>,
}

/// Editing metadata a client may send along with a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetadata {
    #[serde(default)]
    pub is_edited: Option<bool>,

    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
}

impl ExportPayload {
    /// Payload carrying user-edited text on top of an extraction.
    pub fn edited(mut self, raw_text: impl Into<String>, edited_at: DateTime<Utc>) -> Self {
        self.raw_text = Some(raw_text.into());
        self.metadata = Some(PayloadMetadata {
            is_edited: Some(true),
            edited_at: Some(edited_at),
        });
        self
    }
}

impl From<ExtractionResult> for ExportPayload {
    fn from(result: ExtractionResult) -> Self {
        let (raw_text, structured_data, entities, tables) = result.into_parts();
        Self {
            raw_text: Some(raw_text),
            structured_data: Some(structured_data),
            entities: Some(entities),
            tables: Some(tables),
            metadata: None,
        }
    }
}

impl From<ExportBundle> for ExportPayload {
    fn from(bundle: ExportBundle) -> Self {
        Self {
            raw_text: Some(bundle.raw_text),
            structured_data: Some(bundle.structured_data),
            entities: Some(bundle.entities),
            tables: Some(bundle.tables),
            metadata: Some(PayloadMetadata {
                is_edited: Some(bundle.metadata.is_edited),
                edited_at: bundle.metadata.edited_at,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_prepare_fills_defaults() {
        let bundle = ExportBundle::prepare_at(ExportPayload::default(), "scan", fixed_time());

        assert_eq!(bundle.raw_text, "");
        assert!(bundle.structured_data.is_empty());
        assert!(bundle.entities.is_empty());
        assert!(bundle.tables.is_empty());
        assert_eq!(bundle.metadata.original_filename, "scan");
        assert!(!bundle.metadata.is_edited);
        assert_eq!(bundle.metadata.edited_at, None);
        assert_eq!(bundle.metadata.export_date, fixed_time());
        assert_eq!(bundle.metadata.version, EXPORT_VERSION);
    }

    #[test]
    fn test_prepare_drops_edit_time_when_not_edited() {
        let payload = ExportPayload {
            raw_text: Some("text".to_string()),
            metadata: Some(PayloadMetadata {
                is_edited: Some(false),
                edited_at: Some(fixed_time()),
            }),
            ..Default::default()
        };

        let bundle = ExportBundle::prepare_at(payload, "doc", fixed_time());
        assert_eq!(bundle.metadata.edited_at, None);
        assert_eq!(bundle.edited_at_label(), None);
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let result = ExtractionResult::new(
            "Invoice #: A-1\nTotal: 9.99",
            vec![Entity::new("invoiceNumber", "A-1"), Entity::new("total", "9.99")],
            vec![Table::new(vec!["Item".to_string()], vec![vec!["x".to_string(), "1".to_string()]])],
        );
        let payload = ExportPayload::from(result).edited("edited text", fixed_time());

        let first = ExportBundle::prepare_at(payload, "invoice", fixed_time());
        let second = ExportBundle::prepare_at(ExportPayload::from(first.clone()), "invoice", fixed_time());

        assert_eq!(first, second);
    }

    #[test]
    fn test_payload_deserializes_client_json() {
        let json = r#"{
            "rawText": "Edited body",
            "structuredData": {"total": "10.00"},
            "metadata": {"isEdited": true, "editedAt": "2024-03-01T12:30:00.000Z", "source": "web"}
        }"#;

        let payload: ExportPayload = serde_json::from_str(json).unwrap();
        let bundle = ExportBundle::prepare_at(payload, "upload", fixed_time());

        assert_eq!(bundle.raw_text, "Edited body");
        assert_eq!(bundle.structured_data.get("total"), Some("10.00"));
        assert!(bundle.metadata.is_edited);
        assert_eq!(bundle.status_label(), "EDITED BY USER");
        assert_eq!(
            bundle.edited_at_label().as_deref(),
            Some("2024-03-01T12:30:00.000Z")
        );
    }

    #[test]
    fn test_text_length_counts_characters() {
        let payload = ExportPayload {
            raw_text: Some("€5".to_string()),
            ..Default::default()
        };
        let bundle = ExportBundle::prepare_at(payload, "x", fixed_time());
        assert_eq!(bundle.text_length(), 2);
    }
}
