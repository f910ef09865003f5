//! Delimited text (CSV) renderer.
//!
//! Layout: a `#` comment header, then labeled sections. Every data field is
//! wrapped in double quotes with embedded quotes doubled; the raw text field
//! additionally has backslashes doubled and newlines and carriage returns
//! replaced by the literal escapes `\n` and `\r` so it stays on one line.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::{ExportFormat, Renderer};
use crate::error::ExportError;
use crate::models::export::ExportBundle;

const TITLE: &str = "DOCSIFT EXTRACTION DATA";

/// Replace line breaks with their literal escape sequences.
///
/// Backslashes are doubled first so text already containing `\n` survives.
pub fn escape_line_breaks(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Serialize one record with every field quoted.
fn quoted_record<I, T>(fields: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(fields)?;

    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::render(ExportFormat::Delimited, e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::render(ExportFormat::Delimited, e.to_string()))
}

/// Renders a bundle as sectioned CSV.
pub struct DelimitedRenderer;

impl DelimitedRenderer {
    fn header(bundle: &ExportBundle) -> String {
        let mut out = String::new();

        out.push_str(&format!("# {}\n", TITLE));
        out.push_str(&format!("# Generated: {}\n", bundle.export_date_label()));
        out.push_str(&format!("# Filename: {}\n", bundle.metadata.original_filename));
        out.push_str(&format!("# Text Length: {}\n", bundle.text_length()));
        out.push_str(&format!("# Status: {}\n", bundle.status_label()));
        if let Some(edited_at) = bundle.edited_at_label() {
            out.push_str(&format!("# Edited At: {}\n", edited_at));
        }

        out
    }
}

impl Renderer for DelimitedRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Delimited
    }

    fn render(&self, bundle: &ExportBundle) -> Result<Vec<u8>, ExportError> {
        let mut out = Self::header(bundle);
        out.push('\n');

        out.push_str("EXTRACTED_TEXT\n");
        out.push_str(&quoted_record([escape_line_breaks(&bundle.raw_text)])?);
        out.push('\n');

        if !bundle.structured_data.is_empty() {
            out.push_str("STRUCTURED_DATA\n");
            out.push_str("KEY,VALUE\n");
            for (key, value) in bundle.structured_data.iter() {
                out.push_str(&quoted_record([key, value])?);
            }
            out.push('\n');
        }

        if !bundle.entities.is_empty() {
            out.push_str("ENTITIES\n");
            out.push_str("TYPE,VALUE\n");
            for entity in &bundle.entities {
                out.push_str(&quoted_record([&entity.kind, &entity.value])?);
            }
            out.push('\n');
        }

        Ok(out.into_bytes())
    }
}
