//! Plain UTF-8 text renderer.

use super::{ExportFormat, Renderer};
use crate::error::ExportError;
use crate::models::export::ExportBundle;

const BANNER_TITLE: &str = "DOCSIFT EXTRACTION DATA";
const BANNER_WIDTH: usize = 50;
const KEY_WIDTH: usize = 20;

/// Section heading line, e.g. `▀▀▀ METADATA ▀▀▀`.
pub fn section_heading(title: &str) -> String {
    let bar = "▀".repeat(15);
    format!("{} {} {}", bar, title, bar)
}

fn banner() -> String {
    let rule = "═".repeat(BANNER_WIDTH);
    format!(
        "╔{rule}╗\n║{title:^width$}║\n╚{rule}╝\n",
        rule = rule,
        title = BANNER_TITLE,
        width = BANNER_WIDTH
    )
}

/// Renders a bundle as a human-readable text report.
pub struct PlainTextRenderer;

impl Renderer for PlainTextRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::PlainText
    }

    fn render(&self, bundle: &ExportBundle) -> Result<Vec<u8>, ExportError> {
        let mut output = banner();
        output.push('\n');

        output.push_str(&format!("{}\n", section_heading("METADATA")));
        output.push_str(&format!("Generated: {}\n", bundle.export_date_label()));
        output.push_str(&format!("Filename: {}\n", bundle.metadata.original_filename));
        output.push_str(&format!("Text Length: {}\n", bundle.text_length()));
        if bundle.metadata.is_edited {
            output.push_str("Status: EDITED BY USER\n");
        } else {
            output.push_str("Status: Original extraction\n");
        }
        if let Some(edited_at) = bundle.edited_at_label() {
            output.push_str(&format!("Edited At: {}\n", edited_at));
        }
        output.push('\n');

        output.push_str(&format!("{}\n", section_heading("EXTRACTED TEXT")));
        output.push_str(&bundle.raw_text);
        output.push_str("\n\n");

        if !bundle.structured_data.is_empty() {
            output.push_str(&format!("{}\n", section_heading("STRUCTURED DATA")));
            for (key, value) in bundle.structured_data.iter() {
                output.push_str(&format!(
                    "{:<width$} : {}\n",
                    key.to_uppercase(),
                    value,
                    width = KEY_WIDTH
                ));
            }
            output.push('\n');
        }

        Ok(output.into_bytes())
    }
}
