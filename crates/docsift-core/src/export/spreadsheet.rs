//! Spreadsheet (XLSX) renderer.
//!
//! The workbook is described first as plain row layouts, one per sheet, and
//! only then written with `rust_xlsxwriter`. Layouts carry semantic row
//! styles; the writer maps them to cell formats.

use rust_xlsxwriter::{Color, DocProperties, Format, FormatAlign, Workbook, Worksheet};
use tracing::debug;

use super::chunking::{split_for_cell, CELL_CHAR_LIMIT};
use super::{ExportFormat, Renderer};
use crate::error::ExportError;
use crate::models::export::{ExportBundle, APPLICATION_NAME};

const DATA_SHEET: &str = "Extracted Data";
const METADATA_SHEET: &str = "Metadata";

const DATA_TITLE: &str = "DOCSIFT - EXTRACTED DOCUMENT DATA";
const METADATA_TITLE: &str = "DOCSIFT - METADATA";

const DATA_COLUMN_WIDTHS: [f64; 2] = [25.0, 50.0];
const METADATA_COLUMN_WIDTHS: [f64; 2] = [25.0, 40.0];

const TITLE_COLOR: u32 = 0x1976D2;
const ENTITY_HEADER_FILL: u32 = 0xF5F5F5;
const TABLE_HEADER_FILL: u32 = 0xE8F5E9;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Text content of the cell, numbers included.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Cut text cells down to the spreadsheet cell limit.
fn fit_cell(value: CellValue) -> CellValue {
    match value {
        CellValue::Text(text) if text.chars().count() > CELL_CHAR_LIMIT => {
            CellValue::Text(text.chars().take(CELL_CHAR_LIMIT).collect())
        }
        other => other,
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Visual role of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Plain,
    /// Sheet title, merged across both columns.
    Title,
    /// Section label such as `EXTRACTED TEXT:`.
    Section,
    /// Group label on the metadata sheet.
    Group,
    /// `Type`/`Value` header of the entity list.
    EntityHeader,
    /// Header row of a reconstructed table.
    TableHeader,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub cells: Vec<CellValue>,
    pub style: RowStyle,
}

/// Rows and column widths of one worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: &'static str,
    pub column_widths: [f64; 2],
    pub rows: Vec<SheetRow>,
}

impl SheetLayout {
    fn new(name: &'static str, column_widths: [f64; 2]) -> Self {
        Self {
            name,
            column_widths,
            rows: Vec::new(),
        }
    }

    fn push<I, C>(&mut self, style: RowStyle, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        self.rows.push(SheetRow {
            cells: cells.into_iter().map(|c| fit_cell(c.into())).collect(),
            style,
        });
    }

    fn pair(&mut self, label: &str, value: impl Into<CellValue>) {
        self.rows.push(SheetRow {
            cells: vec![fit_cell(CellValue::from(label)), fit_cell(value.into())],
            style: RowStyle::Plain,
        });
    }

    fn blank(&mut self) {
        self.rows.push(SheetRow {
            cells: Vec::new(),
            style: RowStyle::Plain,
        });
    }

    /// Index of the first row whose first cell equals `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| matches!(row.cells.first(), Some(CellValue::Text(t)) if t == label))
    }

    /// Value cell of the first row labeled `label`.
    pub fn value_of(&self, label: &str) -> Option<&CellValue> {
        self.position(label).and_then(|i| self.rows[i].cells.get(1))
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Layout of the "Extracted Data" sheet.
pub fn data_sheet(bundle: &ExportBundle) -> SheetLayout {
    let mut sheet = SheetLayout::new(DATA_SHEET, DATA_COLUMN_WIDTHS);

    sheet.push(RowStyle::Title, [DATA_TITLE]);
    sheet.pair("Generated:", bundle.export_date_label());
    if !bundle.metadata.original_filename.is_empty() {
        sheet.pair("Original File:", bundle.metadata.original_filename.as_str());
    }
    sheet.pair("Character Count:", CellValue::Number(bundle.text_length() as f64));
    sheet.pair("Status:", bundle.status_label());
    if let Some(edited_at) = bundle.edited_at_label() {
        sheet.pair("Edited At:", edited_at);
    }
    sheet.blank();

    sheet.push(RowStyle::Section, ["EXTRACTED TEXT:"]);
    if bundle.raw_text.is_empty() {
        sheet.push(RowStyle::Plain, ["No text extracted"]);
    } else {
        for chunk in split_for_cell(&bundle.raw_text, CELL_CHAR_LIMIT) {
            sheet.push(RowStyle::Plain, [chunk]);
        }
    }
    sheet.blank();

    if !bundle.structured_data.is_empty() {
        sheet.push(RowStyle::Section, ["STRUCTURED DATA:"]);
        for (key, value) in bundle.structured_data.iter() {
            sheet.pair(&format!("{}:", key.to_uppercase()), value);
        }
        sheet.blank();
    }

    if !bundle.entities.is_empty() {
        sheet.push(RowStyle::Section, ["EXTRACTED ENTITIES:"]);
        sheet.push(RowStyle::EntityHeader, ["Type", "Value"]);
        for entity in &bundle.entities {
            sheet.push(RowStyle::Plain, [entity.kind.as_str(), entity.value.as_str()]);
        }
        sheet.blank();
    }

    for (index, table) in bundle.tables.iter().enumerate() {
        sheet.push(RowStyle::Section, [format!("TABLE {}:", index + 1)]);
        if !table.headers.is_empty() {
            sheet.push(RowStyle::TableHeader, table.headers.iter().map(String::as_str));
        }
        for row in &table.rows {
            sheet.push(RowStyle::Plain, row.iter().map(String::as_str));
        }
        sheet.blank();
    }

    sheet
}

/// Layout of the "Metadata" sheet.
pub fn metadata_sheet(bundle: &ExportBundle) -> SheetLayout {
    let mut sheet = SheetLayout::new(METADATA_SHEET, METADATA_COLUMN_WIDTHS);
    let meta = &bundle.metadata;

    sheet.push(RowStyle::Title, [METADATA_TITLE]);

    sheet.push(RowStyle::Group, ["Export Information", ""]);
    sheet.pair("Export Date:", bundle.export_date_label());
    sheet.pair("Application:", APPLICATION_NAME);
    sheet.pair("Version:", meta.version.as_str());
    sheet.blank();

    sheet.push(RowStyle::Group, ["Document Information", ""]);
    sheet.pair("Original Filename:", meta.original_filename.as_str());
    sheet.pair("Text Length:", CellValue::Number(bundle.text_length() as f64));
    sheet.pair("Has Structured Data:", yes_no(!bundle.structured_data.is_empty()));
    sheet.pair("Has Entities:", yes_no(!bundle.entities.is_empty()));
    sheet.pair("Has Tables:", yes_no(!bundle.tables.is_empty()));
    sheet.blank();

    sheet.push(RowStyle::Group, ["Editing Information", ""]);
    sheet.pair("Edited:", if meta.is_edited { "YES" } else { "NO" });
    if let Some(edited_at) = bundle.edited_at_label() {
        sheet.pair("Edited At:", edited_at);
    }

    sheet
}

/// Cell formats for each row style.
struct Formats {
    title: Format,
    section: Format,
    bold: Format,
    entity_header: Format,
    table_header: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(16)
                .set_font_color(Color::RGB(TITLE_COLOR))
                .set_align(FormatAlign::Center),
            section: Format::new().set_bold().set_font_size(14),
            bold: Format::new().set_bold(),
            entity_header: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(ENTITY_HEADER_FILL)),
            table_header: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(TABLE_HEADER_FILL)),
        }
    }

    fn for_style(&self, style: RowStyle) -> Option<&Format> {
        match style {
            RowStyle::Plain => None,
            RowStyle::Title => Some(&self.title),
            RowStyle::Section => Some(&self.section),
            RowStyle::Group => Some(&self.bold),
            RowStyle::EntityHeader => Some(&self.entity_header),
            RowStyle::TableHeader => Some(&self.table_header),
        }
    }
}

fn write_sheet(
    worksheet: &mut Worksheet,
    layout: &SheetLayout,
    formats: &Formats,
) -> Result<(), ExportError> {
    worksheet.set_name(layout.name)?;
    for (col, width) in layout.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (index, row) in layout.rows.iter().enumerate() {
        let row_num = index as u32;
        let format = formats.for_style(row.style);

        if row.style == RowStyle::Title {
            let title = row.cells.first().map(CellValue::as_text).unwrap_or_default();
            worksheet.merge_range(row_num, 0, row_num, 1, &title, &formats.title)?;
            continue;
        }

        for (col, cell) in row.cells.iter().enumerate() {
            let col = col as u16;
            match (cell, format) {
                (CellValue::Text(text), Some(f)) => {
                    worksheet.write_string_with_format(row_num, col, text.as_str(), f)?;
                }
                (CellValue::Text(text), None) => {
                    worksheet.write_string(row_num, col, text.as_str())?;
                }
                (CellValue::Number(n), Some(f)) => {
                    worksheet.write_number_with_format(row_num, col, *n, f)?;
                }
                (CellValue::Number(n), None) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
            }
        }
    }

    Ok(())
}

/// Renders a bundle as a two-sheet workbook.
pub struct SpreadsheetRenderer;

impl Renderer for SpreadsheetRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Spreadsheet
    }

    fn render(&self, bundle: &ExportBundle) -> Result<Vec<u8>, ExportError> {
        let formats = Formats::new();
        let layouts = [data_sheet(bundle), metadata_sheet(bundle)];

        let mut workbook = Workbook::new();
        let properties = DocProperties::new()
            .set_author(APPLICATION_NAME)
            .set_title(DATA_TITLE);
        workbook.set_properties(&properties);

        for layout in &layouts {
            let worksheet = workbook.add_worksheet();
            write_sheet(worksheet, layout, &formats)?;
            debug!("Laid out sheet '{}' with {} rows", layout.name, layout.rows.len());
        }

        Ok(workbook.save_to_buffer()?)
    }
}
