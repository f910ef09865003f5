//! Line-based table reconstruction.
//!
//! A line is a candidate row when it contains a monetary-shaped token. Its
//! cells are the fragments left after splitting on runs of two or more
//! whitespace characters or on tabs. There is no layout analysis: every kept
//! row lands in one table under a fixed line-item header.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::patterns::{CELL_SEPARATOR, MONETARY_TOKEN};
use crate::models::document::Table;

/// Header used for every reconstructed table.
pub const LINE_ITEM_HEADERS: [&str; 5] = ["Item", "Description", "Quantity", "Price", "Amount"];

/// Minimum number of cells for a candidate line to become a row.
const MIN_CELLS: usize = 2;

/// How row cell counts are reconciled with the header width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAlignment {
    /// Keep rows exactly as split.
    #[default]
    Ragged,
    /// Right-pad short rows with empty cells.
    Pad,
    /// Drop cells beyond the header width.
    Truncate,
    /// Pad and truncate so every row matches the header width.
    Fit,
}

impl RowAlignment {
    /// Reconcile a row against a header of `width` columns.
    pub fn apply(&self, mut cells: Vec<String>, width: usize) -> Vec<String> {
        match self {
            Self::Ragged => {}
            Self::Pad => {
                if cells.len() < width {
                    cells.resize(width, String::new());
                }
            }
            Self::Truncate => cells.truncate(width),
            Self::Fit => cells.resize(width, String::new()),
        }
        cells
    }
}

/// Groups monetary lines of free text into a table.
#[derive(Debug, Clone)]
pub struct TableReconstructor {
    headers: Vec<String>,
    alignment: RowAlignment,
}

impl TableReconstructor {
    /// Create a reconstructor with the line-item header and ragged rows.
    pub fn new() -> Self {
        Self {
            headers: LINE_ITEM_HEADERS.iter().map(|h| h.to_string()).collect(),
            alignment: RowAlignment::default(),
        }
    }

    /// Set the row alignment policy.
    pub fn with_alignment(mut self, alignment: RowAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Whether a line carries a monetary-shaped token.
    pub fn is_candidate_row(line: &str) -> bool {
        MONETARY_TOKEN.is_match(line)
    }

    /// Split a line into non-blank cells.
    pub fn split_cells(line: &str) -> Vec<String> {
        // Cells are trimmed, so a single leading or trailing space never survives.
        CELL_SEPARATOR
            .split(line)
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Collect every qualifying line, in source order, into one table.
    ///
    /// Returns `None` when no line qualifies.
    pub fn reconstruct(&self, text: &str) -> Option<Table> {
        let rows: Vec<Vec<String>> = text
            .lines()
            .filter(|line| Self::is_candidate_row(line))
            .map(Self::split_cells)
            .filter(|cells| cells.len() >= MIN_CELLS)
            .map(|cells| self.alignment.apply(cells, self.headers.len()))
            .collect();

        if rows.is_empty() {
            return None;
        }

        debug!("Reconstructed table with {} rows", rows.len());
        Some(Table::new(self.headers.clone(), rows))
    }
}

impl Default for TableReconstructor {
    fn default() -> Self {
        Self::new()
    }
}
