//! Common regex patterns for invoice-style field extraction.
//!
//! Digit classes are spelled `[0-9]` because `\d` is Unicode-aware in the
//! `regex` crate.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice / bill number: letters, digits and hyphens after the marker
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:invoice|bill)\s*#?\s*:?\s*([A-Z0-9\-]+)"
    ).unwrap();

    // D/M/Y or D-M-Y after a date marker
    pub static ref ISSUE_DATE: Regex = Regex::new(
        r"(?i)(?:date|issued|invoice date)\s*:?\s*([0-9]{1,2}[/\-][0-9]{1,2}[/\-][0-9]{2,4})"
    ).unwrap();

    // Labeled amounts, optional currency symbol before the number
    pub static ref TOTAL: Regex = Regex::new(
        r"(?i)(?:total|amount due|grand total)\s*:?\s*[$€£]?\s*([0-9,]+\.?[0-9]*)"
    ).unwrap();

    pub static ref TAX: Regex = Regex::new(
        r"(?i)(?:tax|vat|gst)\s*:?\s*[$€£]?\s*([0-9,]+\.?[0-9]*)"
    ).unwrap();

    pub static ref SUBTOTAL: Regex = Regex::new(
        r"(?i)(?:sub.?total|sub total)\s*:?\s*[$€£]?\s*([0-9,]+\.?[0-9]*)"
    ).unwrap();

    // Any monetary-shaped token: optional currency, digits, separators, decimals
    pub static ref MONETARY_TOKEN: Regex = Regex::new(
        r"[$€£₹]?\s*[0-9][0-9,]*(?:\.[0-9]+)?"
    ).unwrap();

    // Cell boundary inside a candidate row
    pub static ref CELL_SEPARATOR: Regex = Regex::new(
        r"\s{2,}|\t"
    ).unwrap();
}
