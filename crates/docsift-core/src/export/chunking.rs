//! Splitting long text into spreadsheet-sized cells.

use lazy_static::lazy_static;
use regex::Regex;

/// Maximum number of characters a spreadsheet cell can hold.
pub const CELL_CHAR_LIMIT: usize = 32_767;

lazy_static! {
    // Sentence end: terminal punctuation followed by whitespace
    static ref SENTENCE_BREAK: Regex = Regex::new(r"[.!?]\s+").unwrap();
}

/// Split text into sentences, keeping the terminal punctuation and dropping
/// the whitespace that follows it.
fn sentences(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut last = 0;

    for m in SENTENCE_BREAK.find_iter(text) {
        // punctuation is a single ASCII byte
        parts.push(&text[last..m.start() + 1]);
        last = m.end();
    }
    parts.push(&text[last..]);

    parts
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Chunks break after sentence-ending punctuation where possible; sentences
/// are re-joined with a single space. A sentence longer than `max_chars` on
/// its own is cut at the character limit.
pub fn split_for_cell(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in sentences(text) {
        if sentence.is_empty() {
            continue;
        }

        let sentence_len = sentence.chars().count();
        let joined_len = if current.is_empty() {
            sentence_len
        } else {
            current_len + 1 + sentence_len
        };

        if joined_len <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(sentence);
            current_len = joined_len;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if sentence_len <= max_chars {
            current.push_str(sentence);
            current_len = sentence_len;
        } else {
            let chars: Vec<char> = sentence.chars().collect();
            let mut pieces = chars.chunks(max_chars).map(|c| c.iter().collect::<String>());
            let last = pieces.next_back();
            chunks.extend(pieces);
            current = last.unwrap_or_default();
            current_len = current.chars().count();
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
