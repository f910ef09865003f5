//! Reading document text out of uploaded files.
//!
//! Text-bearing formats (plain text, PDF, DOCX) are handled here. Images
//! need OCR and legacy `.doc` files need a converter; both are reported as
//! unsupported so callers can route them elsewhere.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::SourceError;
use crate::models::config::SourceConfig;

/// Result type for document sources.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Broad document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Image,
    Word,
    PlainText,
}

impl DocumentKind {
    /// Detect the kind from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "jpeg" | "jpg" | "png" | "tiff" | "bmp" | "gif" => Some(Self::Image),
            "doc" | "docx" => Some(Self::Word),
            "txt" | "text" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Detect the kind from a MIME type string.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.to_ascii_lowercase();
        if mime.contains("pdf") {
            Some(Self::Pdf)
        } else if mime.contains("image") {
            Some(Self::Image)
        } else if mime.contains("word") || mime.contains("document") {
            Some(Self::Word)
        } else if mime.contains("text") {
            Some(Self::PlainText)
        } else {
            None
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Word => "word",
            Self::PlainText => "text",
        };
        f.write_str(name)
    }
}

/// Something that turns a document on disk into plain text.
pub trait TextSource {
    /// Read the full text of the document at `path`.
    fn read_text(&self, path: &Path) -> Result<String>;
}

/// Reads text from plain text, PDF and DOCX files.
#[derive(Debug, Clone)]
pub struct FileTextSource {
    max_file_size: u64,
}

impl Default for FileTextSource {
    fn default() -> Self {
        Self::from_config(&SourceConfig::default())
    }
}

impl FileTextSource {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(config.max_file_size)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.is_file() {
            return Err(SourceError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let size = std::fs::metadata(path)?.len();
        if size > self.max_file_size {
            return Err(SourceError::TooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(std::fs::read(path)?)
    }
}

impl TextSource for FileTextSource {
    fn read_text(&self, path: &Path) -> Result<String> {
        let kind = DocumentKind::from_path(path).ok_or_else(|| SourceError::Unsupported {
            kind: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        })?;

        let data = self.read_bytes(path)?;
        debug!("Read {} bytes of {} document {}", data.len(), kind, path.display());

        let text = match kind {
            DocumentKind::PlainText => String::from_utf8_lossy(&data).into_owned(),
            DocumentKind::Pdf => pdf_text(&data)?,
            DocumentKind::Word if is_docx(path) => docx_text(&data)?,
            DocumentKind::Word | DocumentKind::Image => {
                warn!("No text reader for {} document {}", kind, path.display());
                return Err(SourceError::Unsupported {
                    kind: kind.to_string(),
                });
            }
        };

        info!("Extracted {} characters from {}", text.chars().count(), path.display());
        Ok(text)
    }
}

fn is_docx(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("docx"))
}

fn pdf_text(data: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| SourceError::Pdf(e.to_string()))
}

fn docx_text(data: &[u8]) -> Result<String> {
    let document = docx_rs::read_docx(data).map_err(|e| SourceError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in &document.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            for run in &p.children {
                if let docx_rs::ParagraphChild::Run(r) = run {
                    for node in &r.children {
                        if let docx_rs::RunChild::Text(t) = node {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }

    Ok(text)
}
