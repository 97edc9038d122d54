//! Document probe used before a PDF is handed to a tool

use crate::error::PdfToolsError;
use lopdf::{Dictionary, Document, Object};
use serde::Serialize;

const HEADER: &[u8] = b"%PDF-";
const EOF_WINDOW: usize = 1024;

/// Summary of a loaded PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub page_count: u32,
    /// Header version, e.g. "1.7".
    pub version: String,
    pub encrypted: bool,
    pub size_bytes: usize,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl DocumentInfo {
    /// Parse `bytes` fully and collect page count and metadata.
    pub fn probe(bytes: &[u8]) -> Result<Self, PdfToolsError> {
        quick_check(bytes)?;

        let doc = Document::load_mem(bytes).map_err(|e| PdfToolsError::ParseError(e.to_string()))?;
        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(PdfToolsError::ParseError("document has no pages".into()));
        }

        let info = info_dictionary(&doc);
        let text = |key: &[u8]| info.and_then(|dict| metadata_text(dict, key));

        Ok(Self {
            page_count,
            version: header_version(bytes),
            encrypted: doc.is_encrypted(),
            size_bytes: bytes.len(),
            title: text(b"Title"),
            author: text(b"Author"),
        })
    }
}

/// Cheap structural check: PDF header up front, `%%EOF` near the end.
pub fn quick_check(bytes: &[u8]) -> Result<(), PdfToolsError> {
    if bytes.len() < 8 {
        return Err(PdfToolsError::ParseError("file too small".into()));
    }
    if !bytes.starts_with(HEADER) {
        return Err(PdfToolsError::ParseError("missing %PDF- header".into()));
    }

    let tail = &bytes[bytes.len().saturating_sub(EOF_WINDOW)..];
    if !tail.windows(5).any(|w| w == b"%%EOF") {
        return Err(PdfToolsError::ParseError(
            "truncated (missing %%EOF marker)".into(),
        ));
    }
    Ok(())
}

fn header_version(bytes: &[u8]) -> String {
    bytes
        .get(HEADER.len()..HEADER.len() + 3)
        .and_then(|v| std::str::from_utf8(v).ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "1.4".to_string())
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    doc.get_dictionary(id).ok()
}

fn metadata_text(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => {
            let text = String::from_utf8_lossy(bytes).into_owned();
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}
