//! PDF Split
//!
//! Extracts a contiguous page range into a new document.

use crate::error::PdfToolsError;
use crate::intake::SelectedFile;
use crate::range::{PageRange, RangeSelector};
use lopdf::Document;

fn split_failed(detail: String) -> PdfToolsError {
    tracing::error!(%detail, "split failed");
    PdfToolsError::SplitFailed { detail }
}

/// Split a PDF, keeping pages `start..=end` (1-indexed)
///
/// An out-of-bounds or inverted range is reported as
/// [`PdfToolsError::InvalidPageRange`]; any library failure as
/// [`PdfToolsError::SplitFailed`].
pub fn split_range(bytes: &[u8], start: i64, end: i64) -> Result<Vec<u8>, PdfToolsError> {
    let doc = Document::load_mem(bytes).map_err(|e| split_failed(e.to_string()))?;
    let total_pages = doc.get_pages().len() as u32;

    let range = PageRange::checked(start, end, total_pages)?;
    tracing::debug!(start = range.start, end = range.end, total_pages, "splitting document");

    extract_pages(doc, &range).map_err(split_failed)
}

/// Build the output by deleting every page outside `range`.
///
/// Uses "Construction by Whitelist":
/// 1. Identify target page objects
/// 2. Delete the rest from the page tree
/// 3. Prune objects no longer reachable from the trailer
/// 4. Compress and serialize
fn extract_pages(mut doc: Document, range: &PageRange) -> Result<Vec<u8>, String> {
    let page_count = doc.get_pages().len() as u32;

    // Delete in reverse order so remaining page numbers stay valid
    let pages_to_delete: Vec<u32> = (1..=page_count)
        .rev()
        .filter(|p| *p < range.start || *p > range.end)
        .collect();
    for page_num in pages_to_delete {
        doc.delete_pages(&[page_num]);
    }

    doc.prune_objects();
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| format!("save failed: {}", e))?;

    Ok(buffer)
}

/// A loaded split source and its range inputs.
#[derive(Debug, Clone)]
pub struct SplitInput {
    file: SelectedFile,
    selector: RangeSelector,
}

impl SplitInput {
    /// Load a new source; the range resets to the whole document.
    ///
    /// An unreadable file is reported as [`PdfToolsError::SplitFailed`].
    pub fn load(file: SelectedFile) -> Result<Self, PdfToolsError> {
        let doc = Document::load_mem(&file.bytes).map_err(|e| split_failed(e.to_string()))?;
        let total_pages = doc.get_pages().len() as u32;
        Ok(Self {
            file,
            selector: RangeSelector::new(total_pages),
        })
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    pub fn total_pages(&self) -> u32 {
        self.selector.total_pages()
    }

    pub fn selector(&self) -> &RangeSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut RangeSelector {
        &mut self.selector
    }

    /// Split with the current range.
    pub fn split(&self) -> Result<(PageRange, Vec<u8>), PdfToolsError> {
        let range = self.selector.checked()?;
        let bytes = split_range(&self.file.bytes, range.start as i64, range.end as i64)?;
        Ok((range, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_pdf, page_text};

    fn pdf_file(pages: u32) -> SelectedFile {
        SelectedFile::new("doc.pdf", "application/pdf", create_test_pdf(pages))
    }

    #[test]
    fn test_split_extracts_single_page() {
        let pdf = create_test_pdf(5);
        let result = split_range(&pdf, 1, 1).unwrap();
        let doc = Document::load_mem(&result).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_split_extracts_range() {
        let pdf = create_test_pdf(10);
        let result = split_range(&pdf, 2, 5).unwrap();
        let mut doc = Document::load_mem(&result).unwrap();
        assert_eq!(doc.get_pages().len(), 4);
        assert!(page_text(&mut doc, 1).contains("Page 2"));
        assert!(page_text(&mut doc, 4).contains("Page 5"));
    }

    #[test]
    fn test_split_whole_document() {
        let pdf = create_test_pdf(3);
        let result = split_range(&pdf, 1, 3).unwrap();
        let doc = Document::load_mem(&result).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_split_page_beyond_end_is_invalid_range() {
        let pdf = create_test_pdf(5);
        let err = split_range(&pdf, 1, 10).unwrap_err();
        assert!(matches!(err, PdfToolsError::InvalidPageRange { total_pages: 5 }));
        assert_eq!(err.to_string(), "Invalid page range. PDF has 5 page(s).");
    }

    #[test]
    fn test_split_page_zero_is_invalid_range() {
        let pdf = create_test_pdf(5);
        let err = split_range(&pdf, 0, 2).unwrap_err();
        assert!(matches!(err, PdfToolsError::InvalidPageRange { .. }));
    }

    #[test]
    fn test_split_inverted_range_is_invalid_range() {
        let pdf = create_test_pdf(5);
        let err = split_range(&pdf, 4, 2).unwrap_err();
        assert!(matches!(err, PdfToolsError::InvalidPageRange { .. }));
    }

    #[test]
    fn test_split_garbage_is_wrapped() {
        let err = split_range(b"definitely not a pdf", 1, 1).unwrap_err();
        assert!(matches!(err, PdfToolsError::SplitFailed { .. }));
        assert_eq!(
            err.to_string(),
            "Failed to split PDF. Please ensure the file is a valid PDF document."
        );
    }

    #[test]
    fn test_split_input_resets_range_on_load() {
        let input = SplitInput::load(pdf_file(8)).unwrap();
        assert_eq!(input.total_pages(), 8);
        assert_eq!(input.selector().range(), PageRange { start: 1, end: 8 });
    }

    #[test]
    fn test_split_input_uses_corrected_range() {
        let mut input = SplitInput::load(pdf_file(10)).unwrap();
        input.selector_mut().set_start(5);
        input.selector_mut().set_end(3);

        let (range, bytes) = input.split().unwrap();
        assert_eq!(range, PageRange { start: 3, end: 3 });
        assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn test_split_input_rejects_invalid_pdf() {
        let file = SelectedFile::new("bad.pdf", "application/pdf", b"nope".to_vec());
        let err = SplitInput::load(file).unwrap_err();
        assert!(matches!(err, PdfToolsError::SplitFailed { .. }));
        assert_eq!(
            err.to_string(),
            "Failed to split PDF. Please ensure the file is a valid PDF document."
        );
        assert!(err.detail().is_some());
    }

    #[test]
    fn test_split_input_hides_truncated_pdf_detail() {
        let mut bytes = create_test_pdf(3);
        bytes.truncate(40);
        let file = SelectedFile::new("cut.pdf", "application/pdf", bytes);
        let err = SplitInput::load(file).unwrap_err();
        assert!(!err.to_string().contains("parse"));
    }
}
