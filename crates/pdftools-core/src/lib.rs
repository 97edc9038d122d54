//! Client-side PDF tools
//!
//! Merge, split, compress, rasterize and images-to-PDF over `lopdf`, plus the
//! state the browser front-end drives: file intake rules, the split range,
//! the page selection, preview navigation, download artifacts and routes.
//!
//! Rendering is abstracted behind [`PageRasterizer`] and [`PageRenderer`] so
//! the orchestration can be tested without a browser.

pub mod action;
pub mod artifact;
pub mod command;
pub mod compress;
pub mod config;
pub mod error;
pub mod format;
pub mod images;
pub mod info;
pub mod intake;
pub mod merge;
pub mod preview;
pub mod range;
pub mod raster;
pub mod routes;
pub mod selection;
pub mod split;

#[cfg(test)]
mod test_support;

pub use action::ActionControl;
pub use artifact::{Artifact, ArtifactKind};
pub use command::{process, process_json, EncodedFile, ProcessMetrics, ProcessResult, ToolCommand};
pub use compress::{compress_pdf, CompressionReport};
pub use config::ToolsConfig;
pub use error::PdfToolsError;
pub use images::{images_to_pdf, ImageBatch, ImageKind};
pub use info::{quick_check, DocumentInfo};
pub use intake::{AcceptFilter, FileMeta, IntakeError, IntakeRules, SelectedFile};
pub use merge::{merge_documents, MergeInputs, MergeSlot};
pub use preview::{PagePreview, PageRenderer, PreviewNavigator, Viewport};
pub use range::{PageRange, RangeSelector};
pub use raster::{rasterize_pages, PageImage, PageRasterizer, RasterReport};
pub use routes::Route;
pub use selection::PageSelection;
pub use split::{split_range, SplitInput};

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32, PdfToolsError> {
    let doc =
        lopdf::Document::load_mem(bytes).map_err(|e| PdfToolsError::ParseError(e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_pdf;

    #[test]
    fn test_get_page_count() {
        assert_eq!(get_page_count(&create_test_pdf(4)).unwrap(), 4);
    }

    #[test]
    fn test_get_page_count_rejects_garbage() {
        let err = get_page_count(b"garbage").unwrap_err();
        assert!(matches!(err, PdfToolsError::ParseError(_)));
    }
}
