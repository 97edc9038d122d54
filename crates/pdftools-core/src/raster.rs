//! Page rasterization orchestration
//!
//! Rendering itself belongs to the host (PDF.js in the browser). This module
//! decides which pages are rendered, in what order, and how the outcome is
//! reported.

use crate::error::PdfToolsError;
use crate::format::count_noun;
use crate::selection::PageSelection;
use async_trait::async_trait;

pub const DEFAULT_RASTER_SCALE: f64 = 2.0;

/// Something that can turn one page of a loaded document into PNG bytes.
#[async_trait(?Send)]
pub trait PageRasterizer {
    /// Render 1-based `page` at `scale`; the error string is a diagnostic.
    async fn render_png(&mut self, page: u32, scale: f64) -> Result<Vec<u8>, String>;
}

/// PNG output for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub page: u32,
    pub png: Vec<u8>,
}

/// Tally of a rasterization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RasterReport {
    pub images: Vec<PageImage>,
    pub failed: Vec<u32>,
}

impl RasterReport {
    pub fn succeeded(&self) -> usize {
        self.images.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Status text for a run with at least one success, or
    /// `RasterizeFailed` when every page failed.
    pub fn outcome_message(&self) -> Result<String, PdfToolsError> {
        if self.images.is_empty() {
            return Err(PdfToolsError::RasterizeFailed {
                failed: self.failed.len(),
            });
        }

        let mut message = format!(
            "Successfully converted {}.",
            count_noun(self.succeeded(), "page")
        );
        if !self.failed.is_empty() {
            message.push_str(&format!(
                " {} failed.",
                count_noun(self.failed_count(), "page")
            ));
        }
        message.push_str(" Click the buttons below to download:");
        Ok(message)
    }
}

/// Render every selected page, one after another in ascending order.
///
/// A page that fails to render is logged and counted; the run carries on.
pub async fn rasterize_pages<R>(
    renderer: &mut R,
    selection: &PageSelection,
    scale: f64,
) -> Result<RasterReport, PdfToolsError>
where
    R: PageRasterizer + ?Sized,
{
    if selection.is_empty() {
        return Err(PdfToolsError::MissingInput(
            "Please select at least one page to convert".into(),
        ));
    }

    let mut report = RasterReport::default();
    for page in selection.pages() {
        match renderer.render_png(page, scale).await {
            Ok(png) => report.images.push(PageImage { page, png }),
            Err(detail) => {
                let err = PdfToolsError::RenderFailed { page, detail };
                tracing::warn!(page, detail = err.detail().unwrap_or_default(), "{}", err);
                report.failed.push(page);
            }
        }
    }

    tracing::debug!(
        succeeded = report.succeeded(),
        failed = report.failed_count(),
        "rasterization finished"
    );
    Ok(report)
}
