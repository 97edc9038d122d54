//! Re-serialize a PDF and report the size change

use super::{now_ms, to_js_error};
use crate::dom::{by_id, hide_id, on, set_hidden, show_status, yield_to_browser, ButtonGuard};
use crate::download::offer_download;
use crate::dropzone::{attach, read_file};
use crate::viewer::open_preview;
use pdftools_core::format::format_kb;
use pdftools_core::{
    compress_pdf, Artifact, ArtifactKind, CompressionReport, IntakeRules, PdfToolsError,
    SelectedFile, ToolsConfig,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlButtonElement};

const STATUS_ID: &str = "compress-error";

#[wasm_bindgen]
#[derive(Default)]
pub struct CompressTool {
    file: Option<SelectedFile>,
}

#[wasm_bindgen]
impl CompressTool {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold a PDF for compression; returns its size in KB for display.
    pub fn load(&mut self, name: &str, bytes: &[u8]) -> String {
        self.load_internal(SelectedFile::new(name, "application/pdf", bytes.to_vec()))
    }

    /// Compressed document bytes.
    pub fn compress(&self) -> Result<Vec<u8>, JsValue> {
        self.compress_internal(now_ms())
            .map(|(artifact, _)| artifact.bytes)
            .map_err(to_js_error)
    }
}

impl CompressTool {
    fn load_internal(&mut self, file: SelectedFile) -> String {
        let size = format_kb(file.meta.size);
        self.file = Some(file);
        size
    }

    fn compress_internal(
        &self,
        timestamp_ms: i64,
    ) -> Result<(Artifact, CompressionReport), PdfToolsError> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| PdfToolsError::MissingInput("Please select a PDF file".into()))?;
        let compressed = compress_pdf(&file.bytes)?;
        let report = CompressionReport::new(file.bytes.len(), compressed.len());
        Ok((
            Artifact::new(ArtifactKind::Compressed, compressed, timestamp_ms),
            report,
        ))
    }
}

/// The compress page reports both outcomes in one box.
fn show_outcome(message: &str, success: bool) -> Result<(), JsValue> {
    if message.is_empty() {
        hide_id(STATUS_ID);
        return Ok(());
    }
    show_status(STATUS_ID, message)?;
    let status = by_id::<Element>(STATUS_ID)?;
    status.set_class_name(if success {
        "success-message"
    } else {
        "error-message"
    });
    Ok(())
}

fn show_file_size(size: &str) -> Result<(), JsValue> {
    let doc = crate::dom::document()?;
    let target = by_id::<Element>("compress-file-size")?;
    let line = doc.create_element("p")?;
    let label = doc.create_element("strong")?;
    label.set_text_content(Some("Original file size:"));
    line.append_child(&label)?;
    line.append_with_str_1(&format!(" {}", size))?;
    target.set_inner_html("");
    target.append_child(&line)?;
    Ok(())
}

pub(crate) fn mount(config: Rc<ToolsConfig>) -> Result<(), JsValue> {
    let tool = Rc::new(RefCell::new(CompressTool::new()));

    {
        let tool = tool.clone();
        let config = config.clone();
        attach("compress-dropzone", IntakeRules::single_pdf(), move |files| {
            let Some(file) = files.into_iter().next() else {
                return;
            };
            let tool = tool.clone();
            let config = config.clone();
            spawn_local(async move {
                let selected = match read_file(&file).await {
                    Ok(selected) => selected,
                    Err(e) => {
                        web_sys::console::error_1(&e);
                        return;
                    }
                };
                let bytes = selected.bytes.clone();
                let size = tool.borrow_mut().load_internal(selected);

                if let Ok(controls) = by_id::<Element>("compress-controls") {
                    set_hidden(&controls, false);
                }
                if let Err(e) = show_file_size(&size) {
                    web_sys::console::error_1(&e);
                }
                if let Ok(btn) = by_id::<HtmlButtonElement>("compress-btn") {
                    btn.set_disabled(false);
                }
                if let Err(e) =
                    open_preview("compress-preview-content", &bytes, config.preview_scale, None)
                        .await
                {
                    web_sys::console::error_1(&e);
                }
            });
        })?;
    }

    let button = by_id::<HtmlButtonElement>("compress-btn")?;
    let btn = button.clone();
    on(&button, "click", move |_| {
        let tool = tool.clone();
        let config = config.clone();
        let btn = btn.clone();
        spawn_local(async move {
            let Some(_guard) = ButtonGuard::begin(btn, "Compressing PDF...") else {
                return;
            };
            let _ = show_outcome("", false);
            let _ = yield_to_browser().await;

            let result = tool.borrow().compress_internal(now_ms());
            let shown = match result {
                Ok((artifact, report)) => show_outcome(&report.summary(), true).and_then(|_| {
                    offer_download(STATUS_ID, artifact, config.document_revoke_ms)
                }),
                Err(err) => show_outcome(&err.to_string(), false),
            };
            if let Err(e) = shown {
                web_sys::console::error_1(&e);
            }
        });
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fixtures::pdf;

    #[test]
    fn test_compress_without_file() {
        let err = CompressTool::new().compress_internal(1).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_compress_reports_sizes() {
        let mut tool = CompressTool::new();
        let bytes = pdf(3);
        let original = bytes.len();
        let size = tool.load_internal(SelectedFile::new("a.pdf", "application/pdf", bytes));
        assert!(size.ends_with(" KB"));

        let (artifact, report) = tool.compress_internal(77).unwrap();
        assert_eq!(artifact.file_name, "compressed-77.pdf");
        assert_eq!(report.original_size, original);
        assert_eq!(report.compressed_size, artifact.bytes.len());
        assert!(report.summary().contains("Reduction:"));
    }

    #[test]
    fn test_compress_invalid_pdf() {
        let mut tool = CompressTool::new();
        tool.load_internal(SelectedFile::new("a.pdf", "application/pdf", b"junk".to_vec()));
        let err = tool.compress_internal(1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to compress PDF. Please ensure the file is a valid PDF document."
        );
    }
}
