//! Pack PNG and JPEG images into a PDF, one image per page

use super::{now_ms, to_js_error};
use crate::dom::{
    by_id, document, file_line, hide_id, on, set_hidden, show_error, show_status, yield_to_browser,
    ButtonGuard,
};
use crate::download::offer_download;
use crate::dropzone::{attach, read_files};
use pdftools_core::{Artifact, ArtifactKind, ImageBatch, PdfToolsError, SelectedFile, ToolsConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, File, HtmlButtonElement, HtmlImageElement, Url};

const SUCCESS: &str = "PDF created successfully! Click the button below to download.";
const PREVIEW_PLACEHOLDER: &str = r#"<div class="preview-placeholder">Upload images to see preview</div>"#;

#[wasm_bindgen]
pub struct ImageToPdfTool {
    batch: ImageBatch,
}

impl Default for ImageToPdfTool {
    fn default() -> Self {
        Self {
            batch: ImageBatch::new(None),
        }
    }
}

#[wasm_bindgen]
impl ImageToPdfTool {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one image; returns its list entry.
    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&mut self, name: &str, mime: &str, bytes: &[u8]) -> Result<String, JsValue> {
        let mut files = self.batch.images().to_vec();
        files.push(SelectedFile::new(name, mime, bytes.to_vec()));
        self.replace_internal(files).map_err(to_js_error)?;
        Ok(self.batch.entries().pop().unwrap_or_default())
    }

    pub fn clear(&mut self) {
        self.batch = ImageBatch::new(self.batch.rules().max_files());
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.batch.len()
    }

    #[wasm_bindgen(js_name = canConvert)]
    pub fn can_convert(&self) -> bool {
        self.batch.can_convert()
    }

    /// The finished PDF; the queue is emptied on success.
    pub fn convert(&mut self) -> Result<Vec<u8>, JsValue> {
        self.convert_internal(now_ms())
            .map(|artifact| artifact.bytes)
            .map_err(to_js_error)
    }
}

impl ImageToPdfTool {
    fn with_limit(max_files: Option<usize>) -> Self {
        Self {
            batch: ImageBatch::new(max_files),
        }
    }

    fn replace_internal(&mut self, files: Vec<SelectedFile>) -> Result<bool, PdfToolsError> {
        self.batch
            .replace(files)
            .map_err(|e| PdfToolsError::MissingInput(e.to_string()))
    }

    fn list_heading(&self) -> String {
        format!("Selected Images ({}):", self.batch.len())
    }

    fn convert_internal(&mut self, timestamp_ms: i64) -> Result<Artifact, PdfToolsError> {
        let pdf = self.batch.convert()?;
        Ok(Artifact::new(ArtifactKind::ImagesToPdf, pdf, timestamp_ms))
    }
}

fn render_list(tool: &ImageToPdfTool) -> Result<(), JsValue> {
    let doc = document()?;
    let list = by_id::<Element>("image-to-pdf-files-list")?;
    list.set_inner_html("");
    if tool.batch.is_empty() {
        set_hidden(&list, true);
        return Ok(());
    }

    let heading = doc.create_element("h3")?;
    heading.set_class_name("files-list-title");
    heading.set_text_content(Some(&tool.list_heading()));
    list.append_child(&heading)?;

    let items = doc.create_element("ul")?;
    items.set_class_name("max-h-40 overflow-y-auto");
    for entry in tool.batch.entries() {
        let item = doc.create_element("li")?;
        file_line(&item, "🖼️", &entry)?;
        items.append_child(&item)?;
    }
    list.append_child(&items)?;
    set_hidden(&list, false);
    Ok(())
}

/// Thumbnails backed by object URLs; the previous set is revoked first.
struct ImagePreview {
    urls: Vec<String>,
}

impl ImagePreview {
    fn clear(&mut self) {
        for url in self.urls.drain(..) {
            let _ = Url::revoke_object_url(&url);
        }
        if let Ok(content) = by_id::<Element>("image-to-pdf-preview-content") {
            content.set_inner_html(PREVIEW_PLACEHOLDER);
        }
    }

    fn show(&mut self, files: &[File]) -> Result<(), JsValue> {
        self.clear();
        let doc = document()?;
        let content = by_id::<Element>("image-to-pdf-preview-content")?;
        let grid = doc.create_element("div")?;
        grid.set_class_name("image-preview-grid");

        for file in files {
            let url = Url::create_object_url_with_blob(file)?;
            let img: HtmlImageElement = doc.create_element("img")?.dyn_into()?;
            img.set_src(&url);
            img.set_alt(&file.name());
            img.set_class_name("image-preview-item");
            grid.append_child(&img)?;
            self.urls.push(url);
        }

        content.set_inner_html("");
        content.append_child(&grid)?;
        Ok(())
    }
}

pub(crate) fn mount(config: Rc<ToolsConfig>) -> Result<(), JsValue> {
    let tool = Rc::new(RefCell::new(ImageToPdfTool::with_limit(config.max_image_files)));
    let preview = Rc::new(RefCell::new(ImagePreview { urls: Vec::new() }));
    let rules = tool.borrow().batch.rules().clone();

    {
        let tool = tool.clone();
        let preview = preview.clone();
        attach("image-to-pdf-dropzone", rules, move |files| {
            let tool = tool.clone();
            let preview = preview.clone();
            spawn_local(async move {
                let selected = match read_files(&files).await {
                    Ok(selected) => selected,
                    Err(e) => {
                        web_sys::console::error_1(&e);
                        return;
                    }
                };
                let replaced = tool.borrow_mut().replace_internal(selected);
                match replaced {
                    Ok(false) => return,
                    Ok(true) => {}
                    Err(err) => {
                        show_error("image-to-pdf-error", &err.to_string());
                        return;
                    }
                }

                hide_id("image-to-pdf-error");
                hide_id("image-to-pdf-success");
                let state = tool.borrow();
                if let Err(e) = render_list(&state) {
                    web_sys::console::error_1(&e);
                }
                if let Ok(btn) = by_id::<HtmlButtonElement>("image-to-pdf-btn") {
                    btn.set_disabled(!state.can_convert());
                }
                if let Err(e) = preview.borrow_mut().show(&files) {
                    web_sys::console::error_1(&e);
                }
            });
        })?;
    }

    let button = by_id::<HtmlButtonElement>("image-to-pdf-btn")?;
    let btn = button.clone();
    on(&button, "click", move |_| {
        let tool = tool.clone();
        let preview = preview.clone();
        let config = config.clone();
        let btn = btn.clone();
        spawn_local(async move {
            if !tool.borrow().can_convert() {
                show_error("image-to-pdf-error", "Please select at least one image file");
                return;
            }
            let Some(_guard) = ButtonGuard::begin(btn, "Converting to PDF...") else {
                return;
            };
            hide_id("image-to-pdf-error");
            let _ = yield_to_browser().await;

            let result = tool.borrow_mut().convert_internal(now_ms());
            match result {
                Ok(artifact) => {
                    let shown = show_status("image-to-pdf-success", SUCCESS).and_then(|_| {
                        offer_download("image-to-pdf-success", artifact, config.document_revoke_ms)
                    });
                    if let Err(e) = shown {
                        web_sys::console::error_1(&e);
                    }
                    if let Err(e) = render_list(&tool.borrow()) {
                        web_sys::console::error_1(&e);
                    }
                    preview.borrow_mut().clear();
                }
                Err(err) => {
                    hide_id("image-to-pdf-success");
                    show_error("image-to-pdf-error", &err.to_string());
                }
            }
        });
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> SelectedFile {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        SelectedFile::new("photo.png", "image/png", bytes)
    }

    #[test]
    fn test_convert_empty_batch() {
        let err = ImageToPdfTool::new().convert_internal(1).unwrap_err();
        assert_eq!(err.to_string(), "Please select at least one image file");
    }

    #[test]
    fn test_replace_and_convert() {
        let mut tool = ImageToPdfTool::new();
        assert!(tool.replace_internal(vec![png(4, 3), png(2, 2)]).unwrap());
        assert_eq!(tool.list_heading(), "Selected Images (2):");

        let artifact = tool.convert_internal(42).unwrap();
        assert_eq!(artifact.file_name, "images-to-pdf-42.pdf");
        assert_eq!(pdftools_core::get_page_count(&artifact.bytes).unwrap(), 2);
        assert_eq!(tool.count(), 0);
    }

    #[test]
    fn test_empty_drop_keeps_batch() {
        let mut tool = ImageToPdfTool::new();
        tool.replace_internal(vec![png(1, 1)]).unwrap();
        assert!(!tool.replace_internal(Vec::new()).unwrap());
        assert_eq!(tool.count(), 1);
    }

    #[test]
    fn test_limit_rejects_extra_files() {
        let mut tool = ImageToPdfTool::with_limit(Some(1));
        let err = tool.replace_internal(vec![png(1, 1), png(1, 1)]).unwrap_err();
        assert_eq!(err.to_string(), "Maximum 1 file(s) allowed");
        assert_eq!(tool.count(), 0);
    }

    #[test]
    fn test_add_image_returns_entry() {
        let mut tool = ImageToPdfTool::new();
        let file = png(3, 3);
        let entry = tool.add_image("a.png", "image/png", &file.bytes).unwrap();
        assert!(entry.starts_with("a.png ("));
        assert!(tool.can_convert());
        tool.clear();
        assert!(!tool.can_convert());
    }
}
