//! PDF.js integration for preview and rasterization

use async_trait::async_trait;
use js_sys::{Reflect, Uint8Array};
use pdftools_core::{PageRasterizer, PageRenderer, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

// External JavaScript functions from pdf-bridge.js
#[wasm_bindgen(module = "/www/js/pdf-bridge.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = initPdfJs)]
    async fn init_pdf_js_internal(worker_src: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = loadDocument)]
    async fn load_document_internal(data: Uint8Array) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = renderPage)]
    async fn render_page_internal(
        doc: &JsValue,
        page_num: u32,
        canvas: &HtmlCanvasElement,
        scale: f64,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = renderPageToPng)]
    async fn render_page_to_png_internal(
        doc: &JsValue,
        page_num: u32,
        scale: f64,
    ) -> Result<JsValue, JsValue>;
}

/// Best-effort text of a thrown JS value.
pub fn js_error_text(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

/// Point PDF.js at its worker script.
pub async fn init_pdf_js(worker_src: &str) -> Result<(), JsValue> {
    init_pdf_js_internal(worker_src).await?;
    Ok(())
}

/// A document loaded into PDF.js.
#[derive(Clone)]
pub struct PdfJsDocument {
    proxy: JsValue,
    page_count: u32,
}

impl PdfJsDocument {
    pub async fn load(bytes: &[u8]) -> Result<Self, String> {
        let data = Uint8Array::new_with_length(bytes.len() as u32);
        data.copy_from(bytes);

        let proxy = load_document_internal(data)
            .await
            .map_err(|e| js_error_text(&e))?;
        if proxy.is_undefined() || proxy.is_null() {
            return Err("PDF.js returned no document".into());
        }

        let page_count = Reflect::get(&proxy, &JsValue::from_str("numPages"))
            .ok()
            .and_then(|n| n.as_f64())
            .map(|n| n as u32)
            .unwrap_or(0);

        Ok(Self { proxy, page_count })
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    fn check_page(&self, page: u32) -> Result<(), String> {
        if page < 1 || page > self.page_count {
            return Err(format!(
                "Invalid page number: {} (document has {} pages)",
                page, self.page_count
            ));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl PageRasterizer for PdfJsDocument {
    async fn render_png(&mut self, page: u32, scale: f64) -> Result<Vec<u8>, String> {
        self.check_page(page)?;
        let png = render_page_to_png_internal(&self.proxy, page, scale)
            .await
            .map_err(|e| js_error_text(&e))?;
        Ok(Uint8Array::new(&png).to_vec())
    }
}

/// A document drawn onto one canvas, page by page.
pub struct CanvasRenderer {
    document: PdfJsDocument,
    canvas: HtmlCanvasElement,
}

impl CanvasRenderer {
    pub fn new(document: PdfJsDocument, canvas: HtmlCanvasElement) -> Self {
        Self { document, canvas }
    }
}

#[async_trait(?Send)]
impl PageRenderer for CanvasRenderer {
    async fn render(&mut self, page: u32, scale: f64) -> Result<Viewport, String> {
        self.document.check_page(page)?;
        let viewport = render_page_internal(&self.document.proxy, page, &self.canvas, scale)
            .await
            .map_err(|e| js_error_text(&e))?;

        let dimension = |key: &str| {
            Reflect::get(&viewport, &JsValue::from_str(key))
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or_default()
        };
        Ok(Viewport {
            width: dimension("width"),
            height: dimension("height"),
        })
    }
}
