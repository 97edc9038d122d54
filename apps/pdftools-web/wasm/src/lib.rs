//! WASM front end for the PDF tools site
//!
//! All document work happens in `pdftools-core`; this crate wires it to the
//! page. PDF.js (through `www/js/pdf-bridge.js`) is used only for drawing
//! pages, either onto a preview canvas or into PNG bytes.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { startApp, MergeTool } from './pkg/pdftools_wasm.js';
//!
//! await init();
//! await startApp(JSON.stringify({ previewScale: 1.5 }));
//!
//! // Tools can also be driven without the page markup
//! const merge = new MergeTool();
//! merge.setFile(1, "a.pdf", bytesA);
//! merge.setFile(2, "b.pdf", bytesB);
//! const merged = merge.merge();
//! ```

pub mod bridge;
pub mod dom;
pub mod download;
pub mod dropzone;
pub mod logging;
pub mod router;
pub mod tools;
pub mod viewer;

use pdftools_core::{DocumentInfo, ToolsConfig};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

pub use tools::{CompressTool, ImageToPdfTool, MergeTool, PdfToImageTool, SplitTool};

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
}

/// Wire routing and every tool page.
///
/// `config_json` overrides any of the `ToolsConfig` defaults.
#[wasm_bindgen(js_name = startApp)]
pub async fn start_app(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) => ToolsConfig::from_json(json).map_err(tools::to_js_error)?,
        None => ToolsConfig::default(),
    };

    if let Err(e) = bridge::init_pdf_js(&config.pdfjs_worker_url).await {
        // Previews and rasterizing stay unavailable; the document tools still work
        web_sys::console::error_2(&"PDF.js unavailable:".into(), &e);
    }

    router::install()?;
    tools::mount_all(Rc::new(config))
}

#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Quick header check for a PDF file
/// Returns Ok(()) if it looks like a PDF, Err with message if not
#[wasm_bindgen]
pub fn quick_validate(bytes: &[u8]) -> Result<(), JsValue> {
    pdftools_core::quick_check(bytes).map_err(tools::to_js_error)
}

/// Page count, version and metadata of a PDF
#[wasm_bindgen]
pub fn get_pdf_info(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let info = DocumentInfo::probe(bytes).map_err(tools::to_js_error)?;

    serde_wasm_bindgen::to_value(&info)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[wasm_bindgen]
pub fn get_page_count(bytes: &[u8]) -> Result<u32, JsValue> {
    pdftools_core::get_page_count(bytes).map_err(tools::to_js_error)
}

/// Run one JSON-encoded tool command (merge, split, compress or
/// images-to-pdf) and return the result object.
#[wasm_bindgen(js_name = runCommand)]
pub fn run_command(command_json: &str) -> Result<JsValue, JsValue> {
    let result = pdftools_core::process_json(command_json, tools::now_ms())
        .map_err(tools::to_js_error)?;
    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Format bytes as human-readable string
#[wasm_bindgen]
pub fn format_bytes(bytes: usize) -> String {
    pdftools_core::format::format_bytes(bytes)
}
