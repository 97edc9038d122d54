//! One module per tool page.
//!
//! Each tool is a `#[wasm_bindgen]` state object usable from JavaScript on
//! its own, plus a `mount` function wiring it to the page's DOM.

pub mod compress;
pub mod image_to_pdf;
pub mod merge;
pub mod pdf_to_image;
pub mod split;

use pdftools_core::format::format_kb;
use pdftools_core::{SelectedFile, ToolsConfig};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

pub use compress::CompressTool;
pub use image_to_pdf::ImageToPdfTool;
pub use merge::MergeTool;
pub use pdf_to_image::PdfToImageTool;
pub use split::SplitTool;

/// Milliseconds since the epoch, for artifact names.
pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// "name (12.34 KB)"
pub(crate) fn file_info(file: &SelectedFile) -> String {
    format!("{} ({})", file.name(), format_kb(file.meta.size))
}

pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Wire every tool page present in the document.
pub fn mount_all(config: Rc<ToolsConfig>) -> Result<(), JsValue> {
    merge::mount(config.clone())?;
    split::mount(config.clone())?;
    compress::mount(config.clone())?;
    pdf_to_image::mount(config.clone())?;
    image_to_pdf::mount(config)?;
    Ok(())
}
