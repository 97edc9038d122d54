//! Extract a page range

use super::{now_ms, to_js_error};
use crate::dom::{
    by_id, hide_id, on, set_hidden, show_error, show_status, yield_to_browser, ButtonGuard,
};
use crate::download::offer_download;
use crate::dropzone::{attach, read_file};
use crate::viewer::open_preview;
use pdftools_core::preview::LOAD_FAILED_MESSAGE;
use pdftools_core::{
    Artifact, ArtifactKind, IntakeRules, PageRange, PdfToolsError, SelectedFile, SplitInput,
    ToolsConfig,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlButtonElement, HtmlInputElement};

const SUCCESS: &str = "PDF split successfully! Click the button below to download.";

#[wasm_bindgen]
#[derive(Default)]
pub struct SplitTool {
    input: Option<SplitInput>,
}

#[wasm_bindgen]
impl SplitTool {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a PDF; returns its page count.
    pub fn load(&mut self, name: &str, bytes: &[u8]) -> Result<u32, JsValue> {
        let file = SelectedFile::new(name, "application/pdf", bytes.to_vec());
        self.load_internal(file).map_err(to_js_error)
    }

    /// Set the first page from raw input text; returns `[start, end]`.
    #[wasm_bindgen(js_name = setStart)]
    pub fn set_start(&mut self, raw: &str) -> Vec<u32> {
        let range = self.set_start_internal(raw);
        vec![range.start, range.end]
    }

    #[wasm_bindgen(js_name = setEnd)]
    pub fn set_end(&mut self, raw: &str) -> Vec<u32> {
        let range = self.set_end_internal(raw);
        vec![range.start, range.end]
    }

    pub fn split(&self) -> Result<Vec<u8>, JsValue> {
        self.split_internal(now_ms())
            .map(|artifact| artifact.bytes)
            .map_err(to_js_error)
    }
}

impl SplitTool {
    fn load_internal(&mut self, file: SelectedFile) -> Result<u32, PdfToolsError> {
        self.input = None;
        let input = SplitInput::load(file)?;
        let total = input.total_pages();
        self.input = Some(input);
        Ok(total)
    }

    fn set_start_internal(&mut self, raw: &str) -> PageRange {
        match self.input.as_mut() {
            Some(input) => input.selector_mut().set_start_input(raw),
            None => PageRange { start: 1, end: 1 },
        }
    }

    fn set_end_internal(&mut self, raw: &str) -> PageRange {
        match self.input.as_mut() {
            Some(input) => input.selector_mut().set_end_input(raw),
            None => PageRange { start: 1, end: 1 },
        }
    }

    fn split_internal(&self, timestamp_ms: i64) -> Result<Artifact, PdfToolsError> {
        let input = self
            .input
            .as_ref()
            .ok_or_else(|| PdfToolsError::MissingInput("Please select a PDF file".into()))?;
        let (range, bytes) = input.split()?;
        Ok(Artifact::new(ArtifactKind::Split(range), bytes, timestamp_ms))
    }
}

fn split_error(message: &str) {
    show_error("split-error", message);
    hide_id("split-success");
}

fn write_range(start: &HtmlInputElement, end: &HtmlInputElement, range: PageRange) {
    start.set_value(&range.start.to_string());
    end.set_value(&range.end.to_string());
}

fn show_loaded(total: u32) -> Result<(), JsValue> {
    by_id::<Element>("split-total-pages")?.set_text_content(Some(&total.to_string()));
    for id in ["split-start-page", "split-end-page"] {
        by_id::<HtmlInputElement>(id)?.set_max(&total.to_string());
    }
    write_range(
        &by_id("split-start-page")?,
        &by_id("split-end-page")?,
        PageRange { start: 1, end: total },
    );
    by_id::<HtmlButtonElement>("split-btn")?.set_disabled(false);
    Ok(())
}

pub(crate) fn mount(config: Rc<ToolsConfig>) -> Result<(), JsValue> {
    let tool = Rc::new(RefCell::new(SplitTool::new()));

    {
        let tool = tool.clone();
        let config = config.clone();
        attach("split-dropzone", IntakeRules::single_pdf(), move |files| {
            let Some(file) = files.into_iter().next() else {
                return;
            };
            let tool = tool.clone();
            let config = config.clone();
            spawn_local(async move {
                if let Ok(controls) = by_id::<Element>("split-controls") {
                    set_hidden(&controls, false);
                }
                let selected = match read_file(&file).await {
                    Ok(selected) => selected,
                    Err(e) => {
                        web_sys::console::error_1(&e);
                        split_error(LOAD_FAILED_MESSAGE);
                        return;
                    }
                };
                let bytes = selected.bytes.clone();
                let loaded = tool.borrow_mut().load_internal(selected);
                match loaded {
                    Ok(total) => {
                        if let Err(e) = show_loaded(total) {
                            web_sys::console::error_1(&e);
                        }
                        if let Err(e) = open_preview(
                            "split-preview-content",
                            &bytes,
                            config.preview_scale,
                            None,
                        )
                        .await
                        {
                            web_sys::console::error_1(&e);
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "split source rejected");
                        split_error(LOAD_FAILED_MESSAGE);
                    }
                }
            });
        })?;
    }

    let start_input = by_id::<HtmlInputElement>("split-start-page")?;
    let end_input = by_id::<HtmlInputElement>("split-end-page")?;
    {
        let tool = tool.clone();
        let (start, end) = (start_input.clone(), end_input.clone());
        on(&start_input, "input", move |_| {
            let range = tool.borrow_mut().set_start_internal(&start.value());
            write_range(&start, &end, range);
        })?;
    }
    {
        let tool = tool.clone();
        let (start, end) = (start_input.clone(), end_input.clone());
        on(&end_input, "input", move |_| {
            let range = tool.borrow_mut().set_end_internal(&end.value());
            write_range(&start, &end, range);
        })?;
    }

    let button = by_id::<HtmlButtonElement>("split-btn")?;
    let btn = button.clone();
    on(&button, "click", move |_| {
        let tool = tool.clone();
        let config = config.clone();
        let btn = btn.clone();
        spawn_local(async move {
            let Some(_guard) = ButtonGuard::begin(btn, "Splitting PDF...") else {
                return;
            };
            split_error("");
            let _ = yield_to_browser().await;

            let result = tool.borrow().split_internal(now_ms());
            match result {
                Ok(artifact) => {
                    hide_id("split-error");
                    let shown = show_status("split-success", SUCCESS).and_then(|_| {
                        offer_download("split-success", artifact, config.document_revoke_ms)
                    });
                    if let Err(e) = shown {
                        web_sys::console::error_1(&e);
                    }
                }
                Err(err) => split_error(&err.to_string()),
            }
        });
    })?;
    Ok(())
}
