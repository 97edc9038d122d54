//! Merge two PDFs

use super::{file_info, now_ms, to_js_error};
use crate::dom::{
    by_id, file_line, hide_id, on, set_hidden, show_error, show_status, yield_to_browser,
    ButtonGuard,
};
use crate::download::offer_download;
use crate::dropzone::{attach, read_file};
use pdftools_core::{
    Artifact, ArtifactKind, IntakeRules, MergeInputs, MergeSlot, PdfToolsError, SelectedFile,
    ToolsConfig,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlButtonElement};

const SUCCESS: &str = "PDFs merged successfully! Click the button below to download.";

#[wasm_bindgen]
#[derive(Default)]
pub struct MergeTool {
    inputs: MergeInputs,
}

#[wasm_bindgen]
impl MergeTool {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a PDF into slot 1 or 2; returns the file info line.
    #[wasm_bindgen(js_name = setFile)]
    pub fn set_file(&mut self, slot: u8, name: &str, bytes: &[u8]) -> Result<String, JsValue> {
        let slot = match slot {
            1 => MergeSlot::First,
            2 => MergeSlot::Second,
            other => return Err(JsValue::from_str(&format!("No merge slot {}", other))),
        };
        let file = SelectedFile::new(name, "application/pdf", bytes.to_vec());
        Ok(self.set_file_internal(slot, file))
    }

    #[wasm_bindgen(js_name = canMerge)]
    pub fn can_merge(&self) -> bool {
        self.inputs.can_merge()
    }

    /// Merged document bytes.
    pub fn merge(&mut self) -> Result<Vec<u8>, JsValue> {
        self.merge_internal(now_ms())
            .map(|artifact| artifact.bytes)
            .map_err(to_js_error)
    }
}

impl MergeTool {
    fn set_file_internal(&mut self, slot: MergeSlot, file: SelectedFile) -> String {
        let info = file_info(&file);
        self.inputs.set(slot, file);
        info
    }

    fn merge_internal(&mut self, timestamp_ms: i64) -> Result<Artifact, PdfToolsError> {
        let merged = self.inputs.merge()?;
        Ok(Artifact::new(ArtifactKind::Merged, merged, timestamp_ms))
    }
}

fn info_id(slot: MergeSlot) -> &'static str {
    match slot {
        MergeSlot::First => "merge-file-1-info",
        MergeSlot::Second => "merge-file-2-info",
    }
}

fn clear_messages() {
    hide_id("merge-error");
    hide_id("merge-success");
}

fn refresh_button(tool: &MergeTool) {
    if let Ok(btn) = by_id::<HtmlButtonElement>("merge-btn") {
        btn.set_disabled(!tool.can_merge());
    }
}

pub(crate) fn mount(config: Rc<ToolsConfig>) -> Result<(), JsValue> {
    let tool = Rc::new(RefCell::new(MergeTool::new()));

    for (zone, slot) in [
        ("merge-dropzone-1", MergeSlot::First),
        ("merge-dropzone-2", MergeSlot::Second),
    ] {
        let tool = tool.clone();
        attach(zone, IntakeRules::single_pdf(), move |files| {
            let Some(file) = files.into_iter().next() else {
                return;
            };
            let tool = tool.clone();
            spawn_local(async move {
                let selected = match read_file(&file).await {
                    Ok(selected) => selected,
                    Err(e) => {
                        web_sys::console::error_1(&e);
                        return;
                    }
                };
                let info = tool.borrow_mut().set_file_internal(slot, selected);
                if let Ok(el) = by_id::<Element>(info_id(slot)) {
                    set_hidden(&el, false);
                    let _ = file_line(&el, "📄", &info);
                }
                refresh_button(&tool.borrow());
                clear_messages();
            });
        })?;
    }

    let button = by_id::<HtmlButtonElement>("merge-btn")?;
    let btn = button.clone();
    on(&button, "click", move |_| {
        let tool = tool.clone();
        let config = config.clone();
        let btn = btn.clone();
        spawn_local(async move {
            if !tool.borrow().can_merge() {
                show_error("merge-error", "Please select both PDF files to merge");
                return;
            }
            let Some(_guard) = ButtonGuard::begin(btn, "Merging PDFs...") else {
                return;
            };
            clear_messages();
            let _ = yield_to_browser().await;

            let result = tool.borrow_mut().merge_internal(now_ms());
            match result {
                Ok(artifact) => {
                    let shown = show_status("merge-success", SUCCESS).and_then(|_| {
                        offer_download("merge-success", artifact, config.document_revoke_ms)
                    });
                    if let Err(e) = shown {
                        web_sys::console::error_1(&e);
                    }
                    hide_id(info_id(MergeSlot::First));
                    hide_id(info_id(MergeSlot::Second));
                }
                Err(err) => show_error("merge-error", &err.to_string()),
            }
        });
    })?;
    Ok(())
}
