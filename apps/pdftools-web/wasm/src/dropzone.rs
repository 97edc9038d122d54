//! Click-or-drop file picker bound to intake rules

use crate::dom::{by_id, document, on, set_hidden};
use js_sys::Uint8Array;
use pdftools_core::{FileMeta, IntakeRules, SelectedFile};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DragEvent, Element, File, FileList, HtmlInputElement};

const ICON: &str = r#"<svg class="dropzone-icon" fill="none" viewBox="0 0 48 48" stroke="currentColor"><path d="M28 8H12a4 4 0 00-4 4v20m32-12v8m0 0v8a4 4 0 01-4 4H12a4 4 0 01-4-4v-4m32-4l-3.172-3.172a4 4 0 00-5.656 0L28 28M8 32l9.172-9.172a4 4 0 015.656 0L28 28m0 0l4 4m4-24h8m-4-4v8m-12 4h.02" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/></svg>
<div class="dropzone-text"><span class="font-semibold text-blue-600 hover:text-blue-700">Click to upload</span> or drag and drop</div>"#;

/// Read a picked file into memory.
pub async fn read_file(file: &File) -> Result<SelectedFile, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = Uint8Array::new(&buffer).to_vec();
    Ok(SelectedFile::new(file.name(), file.type_(), bytes))
}

/// Read several files, one after another.
pub async fn read_files(files: &[File]) -> Result<Vec<SelectedFile>, JsValue> {
    let mut selected = Vec::with_capacity(files.len());
    for file in files {
        selected.push(read_file(file).await?);
    }
    Ok(selected)
}

fn to_vec(list: Option<FileList>) -> Vec<File> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

fn error_box(container: &Element) -> Result<Option<Element>, JsValue> {
    match container.parent_element() {
        Some(parent) => parent.query_selector(".dropzone-error"),
        None => Ok(None),
    }
}

fn show_error(container: &Element, message: &str) -> Result<(), JsValue> {
    let error = match error_box(container)? {
        Some(el) => el,
        None => {
            let el = document()?.create_element("div")?;
            el.set_class_name("dropzone-error error-message");
            if let Some(parent) = container.parent_element() {
                parent.insert_before(&el, container.next_sibling().as_ref())?;
            }
            el
        }
    };
    error.set_text_content(Some(message));
    set_hidden(&error, false);
    Ok(())
}

fn clear_error(container: &Element) {
    if let Ok(Some(error)) = error_box(container) {
        set_hidden(&error, true);
    }
}

/// Validate a picked set; hands accepted files to `on_files`.
fn handle(container: &Element, rules: &IntakeRules, files: Vec<File>, on_files: &dyn Fn(Vec<File>)) {
    let metas: Vec<FileMeta> = files
        .iter()
        .map(|f| FileMeta::new(f.name(), f.type_(), f.size() as u64))
        .collect();

    match rules.validate(&metas) {
        Ok(false) => {}
        Ok(true) => {
            clear_error(container);
            on_files(files);
        }
        Err(e) => {
            tracing::debug!(error = %e, "selection rejected");
            if let Err(js) = show_error(container, &e.to_string()) {
                web_sys::console::error_1(&js);
            }
        }
    }
}

/// Turn `#container_id` into a dropzone.
///
/// Files that pass `rules` are passed to `on_files`; single-file rules
/// always deliver exactly one file.
pub fn attach(
    container_id: &str,
    rules: IntakeRules,
    on_files: impl Fn(Vec<File>) + 'static,
) -> Result<(), JsValue> {
    let doc = document()?;
    let container = by_id::<Element>(container_id)?;
    let rules = Rc::new(rules);
    let on_files: Rc<dyn Fn(Vec<File>)> = Rc::new(on_files);

    let input: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
    input.set_type("file");
    input.set_accept(rules.accept().as_str());
    input.set_multiple(rules.multiple());
    input.style().set_property("display", "none")?;

    let content = doc.create_element("div")?;
    content.set_class_name("dropzone-content");
    content.set_inner_html(ICON);
    for hint in rules.hints() {
        let p = doc.create_element("p")?;
        p.set_class_name("dropzone-format");
        p.set_text_content(Some(&hint));
        content.append_child(&p)?;
    }

    container.set_inner_html("");
    container.append_child(&input)?;
    container.append_child(&content)?;

    {
        let input = input.clone();
        on(&container, "click", move |_| input.click())?;
    }
    {
        let zone = container.clone();
        on(&container, "dragenter", move |event| {
            event.prevent_default();
            event.stop_propagation();
            let _ = zone.class_list().add_1("dragging");
        })?;
    }
    {
        let zone = container.clone();
        on(&container, "dragleave", move |event| {
            event.prevent_default();
            event.stop_propagation();
            let _ = zone.class_list().remove_1("dragging");
        })?;
    }
    on(&container, "dragover", |event| {
        event.prevent_default();
        event.stop_propagation();
    })?;
    {
        let zone = container.clone();
        let rules = rules.clone();
        let on_files = on_files.clone();
        on(&container, "drop", move |event| {
            event.prevent_default();
            event.stop_propagation();
            let _ = zone.class_list().remove_1("dragging");
            let files = event
                .dyn_ref::<DragEvent>()
                .and_then(|e| e.data_transfer())
                .and_then(|dt| dt.files());
            handle(&zone, &rules, to_vec(files), on_files.as_ref());
        })?;
    }
    {
        let zone = container.clone();
        let picker = input.clone();
        on(&input, "change", move |_| {
            handle(&zone, &rules, to_vec(picker.files()), on_files.as_ref());
            // Reset so picking the same file again still fires
            picker.set_value("");
        })?;
    }
    Ok(())
}
