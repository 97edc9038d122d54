//! Render selected pages to PNG

use super::now_ms;
use crate::bridge::PdfJsDocument;
use crate::dom::{by_id, document, hide_id, on, set_hidden, show_error, ButtonGuard};
use crate::download::append_image_download;
use crate::dropzone::{attach, read_file};
use crate::viewer::open_preview;
use pdftools_core::preview::LOAD_FAILED_MESSAGE;
use pdftools_core::{
    rasterize_pages, Artifact, ArtifactKind, IntakeRules, PageRasterizer, PageSelection,
    PdfToolsError, ToolsConfig,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlButtonElement, HtmlInputElement};

/// Page selection state of the PDF-to-image page.
#[wasm_bindgen]
#[derive(Default)]
pub struct PdfToImageTool {
    selection: PageSelection,
    current_page: u32,
    converting: bool,
}

#[wasm_bindgen]
impl PdfToImageTool {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over for a document with `total_pages` pages.
    pub fn reset(&mut self, total_pages: u32) {
        self.selection = PageSelection::new(total_pages);
        self.current_page = 1;
    }

    #[wasm_bindgen(js_name = setPage)]
    pub fn set_page(&mut self, page: u32, checked: bool) {
        self.selection.set(page, checked);
    }

    #[wasm_bindgen(js_name = selectAll)]
    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    #[wasm_bindgen(js_name = deselectAll)]
    pub fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }

    #[wasm_bindgen(js_name = selectedPages)]
    pub fn selected_pages(&self) -> Vec<u32> {
        self.selection.pages()
    }

    #[wasm_bindgen(js_name = canConvert)]
    pub fn can_convert(&self) -> bool {
        self.selection.can_convert()
    }

    #[wasm_bindgen(js_name = countLabel)]
    pub fn count_label(&self) -> String {
        self.selection.count_label()
    }

    #[wasm_bindgen(js_name = actionLabel)]
    pub fn action_label(&self) -> String {
        self.selection.action_label()
    }

    /// Page last shown in the preview.
    #[wasm_bindgen(getter, js_name = currentPage)]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }
}

/// Outcome of one conversion run: status text plus one artifact per page.
struct Converted {
    message: String,
    images: Vec<Artifact>,
}

async fn convert<R: PageRasterizer>(
    renderer: &mut R,
    selection: &PageSelection,
    scale: f64,
    timestamp_ms: i64,
) -> Result<Converted, PdfToolsError> {
    let report = rasterize_pages(renderer, selection, scale).await?;
    let message = report.outcome_message()?;
    let images = report
        .images
        .into_iter()
        .map(|image| Artifact::new(ArtifactKind::PageImage(image.page), image.png, timestamp_ms))
        .collect();
    Ok(Converted { message, images })
}

fn refresh_count(tool: &PdfToImageTool) {
    if let Ok(count) = by_id::<Element>("pdf-to-image-selected-count") {
        count.set_text_content(Some(&tool.count_label()));
    }
    // The busy button is restored by its guard
    if tool.converting {
        return;
    }
    if let Ok(btn) = by_id::<HtmlButtonElement>("pdf-to-image-btn") {
        btn.set_disabled(!tool.can_convert());
        if tool.can_convert() {
            btn.set_inner_html(&tool.action_label());
        }
    }
}

fn checkbox(page: u32) -> Option<HtmlInputElement> {
    by_id::<HtmlInputElement>(&format!("page-checkbox-{}", page)).ok()
}

fn build_page_list(tool: &Rc<RefCell<PdfToImageTool>>, total: u32) -> Result<(), JsValue> {
    let doc = document()?;
    let list = by_id::<Element>("pdf-to-image-pages-list")?;
    list.set_inner_html("");

    for page in 1..=total {
        let item = doc.create_element("div")?;
        item.set_class_name("page-checkbox-item");

        let input: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
        input.set_type("checkbox");
        input.set_id(&format!("page-checkbox-{}", page));
        input.set_value(&page.to_string());
        input.set_checked(tool.borrow().selection.contains(page));

        let label = doc.create_element("label")?;
        label.set_attribute("for", &format!("page-checkbox-{}", page))?;
        label.set_text_content(Some(&format!("Page {}", page)));

        let tool = tool.clone();
        let target = input.clone();
        on(&input, "change", move |_| {
            let mut state = tool.borrow_mut();
            state.set_page(page, target.checked());
            refresh_count(&state);
        })?;

        item.append_child(&input)?;
        item.append_child(&label)?;
        list.append_child(&item)?;
    }

    refresh_count(&tool.borrow());
    Ok(())
}

fn show_total(total: u32) -> Result<(), JsValue> {
    let doc = document()?;
    let info = by_id::<Element>("pdf-to-image-info")?;
    let line = doc.create_element("p")?;
    let label = doc.create_element("strong")?;
    label.set_text_content(Some("Total pages:"));
    line.append_child(&label)?;
    line.append_with_str_1(&format!(" {}", total))?;
    info.set_inner_html("");
    info.append_child(&line)?;
    Ok(())
}

fn conversion_error(message: &str) {
    show_error("pdf-to-image-error", message);
    hide_id("pdf-to-image-success");
}

fn show_converted(converted: Converted, revoke_ms: u32) -> Result<(), JsValue> {
    hide_id("pdf-to-image-error");
    let success = by_id::<Element>("pdf-to-image-success")?;
    let paragraph = document()?.create_element("p")?;
    paragraph.set_text_content(Some(&converted.message));
    success.set_inner_html("");
    success.append_child(&paragraph)?;
    for artifact in converted.images {
        append_image_download(&success, artifact, revoke_ms)?;
    }
    set_hidden(&success, false);
    Ok(())
}

pub(crate) fn mount(config: Rc<ToolsConfig>) -> Result<(), JsValue> {
    let tool = Rc::new(RefCell::new(PdfToImageTool::new()));
    let loaded: Rc<RefCell<Option<PdfJsDocument>>> = Rc::new(RefCell::new(None));

    {
        let tool = tool.clone();
        let loaded = loaded.clone();
        let config = config.clone();
        attach("pdf-to-image-dropzone", IntakeRules::single_pdf(), move |files| {
            let Some(file) = files.into_iter().next() else {
                return;
            };
            let tool = tool.clone();
            let loaded = loaded.clone();
            let config = config.clone();
            spawn_local(async move {
                loaded.borrow_mut().take();
                let bytes = match read_file(&file).await {
                    Ok(selected) => selected.bytes,
                    Err(e) => {
                        web_sys::console::error_1(&e);
                        conversion_error(LOAD_FAILED_MESSAGE);
                        return;
                    }
                };
                let pdf = match PdfJsDocument::load(&bytes).await {
                    Ok(pdf) => pdf,
                    Err(detail) => {
                        tracing::error!(%detail, "pdf-to-image load failed");
                        conversion_error(LOAD_FAILED_MESSAGE);
                        return;
                    }
                };

                let total = pdf.page_count();
                tool.borrow_mut().reset(total);
                *loaded.borrow_mut() = Some(pdf);

                let shown = by_id::<Element>("pdf-to-image-controls")
                    .map(|el| set_hidden(&el, false))
                    .and_then(|_| show_total(total))
                    .and_then(|_| build_page_list(&tool, total))
                    .and_then(|_| by_id::<Element>("pdf-to-image-page-selection"))
                    .map(|el| set_hidden(&el, false));
                if let Err(e) = shown {
                    web_sys::console::error_1(&e);
                }

                let on_page = {
                    let tool = tool.clone();
                    Box::new(move |page: u32| tool.borrow_mut().current_page = page)
                        as Box<dyn FnMut(u32)>
                };
                if let Err(e) = open_preview(
                    "pdf-to-image-preview-content",
                    &bytes,
                    config.preview_scale,
                    Some(on_page),
                )
                .await
                {
                    web_sys::console::error_1(&e);
                }
            });
        })?;
    }

    for (id, select) in [("select-all-pages", true), ("deselect-all-pages", false)] {
        // The bulk buttons are optional in the page markup
        let Ok(button) = by_id::<HtmlButtonElement>(id) else {
            continue;
        };
        let tool = tool.clone();
        on(&button, "click", move |_| {
            let mut state = tool.borrow_mut();
            if select {
                state.select_all();
            } else {
                state.deselect_all();
            }
            for page in 1..=state.selection.total_pages() {
                if let Some(input) = checkbox(page) {
                    input.set_checked(select);
                }
            }
            refresh_count(&state);
        })?;
    }

    let button = by_id::<HtmlButtonElement>("pdf-to-image-btn")?;
    let btn = button.clone();
    on(&button, "click", move |_| {
        let tool = tool.clone();
        let loaded = loaded.clone();
        let config = config.clone();
        let btn = btn.clone();
        spawn_local(async move {
            let Some(mut renderer) = loaded.borrow().clone() else {
                conversion_error("Please select a PDF file");
                return;
            };
            let selection = tool.borrow().selection.clone();
            if selection.is_empty() {
                conversion_error("Please select at least one page to convert");
                return;
            }

            let Some(guard) = ButtonGuard::begin(btn, "Converting Pages...") else {
                return;
            };
            tool.borrow_mut().converting = true;
            hide_id("pdf-to-image-error");
            hide_id("pdf-to-image-success");

            match convert(&mut renderer, &selection, config.raster_scale, now_ms()).await {
                Ok(converted) => {
                    if let Err(e) = show_converted(converted, config.image_revoke_ms) {
                        web_sys::console::error_1(&e);
                    }
                }
                Err(err) => conversion_error(&err.to_string()),
            }

            drop(guard);
            let mut state = tool.borrow_mut();
            state.converting = false;
            refresh_count(&state);
        });
    })?;
    Ok(())
}
