//! Canvas preview with Previous/Next navigation

use crate::bridge::{CanvasRenderer, PdfJsDocument};
use crate::dom::{by_id, document, on};
use pdftools_core::preview::{LOAD_FAILED_MESSAGE, RENDER_FAILED_MESSAGE};
use pdftools_core::{PagePreview, PreviewNavigator};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlButtonElement, HtmlCanvasElement};

const LOADING_HTML: &str = r#"<div class="text-center p-8"><div class="loader loader-md inline-block mb-2"></div><p class="text-gray-600">Loading PDF...</p></div>"#;

type Slot = Rc<RefCell<Option<PagePreview<CanvasRenderer>>>>;

#[derive(Clone, Copy)]
enum Step {
    Previous,
    Next,
}

struct NavBar {
    prev: HtmlButtonElement,
    next: HtmlButtonElement,
    label: Element,
}

impl NavBar {
    fn build(doc: &web_sys::Document) -> Result<(Element, Self), JsValue> {
        let nav = doc.create_element("div")?;
        nav.set_class_name("pdf-nav");

        let prev: HtmlButtonElement = doc.create_element("button")?.dyn_into()?;
        prev.set_class_name("prev-btn");
        prev.set_text_content(Some("Previous"));

        let label = doc.create_element("span")?;
        label.set_class_name("pdf-page-info");

        let next: HtmlButtonElement = doc.create_element("button")?.dyn_into()?;
        next.set_class_name("next-btn");
        next.set_text_content(Some("Next"));

        nav.append_child(&prev)?;
        nav.append_child(&label)?;
        nav.append_child(&next)?;
        Ok((nav, Self { prev, next, label }))
    }

    fn update(&self, navigator: &PreviewNavigator) {
        self.prev.set_disabled(!navigator.has_previous());
        self.next.set_disabled(!navigator.has_next());
        self.label.set_text_content(Some(&navigator.label()));
    }
}

fn show_failure(container: &Element, message: &str) {
    container.set_inner_html("");
    if let Ok(div) = document().and_then(|d| d.create_element("div")) {
        div.set_class_name("error-message");
        div.set_text_content(Some(message));
        let _ = container.append_child(&div);
    }
}

async fn step(slot: Slot, container: Element, nav: Rc<NavBar>, direction: Step) {
    // Out of the cell while rendering; clicks in the meantime find it empty
    let Some(mut preview) = slot.borrow_mut().take() else {
        return;
    };

    let rendered = match direction {
        Step::Previous => preview.previous().await,
        Step::Next => preview.next().await,
    };
    nav.update(preview.navigator());
    *slot.borrow_mut() = Some(preview);

    if let Some(Err(message)) = rendered {
        show_failure(&container, &message);
    }
}

/// Load `bytes` with PDF.js and show the first page in `#container_id`.
///
/// `on_page_change` fires after every navigation with the new page number.
pub async fn open_preview(
    container_id: &str,
    bytes: &[u8],
    scale: f64,
    on_page_change: Option<Box<dyn FnMut(u32)>>,
) -> Result<(), JsValue> {
    let container = by_id::<Element>(container_id)?;
    container.set_inner_html(LOADING_HTML);

    let document_proxy = match PdfJsDocument::load(bytes).await {
        Ok(doc) => doc,
        Err(detail) => {
            tracing::error!(%detail, "preview load failed");
            show_failure(&container, LOAD_FAILED_MESSAGE);
            return Ok(());
        }
    };

    let doc = document()?;
    let canvas: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
    let (nav_el, nav) = NavBar::build(&doc)?;

    let canvas_box = doc.create_element("div")?;
    canvas_box.set_class_name("pdf-canvas-container");
    canvas_box.append_child(&canvas)?;

    let wrapper = doc.create_element("div")?;
    wrapper.set_class_name("pdf-preview-container");
    wrapper.append_child(&nav_el)?;
    wrapper.append_child(&canvas_box)?;

    let total_pages = document_proxy.page_count();
    let mut preview =
        PagePreview::new(CanvasRenderer::new(document_proxy, canvas), total_pages).with_scale(scale);
    if let Some(callback) = on_page_change {
        preview.on_page_change(callback);
    }

    if preview.render_current().await.is_err() {
        show_failure(&container, RENDER_FAILED_MESSAGE);
        return Ok(());
    }
    nav.update(preview.navigator());
    container.set_inner_html("");
    container.append_child(&wrapper)?;

    let slot: Slot = Rc::new(RefCell::new(Some(preview)));
    let nav = Rc::new(nav);
    for (button, direction) in [(&nav.prev, Step::Previous), (&nav.next, Step::Next)] {
        let slot = slot.clone();
        let container = container.clone();
        let nav_for_click = nav.clone();
        on(button, "click", move |_| {
            spawn_local(step(
                slot.clone(),
                container.clone(),
                nav_for_click.clone(),
                direction,
            ));
        })?;
    }
    Ok(())
}
