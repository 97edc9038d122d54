//! Download buttons for finished artifacts

use crate::dom::{by_id, document, on};
use js_sys::{Array, Uint8Array};
use pdftools_core::Artifact;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, Element, HtmlAnchorElement, HtmlElement, Url};

fn blob_for(artifact: &Artifact) -> Result<Blob, JsValue> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(artifact.bytes.as_slice()));
    let options = BlobPropertyBag::new();
    options.set_type(artifact.mime());
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// Save `artifact` through a temporary anchor; the object URL is revoked
/// `revoke_ms` later.
pub fn trigger_download(artifact: &Artifact, revoke_ms: u32) -> Result<(), JsValue> {
    let doc = document()?;
    let body = doc.body().ok_or("No body")?;
    let url = Url::create_object_url_with_blob(&blob_for(artifact)?)?;

    let link: HtmlAnchorElement = doc.create_element("a")?.dyn_into()?;
    link.set_href(&url);
    link.set_download(&artifact.file_name);
    link.style().set_property("display", "none")?;
    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;

    let revoke = Closure::once(Box::new(move || {
        let _ = Url::revoke_object_url(&url);
    }) as Box<dyn FnOnce()>);
    web_sys::window()
        .ok_or("No window")?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            revoke.as_ref().unchecked_ref(),
            revoke_ms as i32,
        )?;
    revoke.forget();
    Ok(())
}

fn download_button(artifact: Artifact, revoke_ms: u32) -> Result<HtmlElement, JsValue> {
    let button: HtmlElement = document()?.create_element("button")?.dyn_into()?;
    button.set_class_name("btn-primary");
    button.set_text_content(Some(&artifact.label()));

    let artifact = Rc::new(artifact);
    on(&button, "click", move |_| {
        if let Err(e) = trigger_download(&artifact, revoke_ms) {
            web_sys::console::error_2(&"Error triggering download:".into(), &e);
        }
    })?;
    Ok(button)
}

/// Offer a document artifact in `#container_id`, replacing any earlier one.
pub fn offer_download(container_id: &str, artifact: Artifact, revoke_ms: u32) -> Result<(), JsValue> {
    let container = by_id::<Element>(container_id)?;
    if let Some(existing) = container.query_selector(".download-btn")? {
        existing.remove();
    }

    let button = download_button(artifact, revoke_ms)?;
    button.class_list().add_1("download-btn")?;
    button.style().set_property("margin-top", "1rem")?;
    button.style().set_property("width", "100%")?;
    container.append_child(&button)?;
    Ok(())
}

/// Append one page-image button; several may coexist.
pub fn append_image_download(
    container: &Element,
    artifact: Artifact,
    revoke_ms: u32,
) -> Result<(), JsValue> {
    let button = download_button(artifact, revoke_ms)?;
    button.style().set_property("margin-top", "0.5rem")?;
    button.style().set_property("width", "100%")?;
    button.style().set_property("display", "block")?;
    container.append_child(&button)?;
    Ok(())
}
