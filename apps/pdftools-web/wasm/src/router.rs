//! History-based navigation between the page sections

use crate::dom::{document, on, set_hidden};
use pdftools_core::Route;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

fn each(selector: &str, mut f: impl FnMut(Element)) -> Result<(), JsValue> {
    let nodes = document()?.query_selector_all(selector)?;
    for i in 0..nodes.length() {
        if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            f(el);
        }
    }
    Ok(())
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "/".to_string())
}

/// Show the section for `path` and highlight its nav link, pushing a
/// history entry when the location changes.
pub fn navigate_to(path: &str) -> Result<(), JsValue> {
    let route = Route::from_path(path);

    each(".page", |page| set_hidden(&page, true))?;
    if let Some(target) = document()?.get_element_by_id(route.page_id()) {
        set_hidden(&target, false);
    }

    each(".nav-link", |link| {
        let active = link
            .get_attribute("data-route")
            .map(|r| Route::from_path(&r).is_nav_active(route))
            .unwrap_or(false);
        let _ = if active {
            link.class_list().add_1("active")
        } else {
            link.class_list().remove_1("active")
        };
    })?;

    // Back/forward and the initial load already sit on `path`
    if current_path() != path {
        web_sys::window()
            .ok_or("No window")?
            .history()?
            .push_state_with_url(&JsValue::from_str(path), "", Some(path))?;
    }
    Ok(())
}

/// Wire route links, back/forward handling and the footer year, then show
/// the initial route.
pub fn install() -> Result<(), JsValue> {
    let doc = document()?;
    if let Some(year) = doc.get_element_by_id("current-year") {
        year.set_text_content(Some(&js_sys::Date::new_0().get_full_year().to_string()));
    }

    each("[data-route]", |el| {
        let Some(path) = el.get_attribute("data-route") else {
            return;
        };
        let _ = on(&el, "click", move |event| {
            event.prevent_default();
            if let Err(e) = navigate_to(&path) {
                web_sys::console::error_1(&e);
            }
        });
    })?;

    let window = web_sys::window().ok_or("No window")?;
    on(&window, "popstate", |_| {
        if let Err(e) = navigate_to(&current_path()) {
            web_sys::console::error_1(&e);
        }
    })?;

    navigate_to(&current_path())
}
