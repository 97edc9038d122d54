//! Small DOM helpers shared by the tool pages

use pdftools_core::ActionControl;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlButtonElement};

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))
}

/// Element by id, cast to the expected type.
pub fn by_id<T: JsCast>(id: &str) -> Result<T, JsValue> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element #{} has an unexpected type", id)))
}

pub fn set_hidden(el: &Element, hidden: bool) {
    let classes = el.class_list();
    let _ = if hidden {
        classes.add_1("hidden")
    } else {
        classes.remove_1("hidden")
    };
}

pub fn hide_id(id: &str) {
    if let Ok(el) = by_id::<Element>(id) {
        set_hidden(&el, true);
    }
}

/// Attach a listener for the lifetime of the page.
pub fn on(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Plain-text error line in `#id`.
pub fn show_error(id: &str, message: &str) {
    if let Ok(el) = by_id::<Element>(id) {
        el.set_text_content(Some(message));
        set_hidden(&el, message.is_empty());
    }
}

/// Replace the message of a status box, keeping any download button in it.
pub fn show_status(id: &str, message: &str) -> Result<(), JsValue> {
    let container = by_id::<Element>(id)?;
    let existing = container.query_selector(".download-btn")?;

    let paragraph = document()?.create_element("p")?;
    paragraph.set_text_content(Some(message));
    container.set_inner_html("");
    container.append_child(&paragraph)?;
    if let Some(button) = existing {
        container.append_child(&button)?;
    }
    set_hidden(&container, false);
    Ok(())
}

/// `<span>icon</span><span>text</span>` file line.
pub fn file_line(el: &Element, icon: &str, text: &str) -> Result<(), JsValue> {
    let doc = document()?;
    el.set_inner_html("");
    for part in [icon, text] {
        let span = doc.create_element("span")?;
        span.set_text_content(Some(part));
        el.append_child(&span)?;
    }
    Ok(())
}

/// Let the browser repaint before synchronous work starts.
pub async fn yield_to_browser() -> Result<(), JsValue> {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0);
        }
    });
    wasm_bindgen_futures::JsFuture::from(promise).await?;
    Ok(())
}

fn busy_html(label: &str) -> String {
    format!(
        r#"<span class="busy-label"><span class="loader loader-sm"></span>{}</span>"#,
        label
    )
}

/// Disables a button and shows a busy label until dropped.
pub struct ButtonGuard {
    button: HtmlButtonElement,
    control: ActionControl,
}

impl ButtonGuard {
    /// `None` while the button is already busy or disabled.
    pub fn begin(button: HtmlButtonElement, busy_label: &str) -> Option<Self> {
        if button.disabled() {
            return None;
        }
        let mut control = ActionControl::new(button.inner_html(), busy_html(busy_label));
        if !control.begin() {
            return None;
        }
        let guard = Self { button, control };
        guard.apply();
        Some(guard)
    }

    fn apply(&self) {
        self.button.set_inner_html(self.control.label());
        self.button.set_disabled(!self.control.is_enabled());
    }
}

impl Drop for ButtonGuard {
    fn drop(&mut self) {
        self.control.finish();
        self.apply();
    }
}
