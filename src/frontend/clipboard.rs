use super::dom;
use crate::copy::{CopyOutcome, CopyPath};
use crate::error::EnhanceError;
use crate::logging::{log_event, LogLevel};
use js_sys::{Function, Promise, Reflect};
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlDocument, HtmlElement, HtmlTextAreaElement};

/// Async clipboard first, then the `execCommand("copy")` fallback.
pub async fn copy_text(document: &Document, body: &HtmlElement, text: &str) -> CopyOutcome {
    let primary = match write_clipboard(text).await {
        Ok(()) => return CopyOutcome::Copied(CopyPath::Clipboard),
        Err(error) => error,
    };
    log_event(
        LogLevel::Debug,
        "clipboard_primary_failed",
        json!({ "error": primary.to_string() }),
    );

    match copy_with_textarea(document, body, text) {
        Ok(()) => CopyOutcome::Copied(CopyPath::Fallback),
        Err(error) => {
            log_event(
                LogLevel::Error,
                "clipboard_copy_failed",
                json!({ "primary": primary.to_string(), "fallback": error.to_string() }),
            );
            CopyOutcome::Failed
        }
    }
}

async fn write_clipboard(text: &str) -> Result<(), EnhanceError> {
    let navigator = dom::window()?.navigator();
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(EnhanceError::ClipboardUnavailable);
    }

    let write_text = Reflect::get(&clipboard, &JsValue::from_str("writeText"))?;
    let Some(write_text) = write_text.dyn_ref::<Function>() else {
        return Err(EnhanceError::ClipboardUnavailable);
    };

    let promise: Promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))?
        .dyn_into()
        .map_err(|_| EnhanceError::Dom("writeText did not return a promise".to_string()))?;
    JsFuture::from(promise).await?;
    Ok(())
}

fn copy_with_textarea(document: &Document, body: &HtmlElement, text: &str) -> Result<(), EnhanceError> {
    let textarea: HtmlTextAreaElement = dom::create(document, "textarea", "")?;
    textarea.set_value(text);
    let _ = textarea.set_attribute("readonly", "");
    let _ = textarea.set_attribute(
        "style",
        "position: fixed; top: 0; left: -9999px; opacity: 0;",
    );

    body.append_child(&textarea)?;
    textarea.select();
    let copied = document
        .dyn_ref::<HtmlDocument>()
        .ok_or_else(|| EnhanceError::Dom("document is not an HTML document".to_string()))
        .and_then(|html| html.exec_command("copy").map_err(EnhanceError::from));
    textarea.remove();

    if copied? {
        Ok(())
    } else {
        Err(EnhanceError::CopyCommandRejected)
    }
}
