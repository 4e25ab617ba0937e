//! Cross-frame messaging helpers for pooled content frames.
//!
//! Content frames are addressed by the DOM id the shell gives their `<iframe>` element.

use serde_json::Value;
use wasm_bindgen::JsValue;

/// Returns `true` when a message from `event_origin` may drive the shell.
///
/// Same-origin senders are trusted, as are opaque (`null`) and `file:` origins used when the
/// site is opened straight from disk.
pub fn is_trusted_origin(event_origin: &str, page_origin: &str) -> bool {
    event_origin == page_origin || event_origin == "null" || event_origin.starts_with("file:")
}

/// Returns the origin of the current page, or an empty string off the browser.
pub fn page_origin() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}

#[cfg(target_arch = "wasm32")]
fn frame_content_window(frame_dom_id: &str) -> Option<web_sys::Window> {
    use wasm_bindgen::JsCast;

    web_sys::window()?
        .document()?
        .get_element_by_id(frame_dom_id)?
        .dyn_into::<web_sys::HtmlIFrameElement>()
        .ok()?
        .content_window()
}

/// Returns `true` when `source` (a `MessageEvent.source`) is the window of the frame with
/// `frame_dom_id`.
pub fn frame_source_matches(frame_dom_id: &str, source: &JsValue) -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        frame_content_window(frame_dom_id)
            .map(|frame_window| js_sys::Object::is(source, frame_window.as_ref()))
            .unwrap_or(false)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (frame_dom_id, source);
        false
    }
}

/// Converts `MessageEvent.data` into JSON. Non-serializable payloads yield `None`.
pub fn decode_message_data(data: JsValue) -> Option<Value> {
    #[cfg(target_arch = "wasm32")]
    {
        serde_wasm_bindgen::from_value(data).ok()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = data;
        None
    }
}

/// Posts `payload` into the content window of the frame with `frame_dom_id`.
///
/// # Errors
///
/// Returns an error when the frame is missing, has no content window, or the post fails.
pub fn post_message_to_frame(frame_dom_id: &str, payload: &Value) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        let target = frame_content_window(frame_dom_id)
            .ok_or_else(|| format!("content frame `{frame_dom_id}` unavailable"))?;
        let message = serde_wasm_bindgen::to_value(payload)
            .map_err(|e| format!("frame message encode failed: {e}"))?;
        target
            .post_message(&message, "*")
            .map_err(|e| format!("frame postMessage failed: {e:?}"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (frame_dom_id, payload);
        Ok(())
    }
}
