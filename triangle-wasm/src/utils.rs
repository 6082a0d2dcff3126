use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, Document, ErrorEvent, HtmlElement, PromiseRejectionEvent, Url, Window};

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

pub fn warn(s: &str) {
    web_sys::console::warn_1(&JsValue::from_str(s));
}

pub fn error(s: &str) {
    web_sys::console::error_1(&JsValue::from_str(s));
}

/// Milliseconds on the page's monotonic clock.
pub fn now(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// Route uncaught errors and unhandled promise rejections to the console.
pub fn install_error_logging(window: &Window) -> Result<(), JsValue> {
    let onerror = Closure::<dyn FnMut(ErrorEvent)>::wrap(Box::new(|e: ErrorEvent| {
        error(&format!("[onerror] {}", e.message()));
    }));
    window.add_event_listener_with_callback("error", onerror.as_ref().unchecked_ref())?;
    onerror.forget();

    let onrejection =
        Closure::<dyn FnMut(PromiseRejectionEvent)>::wrap(Box::new(|e: PromiseRejectionEvent| {
            error(&format!("[unhandled] {:?}", e.reason()));
        }));
    window.add_event_listener_with_callback(
        "unhandledrejection",
        onrejection.as_ref().unchecked_ref(),
    )?;
    onrejection.forget();
    Ok(())
}

/// Base path the host page was served under, from `window.__BASE_URL`.
pub fn base_url(window: &Window) -> String {
    js_sys::Reflect::get(window, &JsValue::from_str("__BASE_URL"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| "/".to_string())
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

/// Offer `text` as a file download through a temporary object URL.
pub fn save_text_as_file(
    document: &Document,
    filename: &str,
    mime: &str,
    text: &str,
) -> Result<(), JsValue> {
    let array = Array::new();
    array.push(&JsValue::from_str(text));
    let opts = web_sys::BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&array, &opts)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let a = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    a.set_attribute("download", filename)?;
    a.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}
