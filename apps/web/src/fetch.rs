use bird_tracks_core::FetchError;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Appends `query` to `url`, URL-encoding every value.
pub fn with_query(url: &str, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }

    let pairs: Vec<String> = query
        .iter()
        .map(|(key, value)| {
            let encoded = String::from(js_sys::encode_uri_component(value));
            format!("{key}={encoded}")
        })
        .collect();
    format!("{url}?{}", pairs.join("&"))
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// GET `url` from the tracking service and decode the body as JSON.
pub async fn get_json(url: &str) -> Result<Value, FetchError> {
    log::debug!("GET {url}");
    let window = web_sys::window().ok_or_else(|| FetchError::Transport("no window".into()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| FetchError::Transport(describe(&e)))?;

    let response_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| FetchError::Transport(describe(&e)))?;
    let response = response_value
        .dyn_into::<Response>()
        .map_err(|e| FetchError::Transport(describe(&e)))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let body = response
        .json()
        .map_err(|e| FetchError::Decode(describe(&e)))?;
    let json = JsFuture::from(body)
        .await
        .map_err(|e| FetchError::Decode(describe(&e)))?;

    serde_wasm_bindgen::from_value::<Value>(json).map_err(|e| FetchError::Decode(e.to_string()))
}
