//! Browser fetch for content requests

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::content::{ContentEvent, FetchRequest, HttpMethod};

async fn fetch_text(request: &FetchRequest) -> Result<(u16, String), JsValue> {
    let init = RequestInit::new();
    init.set_mode(RequestMode::Cors);
    init.set_method(match request.method {
        HttpMethod::Get => "GET",
        HttpMethod::Post => "POST",
    });
    if let Some(body) = &request.body {
        init.set_body(&JsValue::from_str(body));
    }

    let req = Request::new_with_str_and_init(&request.url, &init)?;
    req.headers().set("Accept", "application/json")?;
    if request.body.is_some() {
        req.headers().set("Content-Type", "application/json")?;
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&req)).await?.dyn_into()?;
    let text = JsFuture::from(response.text()?).await?;
    Ok((response.status(), text.as_string().unwrap_or_default()))
}

/// Perform `request` and describe the outcome as a content event
pub async fn perform(request: FetchRequest) -> ContentEvent {
    match fetch_text(&request).await {
        Ok((status, body)) => ContentEvent::FetchCompleted { status, body },
        Err(e) => {
            let reason = e.as_string().unwrap_or_else(|| format!("{:?}", e));
            log::warn!("{:?} {} failed: {}", request.method, request.url, reason);
            ContentEvent::FetchFailed { reason }
        }
    }
}
