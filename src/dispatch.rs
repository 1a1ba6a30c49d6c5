#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use hyoka_core::{decode, encode, DispatchRequest, DispatchResponse};

#[cfg(test)]
pub(crate) type TestDispatchHandler = Rc<dyn Fn(DispatchRequest) -> bool>;

#[cfg(test)]
thread_local! {
    static TEST_DISPATCH: RefCell<Option<TestDispatchHandler>> = RefCell::new(None);
}

#[cfg(test)]
pub(crate) fn install_test_dispatch(handler: TestDispatchHandler) {
    TEST_DISPATCH.with(|slot| {
        *slot.borrow_mut() = Some(handler);
    });
}

#[cfg(test)]
pub(crate) fn clear_test_dispatch() {
    TEST_DISPATCH.with(|slot| slot.borrow_mut().take());
}

pub(crate) async fn send(endpoint: &str, request: &DispatchRequest) -> bool {
    #[cfg(test)]
    {
        if let Some(handler) = TEST_DISPATCH.with(|slot| slot.borrow().clone()) {
            return handler(request.clone());
        }
    }
    send_over_fetch(endpoint, request).await
}

async fn send_over_fetch(endpoint: &str, request: &DispatchRequest) -> bool {
    let Some(body) = encode(request) else {
        return false;
    };
    let Some(window) = web_sys::window() else {
        return false;
    };
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));
    let Ok(fetch_request) = Request::new_with_str_and_init(endpoint, &init) else {
        return false;
    };
    if fetch_request
        .headers()
        .set("Content-Type", "application/json")
        .is_err()
    {
        return false;
    }
    let Ok(response) = JsFuture::from(window.fetch_with_request(&fetch_request)).await else {
        gloo::console::warn!("feedback dispatch failed before reaching the relay");
        return false;
    };
    let Ok(response) = response.dyn_into::<Response>() else {
        return false;
    };
    if !response.ok() {
        gloo::console::warn!("feedback dispatch rejected", response.status());
        return false;
    }
    let Ok(text_promise) = response.text() else {
        return false;
    };
    let Ok(raw) = JsFuture::from(text_promise).await else {
        return false;
    };
    let Some(raw) = raw.as_string() else {
        return false;
    };
    decode::<DispatchResponse>(&raw)
        .map(|result| result.delivered)
        .unwrap_or(false)
}
