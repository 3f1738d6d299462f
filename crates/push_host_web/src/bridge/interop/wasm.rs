use super::*;
use js_sys::{Function, Promise, Reflect, Uint8Array};
use push_host::CapabilityStatus;
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    HtmlButtonElement, HtmlDocument, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    NotificationOptions, PushSubscriptionOptionsInit, RegistrationOptions,
    ServiceWorkerGlobalScope, ServiceWorkerRegistration,
};

/// Ready service-worker registration owned by the page.
#[derive(Debug, Clone)]
pub struct RegistrationHandle {
    registration: ServiceWorkerRegistration,
}

async fn await_promise(promise: Promise) -> Result<JsValue, String> {
    JsFuture::from(promise).await.map_err(js_error_to_string)
}

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

fn set_field(target: &JsValue, name: &str, value: &JsValue) -> Result<(), String> {
    Reflect::set(target, &JsValue::from_str(name), value)
        .map(|_| ())
        .map_err(js_error_to_string)
}

fn has_field(target: &JsValue, name: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

fn window() -> Result<web_sys::Window, String> {
    web_sys::window().ok_or_else(|| "window unavailable".to_string())
}

fn document() -> Result<web_sys::Document, String> {
    window()?
        .document()
        .ok_or_else(|| "document unavailable".to_string())
}

fn element<T: JsCast>(id: &str) -> Result<T, String> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| format!("element #{id} not found"))?
        .dyn_into::<T>()
        .map_err(|_| format!("element #{id} has an unexpected type"))
}

fn worker_scope() -> Result<ServiceWorkerGlobalScope, String> {
    js_sys::global()
        .dyn_into::<ServiceWorkerGlobalScope>()
        .map_err(|_| "not running inside a service worker".to_string())
}

pub async fn register_service_worker(script_url: &str, scope: &str) -> Result<(), String> {
    let container = window()?.navigator().service_worker();
    let options = RegistrationOptions::new();
    set_field(&options, "scope", &JsValue::from_str(scope))?;
    await_promise(container.register_with_options(script_url, &options))
        .await
        .map(|_| ())
}

pub async fn service_worker_ready() -> Result<RegistrationHandle, String> {
    let container = window()?.navigator().service_worker();
    let promise = container.ready().map_err(js_error_to_string)?;
    await_promise(promise)
        .await?
        .dyn_into::<ServiceWorkerRegistration>()
        .map(|registration| RegistrationHandle { registration })
        .map_err(|_| "service worker readiness resolved without a registration".to_string())
}

pub fn registration_scope(handle: &RegistrationHandle) -> String {
    handle.registration.scope()
}

pub async fn push_subscribe(
    handle: &RegistrationHandle,
    user_visible_only: bool,
    application_server_key: &[u8],
) -> Result<String, String> {
    let manager = handle
        .registration
        .push_manager()
        .map_err(js_error_to_string)?;
    let options = PushSubscriptionOptionsInit::new();
    set_field(&options, "userVisibleOnly", &JsValue::from_bool(user_visible_only))?;
    set_field(
        &options,
        "applicationServerKey",
        &Uint8Array::from(application_server_key),
    )?;
    let promise = manager
        .subscribe_with_options(&options)
        .map_err(js_error_to_string)?;
    let subscription = await_promise(promise).await?;
    js_sys::JSON::stringify(&subscription)
        .map(String::from)
        .map_err(js_error_to_string)
}

pub async fn unregister(handle: &RegistrationHandle) -> Result<bool, String> {
    let promise = handle
        .registration
        .unregister()
        .map_err(js_error_to_string)?;
    Ok(await_promise(promise).await?.as_bool().unwrap_or(false))
}

pub async fn show_notification(
    title: &str,
    body: Option<&str>,
    icon: Option<&str>,
) -> Result<(), String> {
    let options = NotificationOptions::new();
    if let Some(body) = body {
        set_field(&options, "body", &JsValue::from_str(body))?;
    }
    if let Some(icon) = icon {
        set_field(&options, "icon", &JsValue::from_str(icon))?;
    }
    let promise = worker_scope()?
        .registration()
        .show_notification_with_options(title, &options)
        .map_err(js_error_to_string)?;
    await_promise(promise).await.map(|_| ())
}

pub fn cookie_string() -> Result<String, String> {
    document()?
        .dyn_into::<HtmlDocument>()
        .map_err(|_| "document does not expose cookies".to_string())?
        .cookie()
        .map_err(js_error_to_string)
}

pub fn assign_cookie(cookie: &str) -> Result<(), String> {
    document()?
        .dyn_into::<HtmlDocument>()
        .map_err(|_| "document does not expose cookies".to_string())?
        .set_cookie(cookie)
        .map_err(js_error_to_string)
}

pub fn set_input_value(id: &str, value: &str) -> Result<(), String> {
    element::<HtmlInputElement>(id)?.set_value(value);
    Ok(())
}

pub fn set_text_area_value(id: &str, text: &str) -> Result<(), String> {
    element::<HtmlTextAreaElement>(id)?.set_value(text);
    Ok(())
}

pub fn set_button_disabled(id: &str, disabled: bool) -> Result<(), String> {
    element::<HtmlButtonElement>(id)?.set_disabled(disabled);
    Ok(())
}

pub fn click_element(id: &str) -> Result<(), String> {
    element::<HtmlElement>(id)?.click();
    Ok(())
}

pub async fn register_protocol_handler(scheme: &str, url: &str, title: &str) -> Result<(), String> {
    let navigator = window()?.navigator();
    let register = Reflect::get(&navigator, &JsValue::from_str("registerProtocolHandler"))
        .map_err(js_error_to_string)?
        .dyn_into::<Function>()
        .map_err(|_| "registerProtocolHandler is unavailable".to_string())?;
    register
        .call3(
            &navigator,
            &JsValue::from_str(scheme),
            &JsValue::from_str(url),
            &JsValue::from_str(title),
        )
        .map(|_| ())
        .map_err(js_error_to_string)
}

pub async fn sleep_ms(millis: u32) {
    let delay = i32::try_from(millis).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            if let Err(err) =
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay)
            {
                leptos::logging::warn!("timer scheduling failed: {}", js_error_to_string(err));
            }
        }
    });
    let _ = JsFuture::from(promise).await;
}

pub fn global_string(name: &str) -> Option<String> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()?
        .as_string()
}

pub fn global_push_config(name: &str) -> Result<Option<PushConfig>, String> {
    let value =
        Reflect::get(&js_sys::global(), &JsValue::from_str(name)).map_err(js_error_to_string)?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    if let Some(raw) = value.as_string() {
        return PushConfig::from_json(&raw)
            .map(Some)
            .map_err(|err| err.to_string());
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|err| err.to_string())
}

pub fn location_search() -> String {
    web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default()
}

pub fn location_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

pub fn capabilities() -> PushCapabilities {
    let Some(window) = web_sys::window() else {
        return PushCapabilities::unsupported();
    };
    let navigator = window.navigator();
    let status = |supported: bool| {
        if supported {
            CapabilityStatus::Available
        } else {
            CapabilityStatus::Unavailable
        }
    };
    let notifications = Reflect::get(&window, &JsValue::from_str("Notification"))
        .ok()
        .filter(|api| !api.is_undefined())
        .and_then(|api| Reflect::get(&api, &JsValue::from_str("permission")).ok())
        .and_then(|permission| permission.as_string());
    let notifications = match notifications.as_deref() {
        Some("granted") => CapabilityStatus::Available,
        Some("default") => CapabilityStatus::RequiresUserActivation,
        _ => CapabilityStatus::Unavailable,
    };

    PushCapabilities {
        service_worker: status(has_field(&navigator, "serviceWorker")),
        push_manager: status(has_field(&window, "PushManager")),
        protocol_handlers: status(has_field(&navigator, "registerProtocolHandler")),
        notifications,
    }
}
