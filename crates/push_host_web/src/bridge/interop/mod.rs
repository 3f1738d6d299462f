//! Shared transport interop for the browser push bridge.
//!
//! Routes calls to target-specific implementations so adapters see one API on every target.

use push_host::{PushCapabilities, PushConfig};

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub use imp::RegistrationHandle;

pub async fn register_service_worker(script_url: &str, scope: &str) -> Result<(), String> {
    imp::register_service_worker(script_url, scope).await
}

pub async fn service_worker_ready() -> Result<RegistrationHandle, String> {
    imp::service_worker_ready().await
}

pub fn registration_scope(handle: &RegistrationHandle) -> String {
    imp::registration_scope(handle)
}

pub async fn push_subscribe(
    handle: &RegistrationHandle,
    user_visible_only: bool,
    application_server_key: &[u8],
) -> Result<String, String> {
    imp::push_subscribe(handle, user_visible_only, application_server_key).await
}

pub async fn unregister(handle: &RegistrationHandle) -> Result<bool, String> {
    imp::unregister(handle).await
}

pub async fn show_notification(
    title: &str,
    body: Option<&str>,
    icon: Option<&str>,
) -> Result<(), String> {
    imp::show_notification(title, body, icon).await
}

pub fn cookie_string() -> Result<String, String> {
    imp::cookie_string()
}

pub fn assign_cookie(cookie: &str) -> Result<(), String> {
    imp::assign_cookie(cookie)
}

pub fn set_input_value(id: &str, value: &str) -> Result<(), String> {
    imp::set_input_value(id, value)
}

pub fn set_text_area_value(id: &str, text: &str) -> Result<(), String> {
    imp::set_text_area_value(id, text)
}

pub fn set_button_disabled(id: &str, disabled: bool) -> Result<(), String> {
    imp::set_button_disabled(id, disabled)
}

pub fn click_element(id: &str) -> Result<(), String> {
    imp::click_element(id)
}

pub async fn register_protocol_handler(scheme: &str, url: &str, title: &str) -> Result<(), String> {
    imp::register_protocol_handler(scheme, url, title).await
}

pub async fn sleep_ms(millis: u32) {
    imp::sleep_ms(millis).await
}

pub fn global_string(name: &str) -> Option<String> {
    imp::global_string(name)
}

pub fn global_push_config(name: &str) -> Result<Option<PushConfig>, String> {
    imp::global_push_config(name)
}

pub fn location_search() -> String {
    imp::location_search()
}

pub fn location_origin() -> Option<String> {
    imp::location_origin()
}

pub fn capabilities() -> PushCapabilities {
    imp::capabilities()
}
