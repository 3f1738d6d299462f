use super::*;

fn unsupported() -> String {
    "Browser push APIs are only available when compiled for wasm32".to_string()
}

/// Uninhabited off the browser: readiness never produces a registration.
#[derive(Debug)]
pub enum RegistrationHandle {}

pub async fn register_service_worker(_script_url: &str, _scope: &str) -> Result<(), String> {
    Err(unsupported())
}

pub async fn service_worker_ready() -> Result<RegistrationHandle, String> {
    Err(unsupported())
}

pub fn registration_scope(handle: &RegistrationHandle) -> String {
    match *handle {}
}

pub async fn push_subscribe(
    handle: &RegistrationHandle,
    _user_visible_only: bool,
    _application_server_key: &[u8],
) -> Result<String, String> {
    match *handle {}
}

pub async fn unregister(handle: &RegistrationHandle) -> Result<bool, String> {
    match *handle {}
}

pub async fn show_notification(
    _title: &str,
    _body: Option<&str>,
    _icon: Option<&str>,
) -> Result<(), String> {
    Err(unsupported())
}

pub fn cookie_string() -> Result<String, String> {
    Ok(String::new())
}

pub fn assign_cookie(_cookie: &str) -> Result<(), String> {
    Ok(())
}

pub fn set_input_value(_id: &str, _value: &str) -> Result<(), String> {
    Err(unsupported())
}

pub fn set_text_area_value(_id: &str, _text: &str) -> Result<(), String> {
    Err(unsupported())
}

pub fn set_button_disabled(_id: &str, _disabled: bool) -> Result<(), String> {
    Err(unsupported())
}

pub fn click_element(_id: &str) -> Result<(), String> {
    Err(unsupported())
}

pub async fn register_protocol_handler(
    _scheme: &str,
    _url: &str,
    _title: &str,
) -> Result<(), String> {
    Err(unsupported())
}

pub async fn sleep_ms(_millis: u32) {
    futures::future::pending::<()>().await
}

pub fn global_string(_name: &str) -> Option<String> {
    None
}

pub fn global_push_config(_name: &str) -> Result<Option<PushConfig>, String> {
    Ok(None)
}

pub fn location_search() -> String {
    String::new()
}

pub fn location_origin() -> Option<String> {
    None
}

pub fn capabilities() -> PushCapabilities {
    PushCapabilities::unsupported()
}
