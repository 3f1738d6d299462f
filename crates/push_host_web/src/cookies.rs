//! `document.cookie`-backed cookie store.

use push_host::CookieStore;

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Browser cookie store backed by `document.cookie`.
pub struct WebCookieStore;

impl CookieStore for WebCookieStore {
    fn cookie_string(&self) -> Result<String, String> {
        bridge::cookie_string()
    }

    fn assign(&self, cookie: &str) -> Result<(), String> {
        bridge::assign_cookie(cookie)
    }
}
