//! Client-side submission page and the push worker entry.
//!
//! The page is the `site_app` binary. The background worker is a second bundle built from this
//! library with `wasm-bindgen --target no-modules`, which exposes the global `wasm_bindgen` that
//! `assets/worker.js` loads through `importScripts`:
//!
//! ```text
//! cargo build -p site --lib --release --target wasm32-unknown-unknown
//! wasm-bindgen --target no-modules --out-dir dist/pkg --out-name site \
//!     target/wasm32-unknown-unknown/release/site.wasm
//! cp crates/site/assets/worker.js dist/worker.js
//! ```
//!
//! `worker.js` must be served from the site root so its default scope (`/`) covers the page.

mod web_app;

pub use web_app::{SiteApp, SubmissionPage};

/// Script served as the service worker; loads the `no-modules` bundle from `/pkg/`.
pub const WORKER_SCRIPT: &str = include_str!("../assets/worker.js");

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub fn mount() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(|| leptos::view! { <SiteApp /> })
}

/// Worker-side entry called by `worker.js` for each `push` event payload.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub async fn handle_push(payload: String) -> Result<(), wasm_bindgen::JsValue> {
    push_host_web::handle_push_payload(payload.as_bytes())
        .await
        .map_err(|err| wasm_bindgen::JsValue::from_str(&err))
}
