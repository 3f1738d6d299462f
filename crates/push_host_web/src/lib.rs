//! Browser (`wasm32`) implementations of [`push_host`] service contracts.
//!
//! This crate wires the push handshake to the live browser: the service-worker container, the
//! push manager, worker-scope notifications, `document.cookie`, the submission form's DOM
//! controls, `navigator.registerProtocolHandler`, and `setTimeout`. On native targets every bridge
//! call routes to an "unsupported" shim so the crate still builds and tests.
//!
//! Bridge bindings live under `bridge/`:
//! - `bridge::interop` (shared wasm/non-wasm transport glue)

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod bridge;
pub mod cookies;
pub mod form;
pub mod notifications;
pub mod page;
pub mod protocol_handler;
pub mod service_worker;
pub mod timer;
pub mod worker;

pub use cookies::WebCookieStore;
pub use form::DomSubmissionForm;
pub use notifications::WebNotificationService;
pub use page::{
    build_page_services, host_capabilities, page_config, PageContext, MAGNET_HANDLER_COOKIE,
    PUSH_CONFIG_GLOBAL, VAPID_KEY_GLOBAL,
};
pub use protocol_handler::WebProtocolHandlerService;
pub use service_worker::{WebPushRegistration, WebServiceWorkerHost};
pub use timer::WebHostTimer;
pub use worker::handle_push_payload;
