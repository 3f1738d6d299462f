//! `magnet:` protocol-handler registration contracts.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use leptos::logging;

use crate::deep_link::MAGNET_QUERY_KEY;

/// Scheme the page offers to handle.
pub const MAGNET_SCHEME: &str = "magnet";

/// Object-safe boxed future used by [`ProtocolHandlerService`].
pub type ProtocolHandlerFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for registering the page as a URL scheme handler.
pub trait ProtocolHandlerService {
    /// Registers `url` (containing a `%s` placeholder) as the handler for `scheme`.
    fn register_protocol_handler<'a>(
        &'a self,
        scheme: &'a str,
        url: &'a str,
        title: &'a str,
    ) -> ProtocolHandlerFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op protocol-handler service for unsupported targets.
pub struct NoopProtocolHandlerService;

impl ProtocolHandlerService for NoopProtocolHandlerService {
    fn register_protocol_handler<'a>(
        &'a self,
        _scheme: &'a str,
        _url: &'a str,
        _title: &'a str,
    ) -> ProtocolHandlerFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory protocol-handler service recording `(scheme, url, title)` registrations.
pub struct MemoryProtocolHandlerService {
    registered: Rc<RefCell<Vec<(String, String, String)>>>,
}

impl MemoryProtocolHandlerService {
    /// Registrations recorded so far.
    pub fn registered(&self) -> Vec<(String, String, String)> {
        self.registered.borrow().clone()
    }
}

impl ProtocolHandlerService for MemoryProtocolHandlerService {
    fn register_protocol_handler<'a>(
        &'a self,
        scheme: &'a str,
        url: &'a str,
        title: &'a str,
    ) -> ProtocolHandlerFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.registered
                .borrow_mut()
                .push((scheme.to_string(), url.to_string(), title.to_string()));
            Ok(())
        })
    }
}

/// Handler URL for `origin`: `<origin>/?magnet=%s`.
pub fn magnet_handler_url(origin: &str) -> String {
    format!("{}/?{MAGNET_QUERY_KEY}=%s", origin.trim_end_matches('/'))
}

/// Registers the page at `origin` as the `magnet:` handler, logging any failure.
///
/// # Errors
///
/// Returns the host error text when registration is refused.
pub async fn register_magnet_handler<S: ProtocolHandlerService + ?Sized>(
    service: &S,
    origin: &str,
    title: &str,
) -> Result<(), String> {
    let url = magnet_handler_url(origin);
    service
        .register_protocol_handler(MAGNET_SCHEME, &url, title)
        .await
        .inspect_err(|err| logging::warn!("magnet protocol handler registration failed: {err}"))
}
