//! `navigator.registerProtocolHandler` adapter.

use push_host::{ProtocolHandlerFuture, ProtocolHandlerService};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Browser protocol-handler registration.
pub struct WebProtocolHandlerService;

impl ProtocolHandlerService for WebProtocolHandlerService {
    fn register_protocol_handler<'a>(
        &'a self,
        scheme: &'a str,
        url: &'a str,
        title: &'a str,
    ) -> ProtocolHandlerFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::register_protocol_handler(scheme, url, title).await })
    }
}
