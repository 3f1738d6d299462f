//! Service-worker registration contracts and adapters.

pub mod memory;
pub mod service;

pub use memory::{HostCall, MemoryServiceWorkerHost, ReadyScript, SubscribeScript};
pub use service::{NoopServiceWorkerHost, PushRegistration, ServiceWorkerFuture, ServiceWorkerHost};
