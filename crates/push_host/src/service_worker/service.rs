//! Service-worker and push-manager host-service contracts.

use std::{future::Future, pin::Pin, rc::Rc};

use crate::subscription::SubscribeOptions;

/// Object-safe boxed future used by [`ServiceWorkerHost`] and [`PushRegistration`].
pub type ServiceWorkerFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Platform-owned registration observed through the readiness signal.
pub trait PushRegistration {
    /// Scope URL the registration controls.
    fn scope(&self) -> String;

    /// Requests a push subscription bound to this registration.
    ///
    /// Resolves to the platform's own serialization of the subscription (its `toJSON()` text).
    /// May suspend while the user answers a permission prompt.
    fn subscribe<'a>(
        &'a self,
        options: &'a SubscribeOptions,
    ) -> ServiceWorkerFuture<'a, Result<String, String>>;

    /// Unregisters this registration, dropping any subscription bound to it.
    ///
    /// Resolves to whether the platform reported a registration to remove.
    fn unregister<'a>(&'a self) -> ServiceWorkerFuture<'a, Result<bool, String>>;
}

/// Host service for the page's service-worker container.
pub trait ServiceWorkerHost {
    /// Installs the background worker script for `scope`; idempotent when already registered.
    fn register<'a>(
        &'a self,
        script_url: &'a str,
        scope: &'a str,
    ) -> ServiceWorkerFuture<'a, Result<(), String>>;

    /// Resolves once an active registration exists for the page's scope.
    fn ready<'a>(&'a self) -> ServiceWorkerFuture<'a, Result<Rc<dyn PushRegistration>, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op service-worker host for targets without service-worker support.
pub struct NoopServiceWorkerHost;

impl ServiceWorkerHost for NoopServiceWorkerHost {
    fn register<'a>(
        &'a self,
        _script_url: &'a str,
        _scope: &'a str,
    ) -> ServiceWorkerFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn ready<'a>(&'a self) -> ServiceWorkerFuture<'a, Result<Rc<dyn PushRegistration>, String>> {
        Box::pin(async { Err("service workers are unavailable on this host".to_string()) })
    }
}
