//! Service-worker container and push-manager adapters backed by `navigator.serviceWorker`.

use std::rc::Rc;

use push_host::{PushRegistration, ServiceWorkerFuture, ServiceWorkerHost, SubscribeOptions};

use crate::bridge::{self, RegistrationHandle};

#[derive(Debug, Clone, Copy, Default)]
/// Browser service-worker host backed by `navigator.serviceWorker`.
pub struct WebServiceWorkerHost;

impl ServiceWorkerHost for WebServiceWorkerHost {
    fn register<'a>(
        &'a self,
        script_url: &'a str,
        scope: &'a str,
    ) -> ServiceWorkerFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::register_service_worker(script_url, scope).await })
    }

    fn ready<'a>(&'a self) -> ServiceWorkerFuture<'a, Result<Rc<dyn PushRegistration>, String>> {
        Box::pin(async move {
            let handle = bridge::service_worker_ready().await?;
            Ok(Rc::new(WebPushRegistration { handle }) as Rc<dyn PushRegistration>)
        })
    }
}

#[derive(Debug)]
/// Ready registration returned by [`WebServiceWorkerHost::ready`].
pub struct WebPushRegistration {
    handle: RegistrationHandle,
}

impl PushRegistration for WebPushRegistration {
    fn scope(&self) -> String {
        bridge::registration_scope(&self.handle)
    }

    fn subscribe<'a>(
        &'a self,
        options: &'a SubscribeOptions,
    ) -> ServiceWorkerFuture<'a, Result<String, String>> {
        Box::pin(async move {
            bridge::push_subscribe(
                &self.handle,
                options.user_visible_only,
                options.application_server_key.as_bytes(),
            )
            .await
        })
    }

    fn unregister<'a>(&'a self) -> ServiceWorkerFuture<'a, Result<bool, String>> {
        Box::pin(async move { bridge::unregister(&self.handle).await })
    }
}
