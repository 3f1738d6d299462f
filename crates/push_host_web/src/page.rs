//! Page-level wiring: configuration globals, service bundle, and the page context the site drives.

use std::rc::Rc;

use leptos::logging;
use push_host::{
    read_cookie, register_magnet_handler, run_page_bootstrap, settle_form, unsubscribe,
    write_cookie, BootstrapReport, ConfigError, FormFieldIds, NoopServiceWorkerHost, PageServices,
    PushCapabilities, PushConfig, ServiceWorkerHost,
};

use crate::{
    bridge, DomSubmissionForm, WebCookieStore, WebHostTimer, WebProtocolHandlerService,
    WebServiceWorkerHost,
};

/// Window global carrying the application server key.
pub const VAPID_KEY_GLOBAL: &str = "vapidPublicKey";
/// Optional window global carrying a [`PushConfig`] object or JSON string.
pub const PUSH_CONFIG_GLOBAL: &str = "pushConfig";
/// Cookie remembering that the browser accepted the `magnet:` handler.
pub const MAGNET_HANDLER_COOKIE: &str = "magnetHandler";
const MAGNET_HANDLER_COOKIE_DAYS: i64 = 365;

/// Loads the page configuration from the injected window globals.
///
/// A `pushConfig` global overrides the defaults; a blank key inside it falls back to the
/// `vapidPublicKey` global.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for an unreadable `pushConfig` and
/// [`ConfigError::MissingKey`] when no key is available.
pub fn page_config() -> Result<PushConfig, ConfigError> {
    let key = bridge::global_string(VAPID_KEY_GLOBAL).unwrap_or_default();
    let config = bridge::global_push_config(PUSH_CONFIG_GLOBAL).map_err(ConfigError::Invalid)?;
    resolve_config(config, key)
}

fn resolve_config(config: Option<PushConfig>, key: String) -> Result<PushConfig, ConfigError> {
    let mut config = config.unwrap_or_else(|| PushConfig::new(String::new()));
    if config.vapid_public_key.trim().is_empty() {
        config.vapid_public_key = key;
    }
    config.validated()
}

/// Capability posture of the current host, detected from `navigator` and `window`.
pub fn host_capabilities() -> PushCapabilities {
    bridge::capabilities()
}

/// Builds the browser service bundle for a form with `form_ids`.
///
/// Hosts without `navigator.serviceWorker` get the no-op container, so negotiation settles as
/// unavailable instead of touching a missing API.
pub fn build_page_services(form_ids: FormFieldIds) -> PageServices {
    let capabilities = host_capabilities();
    let service_worker: Rc<dyn ServiceWorkerHost> = if capabilities.push_supported() {
        Rc::new(WebServiceWorkerHost)
    } else {
        logging::warn!("push messaging is not supported by this browser");
        Rc::new(NoopServiceWorkerHost)
    };

    PageServices {
        service_worker,
        form: Rc::new(DomSubmissionForm::new(form_ids)),
        protocol_handlers: Rc::new(WebProtocolHandlerService),
        timer: Rc::new(WebHostTimer),
        cookies: Rc::new(WebCookieStore),
        capabilities,
    }
}

/// Configuration, host services, and location of one loaded page.
#[derive(Clone)]
pub struct PageContext {
    config: Result<PushConfig, ConfigError>,
    services: PageServices,
    search: String,
    origin: Option<String>,
}

impl PageContext {
    /// Reads the window globals and location and wires the browser services.
    pub fn load() -> Self {
        let config = page_config();
        let form_ids = config
            .as_ref()
            .map(|config| config.form.clone())
            .unwrap_or_default();
        Self::new(
            config,
            build_page_services(form_ids),
            bridge::location_search(),
            bridge::location_origin(),
        )
    }

    /// Assembles a context from explicit parts.
    pub fn new(
        config: Result<PushConfig, ConfigError>,
        services: PageServices,
        search: impl Into<String>,
        origin: Option<String>,
    ) -> Self {
        Self {
            config,
            services,
            search: search.into(),
            origin,
        }
    }

    /// Loaded configuration, or why it could not be loaded.
    pub fn config(&self) -> Result<&PushConfig, &ConfigError> {
        self.config.as_ref()
    }

    /// Capability posture captured when the services were built.
    pub fn capabilities(&self) -> PushCapabilities {
        self.services.capabilities
    }

    /// Runs the page bootstrap.
    ///
    /// Without a usable configuration the form is still released: the subscription field is left
    /// empty, submit is enabled, and a magnet deep link is applied.
    pub async fn boot(&self) -> Option<BootstrapReport> {
        match &self.config {
            Ok(config) => Some(run_page_bootstrap(config, &self.services, &self.search).await),
            Err(err) => {
                logging::error!("push subscription disabled: {err}");
                settle_form(self.services.form.as_ref(), "", &self.search);
                None
            }
        }
    }

    /// Whether an earlier visit registered the `magnet:` handler.
    pub fn magnet_handler_remembered(&self) -> bool {
        read_cookie(self.services.cookies.as_ref(), MAGNET_HANDLER_COOKIE)
            .map(|value| !value.is_empty())
            .unwrap_or(false)
    }

    /// Offers the page as the `magnet:` handler and remembers the registration in a cookie.
    ///
    /// # Errors
    ///
    /// Returns an error when the page has no origin or the browser refuses the registration.
    pub async fn register_magnet_handler(&self) -> Result<(), String> {
        let origin = self
            .origin
            .as_deref()
            .ok_or_else(|| "page origin unavailable".to_string())?;
        let title = match &self.config {
            Ok(config) => config.protocol_handler_title.clone(),
            Err(_) => PushConfig::new(String::new()).protocol_handler_title,
        };
        register_magnet_handler(self.services.protocol_handlers.as_ref(), origin, &title).await?;
        if let Err(err) = write_cookie(
            self.services.cookies.as_ref(),
            MAGNET_HANDLER_COOKIE,
            "1",
            Some(MAGNET_HANDLER_COOKIE_DAYS),
        ) {
            logging::warn!("remembering magnet handler failed: {err}");
        }
        Ok(())
    }

    /// Unregisters the page's service worker, dropping its push subscription.
    ///
    /// # Errors
    ///
    /// Returns an error when no registration becomes ready or unregistering fails.
    pub async fn unsubscribe(&self) -> Result<bool, String> {
        unsubscribe(self.services.service_worker.as_ref())
            .await
            .inspect(|removed| logging::log!("service worker unregistered: {removed}"))
            .inspect_err(|err| logging::warn!("unsubscribe failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use push_host::{
        FormEvent, MemoryCookieStore, MemoryProtocolHandlerService, MemoryServiceWorkerHost,
        MemorySubmissionForm,
    };

    use super::*;

    fn context(
        config: Result<PushConfig, ConfigError>,
        form: &MemorySubmissionForm,
        handlers: &MemoryProtocolHandlerService,
        cookies: &MemoryCookieStore,
    ) -> PageContext {
        let services = PageServices {
            service_worker: Rc::new(MemoryServiceWorkerHost::default()),
            form: Rc::new(form.clone()),
            protocol_handlers: Rc::new(handlers.clone()),
            cookies: Rc::new(cookies.clone()),
            ..PageServices::noop()
        };
        PageContext::new(
            config,
            services,
            "?magnet=abc123",
            Some("https://torrents.example.org".to_string()),
        )
    }

    #[test]
    fn key_global_fills_missing_config() {
        let config = resolve_config(None, "BAAA".to_string()).expect("config");
        assert_eq!(config, PushConfig::new("BAAA"));
    }

    #[test]
    fn config_global_overrides_defaults_but_borrows_key() {
        let mut injected = PushConfig::new("");
        injected.worker_script_url = "/sw.js".to_string();
        let config = resolve_config(Some(injected), "BAAA".to_string()).expect("config");
        assert_eq!(config.vapid_public_key, "BAAA");
        assert_eq!(config.worker_script_url, "/sw.js");

        let own_key = resolve_config(Some(PushConfig::new("BCCC")), "BAAA".to_string())
            .expect("config");
        assert_eq!(own_key.vapid_public_key, "BCCC");
    }

    #[test]
    fn no_key_anywhere_is_missing() {
        assert_eq!(
            resolve_config(None, String::new()),
            Err(ConfigError::MissingKey)
        );
    }

    #[test]
    fn missing_config_still_releases_the_form() {
        let form = MemorySubmissionForm::default();
        let page = context(
            Err(ConfigError::MissingKey),
            &form,
            &MemoryProtocolHandlerService::default(),
            &MemoryCookieStore::default(),
        );

        assert!(block_on(page.boot()).is_none());
        assert!(form.submit_enabled());
        assert_eq!(form.events().last(), Some(&FormEvent::Submitted));
    }

    #[test]
    fn magnet_handler_registration_is_remembered() {
        let handlers = MemoryProtocolHandlerService::default();
        let cookies = MemoryCookieStore::default();
        let page = context(
            Ok(PushConfig::new("BAAA")),
            &MemorySubmissionForm::default(),
            &handlers,
            &cookies,
        );
        assert!(!page.magnet_handler_remembered());

        block_on(page.register_magnet_handler()).expect("register");

        assert!(page.magnet_handler_remembered());
        assert_eq!(
            handlers.registered(),
            vec![(
                "magnet".to_string(),
                "https://torrents.example.org/?magnet=%s".to_string(),
                "Torrent Submission Handler".to_string(),
            )]
        );
    }

    #[test]
    fn unsubscribe_goes_through_the_service_bundle() {
        let page = context(
            Ok(PushConfig::new("BAAA")),
            &MemorySubmissionForm::default(),
            &MemoryProtocolHandlerService::default(),
            &MemoryCookieStore::default(),
        );
        assert_eq!(block_on(page.unsubscribe()), Ok(true));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_page_has_no_config_and_no_push_support() {
        assert_eq!(page_config(), Err(ConfigError::MissingKey));
        assert!(!host_capabilities().push_supported());
        let page = PageContext::load();
        assert!(page.config().is_err());
        assert!(!page.capabilities().push_supported());
        assert!(block_on(page.register_magnet_handler()).is_err());
        assert!(block_on(page.unsubscribe()).is_err());
    }
}
