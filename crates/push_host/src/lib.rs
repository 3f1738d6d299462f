//! Typed host contracts and the push-subscription handshake shared by browser adapters.
//!
//! This crate is the host-agnostic boundary for the submission page. It owns the application
//! server key codec, the bounded-retry subscription negotiator, the background delivery handler,
//! and the page bootstrap sequence, all expressed against object-safe service traits. Concrete
//! browser adapters live in `push_host_web`; in-memory adapters here drive the native test suite.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod bootstrap;
pub mod config;
pub mod cookies;
pub mod deep_link;
pub mod delivery;
pub mod form;
pub mod host;
pub mod key_codec;
pub mod negotiator;
pub mod notifications;
pub mod protocol_handler;
pub mod service_worker;
pub mod subscription;
pub mod time;

pub use bootstrap::{register_worker, run_page_bootstrap, settle_form, unsubscribe, BootstrapReport};
pub use config::{ConfigError, FormFieldIds, PushConfig};
pub use cookies::{
    find_cookie, format_cookie, read_cookie, write_cookie, write_cookie_at, CookieStore,
    MemoryCookieStore, NoopCookieStore,
};
pub use deep_link::{magnet_from_query, magnet_links, MAGNET_QUERY_KEY};
pub use delivery::{
    deliver_push, notification_for_push, DeliveryError, NotificationOptions, NotificationRequest,
    PushNotificationPayload,
};
pub use form::{FormEvent, MemorySubmissionForm, NoopSubmissionForm, SubmissionForm};
pub use host::{CapabilityStatus, PageServices, PushCapabilities};
pub use key_codec::{decode_key, encode_key, ApplicationServerKey, KeyDecodeError};
pub use negotiator::{
    AttemptFailure, NegotiationOutcome, NegotiationReport, NegotiationState,
    SubscriptionNegotiator, MAX_SUBSCRIBE_ATTEMPTS,
};
pub use notifications::{
    MemoryNotificationService, NotificationFuture, NotificationService,
};
pub use protocol_handler::{
    magnet_handler_url, register_magnet_handler, MemoryProtocolHandlerService,
    NoopProtocolHandlerService, ProtocolHandlerFuture, ProtocolHandlerService, MAGNET_SCHEME,
};
pub use service_worker::{
    HostCall, MemoryServiceWorkerHost, NoopServiceWorkerHost, PushRegistration, ReadyScript,
    ServiceWorkerFuture, ServiceWorkerHost, SubscribeScript,
};
pub use subscription::{
    PushSubscription, PushSubscriptionKeys, SubscribeOptions, SubscriptionParseError,
};
pub use time::{unix_time_ms_now, HostTimer, ImmediateTimer, NoopHostTimer, TimerFuture};
