//! Page bootstrap: worker registration, negotiation, and form settlement.
//!
//! Whatever the negotiation outcome, the subscription field is written and the submit control is
//! enabled; push notifications are optional for the page. A deep-linked magnet is applied only
//! after the control is enabled.
//!
//! Worker installation races the negotiation: a failed install means no registration will ever
//! become ready, so it ends the negotiation as unavailable instead of leaving the form waiting.

use futures::{
    future::{select, Either},
    pin_mut,
};
use leptos::logging;

use crate::{
    config::PushConfig,
    deep_link::magnet_from_query,
    form::SubmissionForm,
    host::PageServices,
    key_codec::KeyDecodeError,
    negotiator::{NegotiationOutcome, NegotiationReport, NegotiationState, SubscriptionNegotiator},
    service_worker::ServiceWorkerHost,
};

/// Observable result of one page bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapReport {
    /// Result of installing the background worker.
    pub worker_registration: Result<(), String>,
    /// Negotiation report, or the key error that prevented negotiation.
    pub negotiation: Result<NegotiationReport, KeyDecodeError>,
    /// Value written to the subscription field.
    pub subscription_value: String,
    /// Deep-linked magnet applied to the text area.
    pub deep_link_magnet: Option<String>,
}

/// Installs the background worker, logging a failure instead of propagating it.
///
/// # Errors
///
/// Returns the host error text when registration fails.
pub async fn register_worker(
    host: &dyn ServiceWorkerHost,
    config: &PushConfig,
) -> Result<(), String> {
    host.register(&config.worker_script_url, &config.worker_scope)
        .await
        .inspect_err(|err| {
            logging::warn!(
                "service worker registration of {} failed: {err}",
                config.worker_script_url
            )
        })
}

/// Runs worker registration and negotiation, then settles the form.
///
/// `search` is the page's location search string, used for the magnet deep link.
pub async fn run_page_bootstrap(
    config: &PushConfig,
    services: &PageServices,
    search: &str,
) -> BootstrapReport {
    let host = services.service_worker.as_ref();
    let (worker_registration, negotiation) = match SubscriptionNegotiator::new(config) {
        Ok(negotiator) => {
            let (worker_registration, report) =
                install_and_negotiate(&negotiator, config, services).await;
            (worker_registration, Ok(report))
        }
        Err(err) => {
            logging::error!("push subscription disabled, bad application server key: {err}");
            (register_worker(host, config).await, Err(err))
        }
    };

    let subscription_value = negotiation
        .as_ref()
        .ok()
        .and_then(NegotiationReport::serialized_subscription)
        .unwrap_or_default()
        .to_string();
    let deep_link_magnet = settle_form(services.form.as_ref(), &subscription_value, search);

    if subscription_value.is_empty() {
        logging::log!("push notifications unavailable for this page");
    } else {
        logging::log!("push subscription ready");
    }

    BootstrapReport {
        worker_registration,
        negotiation,
        subscription_value,
        deep_link_magnet,
    }
}

async fn install_and_negotiate(
    negotiator: &SubscriptionNegotiator,
    config: &PushConfig,
    services: &PageServices,
) -> (Result<(), String>, NegotiationReport) {
    let host = services.service_worker.as_ref();
    let install = register_worker(host, config);
    let negotiation = negotiator.negotiate(host, services.timer.as_ref());
    pin_mut!(install, negotiation);

    match select(install, negotiation).await {
        Either::Left((Ok(()), negotiation)) => (Ok(()), negotiation.await),
        Either::Left((Err(error), _abandoned)) => {
            let report = NegotiationReport {
                outcome: NegotiationOutcome::RegistrationUnavailable {
                    error: format!("service worker registration failed: {error}"),
                },
                attempts: 0,
                failures: Vec::new(),
                transitions: vec![
                    NegotiationState::AwaitingRegistration,
                    NegotiationState::RegistrationUnavailable,
                ],
            };
            (Err(error), report)
        }
        Either::Right((report, install)) => (install.await, report),
    }
}

/// Writes the subscription value, enables submit, then applies a magnet deep link.
///
/// Returns the applied magnet, if any. Form errors are logged; they never stop later steps.
pub fn settle_form(
    form: &dyn SubmissionForm,
    subscription_value: &str,
    search: &str,
) -> Option<String> {
    if let Err(err) = form.set_subscription(subscription_value) {
        logging::warn!("subscription field update failed: {err}");
    }
    if let Err(err) = form.set_submit_enabled(true) {
        logging::error!("submit control could not be enabled: {err}");
    }

    let magnet = magnet_from_query(search)?;
    if let Err(err) = form.set_magnets(&magnet) {
        logging::warn!("magnet field update failed: {err}");
    }
    if let Err(err) = form.trigger_submit() {
        logging::warn!("deep-link submission failed: {err}");
    }
    Some(magnet)
}

/// Waits for the ready registration and unregisters it.
///
/// # Errors
///
/// Returns the host error text when readiness or unregistering fails.
pub async fn unsubscribe(host: &dyn ServiceWorkerHost) -> Result<bool, String> {
    let registration = host.ready().await?;
    registration.unregister().await
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::{executor::block_on, FutureExt};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        form::{FormEvent, MemorySubmissionForm},
        negotiator::NegotiationOutcome,
        service_worker::{HostCall, MemoryServiceWorkerHost, ReadyScript, SubscribeScript},
        subscription::{PushSubscription, PushSubscriptionKeys},
    };

    const KEY: &str =
        "BEl62iUYgUivxIkv69yViEuiBIa-Ib9-SkvMeAtA3LFgDzkrxZJjSgSnfckjBJuBkr3qBUYIHBQFLXYp5Nksh8U";

    fn accepted(endpoint: &str) -> SubscribeScript {
        SubscribeScript::Accept(PushSubscription {
            endpoint: endpoint.to_string(),
            expiration_time: None,
            keys: PushSubscriptionKeys {
                p256dh: "BNcR".to_string(),
                auth: "tBHI".to_string(),
            },
        })
    }

    fn services(host: &MemoryServiceWorkerHost, form: &MemorySubmissionForm) -> PageServices {
        PageServices {
            service_worker: Rc::new(host.clone()),
            form: Rc::new(form.clone()),
            ..PageServices::noop()
        }
    }

    #[test]
    fn success_fills_subscription_and_enables_submit() {
        let host = MemoryServiceWorkerHost::with_subscribe_script([accepted(
            "https://push.example.net/send/k",
        )]);
        let form = MemorySubmissionForm::default();

        let report = block_on(run_page_bootstrap(
            &PushConfig::new(KEY),
            &services(&host, &form),
            "",
        ));

        assert_eq!(
            host.calls()[0],
            HostCall::Register {
                script_url: "/worker.js".to_string(),
                scope: "/".to_string(),
            }
        );
        assert_eq!(host.unregister_count(), 0);
        assert_eq!(report.worker_registration, Ok(()));
        let stored = form.subscription().expect("subscription written");
        assert!(stored.contains("https://push.example.net/send/k"));
        assert_eq!(stored, report.subscription_value);
        assert!(form.submit_enabled());
        assert_eq!(report.deep_link_magnet, None);
    }

    #[test]
    fn retry_after_failure_uses_second_result() {
        let host = MemoryServiceWorkerHost::with_subscribe_script([
            SubscribeScript::Reject("InvalidStateError".to_string()),
            accepted("https://push.example.net/second"),
        ]);
        let form = MemorySubmissionForm::default();

        let report = block_on(run_page_bootstrap(
            &PushConfig::new(KEY),
            &services(&host, &form),
            "",
        ));

        let calls = host.calls();
        let subscribes: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, call)| matches!(call, HostCall::Subscribe { .. }))
            .map(|(index, _)| index)
            .collect();
        assert_eq!(subscribes.len(), 2);
        let between = &calls[subscribes[0]..subscribes[1]];
        assert_eq!(
            between
                .iter()
                .filter(|call| matches!(call, HostCall::Unregister { .. }))
                .count(),
            1
        );
        assert!(report.subscription_value.contains("/second"));
    }

    #[test]
    fn exhausted_retries_leave_field_empty_and_submit_enabled() {
        let host = MemoryServiceWorkerHost::with_subscribe_script([
            SubscribeScript::Reject("NotAllowedError".to_string()),
            SubscribeScript::Reject("NotAllowedError".to_string()),
        ]);
        let form = MemorySubmissionForm::default();

        let report = block_on(run_page_bootstrap(
            &PushConfig::new(KEY),
            &services(&host, &form),
            "",
        ));

        assert_eq!(host.unregister_count(), 2);
        assert_eq!(
            form.events(),
            vec![
                FormEvent::Subscription(String::new()),
                FormEvent::SubmitEnabled(true),
            ]
        );
        assert!(matches!(
            report.negotiation.map(|n| n.outcome),
            Ok(NegotiationOutcome::ExhaustedRetries { .. })
        ));
    }

    #[test]
    fn deep_link_submits_only_after_enabling() {
        let host = MemoryServiceWorkerHost::with_subscribe_script([accepted(
            "https://push.example.net/a",
        )]);
        let form = MemorySubmissionForm::default();

        let report = block_on(run_page_bootstrap(
            &PushConfig::new(KEY),
            &services(&host, &form),
            "?magnet=abc123",
        ));

        let events = form.events();
        assert_eq!(
            events[1..].to_vec(),
            vec![
                FormEvent::SubmitEnabled(true),
                FormEvent::Magnets("abc123".to_string()),
                FormEvent::Submitted,
            ]
        );
        assert_eq!(form.magnets(), Some("abc123".to_string()));
        assert_eq!(report.deep_link_magnet, Some("abc123".to_string()));
    }

    #[test]
    fn bad_key_still_releases_the_form() {
        let host = MemoryServiceWorkerHost::default();
        let form = MemorySubmissionForm::default();

        let report = block_on(run_page_bootstrap(
            &PushConfig::new("@@@"),
            &services(&host, &form),
            "?magnet=abc123",
        ));

        assert!(report.negotiation.is_err());
        assert_eq!(host.subscribe_count(), 0);
        assert!(form.submit_enabled());
        assert_eq!(form.subscription(), Some(String::new()));
        assert_eq!(form.events().last(), Some(&FormEvent::Submitted));
    }

    #[test]
    fn unavailable_registration_and_failed_worker_install_keep_page_usable() {
        let host = MemoryServiceWorkerHost::default()
            .with_register_error("SecurityError: insecure origin")
            .with_ready_script([ReadyScript::Reject("InvalidStateError".to_string())]);
        let form = MemorySubmissionForm::default();

        let report = block_on(run_page_bootstrap(
            &PushConfig::new(KEY),
            &services(&host, &form),
            "",
        ));

        assert_eq!(
            report.worker_registration,
            Err("SecurityError: insecure origin".to_string())
        );
        assert!(form.submit_enabled());
        assert_eq!(report.subscription_value, "");
    }

    #[test]
    fn failed_install_releases_form_while_readiness_hangs() {
        let host = MemoryServiceWorkerHost::default()
            .with_register_error("SecurityError: insecure origin")
            .with_ready_script([ReadyScript::Never]);
        let form = MemorySubmissionForm::default();

        let report = run_page_bootstrap(&PushConfig::new(KEY), &services(&host, &form), "?magnet=m1")
            .now_or_never()
            .expect("bootstrap settles without a ready registration");

        assert!(form.submit_enabled());
        assert_eq!(form.subscription(), Some(String::new()));
        assert_eq!(report.deep_link_magnet, Some("m1".to_string()));
        assert_eq!(host.subscribe_count(), 0);
        assert_eq!(
            report.negotiation.map(|n| n.outcome),
            Ok(NegotiationOutcome::RegistrationUnavailable {
                error: "service worker registration failed: SecurityError: insecure origin"
                    .to_string()
            })
        );
    }

    #[test]
    fn unsubscribe_unregisters_ready_registration() {
        let host = MemoryServiceWorkerHost::default();
        assert_eq!(block_on(unsubscribe(&host)), Ok(true));
        assert_eq!(
            host.calls(),
            vec![HostCall::Ready, HostCall::Unregister { registration: 1 }]
        );
    }
}
