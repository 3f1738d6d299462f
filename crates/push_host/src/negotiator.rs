//! Bounded-retry push subscription handshake.
//!
//! The negotiator waits for a ready service-worker registration, asks it for a user-visible push
//! subscription authorized by the application server key, and on failure unregisters that
//! registration before waiting again. Unregistering is what clears a leftover subscription bound
//! to a different key (after a server key rotation), since the platform refuses to re-subscribe
//! an existing subscription with a new key.
//!
//! Attempts are strictly sequential and capped at [`MAX_SUBSCRIBE_ATTEMPTS`]; exhausting the cap
//! is an ordinary outcome, never an error that blocks the page.

use std::{rc::Rc, time::Duration};

use futures::future::{select, Either};
use leptos::logging;

use crate::{
    config::PushConfig,
    key_codec::{decode_key, ApplicationServerKey, KeyDecodeError},
    service_worker::{PushRegistration, ServiceWorkerHost},
    subscription::{PushSubscription, SubscribeOptions},
    time::HostTimer,
};

/// Upper bound on subscribe attempts per negotiation: one attempt and one retry.
pub const MAX_SUBSCRIBE_ATTEMPTS: u32 = 2;

/// Handshake states, recorded in order in [`NegotiationReport::transitions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    /// Suspended on the platform readiness signal.
    AwaitingRegistration,
    /// Subscribe call in flight.
    Subscribing,
    /// A subscription was obtained.
    Succeeded,
    /// Every attempt failed.
    ExhaustedRetries,
    /// The readiness wait exceeded the configured timeout.
    RegistrationTimeout,
    /// The platform reported that no registration can become ready.
    RegistrationUnavailable,
}

/// One failed subscribe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Platform error text from the subscribe call.
    pub error: String,
    /// Whether the attempt's registration was unregistered successfully.
    pub unregistered: bool,
}

/// Terminal result of one negotiation.
#[derive(Debug, Clone, PartialEq)]
pub enum NegotiationOutcome {
    /// A subscription was obtained.
    Subscribed {
        /// Typed view of the subscription, `None` when the platform text did not parse.
        subscription: Option<PushSubscription>,
        /// Platform serialization handed to the form field unchanged.
        serialized: String,
    },
    /// Every attempt failed.
    ExhaustedRetries {
        /// Error text of the final attempt.
        last_error: String,
    },
    /// The readiness wait timed out.
    RegistrationTimeout {
        /// Configured timeout that elapsed.
        waited: Duration,
    },
    /// The readiness signal rejected.
    RegistrationUnavailable {
        /// Platform error text.
        error: String,
    },
}

/// Diagnostics and result of one negotiation call.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationReport {
    /// Terminal outcome.
    pub outcome: NegotiationOutcome,
    /// Subscribe attempts performed.
    pub attempts: u32,
    /// Failed attempts in order.
    pub failures: Vec<AttemptFailure>,
    /// State transitions in order.
    pub transitions: Vec<NegotiationState>,
}

impl NegotiationReport {
    /// Serialized subscription when one was obtained.
    pub fn serialized_subscription(&self) -> Option<&str> {
        match &self.outcome {
            NegotiationOutcome::Subscribed { serialized, .. } => Some(serialized),
            _ => None,
        }
    }

    /// Whether a subscription was obtained.
    pub fn is_subscribed(&self) -> bool {
        matches!(self.outcome, NegotiationOutcome::Subscribed { .. })
    }
}

enum ReadinessFailure {
    TimedOut(Duration),
    Unavailable(String),
}

/// Drives the subscription handshake for one page load.
#[derive(Debug, Clone)]
pub struct SubscriptionNegotiator {
    options: SubscribeOptions,
    max_attempts: u32,
    registration_timeout: Option<Duration>,
}

impl SubscriptionNegotiator {
    /// Builds a negotiator from page configuration, decoding the application server key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyDecodeError`] when the configured key is malformed; no attempt can succeed
    /// with such a key, so negotiation never starts.
    pub fn new(config: &PushConfig) -> Result<Self, KeyDecodeError> {
        let key = decode_key(&config.vapid_public_key)?;
        if !key.is_uncompressed_p256() {
            logging::warn!(
                "application server key is {} bytes, expected an uncompressed P-256 point",
                key.len()
            );
        }
        Ok(Self::with_key(key).with_registration_timeout(config.registration_timeout()))
    }

    /// Builds a negotiator for an already decoded key.
    pub fn with_key(key: ApplicationServerKey) -> Self {
        Self {
            options: SubscribeOptions::user_visible(key),
            max_attempts: MAX_SUBSCRIBE_ATTEMPTS,
            registration_timeout: None,
        }
    }

    /// Lowers the attempt cap; requests outside `1..=MAX_SUBSCRIBE_ATTEMPTS` are clamped.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.clamp(1, MAX_SUBSCRIBE_ATTEMPTS);
        self
    }

    /// Bounds every readiness wait by `timeout`.
    pub fn with_registration_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.registration_timeout = timeout;
        self
    }

    /// Attempt cap.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs the handshake to a terminal outcome.
    pub async fn negotiate(
        &self,
        host: &dyn ServiceWorkerHost,
        timer: &dyn HostTimer,
    ) -> NegotiationReport {
        let mut transitions = Vec::new();
        let mut failures: Vec<AttemptFailure> = Vec::new();
        let mut attempts = 0;

        while attempts < self.max_attempts {
            transitions.push(NegotiationState::AwaitingRegistration);
            let registration = match self.await_registration(host, timer).await {
                Ok(registration) => registration,
                Err(ReadinessFailure::TimedOut(waited)) => {
                    logging::warn!(
                        "push registration not ready after {} ms",
                        waited.as_millis()
                    );
                    transitions.push(NegotiationState::RegistrationTimeout);
                    return NegotiationReport {
                        outcome: NegotiationOutcome::RegistrationTimeout { waited },
                        attempts,
                        failures,
                        transitions,
                    };
                }
                Err(ReadinessFailure::Unavailable(error)) => {
                    logging::warn!("push registration unavailable: {error}");
                    transitions.push(NegotiationState::RegistrationUnavailable);
                    return NegotiationReport {
                        outcome: NegotiationOutcome::RegistrationUnavailable { error },
                        attempts,
                        failures,
                        transitions,
                    };
                }
            };

            attempts += 1;
            transitions.push(NegotiationState::Subscribing);
            match registration.subscribe(&self.options).await {
                Ok(serialized) => {
                    let subscription = PushSubscription::from_json(&serialized)
                        .inspect_err(|err| {
                            logging::warn!("platform subscription kept as issued: {err}")
                        })
                        .ok();
                    transitions.push(NegotiationState::Succeeded);
                    return NegotiationReport {
                        outcome: NegotiationOutcome::Subscribed {
                            subscription,
                            serialized,
                        },
                        attempts,
                        failures,
                        transitions,
                    };
                }
                Err(error) => {
                    logging::warn!("push subscribe attempt {attempts} failed: {error}");
                    let unregistered = unregister_after_failure(registration.as_ref()).await;
                    failures.push(AttemptFailure {
                        attempt: attempts,
                        error,
                        unregistered,
                    });
                }
            }
        }

        let last_error = failures
            .last()
            .map(|failure| failure.error.clone())
            .unwrap_or_default();
        logging::warn!("push subscription unavailable after {attempts} attempts: {last_error}");
        transitions.push(NegotiationState::ExhaustedRetries);
        NegotiationReport {
            outcome: NegotiationOutcome::ExhaustedRetries { last_error },
            attempts,
            failures,
            transitions,
        }
    }

    async fn await_registration(
        &self,
        host: &dyn ServiceWorkerHost,
        timer: &dyn HostTimer,
    ) -> Result<Rc<dyn PushRegistration>, ReadinessFailure> {
        let ready = host.ready();
        let Some(timeout) = self.registration_timeout else {
            return ready.await.map_err(ReadinessFailure::Unavailable);
        };
        match select(ready, timer.sleep(timeout)).await {
            Either::Left((result, _)) => result.map_err(ReadinessFailure::Unavailable),
            Either::Right(((), _)) => Err(ReadinessFailure::TimedOut(timeout)),
        }
    }
}

async fn unregister_after_failure(registration: &dyn PushRegistration) -> bool {
    match registration.unregister().await {
        Ok(removed) => removed,
        Err(err) => {
            logging::warn!(
                "unregister of push registration {} failed: {err}",
                registration.scope()
            );
            false
        }
    }
}
