//! Scripted in-memory service-worker host with an ordered call journal.
//!
//! Each readiness wait hands out the active registration, creating a fresh one (new id) after the
//! previous registration was unregistered. Subscribe outcomes are consumed from a script in call
//! order, which lets tests pin down retry sequences exactly.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use super::service::{PushRegistration, ServiceWorkerFuture, ServiceWorkerHost};
use crate::subscription::{PushSubscription, SubscribeOptions};

/// One observed call against [`MemoryServiceWorkerHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// Worker script registration.
    Register {
        /// Script URL.
        script_url: String,
        /// Registration scope.
        scope: String,
    },
    /// Readiness wait started.
    Ready,
    /// Subscribe call on a registration.
    Subscribe {
        /// Registration id.
        registration: u32,
        /// Requested user-visible-only flag.
        user_visible_only: bool,
        /// Decoded application server key length.
        key_len: usize,
    },
    /// Unregister call on a registration.
    Unregister {
        /// Registration id.
        registration: u32,
    },
}

/// Scripted outcome of one subscribe call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscribeScript {
    /// The platform issues this subscription.
    Accept(PushSubscription),
    /// The platform issues a subscription serialized as this exact text.
    AcceptRaw(String),
    /// The platform rejects the call with this error text.
    Reject(String),
}

/// Scripted outcome of one readiness wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyScript {
    /// A registration becomes ready.
    Resolve,
    /// The readiness signal rejects with this error text.
    Reject(String),
    /// The readiness signal never settles.
    Never,
}

#[derive(Debug, Default)]
struct MemoryHostState {
    calls: Vec<HostCall>,
    subscribe_script: VecDeque<SubscribeScript>,
    ready_script: VecDeque<ReadyScript>,
    register_error: Option<String>,
    next_registration: u32,
    active_registration: Option<u32>,
}

#[derive(Debug, Clone, Default)]
/// In-memory service-worker host driven by scripted outcomes.
pub struct MemoryServiceWorkerHost {
    inner: Rc<RefCell<MemoryHostState>>,
}

impl MemoryServiceWorkerHost {
    /// Builds a host whose subscribe calls settle in `script` order.
    pub fn with_subscribe_script(script: impl IntoIterator<Item = SubscribeScript>) -> Self {
        let host = Self::default();
        host.inner.borrow_mut().subscribe_script = script.into_iter().collect();
        host
    }

    /// Scripts readiness outcomes; once exhausted, readiness resolves.
    pub fn with_ready_script(self, script: impl IntoIterator<Item = ReadyScript>) -> Self {
        self.inner.borrow_mut().ready_script = script.into_iter().collect();
        self
    }

    /// Makes worker registration fail with `error`.
    pub fn with_register_error(self, error: impl Into<String>) -> Self {
        self.inner.borrow_mut().register_error = Some(error.into());
        self
    }

    /// Ordered journal of calls observed so far.
    pub fn calls(&self) -> Vec<HostCall> {
        self.inner.borrow().calls.clone()
    }

    /// Number of subscribe calls observed so far.
    pub fn subscribe_count(&self) -> usize {
        self.count(|call| matches!(call, HostCall::Subscribe { .. }))
    }

    /// Number of unregister calls observed so far.
    pub fn unregister_count(&self) -> usize {
        self.count(|call| matches!(call, HostCall::Unregister { .. }))
    }

    fn count(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.inner.borrow().calls.iter().filter(|call| predicate(call)).count()
    }
}

impl ServiceWorkerHost for MemoryServiceWorkerHost {
    fn register<'a>(
        &'a self,
        script_url: &'a str,
        scope: &'a str,
    ) -> ServiceWorkerFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut state = self.inner.borrow_mut();
            state.calls.push(HostCall::Register {
                script_url: script_url.to_string(),
                scope: scope.to_string(),
            });
            match state.register_error.clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }

    fn ready<'a>(&'a self) -> ServiceWorkerFuture<'a, Result<Rc<dyn PushRegistration>, String>> {
        let script = {
            let mut state = self.inner.borrow_mut();
            state.calls.push(HostCall::Ready);
            state.ready_script.pop_front().unwrap_or(ReadyScript::Resolve)
        };
        match script {
            ReadyScript::Never => {
                Box::pin(futures::future::pending::<Result<Rc<dyn PushRegistration>, String>>())
            }
            ReadyScript::Reject(err) => Box::pin(async move { Err(err) }),
            ReadyScript::Resolve => Box::pin(async move {
                let mut state = self.inner.borrow_mut();
                let id = match state.active_registration {
                    Some(id) => id,
                    None => {
                        state.next_registration += 1;
                        let id = state.next_registration;
                        state.active_registration = Some(id);
                        id
                    }
                };
                let registration: Rc<dyn PushRegistration> = Rc::new(MemoryPushRegistration {
                    id,
                    state: self.inner.clone(),
                });
                Ok(registration)
            }),
        }
    }
}

#[derive(Debug)]
struct MemoryPushRegistration {
    id: u32,
    state: Rc<RefCell<MemoryHostState>>,
}

impl PushRegistration for MemoryPushRegistration {
    fn scope(&self) -> String {
        "/".to_string()
    }

    fn subscribe<'a>(
        &'a self,
        options: &'a SubscribeOptions,
    ) -> ServiceWorkerFuture<'a, Result<String, String>> {
        Box::pin(async move {
            let mut state = self.state.borrow_mut();
            state.calls.push(HostCall::Subscribe {
                registration: self.id,
                user_visible_only: options.user_visible_only,
                key_len: options.application_server_key.len(),
            });
            match state.subscribe_script.pop_front() {
                Some(SubscribeScript::Accept(subscription)) => {
                    subscription.to_json().map_err(|err| err.to_string())
                }
                Some(SubscribeScript::AcceptRaw(raw)) => Ok(raw),
                Some(SubscribeScript::Reject(err)) => Err(err),
                None => Err("no scripted subscribe outcome".to_string()),
            }
        })
    }

    fn unregister<'a>(&'a self) -> ServiceWorkerFuture<'a, Result<bool, String>> {
        Box::pin(async move {
            let mut state = self.state.borrow_mut();
            state.calls.push(HostCall::Unregister {
                registration: self.id,
            });
            if state.active_registration == Some(self.id) {
                state.active_registration = None;
                Ok(true)
            } else {
                Ok(false)
            }
        })
    }
}
