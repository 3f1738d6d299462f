//! Page host-service bundle and capability posture.

use std::rc::Rc;

use crate::{
    cookies::{CookieStore, NoopCookieStore},
    form::{NoopSubmissionForm, SubmissionForm},
    protocol_handler::{NoopProtocolHandlerService, ProtocolHandlerService},
    service_worker::{NoopServiceWorkerHost, ServiceWorkerHost},
    time::{HostTimer, NoopHostTimer},
};

/// Host availability state for one capability domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityStatus {
    /// Capability is available.
    Available,
    /// Capability is not supported on the active host.
    Unavailable,
    /// Capability exists but needs a user permission grant first.
    RequiresUserActivation,
}

impl CapabilityStatus {
    /// Returns whether the capability can be used without further user interaction.
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }

    /// Returns whether the capability exists on this host at all.
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

/// Capability snapshot for the platform features the page relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushCapabilities {
    /// `navigator.serviceWorker` availability.
    pub service_worker: CapabilityStatus,
    /// Push manager availability.
    pub push_manager: CapabilityStatus,
    /// `navigator.registerProtocolHandler` availability.
    pub protocol_handlers: CapabilityStatus,
    /// Notification display permission posture.
    pub notifications: CapabilityStatus,
}

impl PushCapabilities {
    /// Posture of a host with none of the required platform features.
    pub const fn unsupported() -> Self {
        Self {
            service_worker: CapabilityStatus::Unavailable,
            push_manager: CapabilityStatus::Unavailable,
            protocol_handlers: CapabilityStatus::Unavailable,
            notifications: CapabilityStatus::Unavailable,
        }
    }

    /// Whether push subscriptions can be negotiated at all.
    pub const fn push_supported(&self) -> bool {
        self.service_worker.is_supported() && self.push_manager.is_supported()
    }
}

/// Host services injected into the page bootstrap.
///
/// All browser-specific selection happens before this bundle is built, so the bootstrap and
/// negotiator never import adapter types.
#[derive(Clone)]
pub struct PageServices {
    /// Service-worker container.
    pub service_worker: Rc<dyn ServiceWorkerHost>,
    /// Submission form controls.
    pub form: Rc<dyn SubmissionForm>,
    /// Protocol-handler registration.
    pub protocol_handlers: Rc<dyn ProtocolHandlerService>,
    /// Timer for readiness timeouts.
    pub timer: Rc<dyn HostTimer>,
    /// Cookie store.
    pub cookies: Rc<dyn CookieStore>,
    /// Capability posture.
    pub capabilities: PushCapabilities,
}

impl PageServices {
    /// Bundle of no-op services for hosts without a browser document.
    pub fn noop() -> Self {
        Self {
            service_worker: Rc::new(NoopServiceWorkerHost),
            form: Rc::new(NoopSubmissionForm),
            protocol_handlers: Rc::new(NoopProtocolHandlerService),
            timer: Rc::new(NoopHostTimer),
            cookies: Rc::new(NoopCookieStore),
            capabilities: PushCapabilities::unsupported(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_support_needs_worker_and_push_manager() {
        let mut capabilities = PushCapabilities::unsupported();
        assert!(!capabilities.push_supported());
        capabilities.service_worker = CapabilityStatus::Available;
        capabilities.push_manager = CapabilityStatus::RequiresUserActivation;
        assert!(capabilities.push_supported());
        assert!(!capabilities.push_manager.is_available());
    }
}
