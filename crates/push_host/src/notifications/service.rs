//! Notification service contract and an in-memory adapter.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use crate::delivery::NotificationRequest;

/// Object-safe boxed future used by [`NotificationService`].
pub type NotificationFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for user-visible notifications raised by the background worker.
pub trait NotificationService {
    /// Asks the platform to display `request`.
    fn show<'a>(
        &'a self,
        request: &'a NotificationRequest,
    ) -> NotificationFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Default)]
/// In-memory notification service that records every displayed request.
pub struct MemoryNotificationService {
    shown: Rc<RefCell<Vec<NotificationRequest>>>,
}

impl MemoryNotificationService {
    /// Requests displayed so far, in order.
    pub fn shown(&self) -> Vec<NotificationRequest> {
        self.shown.borrow().clone()
    }
}

impl NotificationService for MemoryNotificationService {
    fn show<'a>(
        &'a self,
        request: &'a NotificationRequest,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.shown.borrow_mut().push(request.clone());
            Ok(())
        })
    }
}
