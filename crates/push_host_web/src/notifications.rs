//! Worker-scope notification adapter backed by `registration.showNotification`.

use push_host::{NotificationFuture, NotificationRequest, NotificationService};

use crate::bridge;

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}

#[derive(Debug, Clone, Copy, Default)]
/// Notification service for the service-worker global scope.
pub struct WebNotificationService;

impl NotificationService for WebNotificationService {
    fn show<'a>(
        &'a self,
        request: &'a NotificationRequest,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            bridge::show_notification(
                &request.title,
                non_empty(&request.options.body),
                non_empty(&request.options.icon),
            )
            .await
            .map_err(|err| format!("notification dispatch failed: {err}"))
        })
    }
}
