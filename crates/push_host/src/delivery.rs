//! Background delivery handler: push payload in, notification request out.
//!
//! This runs in the service-worker context with no state shared with the page. Delivery
//! reliability belongs to the platform, so there is no acknowledgement, retry, or queue here.

use leptos::logging;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notifications::NotificationService;

/// Push message wire format produced by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushNotificationPayload {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Icon resource URL.
    pub icon: String,
}

/// Display options attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    /// Body text.
    pub body: String,
    /// Icon resource URL.
    pub icon: String,
}

/// Request for the platform to display one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Notification title.
    pub title: String,
    /// Display options.
    pub options: NotificationOptions,
}

impl From<PushNotificationPayload> for NotificationRequest {
    fn from(payload: PushNotificationPayload) -> Self {
        Self {
            title: payload.title,
            options: NotificationOptions {
                body: payload.body,
                icon: payload.icon,
            },
        }
    }
}

/// Errors raised while handling a push event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The push event carried no data.
    #[error("push event carried no payload")]
    EmptyPayload,
    /// The payload was not a notification object.
    #[error("malformed push payload: {0}")]
    MalformedPayload(String),
    /// The platform refused to display the notification.
    #[error("notification display failed: {0}")]
    Display(String),
}

/// Maps a raw push payload to the notification the worker should display.
///
/// # Errors
///
/// Returns [`DeliveryError::EmptyPayload`] for an empty payload and
/// [`DeliveryError::MalformedPayload`] when it is not a `{title, body, icon}` object.
pub fn notification_for_push(payload: &[u8]) -> Result<NotificationRequest, DeliveryError> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Err(DeliveryError::EmptyPayload);
    }
    serde_json::from_slice::<PushNotificationPayload>(payload)
        .map(NotificationRequest::from)
        .map_err(|err| DeliveryError::MalformedPayload(err.to_string()))
}

/// Handles one push event end to end.
///
/// # Errors
///
/// Returns [`DeliveryError`] when the payload is unusable or the platform refuses to display the
/// notification; the error is also logged.
pub async fn deliver_push<S: NotificationService + ?Sized>(
    payload: &[u8],
    notifications: &S,
) -> Result<NotificationRequest, DeliveryError> {
    let request = notification_for_push(payload).inspect_err(|err| {
        logging::warn!("dropping push event: {err}");
    })?;
    notifications
        .show(&request)
        .await
        .map_err(DeliveryError::Display)
        .inspect_err(|err| logging::warn!("{err}"))?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::notifications::MemoryNotificationService;

    const PAYLOAD: &str = r#"{"title":"Finished downloading Torrent","body":"Name: ubuntu.iso","icon":"https://torrents.example.org/logo.svg"}"#;

    #[test]
    fn payload_maps_to_notification_fields() {
        let request = notification_for_push(PAYLOAD.as_bytes()).expect("valid payload");
        assert_eq!(request.title, "Finished downloading Torrent");
        assert_eq!(request.options.body, "Name: ubuntu.iso");
        assert_eq!(request.options.icon, "https://torrents.example.org/logo.svg");
    }

    #[test]
    fn delivered_push_is_shown_once() {
        let notifications = MemoryNotificationService::default();
        let request = block_on(deliver_push(PAYLOAD.as_bytes(), &notifications)).expect("deliver");
        assert_eq!(notifications.shown(), vec![request]);
    }

    #[test]
    fn malformed_payload_shows_nothing() {
        let notifications = MemoryNotificationService::default();
        let result = block_on(deliver_push(br#"{"title":"only"}"#, &notifications));
        assert!(matches!(result, Err(DeliveryError::MalformedPayload(_))));
        assert!(notifications.shown().is_empty());
    }

    #[test]
    fn empty_payload_is_distinguished() {
        assert_eq!(notification_for_push(b""), Err(DeliveryError::EmptyPayload));
        assert_eq!(notification_for_push(b"  \n"), Err(DeliveryError::EmptyPayload));
    }
}
