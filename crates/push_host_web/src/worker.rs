//! Background worker entry: push payloads in, worker-scope notifications out.
//!
//! The worker script attaches the `push` listener synchronously during its first evaluation and
//! forwards each payload here once the module has loaded.

use leptos::logging;
use push_host::deliver_push;

use crate::notifications::WebNotificationService;

/// Handles one push payload, displaying its notification from the worker scope.
///
/// # Errors
///
/// Returns the delivery error text when the payload is unusable or display is refused.
pub async fn handle_push_payload(payload: &[u8]) -> Result<(), String> {
    let request = deliver_push(payload, &WebNotificationService)
        .await
        .map_err(|err| err.to_string())?;
    logging::log!("displayed push notification: {}", request.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn malformed_payload_is_rejected_before_display() {
        let err = block_on(handle_push_payload(b"not json")).expect_err("malformed");
        assert!(err.starts_with("malformed push payload"));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert_eq!(
            block_on(handle_push_payload(b"")),
            Err("push event carried no payload".to_string())
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_display_is_refused() {
        let payload = br#"{"title":"Finished downloading Torrent","body":"","icon":""}"#;
        let err = block_on(handle_push_payload(payload)).expect_err("native");
        assert!(err.starts_with("notification display failed"));
    }
}
