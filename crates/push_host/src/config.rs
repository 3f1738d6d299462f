//! Page configuration for worker registration, negotiation, and form binding.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default service-worker script served from the site root.
pub const DEFAULT_WORKER_SCRIPT_URL: &str = "/worker.js";
/// Default service-worker registration scope.
pub const DEFAULT_WORKER_SCOPE: &str = "/";
/// Default label shown by the browser for the `magnet:` protocol handler.
pub const DEFAULT_PROTOCOL_HANDLER_TITLE: &str = "Torrent Submission Handler";

/// DOM element IDs the page bootstrap writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormFieldIds {
    /// Text area receiving deep-linked magnet links.
    pub magnets: String,
    /// Submit control; starts disabled and is enabled once negotiation settles.
    pub add: String,
    /// Input receiving the serialized push subscription.
    pub subscription: String,
}

impl Default for FormFieldIds {
    fn default() -> Self {
        Self {
            magnets: "magnets".to_string(),
            add: "add".to_string(),
            subscription: "subscription".to_string(),
        }
    }
}

/// Configuration errors raised while loading [`PushConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The application server key was absent or blank.
    #[error("application server key is missing")]
    MissingKey,
    /// The configuration JSON could not be parsed.
    #[error("invalid push configuration: {0}")]
    Invalid(String),
}

/// Set-once page configuration consumed by the negotiator and bootstrap.
///
/// Keys follow the page-global convention (`vapidPublicKey`, `registrationTimeoutMs`). The
/// subscribe attempt cap is not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushConfig {
    /// URL-safe base64 application server (VAPID) public key.
    #[serde(default)]
    pub vapid_public_key: String,
    /// Service-worker script URL.
    #[serde(default = "default_worker_script_url")]
    pub worker_script_url: String,
    /// Service-worker registration scope.
    #[serde(default = "default_worker_scope")]
    pub worker_scope: String,
    /// Optional readiness timeout; `None` waits indefinitely.
    #[serde(default)]
    pub registration_timeout_ms: Option<u64>,
    /// Label for the `magnet:` protocol handler.
    #[serde(default = "default_protocol_handler_title")]
    pub protocol_handler_title: String,
    /// Form element IDs.
    #[serde(default)]
    pub form: FormFieldIds,
}

fn default_worker_script_url() -> String {
    DEFAULT_WORKER_SCRIPT_URL.to_string()
}

fn default_worker_scope() -> String {
    DEFAULT_WORKER_SCOPE.to_string()
}

fn default_protocol_handler_title() -> String {
    DEFAULT_PROTOCOL_HANDLER_TITLE.to_string()
}

impl PushConfig {
    /// Builds a configuration with defaults for everything but the key.
    pub fn new(vapid_public_key: impl Into<String>) -> Self {
        Self {
            vapid_public_key: vapid_public_key.into(),
            worker_script_url: default_worker_script_url(),
            worker_scope: default_worker_scope(),
            registration_timeout_ms: None,
            protocol_handler_title: default_protocol_handler_title(),
            form: FormFieldIds::default(),
        }
    }

    /// Parses a JSON configuration document, filling defaults.
    ///
    /// The key may still be blank; call [`PushConfig::validated`] once every key source has been
    /// consulted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Checks the set-once invariants of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] when the key is blank.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.vapid_public_key.trim().is_empty() {
            return Err(ConfigError::MissingKey);
        }
        Ok(self)
    }

    /// Readiness timeout as a [`Duration`], when configured.
    pub fn registration_timeout(&self) -> Option<Duration> {
        self.registration_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_config_fills_defaults() {
        let config = PushConfig::from_json(r#"{"vapidPublicKey":"BAAA"}"#)
            .and_then(PushConfig::validated)
            .expect("parse");
        assert_eq!(config, PushConfig::new("BAAA"));
        assert_eq!(config.form.add, "add");
        assert_eq!(config.registration_timeout(), None);
    }

    #[test]
    fn json_config_uses_camel_case_keys() {
        let config = PushConfig::from_json(
            r#"{"vapidPublicKey":"BAAA","registrationTimeoutMs":1500,"workerScriptUrl":"/sw.js","form":{"add":"submit"}}"#,
        )
        .expect("parse");
        assert_eq!(config.form.add, "submit");
        assert_eq!(config.form.magnets, "magnets");
        assert_eq!(config.worker_script_url, "/sw.js");
        assert_eq!(config.registration_timeout(), Some(Duration::from_millis(1500)));

        let snake = PushConfig::from_json(r#"{"vapid_public_key":"BAAA"}"#).expect("parse");
        assert_eq!(snake.vapid_public_key, "");
    }

    #[test]
    fn attempt_cap_is_not_a_config_field() {
        let config =
            PushConfig::from_json(r#"{"vapidPublicKey":"BAAA","maxAttempts":7}"#).expect("parse");
        let rendered = serde_json::to_string(&config).expect("serialize");
        assert!(!rendered.contains("ttempts"));
    }

    #[test]
    fn blank_key_is_rejected() {
        assert_eq!(
            PushConfig::from_json(r#"{"vapidPublicKey":"  "}"#).and_then(PushConfig::validated),
            Err(ConfigError::MissingKey)
        );
        assert_eq!(
            PushConfig::from_json("{}").and_then(PushConfig::validated),
            Err(ConfigError::MissingKey)
        );
        assert!(matches!(
            PushConfig::from_json("{"),
            Err(ConfigError::Invalid(_))
        ));
    }
}
