//! Push subscription wire model and subscribe request options.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key_codec::ApplicationServerKey;

/// Errors raised while reading a serialized subscription.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionParseError {
    /// The text was not a subscription JSON object.
    #[error("malformed subscription JSON: {0}")]
    Json(String),
    /// The endpoint was not an absolute http(s) URL.
    #[error("invalid subscription endpoint `{0}`")]
    Endpoint(String),
    /// A required encryption key was empty.
    #[error("subscription key `{0}` is empty")]
    MissingKey(&'static str),
}

/// Client encryption parameters issued alongside a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushSubscriptionKeys {
    /// Client ECDH public key (URL-safe base64).
    pub p256dh: String,
    /// Client authentication secret (URL-safe base64).
    pub auth: String,
}

/// Platform-issued subscription in its `toJSON()` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    /// Push service endpoint the server delivers to.
    pub endpoint: String,
    /// Expiry as unix milliseconds, `null` when the subscription does not expire.
    #[serde(default)]
    pub expiration_time: Option<serde_json::Number>,
    /// Encryption parameters.
    pub keys: PushSubscriptionKeys,
}

impl PushSubscription {
    /// Parses and validates subscription JSON as produced by the platform.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionParseError`] when the JSON is malformed, the endpoint is not an
    /// absolute http(s) URL, or either key is empty.
    pub fn from_json(raw: &str) -> Result<Self, SubscriptionParseError> {
        let subscription: Self =
            serde_json::from_str(raw).map_err(|err| SubscriptionParseError::Json(err.to_string()))?;
        subscription.validate()?;
        Ok(subscription)
    }

    /// Serializes the subscription to the text handed to the form field.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionParseError::Json`] when serialization fails.
    pub fn to_json(&self) -> Result<String, SubscriptionParseError> {
        serde_json::to_string(self).map_err(|err| SubscriptionParseError::Json(err.to_string()))
    }

    fn validate(&self) -> Result<(), SubscriptionParseError> {
        let endpoint = url::Url::parse(&self.endpoint)
            .map_err(|_| SubscriptionParseError::Endpoint(self.endpoint.clone()))?;
        if !matches!(endpoint.scheme(), "https" | "http") {
            return Err(SubscriptionParseError::Endpoint(self.endpoint.clone()));
        }
        if self.keys.p256dh.is_empty() {
            return Err(SubscriptionParseError::MissingKey("p256dh"));
        }
        if self.keys.auth.is_empty() {
            return Err(SubscriptionParseError::MissingKey("auth"));
        }
        Ok(())
    }
}

/// Options passed to the push manager's subscribe call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Every push must produce a user-visible notification.
    pub user_visible_only: bool,
    /// Decoded application server key authorizing pushes to this origin.
    pub application_server_key: ApplicationServerKey,
}

impl SubscribeOptions {
    /// Builds user-visible-only options for `key`.
    pub fn user_visible(key: ApplicationServerKey) -> Self {
        Self {
            user_visible_only: true,
            application_server_key: key,
        }
    }
}
