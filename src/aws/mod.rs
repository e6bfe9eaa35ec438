use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

pub mod credentials;
pub mod sts;

const REDACTED: &str = "[REDACTED]";

/// Temporary credential triplet returned to callers.
///
/// The serialized field names are a wire contract shared with existing
/// clients and must stay `access_key_id`, `secret_access_key`, `session_token`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredentials {
    #[serde(rename = "access_key_id")]
    access_key_id: String,
    #[serde(rename = "secret_access_key")]
    secret_access_key: String,
    #[serde(rename = "session_token")]
    session_token: String,
}

impl SessionCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &REDACTED)
            .field("session_token", &REDACTED)
            .finish()
    }
}

/// Long-lived access key pair used to sign the STS request
#[derive(Debug)]
pub struct StaticKeys {
    access_key_id: SecretString,
    secret_access_key: SecretString,
}

impl StaticKeys {
    pub fn new(access_key_id: String, secret_access_key: String) -> Self {
        Self {
            access_key_id: SecretString::new(access_key_id),
            secret_access_key: SecretString::new(secret_access_key),
        }
    }

    pub fn access_key_id(&self) -> &str {
        self.access_key_id.expose_secret()
    }

    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }

    /// Access key id reduced to something safe to log
    pub fn masked_access_key_id(&self) -> String {
        mask(self.access_key_id())
    }
}

/// Keep the first four characters (enough to tell `AKIA` from `ASIA`)
pub(crate) fn mask(value: &str) -> String {
    if value.is_empty() {
        return "<empty>".to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    format!("{prefix}****")
}
