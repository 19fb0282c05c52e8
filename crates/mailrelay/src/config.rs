//! Sender configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Credentials and greeting identity for a [`Sender`](crate::Sender).
///
/// Immutable once built. Deserializes from the same shape it serializes to:
///
/// ```json
/// { "username": "mailer@example.com", "password": "app-password", "local_name": "web-01.example.com" }
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderConfig {
    username: String,
    password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_name: Option<String>,
}

impl SenderConfig {
    /// Creates a configuration without a local name; the protocol default is used.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            local_name: None,
        }
    }

    /// Sets the identity announced in the EHLO/HELO greeting.
    #[must_use]
    pub fn with_local_name(mut self, local_name: impl Into<String>) -> Self {
        self.local_name = Some(local_name.into());
        self
    }

    /// Returns the AUTH username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the AUTH password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the configured greeting identity; an empty string counts as unset.
    #[must_use]
    pub fn local_name(&self) -> Option<&str> {
        self.local_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Checks the credentials are present.
    ///
    /// # Errors
    ///
    /// Returns the first missing field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::MissingUsername);
        }
        if self.password.is_empty() {
            return Err(ConfigError::MissingPassword);
        }
        Ok(())
    }
}

impl fmt::Debug for SenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("local_name", &self.local_name)
            .finish()
    }
}

/// Configuration problem detected before any network activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Username is empty.
    #[error("Username has to be set")]
    MissingUsername,
    /// Password is empty.
    #[error("Password has to be set")]
    MissingPassword,
}
