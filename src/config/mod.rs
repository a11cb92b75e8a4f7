#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_mailbox, validate_non_empty_string, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_PROVIDER_ENDPOINT: &str = "https://api.resend.com/emails";
pub const DEFAULT_SENDER: &str = "Portfolio Contact <onboarding@resend.dev>";
pub const DEFAULT_SUBJECT_PREFIX: &str = "New Portfolio Contact: ";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

pub const API_KEY_ENV: &str = "RESEND_API_KEY";
pub const PROVIDER_ENDPOINT_ENV: &str = "PROVIDER_ENDPOINT";
pub const SENDER_ENV: &str = "CONTACT_SENDER";
pub const RECIPIENT_ENV: &str = "CONTACT_RECIPIENT";
pub const SUBJECT_PREFIX_ENV: &str = "CONTACT_SUBJECT_PREFIX";
pub const REQUEST_TIMEOUT_ENV: &str = "REQUEST_TIMEOUT_SECONDS";

/// Fully resolved relay settings, independent of where they were loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySettings {
    pub provider_endpoint: String,
    pub sender: String,
    pub recipient: String,
    pub subject_prefix: String,
    pub request_timeout_seconds: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            provider_endpoint: DEFAULT_PROVIDER_ENDPOINT.to_string(),
            sender: DEFAULT_SENDER.to_string(),
            recipient: String::new(),
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl RelaySettings {
    /// Builds settings from a variable lookup, falling back to defaults for
    /// anything not set. Unparseable timeouts keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            provider_endpoint: lookup(PROVIDER_ENDPOINT_ENV).unwrap_or(defaults.provider_endpoint),
            sender: lookup(SENDER_ENV).unwrap_or(defaults.sender),
            recipient: lookup(RECIPIENT_ENV).unwrap_or(defaults.recipient),
            subject_prefix: lookup(SUBJECT_PREFIX_ENV).unwrap_or(defaults.subject_prefix),
            request_timeout_seconds: lookup(REQUEST_TIMEOUT_ENV)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl ConfigProvider for RelaySettings {
    fn provider_endpoint(&self) -> &str {
        &self.provider_endpoint
    }

    fn sender(&self) -> &str {
        &self.sender
    }

    fn recipient(&self) -> &str {
        &self.recipient
    }

    fn subject_prefix(&self) -> &str {
        &self.subject_prefix
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Validate for RelaySettings {
    fn validate(&self) -> Result<()> {
        validate_url("provider_endpoint", &self.provider_endpoint)?;
        validate_mailbox("sender", &self.sender)?;
        validate_mailbox("recipient", &self.recipient)?;
        validate_non_empty_string("subject_prefix", &self.subject_prefix)?;
        validate_range("request_timeout_seconds", self.request_timeout_seconds, 1, 300)?;

        tracing::debug!("Relay configuration validation passed");
        Ok(())
    }
}

/// Provider credential. Never printed; `Debug` shows only whether it is set.
#[derive(Clone, Default)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// A missing key is not an error here: the provider answers with an
    /// authorization failure, which the relay reports like any other
    /// rejected delivery.
    pub fn from_env() -> Self {
        let key = Self(std::env::var(API_KEY_ENV).unwrap_or_default());
        if key.is_empty() {
            tracing::warn!("{} is not set; the provider will reject deliveries", API_KEY_ENV);
        }
        key
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("ApiKey(<unset>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}
