use crate::config::RelaySettings;
use crate::utils::error::{RelayError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file for the local server. Every key may be omitted;
/// missing values keep whatever the caller already resolved.
///
/// ```toml
/// [relay]
/// recipient = "${CONTACT_RECIPIENT}"
/// sender = "Portfolio Contact <onboarding@resend.dev>"
/// request_timeout_seconds = 15
///
/// [server]
/// bind = "0.0.0.0:8787"
///
/// [logging]
/// verbose = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub relay: Option<RelaySection>,
    pub server: Option<ServerSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelaySection {
    pub provider_endpoint: Option<String>,
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub subject_prefix: Option<String>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub verbose: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RelayError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn apply_to(&self, settings: &mut RelaySettings) {
        let Some(relay) = &self.relay else {
            return;
        };

        if let Some(endpoint) = &relay.provider_endpoint {
            settings.provider_endpoint = endpoint.clone();
        }
        if let Some(sender) = &relay.sender {
            settings.sender = sender.clone();
        }
        if let Some(recipient) = &relay.recipient {
            settings.recipient = recipient.clone();
        }
        if let Some(prefix) = &relay.subject_prefix {
            settings.subject_prefix = prefix.clone();
        }
        if let Some(timeout) = relay.request_timeout_seconds {
            settings.request_timeout_seconds = timeout;
        }
    }

    pub fn bind(&self) -> Option<&str> {
        self.server.as_ref()?.bind.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|logging| logging.verbose)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[relay]
provider_endpoint = "https://mail.example.com/emails"
sender = "Site <noreply@example.com>"
recipient = "owner@example.com"
subject_prefix = "Contact: "
request_timeout_seconds = 5

[server]
bind = "0.0.0.0:9000"

[logging]
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let mut settings = RelaySettings::default();
        config.apply_to(&mut settings);

        assert_eq!(settings.provider_endpoint, "https://mail.example.com/emails");
        assert_eq!(settings.sender, "Site <noreply@example.com>");
        assert_eq!(settings.recipient, "owner@example.com");
        assert_eq!(settings.subject_prefix, "Contact: ");
        assert_eq!(settings.request_timeout_seconds, 5);
        assert_eq!(config.bind(), Some("0.0.0.0:9000"));
        assert!(config.verbose());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = TomlConfig::from_toml_str("[relay]\nrecipient = \"owner@example.com\"\n")
            .unwrap();
        let mut settings = RelaySettings::default();
        config.apply_to(&mut settings);

        assert_eq!(settings.recipient, "owner@example.com");
        assert_eq!(settings, RelaySettings {
            recipient: "owner@example.com".to_string(),
            ..RelaySettings::default()
        });
        assert_eq!(config.bind(), None);
        assert!(!config.verbose());
    }

    #[test]
    fn test_unknown_variable_is_left_intact() {
        let config = TomlConfig::from_toml_str(
            "[relay]\nrecipient = \"${CONTACT_RELAY_TEST_SURELY_UNSET_VAR}\"\n",
        )
        .unwrap();
        let relay = config.relay.unwrap();
        assert_eq!(
            relay.recipient.as_deref(),
            Some("${CONTACT_RELAY_TEST_SURELY_UNSET_VAR}")
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[relay\nrecipient = ");
        assert!(matches!(result, Err(RelayError::ConfigError { .. })));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbind = \"127.0.0.1:0\"").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.bind(), Some("127.0.0.1:0"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TomlConfig::from_file("/nonexistent/contact-relay.toml");
        assert!(matches!(result, Err(RelayError::IoError(_))));
    }
}
