use crate::config::toml_config::TomlConfig;
use crate::config::{RelaySettings, PROVIDER_ENDPOINT_ENV, RECIPIENT_ENV, SENDER_ENV};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

#[derive(Debug, Clone, Parser)]
#[command(name = "contact-relay")]
#[command(about = "Relays contact form submissions to a transactional email API")]
pub struct CliConfig {
    #[arg(long, short, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "RELAY_BIND", help = "Address to listen on [default: 127.0.0.1:8787]")]
    pub bind: Option<String>,

    #[arg(long, env = PROVIDER_ENDPOINT_ENV)]
    pub provider_endpoint: Option<String>,

    #[arg(long, env = SENDER_ENV)]
    pub sender: Option<String>,

    #[arg(long, env = RECIPIENT_ENV)]
    pub recipient: Option<String>,

    #[arg(long)]
    pub subject_prefix: Option<String>,

    #[arg(long)]
    pub request_timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Everything the local server needs once flags and the settings file are merged.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub settings: RelaySettings,
    pub bind: String,
    pub verbose: bool,
}

impl CliConfig {
    /// Defaults first, then the settings file, then flags and environment.
    pub fn resolve(&self) -> Result<ServerConfig> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let mut settings = RelaySettings::default();
        file.apply_to(&mut settings);

        if let Some(endpoint) = &self.provider_endpoint {
            settings.provider_endpoint = endpoint.clone();
        }
        if let Some(sender) = &self.sender {
            settings.sender = sender.clone();
        }
        if let Some(recipient) = &self.recipient {
            settings.recipient = recipient.clone();
        }
        if let Some(prefix) = &self.subject_prefix {
            settings.subject_prefix = prefix.clone();
        }
        if let Some(timeout) = self.request_timeout_seconds {
            settings.request_timeout_seconds = timeout;
        }

        let bind = self
            .bind
            .clone()
            .or_else(|| file.bind().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        Ok(ServerConfig {
            settings,
            bind,
            verbose: self.verbose || file.verbose(),
        })
    }
}
