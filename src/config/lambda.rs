use crate::adapters::resend::ResendProvider;
use crate::config::{ApiKey, RelaySettings};
use crate::core::relay::ContactRelay;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Settings for one Lambda invocation, read from the function's environment.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub settings: RelaySettings,
    pub api_key: ApiKey,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let settings = RelaySettings::from_env();
        settings.validate()?;

        Ok(Self {
            settings,
            api_key: ApiKey::from_env(),
        })
    }

    pub fn into_relay(self) -> Result<ContactRelay<ResendProvider, RelaySettings>> {
        let provider = ResendProvider::new(&self.settings, self.api_key)?;
        ContactRelay::new(provider, self.settings)
    }
}
