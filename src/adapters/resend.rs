use crate::config::ApiKey;
use crate::core::{ConfigProvider, DeliveryReceipt, EmailProvider, OutboundEmail, Result};
use crate::utils::error::RelayError;
use reqwest::Client;

/// Sends email through a Resend-compatible HTTP API (`POST /emails` with a bearer token).
pub struct ResendProvider {
    client: Client,
    endpoint: String,
    api_key: ApiKey,
}

impl ResendProvider {
    pub fn new<C: ConfigProvider>(config: &C, api_key: ApiKey) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.provider_endpoint().to_string(),
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt> {
        tracing::debug!("Making provider request to: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(email)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Provider response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Provider API error: {}", body);
            return Err(RelayError::Delivery {
                status: status.as_u16(),
                body,
            });
        }

        // Acceptance is decided by the status alone; the body only feeds the logs.
        let receipt = serde_json::from_str::<DeliveryReceipt>(&body).unwrap_or_else(|e| {
            tracing::warn!("Could not parse provider response: {}", e);
            DeliveryReceipt::default()
        });
        tracing::debug!("Provider accepted email: {:?}", receipt);

        Ok(receipt)
    }
}
