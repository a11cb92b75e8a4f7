use crate::core::email::EmailComposer;
use crate::core::{
    ConfigProvider, ContactMessage, ContactSubmission, DeliveryReceipt, EmailProvider,
    RelayRequest, RelayResponse, Result,
};
use crate::utils::error::{ErrorCategory, RelayError};
use crate::utils::logger::preview;
use reqwest::Method;

const LOG_PREVIEW_CHARS: usize = 50;

/// Validates contact form submissions and forwards each one to the email provider.
///
/// The relay is stateless; one instance can serve any number of concurrent requests.
pub struct ContactRelay<P: EmailProvider, C: ConfigProvider> {
    provider: P,
    config: C,
    composer: EmailComposer,
}

impl<P: EmailProvider, C: ConfigProvider> ContactRelay<P, C> {
    pub fn new(provider: P, config: C) -> Result<Self> {
        Ok(Self {
            provider,
            config,
            composer: EmailComposer::new()?,
        })
    }

    /// Runs one request to completion. Failures never escape: each one is
    /// turned into a JSON error response.
    pub async fn handle(&self, request: RelayRequest) -> RelayResponse {
        if request.method == Method::OPTIONS {
            tracing::debug!("Answering CORS preflight");
            return RelayResponse::preflight();
        }

        match self.relay(&request).await {
            Ok(receipt) => {
                tracing::info!(
                    email_id = receipt.id.as_deref().unwrap_or("unknown"),
                    "Email sent successfully"
                );
                RelayResponse::success()
            }
            Err(e) => {
                match e.category() {
                    ErrorCategory::Validation => {
                        tracing::warn!("Rejected contact submission: {:?}", e)
                    }
                    _ => tracing::error!(
                        "Error relaying contact submission: {} (Category: {:?})",
                        e,
                        e.category()
                    ),
                }
                RelayResponse::error(&e)
            }
        }
    }

    async fn relay(&self, request: &RelayRequest) -> Result<DeliveryReceipt> {
        if request.method != Method::POST {
            return Err(RelayError::MethodNotAllowed);
        }

        let submission: ContactSubmission = serde_json::from_slice(&request.body)?;
        let message_preview = submission
            .message
            .as_deref()
            .map(|m| preview(m, LOG_PREVIEW_CHARS))
            .unwrap_or_default();
        tracing::info!(
            name_present = submission.name.as_deref().is_some_and(|v| !v.is_empty()),
            email_present = submission.email.as_deref().is_some_and(|v| !v.is_empty()),
            message_preview = %message_preview,
            "Received contact form submission"
        );

        let message = ContactMessage::try_from(submission)?;
        let email = self.composer.compose(&self.config, &message)?;

        tracing::debug!(recipients = email.to.len(), "Forwarding to email provider");
        self.provider.send(&email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelaySettings;
    use crate::core::OutboundEmail;
    use crate::utils::error::VALIDATION_MESSAGE;
    use reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    enum Outcome {
        Accept,
        Reject(u16, &'static str),
    }

    #[derive(Clone)]
    struct RecordingProvider {
        sent: Arc<Mutex<Vec<OutboundEmail>>>,
        outcome: Outcome,
    }

    impl RecordingProvider {
        fn new(outcome: Outcome) -> Self {
            Self {
                sent: Arc::new(Mutex::new(Vec::new())),
                outcome,
            }
        }

        async fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait::async_trait]
    impl EmailProvider for RecordingProvider {
        async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt> {
            self.sent.lock().await.push(email.clone());
            match self.outcome {
                Outcome::Accept => Ok(DeliveryReceipt {
                    id: Some("email-1".to_string()),
                }),
                Outcome::Reject(status, body) => Err(RelayError::Delivery {
                    status,
                    body: body.to_string(),
                }),
            }
        }
    }

    fn relay(provider: RecordingProvider) -> ContactRelay<RecordingProvider, RelaySettings> {
        let settings = RelaySettings {
            recipient: "owner@example.com".to_string(),
            ..RelaySettings::default()
        };
        ContactRelay::new(provider, settings).unwrap()
    }

    fn post(body: serde_json::Value) -> RelayRequest {
        RelayRequest::new(Method::POST, body.to_string())
    }

    #[tokio::test]
    async fn test_valid_submission_is_forwarded_once() {
        let provider = RecordingProvider::new(Outcome::Accept);
        let sut = relay(provider.clone());

        let response = sut
            .handle(post(json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "message": "Hello!"
            })))
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, Some(json!({ "success": true })));

        let sent = provider.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New Portfolio Contact: Jane Doe");
        assert_eq!(sent[0].reply_to, "jane@example.com");
        assert_eq!(sent[0].to, vec!["owner@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected_without_delivery() {
        let bodies = [
            json!({ "name": "", "email": "a@b.com", "message": "hi" }),
            json!({ "name": "Jane", "email": "", "message": "hi" }),
            json!({ "name": "Jane", "email": "a@b.com", "message": "" }),
            json!({ "email": "a@b.com", "message": "hi" }),
            json!({ "name": "Jane", "message": "hi" }),
            json!({ "name": "Jane", "email": "a@b.com" }),
            json!({}),
        ];

        for body in bodies {
            let provider = RecordingProvider::new(Outcome::Accept);
            let sut = relay(provider.clone());

            let response = sut.handle(post(body)).await;

            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert_eq!(response.body, Some(json!({ "error": VALIDATION_MESSAGE })));
            assert!(provider.sent().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_provider_rejection_becomes_server_error() {
        let provider = RecordingProvider::new(Outcome::Reject(401, "invalid api key"));
        let sut = relay(provider.clone());

        let response = sut
            .handle(post(json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "message": "Hello!"
            })))
            .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body,
            Some(json!({ "error": "Failed to send email: invalid api key" }))
        );
        assert_eq!(provider.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_preflight_skips_validation_and_delivery() {
        let provider = RecordingProvider::new(Outcome::Accept);
        let sut = relay(provider.clone());

        let response = sut
            .handle(RelayRequest::new(Method::OPTIONS, "not json"))
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.is_none());
        assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(provider.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_server_error() {
        let provider = RecordingProvider::new(Outcome::Accept);
        let sut = relay(provider.clone());

        let response = sut
            .handle(RelayRequest::new(Method::POST, "{\"name\": "))
            .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.unwrap()["error"].is_string());
        assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(provider.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_object_bodies_are_never_forwarded() {
        for body in [r#"["Jane","j@e.com","hi"]"#, "null", r#""Jane Doe""#] {
            let provider = RecordingProvider::new(Outcome::Accept);
            let sut = relay(provider.clone());

            let response = sut.handle(RelayRequest::new(Method::POST, body)).await;

            assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
            assert!(provider.sent().await.is_empty(), "forwarded {}", body);
        }
    }

    #[tokio::test]
    async fn test_other_methods_are_not_allowed() {
        let provider = RecordingProvider::new(Outcome::Accept);
        let sut = relay(provider.clone());

        let response = sut.handle(RelayRequest::new(Method::GET, "")).await;

        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.body, Some(json!({ "error": "Method not allowed" })));
        assert!(provider.sent().await.is_empty());
    }
}
