use crate::core::relay::ContactRelay;
use crate::core::{ConfigProvider, EmailProvider, RelayRequest, RelayResponse};
use crate::utils::error::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Proxy event as delivered by API Gateway (REST, `httpMethod`) or by
/// HTTP APIs and function URLs (`requestContext.http.method`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub http: Option<HttpContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpContext {
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ProxyRequest {
    pub fn method(&self) -> Method {
        let raw = self
            .http_method
            .as_deref()
            .or_else(|| {
                self.request_context
                    .as_ref()
                    .and_then(|ctx| ctx.http.as_ref())
                    .map(|http| http.method.as_str())
            })
            .unwrap_or("POST");

        Method::from_bytes(raw.to_ascii_uppercase().as_bytes()).unwrap_or(Method::POST)
    }

    pub fn into_relay_request(self) -> Result<RelayRequest> {
        let method = self.method();
        let body = match self.body {
            Some(body) if self.is_base64_encoded => STANDARD.decode(body)?,
            Some(body) => body.into_bytes(),
            None => Vec::new(),
        };

        Ok(RelayRequest::new(method, body))
    }
}

/// Answers one proxy event. Preflight is answered before the relay or the
/// body is looked at, so it succeeds even when either one is broken.
pub async fn respond<P, C>(event: ProxyRequest, relay: Result<ContactRelay<P, C>>) -> ProxyResponse
where
    P: EmailProvider,
    C: ConfigProvider,
{
    if event.method() == Method::OPTIONS {
        tracing::debug!("Answering CORS preflight");
        return RelayResponse::preflight().into();
    }

    let relay = match relay {
        Ok(relay) => relay,
        Err(e) => {
            tracing::error!(
                "❌ Relay configuration failed: {} (Category: {:?})",
                e,
                e.category()
            );
            return RelayResponse::error(&e).into();
        }
    };

    match event.into_relay_request() {
        Ok(request) => relay.handle(request).await.into(),
        Err(e) => {
            tracing::error!("Unreadable request event: {}", e);
            RelayResponse::error(&e).into()
        }
    }
}

impl From<RelayResponse> for ProxyResponse {
    fn from(response: RelayResponse) -> Self {
        let headers = response
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        Self {
            status_code: response.status.as_u16(),
            headers,
            body: response.body_string(),
            is_base64_encoded: false,
        }
    }
}
