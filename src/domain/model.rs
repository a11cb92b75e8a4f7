use crate::utils::error::RelayError;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use reqwest::{Method, StatusCode};
use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Inbound form body as the browser sent it. Absent and `null` fields both
/// deserialize to `None`. Only a JSON object is accepted; arrays, strings
/// and `null` fail to deserialize.
#[derive(Debug, Clone, Default)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct SubmissionFields {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

impl<'de> Deserialize<'de> for ContactSubmission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SubmissionVisitor)
    }
}

struct SubmissionVisitor;

impl<'de> Visitor<'de> for SubmissionVisitor {
    type Value = ContactSubmission;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with name, email and message")
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let fields = SubmissionFields::deserialize(MapAccessDeserializer::new(map))?;
        Ok(ContactSubmission {
            name: fields.name,
            email: fields.email,
            message: fields.message,
        })
    }
}

impl ContactSubmission {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(field, _)| field)
        .collect()
    }
}

/// A submission with all three fields present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl TryFrom<ContactSubmission> for ContactMessage {
    type Error = RelayError;

    fn try_from(submission: ContactSubmission) -> Result<Self, Self::Error> {
        match submission {
            ContactSubmission {
                name: Some(name),
                email: Some(email),
                message: Some(message),
            } if !name.is_empty() && !email.is_empty() && !message.is_empty() => Ok(Self {
                name,
                email,
                message,
            }),
            submission => Err(RelayError::Validation {
                missing: submission.missing_fields(),
            }),
        }
    }
}

/// Payload for the provider's send endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub reply_to: String,
    pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeliveryReceipt {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub method: Method,
    pub body: Vec<u8>,
}

impl RelayRequest {
    pub fn new(method: Method, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl RelayResponse {
    pub fn preflight() -> Self {
        Self {
            status: StatusCode::OK,
            headers: cors_headers(),
            body: None,
        }
    }

    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        let mut headers = cors_headers();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    pub fn success() -> Self {
        Self::json(StatusCode::OK, serde_json::json!({ "success": true }))
    }

    pub fn error(err: &RelayError) -> Self {
        Self::json(
            err.status_code(),
            serde_json::json!({ "error": err.to_string() }),
        )
    }

    pub fn body_string(&self) -> String {
        self.body
            .as_ref()
            .map(|body| body.to_string())
            .unwrap_or_default()
    }
}

pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers
}
