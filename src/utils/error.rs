use reqwest::StatusCode;
use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "All fields are required";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("All fields are required")]
    Validation { missing: Vec<&'static str> },

    #[error("Failed to send email: {body}")]
    Delivery { status: u16, body: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    MalformedRequest(#[from] serde_json::Error),

    #[error("Invalid request body encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Delivery,
    Transport,
    Configuration,
}

impl RelayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::Validation { .. } | RelayError::MethodNotAllowed => {
                ErrorCategory::Validation
            }
            RelayError::Delivery { .. } => ErrorCategory::Delivery,
            RelayError::Transport(_)
            | RelayError::MalformedRequest(_)
            | RelayError::Encoding(_) => ErrorCategory::Transport,
            RelayError::Template(_)
            | RelayError::IoError(_)
            | RelayError::ConfigError { .. }
            | RelayError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Status reported to the caller when this error ends a request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation { .. } => StatusCode::BAD_REQUEST,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
