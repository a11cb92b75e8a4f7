// Adapters layer: concrete implementations for external systems (email provider, HTTP surfaces).

pub mod apigateway;
pub mod resend;
#[cfg(feature = "cli")]
pub mod server;
