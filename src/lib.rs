pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;

pub use adapters::resend::ResendProvider;
pub use config::{ApiKey, RelaySettings};
pub use core::relay::ContactRelay;
pub use utils::error::{RelayError, Result};
