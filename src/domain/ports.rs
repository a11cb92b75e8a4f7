use crate::domain::model::{DeliveryReceipt, OutboundEmail};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn provider_endpoint(&self) -> &str;
    fn sender(&self) -> &str;
    fn recipient(&self) -> &str;
    fn subject_prefix(&self) -> &str;
    fn request_timeout(&self) -> Duration;
}

/// A transactional email API that accepts one message per call.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt>;
}
