pub mod email;
pub mod relay;

pub use crate::domain::model::{
    ContactMessage, ContactSubmission, DeliveryReceipt, OutboundEmail, RelayRequest,
    RelayResponse,
};
pub use crate::domain::ports::{ConfigProvider, EmailProvider};
pub use crate::utils::error::Result;
