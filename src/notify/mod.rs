//! Outbound notifications for quote and contact submissions.

mod emailjs;

pub use emailjs::EmailJsGateway;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

pub type TemplateParams = BTreeMap<String, String>;

/// Accepted delivery as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: u16,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("could not reach the email service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email service rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Fire-and-forget message delivery through a template service.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}
