use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ConfigError, EmailSettings};
use crate::notify::{DeliveryError, DeliveryReceipt, NotificationGateway, TemplateParams};

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

/// EmailJS REST delivery (`POST /api/v1.0/email/send`).
#[derive(Debug, Clone)]
pub struct EmailJsGateway {
    client: reqwest::Client,
    endpoint: String,
    public_key: String,
}

impl EmailJsGateway {
    pub fn new(endpoint: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            public_key: public_key.into(),
        }
    }

    pub fn from_settings(settings: &EmailSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let key = settings.public_key.as_deref().ok_or(ConfigError::Missing("email.public_key"))?;
        Ok(Self::new(&settings.endpoint, key))
    }
}

#[async_trait]
impl NotificationGateway for EmailJsGateway {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        debug!(service_id, template_id, fields = params.len(), "sending email");
        let body = SendRequest {
            service_id,
            template_id,
            user_id: &self.public_key,
            template_params: params,
        };
        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(DeliveryError::Rejected { status: status.as_u16(), body: text });
        }
        info!(template_id, status = status.as_u16(), "email accepted");
        Ok(DeliveryReceipt { status: status.as_u16(), text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_the_rest_api() {
        let params: TemplateParams = [("from_name".to_string(), "Ana".to_string())].into_iter().collect();
        let body = SendRequest { service_id: "svc", template_id: "tpl", user_id: "key", template_params: &params };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "service_id": "svc",
                "template_id": "tpl",
                "user_id": "key",
                "template_params": {"from_name": "Ana"}
            })
        );
    }

    #[test]
    fn incomplete_settings_are_refused() {
        let settings = EmailSettings { service_id: "svc".into(), ..Default::default() };
        assert!(EmailJsGateway::from_settings(&settings).is_err());
    }
}
