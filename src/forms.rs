//! Quote and contact forms delivered as an operator notification plus a
//! confirmation to the requester.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::EmailSettings;
use crate::notify::{DeliveryError, DeliveryReceipt, NotificationGateway, TemplateParams};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub service_type: String,
    pub base_price: String,
    pub location: String,
    pub duration: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Enquiry {
    Quote(QuoteRequest),
    Contact(ContactRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("please fill in the {0} field")]
    MissingField(&'static str),
    #[error("{0:?} is not a valid email address")]
    InvalidEmail(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Operator,
    Requester,
}

#[derive(Debug)]
pub struct FailedSend {
    pub recipient: Recipient,
    pub error: DeliveryError,
}

/// A submission that did not go through. The form is handed back untouched so
/// the user can correct or resend it.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{reason}")]
    Invalid { form: Box<Enquiry>, reason: FormError },
    #[error("we could not send your request, please try again")]
    RetryPrompt { form: Box<Enquiry>, failures: Vec<FailedSend> },
}

impl SubmissionError {
    pub fn form(&self) -> &Enquiry {
        match self {
            SubmissionError::Invalid { form, .. } | SubmissionError::RetryPrompt { form, .. } => form,
        }
    }

    pub fn into_form(self) -> Enquiry {
        match self {
            SubmissionError::Invalid { form, .. } | SubmissionError::RetryPrompt { form, .. } => *form,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub operator: DeliveryReceipt,
    pub confirmation: DeliveryReceipt,
}

fn required(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(())
    }
}

fn valid_email(value: &str) -> Result<(), FormError> {
    required(value, "email")?;
    let value = value.trim();
    match value.split_once('@') {
        Some((user, domain)) if !user.is_empty() && domain.contains('.') && !domain.starts_with('.') => Ok(()),
        _ => Err(FormError::InvalidEmail(value.to_string())),
    }
}

fn params<const N: usize>(pairs: [(&str, &str); N]) -> TemplateParams {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v.trim().to_string())).collect()
}

impl Enquiry {
    pub fn validate(&self) -> Result<(), FormError> {
        match self {
            Enquiry::Quote(quote) => {
                required(&quote.service_type, "service type")?;
                required(&quote.location, "location")?;
                required(&quote.duration, "duration")?;
                required(&quote.name, "name")?;
                valid_email(&quote.email)?;
                required(&quote.phone, "phone")
            }
            Enquiry::Contact(contact) => {
                required(&contact.name, "name")?;
                valid_email(&contact.email)?;
                required(&contact.phone, "phone")?;
                required(&contact.subject, "subject")?;
                required(&contact.message, "message")
            }
        }
    }

    pub fn requester_name(&self) -> &str {
        match self {
            Enquiry::Quote(quote) => &quote.name,
            Enquiry::Contact(contact) => &contact.name,
        }
    }

    pub fn requester_email(&self) -> &str {
        match self {
            Enquiry::Quote(quote) => &quote.email,
            Enquiry::Contact(contact) => &contact.email,
        }
    }

    /// Everything the operator needs to follow up.
    pub fn operator_params(&self, operator_address: &str) -> TemplateParams {
        match self {
            Enquiry::Quote(quote) => {
                let message = quote.message.as_deref().unwrap_or("");
                let mut out = params([
                    ("from_name", quote.name.as_str()),
                    ("email", quote.email.as_str()),
                    ("phone", quote.phone.as_str()),
                    ("service_type", quote.service_type.as_str()),
                    ("base_price", quote.base_price.as_str()),
                    ("location", quote.location.as_str()),
                    ("duration", quote.duration.as_str()),
                    ("message", message),
                    ("to_email", operator_address),
                    ("subject", "New quote request"),
                ]);
                out.insert("summary".into(), format!(
                    "Service: {}\nBase price: {}\nLocation: {}\nDuration: {}\nName: {}\nEmail: {}\nPhone: {}",
                    quote.service_type, quote.base_price, quote.location, quote.duration,
                    quote.name, quote.email, quote.phone,
                ));
                out
            }
            Enquiry::Contact(contact) => {
                let mut out = params([
                    ("from_name", contact.name.as_str()),
                    ("email", contact.email.as_str()),
                    ("phone", contact.phone.as_str()),
                    ("topic", contact.subject.as_str()),
                    ("message", contact.message.as_str()),
                    ("to_email", operator_address),
                    ("subject", "New contact enquiry"),
                ]);
                out.insert("summary".into(), format!(
                    "Subject: {}\nName: {}\nEmail: {}\nPhone: {}",
                    contact.subject, contact.name, contact.email, contact.phone,
                ));
                out
            }
        }
    }

    /// Acknowledgement sent back to whoever filled in the form.
    pub fn confirmation_params(&self) -> TemplateParams {
        let (subject, topic) = match self {
            Enquiry::Quote(quote) => ("We received your quote request", quote.service_type.as_str()),
            Enquiry::Contact(contact) => ("We received your message", contact.subject.as_str()),
        };
        params([
            ("to_name", self.requester_name()),
            ("to_email", self.requester_email()),
            ("subject", subject),
            ("topic", topic),
        ])
    }
}

/// Delivers enquiries through a [`NotificationGateway`].
#[derive(Debug, Clone)]
pub struct FormMailer<G> {
    gateway: G,
    service_id: String,
    operator_template: String,
    confirmation_template: String,
    operator_address: String,
}

impl<G: NotificationGateway> FormMailer<G> {
    pub fn new(gateway: G, settings: &EmailSettings) -> Self {
        Self {
            gateway,
            service_id: settings.service_id.clone(),
            operator_template: settings.operator_template.clone(),
            confirmation_template: settings.confirmation_template.clone(),
            operator_address: settings.operator_address.clone(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Validate and deliver `form`.
    ///
    /// Both the operator notification and the requester confirmation are attempted;
    /// if either fails the whole submission comes back as a single retry prompt.
    pub async fn submit(&self, form: Enquiry) -> Result<SubmissionReceipt, SubmissionError> {
        if let Err(reason) = form.validate() {
            return Err(SubmissionError::Invalid { form: Box::new(form), reason });
        }

        let operator = self
            .gateway
            .send(&self.service_id, &self.operator_template, &form.operator_params(&self.operator_address))
            .await;
        let confirmation = self
            .gateway
            .send(&self.service_id, &self.confirmation_template, &form.confirmation_params())
            .await;

        match (operator, confirmation) {
            (Ok(operator), Ok(confirmation)) => {
                info!(requester = form.requester_email(), "submission delivered");
                Ok(SubmissionReceipt { operator, confirmation })
            }
            (operator, confirmation) => {
                let failures: Vec<FailedSend> = [(Recipient::Operator, operator), (Recipient::Requester, confirmation)]
                    .into_iter()
                    .filter_map(|(recipient, result)| result.err().map(|error| FailedSend { recipient, error }))
                    .collect();
                for failure in &failures {
                    warn!(recipient = ?failure.recipient, error = %failure.error, "submission delivery failed");
                }
                Err(SubmissionError::RetryPrompt { form: Box::new(form), failures })
            }
        }
    }
}
