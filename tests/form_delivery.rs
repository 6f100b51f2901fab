use std::sync::Mutex;

use async_trait::async_trait;
use showreel::config::EmailSettings;
use showreel::forms::{ContactRequest, Enquiry, FormMailer, QuoteRequest, Recipient, SubmissionError};
use showreel::notify::{DeliveryError, DeliveryReceipt, NotificationGateway, TemplateParams};

const OPERATOR_TEMPLATE: &str = "template_operator";
const CONFIRMATION_TEMPLATE: &str = "template_confirmation";

/// Records every send and fails the templates it is told to.
#[derive(Default)]
struct FakeGateway {
    failing: Vec<&'static str>,
    sent: Mutex<Vec<(String, TemplateParams)>>,
}

impl FakeGateway {
    fn failing(templates: &[&'static str]) -> Self {
        Self { failing: templates.to_vec(), ..Default::default() }
    }

    fn sent(&self) -> Vec<(String, TemplateParams)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationGateway for FakeGateway {
    async fn send(
        &self,
        _service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        self.sent.lock().unwrap().push((template_id.to_string(), params.clone()));
        if self.failing.iter().any(|t| *t == template_id) {
            return Err(DeliveryError::Rejected { status: 400, body: "template not found".into() });
        }
        Ok(DeliveryReceipt { status: 200, text: "OK".into() })
    }
}

fn settings() -> EmailSettings {
    EmailSettings {
        service_id: "service_drone".into(),
        operator_template: OPERATOR_TEMPLATE.into(),
        confirmation_template: CONFIRMATION_TEMPLATE.into(),
        public_key: Some("public-key".into()),
        operator_address: "bookings@example.com".into(),
        ..Default::default()
    }
}

fn quote() -> Enquiry {
    Enquiry::Quote(QuoteRequest {
        service_type: "Real estate".into(),
        base_price: "from 300".into(),
        location: "Marbella".into(),
        duration: "2h".into(),
        name: "Marta".into(),
        email: "marta@example.com".into(),
        phone: "655 000 111".into(),
        message: Some("Sunset shots please".into()),
    })
}

#[tokio::test]
async fn both_messages_are_sent_when_delivery_succeeds() {
    let mailer = FormMailer::new(FakeGateway::default(), &settings());

    let receipt = mailer.submit(quote()).await.unwrap();
    assert_eq!(receipt.operator.status, 200);
    assert_eq!(receipt.confirmation.status, 200);

    let sent = mailer.gateway().sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, OPERATOR_TEMPLATE);
    assert_eq!(sent[0].1["to_email"], "bookings@example.com");
    assert_eq!(sent[1].0, CONFIRMATION_TEMPLATE);
    assert_eq!(sent[1].1["to_email"], "marta@example.com");
}

#[tokio::test]
async fn operator_failure_returns_the_form_for_retry() {
    let mailer = FormMailer::new(FakeGateway::failing(&[OPERATOR_TEMPLATE]), &settings());

    let err = mailer.submit(quote()).await.unwrap_err();
    let SubmissionError::RetryPrompt { form, failures } = err else {
        panic!("expected a retry prompt");
    };
    assert_eq!(*form, quote());
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].recipient, Recipient::Operator);

    // The confirmation is still attempted
    assert_eq!(mailer.gateway().sent().len(), 2);
}

#[tokio::test]
async fn confirmation_failure_also_prompts_a_retry() {
    let mailer = FormMailer::new(FakeGateway::failing(&[CONFIRMATION_TEMPLATE]), &settings());

    let err = mailer.submit(quote()).await.unwrap_err();
    assert!(matches!(&err, SubmissionError::RetryPrompt { failures, .. } if failures[0].recipient == Recipient::Requester));
    assert_eq!(err.into_form(), quote());
}

#[tokio::test]
async fn invalid_forms_are_never_sent() {
    let mailer = FormMailer::new(FakeGateway::default(), &settings());
    let contact = Enquiry::Contact(ContactRequest {
        name: "Pablo".into(),
        email: "not-an-address".into(),
        phone: "600".into(),
        subject: "Events".into(),
        message: "Festival coverage".into(),
    });

    let err = mailer.submit(contact.clone()).await.unwrap_err();
    assert!(matches!(err, SubmissionError::Invalid { .. }));
    assert_eq!(err.form(), &contact);
    assert!(mailer.gateway().sent().is_empty());
}
