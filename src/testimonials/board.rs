use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::constants::SYSTEM_TOKEN;
use crate::testimonials::api::{ApiError, Testimonial, TestimonialApi, TestimonialDraft};
use crate::testimonials::ledger::{Cooldown, LedgerError, SubmissionLedger};

/// Failures shown to the user as a short on-screen message.
#[derive(Debug, Error)]
pub enum TestimonialError {
    #[error("please fill in the {0} field")]
    MissingField(&'static str),
    #[error("you can add one testimonial every week; {0}")]
    Cooldown(Cooldown),
    #[error("this testimonial is verified and cannot be deleted")]
    SystemTestimonial,
    #[error("you can only delete testimonials you added")]
    NotOwner,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl TestimonialDraft {
    pub fn validate(&self) -> Result<(), TestimonialError> {
        for (value, field) in [(&self.name, "name"), (&self.role, "role"), (&self.text, "testimonial")] {
            if value.trim().is_empty() {
                return Err(TestimonialError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// Adds and removes this client's testimonial, enforcing the weekly limit.
#[derive(Debug)]
pub struct TestimonialBoard<A> {
    api: A,
    ledger: SubmissionLedger,
}

impl<A: TestimonialApi> TestimonialBoard<A> {
    pub fn new(api: A, ledger: SubmissionLedger) -> Self {
        Self { api, ledger }
    }

    pub fn ledger(&self) -> &SubmissionLedger {
        &self.ledger
    }

    pub fn status(&self, now: DateTime<Utc>) -> Result<(), Cooldown> {
        self.ledger.check(now)
    }

    pub async fn submit(&mut self, draft: TestimonialDraft, now: DateTime<Utc>) -> Result<Testimonial, TestimonialError> {
        draft.validate()?;
        self.ledger.check(now).map_err(TestimonialError::Cooldown)?;

        let created = self.api.create(&draft).await.inspect_err(|error| {
            warn!(%error, "testimonial was not created");
        })?;
        self.ledger.record(now, &created.token)?;
        info!(id = created.testimonial.id, "testimonial added");
        Ok(created.testimonial)
    }

    pub async fn delete(&mut self, token: &str) -> Result<(), TestimonialError> {
        if token == SYSTEM_TOKEN {
            return Err(TestimonialError::SystemTestimonial);
        }
        if !self.ledger.owns(token) {
            return Err(TestimonialError::NotOwner);
        }

        self.api.delete(token).await.inspect_err(|error| {
            warn!(%error, "testimonial was not deleted");
        })?;
        // Deleting frees the weekly slot
        self.ledger.clear()?;
        info!("testimonial deleted");
        Ok(())
    }
}
