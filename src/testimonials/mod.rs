//! Client side of the testimonials feature: a REST resource plus a local
//! once-a-week submission limit.

mod api;
mod board;
mod ledger;

pub use api::{ApiError, Created, HttpTestimonialApi, Testimonial, TestimonialApi, TestimonialDraft};
pub use board::{TestimonialBoard, TestimonialError};
pub use ledger::{Cooldown, LedgerError, SubmissionLedger};
