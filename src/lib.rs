//! Showreel: the video carousel behind a drone videography site, plus the
//! quote/contact mailer and testimonials client that sit next to it.

pub mod carousel;
pub mod config;
pub mod constants;
pub mod forms;
pub mod input;
pub mod media;
pub mod notify;
pub mod observer;
pub mod slide;
pub mod state;
pub mod testimonials;

#[cfg(feature = "viewer")]
pub mod viewer;

pub use carousel::{CarouselConfig, CarouselError, SlideCarousel};
pub use input::CarouselCommand;
pub use media::{MediaPlayer, Readiness};
pub use observer::{CarouselObserver, TracingObserver};
pub use slide::Slide;
pub use state::{CarouselState, NavOutcome, PendingPolicy};
