use tracing::{info, warn};
use crate::media::{LoadError, PlaybackError};

/// Observability hook for recovered media failures.
///
/// Implementations must not panic and must return promptly; the carousel calls
/// them from inside its own state transitions.
pub trait CarouselObserver {
    fn playback_failed(&mut self, index: usize, error: &PlaybackError);
    fn load_failed(&mut self, index: usize, error: &LoadError);
    fn settled(&mut self, _index: usize) {}
}

/// Emits every hook as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CarouselObserver for TracingObserver {
    fn playback_failed(&mut self, index: usize, error: &PlaybackError) {
        warn!(slide = index, %error, "slide playback failed");
    }

    fn load_failed(&mut self, index: usize, error: &LoadError) {
        warn!(slide = index, %error, "slide media failed to load");
    }

    fn settled(&mut self, index: usize) {
        info!(slide = index, "carousel settled");
    }
}
