//! Playback capability exposed by each slide's embedded media.

mod ken_burns;

pub use ken_burns::{KenBurnsClip, KenBurnsFrame, PanDirection};

use thiserror::Error;

/// A rejected `play()` request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("media is not ready to play")]
    NotReady,
    #[error("playback rejected: {0}")]
    Rejected(String),
    #[error("playback failed: {0}")]
    Failed(String),
}

/// Why a media item could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("media source unavailable: {0}")]
    Unavailable(String),
    #[error("media could not be decoded: {0}")]
    Decode(String),
}

/// Buffering state reported by a media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Unloaded,
    Buffering,
    Ready,
    Failed(LoadError),
}

/// The operations the carousel needs from a slide's media.
///
/// Implementations never block: `load` starts buffering and `readiness` is polled
/// by the carousel on every `update` until the media is playable.
pub trait MediaPlayer {
    fn load(&mut self);
    fn readiness(&self) -> Readiness;
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn seek(&mut self, seconds: f32);
    fn is_paused(&self) -> bool;
    fn position(&self) -> f32;

    /// Advance the media clock. Media driven by an external clock can ignore this.
    fn advance(&mut self, _dt: f32) {}
}
