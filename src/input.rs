//! Translates keyboard and pointer input into carousel commands.

use crate::constants::SWIPE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselCommand {
    Prev,
    Next,
    GoTo(isize),
    TogglePlayPause,
    Restart,
}

/// Keys the carousel reacts to, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    R,
}

pub fn command_for_key(key: Key) -> CarouselCommand {
    match key {
        Key::ArrowLeft => CarouselCommand::Prev,
        Key::ArrowRight => CarouselCommand::Next,
        Key::Space => CarouselCommand::TogglePlayPause,
        Key::R => CarouselCommand::Restart,
    }
}

/// Horizontal swipe detection for touch or mouse drags.
///
/// Dragging left past the threshold shows the next slide, dragging right the
/// previous one. A drag of exactly the threshold does nothing.
#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    threshold: f32,
    start_x: Option<f32>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self { threshold: threshold.abs(), start_x: None }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_tracking(&self) -> bool {
        self.start_x.is_some()
    }

    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
    }

    /// Finish the gesture at `x`. Returns a command when the drag was a swipe.
    pub fn end(&mut self, x: f32) -> Option<CarouselCommand> {
        let start = self.start_x.take()?;
        let dx = x - start;
        if dx < -self.threshold {
            Some(CarouselCommand::Next)
        } else if dx > self.threshold {
            Some(CarouselCommand::Prev)
        } else {
            None
        }
    }
}
