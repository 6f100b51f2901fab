use rand::Rng;
use crate::constants::*;
use crate::media::{LoadError, MediaPlayer, PlaybackError, Readiness};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl PanDirection {
    pub fn random() -> Self {
        match rand::rng().random_range(0..4) {
            0 => PanDirection::LeftToRight,
            1 => PanDirection::RightToLeft,
            2 => PanDirection::TopToBottom,
            _ => PanDirection::BottomToTop,
        }
    }

    // Pan offset reached at the end of the clip
    fn end_offset(self) -> (f32, f32) {
        match self {
            PanDirection::LeftToRight => ( KEN_BURNS_PAN, 0.0),
            PanDirection::RightToLeft => (-KEN_BURNS_PAN, 0.0),
            PanDirection::TopToBottom => (0.0,  KEN_BURNS_PAN),
            PanDirection::BottomToTop => (0.0, -KEN_BURNS_PAN),
        }
    }
}

/// Source-rect parameters for drawing the clip at its current position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KenBurnsFrame {
    pub zoom: f32,  // Fraction of the texture visible (1.0 = whole image)
    pub pan_x: f32, // Offset as a fraction of texture width
    pub pan_y: f32, // Offset as a fraction of texture height
    pub direction: PanDirection,
}

#[derive(Debug, Clone, PartialEq)]
enum ClipLoad {
    Unloaded,
    Buffering { elapsed: f32 },
    Ready,
    Failed(LoadError),
}

/// A still image "played" as a slow pan and zoom.
///
/// The clip has a real clock: `advance` moves the position while playing, `seek`
/// jumps, and the clip loops when it reaches its duration.
#[derive(Debug, Clone)]
pub struct KenBurnsClip {
    duration: f32,
    buffer_time: f32,
    load: ClipLoad,
    position: f32,
    playing: bool,
    looping: bool,
    direction: PanDirection,
    // Set when the backing image could not be read; load() reports it
    source_error: Option<LoadError>,
}

impl KenBurnsClip {
    pub fn new(duration: f32) -> Self {
        Self::with_direction(duration, PanDirection::random())
    }

    pub fn with_direction(duration: f32, direction: PanDirection) -> Self {
        Self {
            duration: duration.max(FRAME_TIME),
            buffer_time: CLIP_BUFFER_TIME,
            load: ClipLoad::Unloaded,
            position: 0.0,
            playing: false,
            looping: true,
            direction,
            source_error: None,
        }
    }

    /// A clip whose image is missing; loading it always fails.
    pub fn unavailable(error: LoadError) -> Self {
        let mut clip = Self::with_direction(CLIP_DURATION, PanDirection::LeftToRight);
        clip.source_error = Some(error);
        clip
    }

    pub fn buffer_time(mut self, seconds: f32) -> Self {
        self.buffer_time = seconds.max(0.0);
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn frame(&self) -> KenBurnsFrame {
        let t = (self.position / self.duration).clamp(0.0, 1.0);
        let (end_x, end_y) = self.direction.end_offset();
        KenBurnsFrame {
            zoom: 1.0 + (KEN_BURNS_ZOOM - 1.0) * t,
            pan_x: end_x * t,
            pan_y: end_y * t,
            direction: self.direction,
        }
    }
}

impl MediaPlayer for KenBurnsClip {
    fn load(&mut self) {
        if let Some(error) = &self.source_error {
            self.load = ClipLoad::Failed(error.clone());
            return;
        }
        if self.load == ClipLoad::Unloaded {
            self.load = if self.buffer_time <= 0.0 {
                ClipLoad::Ready
            } else {
                ClipLoad::Buffering { elapsed: 0.0 }
            };
        }
    }

    fn readiness(&self) -> Readiness {
        match &self.load {
            ClipLoad::Unloaded => Readiness::Unloaded,
            ClipLoad::Buffering { .. } => Readiness::Buffering,
            ClipLoad::Ready => Readiness::Ready,
            ClipLoad::Failed(error) => Readiness::Failed(error.clone()),
        }
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        match &self.load {
            ClipLoad::Ready => {
                self.playing = true;
                Ok(())
            }
            ClipLoad::Failed(error) => Err(PlaybackError::Failed(error.to_string())),
            _ => Err(PlaybackError::NotReady),
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f32) {
        self.position = seconds.clamp(0.0, self.duration);
    }

    fn is_paused(&self) -> bool {
        !self.playing
    }

    fn position(&self) -> f32 {
        self.position
    }

    fn advance(&mut self, dt: f32) {
        if let ClipLoad::Buffering { elapsed } = &mut self.load {
            *elapsed += dt;
            if *elapsed >= self.buffer_time {
                self.load = ClipLoad::Ready;
            }
        }

        if !self.playing {
            return;
        }
        self.position += dt;
        if self.position >= self.duration {
            if self.looping {
                self.position %= self.duration;
            } else {
                self.position = self.duration;
                self.playing = false;
            }
        }
    }
}
