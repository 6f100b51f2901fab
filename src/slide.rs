use crate::media::MediaPlayer;

/// Presentation flags the render surface reads for a slide panel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PanelState {
    pub active: bool,
    pub leaving: bool,  // Animating out after losing the active designation
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackIndicator {
    Playing,
    #[default]
    Paused,
}

/// Play/pause icon and loading spinner for a slide.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorState {
    pub playback: PlaybackIndicator,
    pub spinner: bool,
}

/// What happens to a slide's media position when it stops being active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RewindPolicy {
    #[default]
    Rewind,
    Resume,
}

pub struct Slide<M> {
    index: usize,
    label: String,
    pub(crate) media: M,
    pub(crate) panel: PanelState,
    pub(crate) indicator: IndicatorState,
    rewind: RewindPolicy,
}

impl<M: MediaPlayer> Slide<M> {
    pub fn new(index: usize, media: M) -> Self {
        Self {
            index,
            label: format!("slide {}", index + 1),
            media,
            panel: PanelState::default(),
            indicator: IndicatorState::default(),
            rewind: RewindPolicy::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_rewind(mut self, rewind: RewindPolicy) -> Self {
        self.rewind = rewind;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    pub fn indicator(&self) -> IndicatorState {
        self.indicator
    }

    pub fn rewind(&self) -> RewindPolicy {
        self.rewind
    }

    // Stop playback as the slide animates out
    pub(crate) fn leave(&mut self) {
        self.media.pause();
        if self.rewind == RewindPolicy::Rewind {
            self.media.seek(0.0);
        }
        self.panel.active = false;
        self.panel.leaving = true;
        self.indicator = IndicatorState { playback: PlaybackIndicator::Paused, spinner: false };
    }

    pub(crate) fn enter(&mut self) {
        self.panel.active = true;
        self.panel.leaving = false;
        self.indicator.spinner = true;
    }
}

impl<M> std::fmt::Debug for Slide<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slide")
            .field("index", &self.index)
            .field("label", &self.label)
            .field("panel", &self.panel)
            .field("indicator", &self.indicator)
            .field("rewind", &self.rewind)
            .finish_non_exhaustive()
    }
}
