use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::constants::*;
use crate::input::CarouselCommand;
use crate::media::{MediaPlayer, PlaybackError, Readiness};
use crate::observer::{CarouselObserver, TracingObserver};
use crate::slide::{PlaybackIndicator, Slide};
use crate::state::{CarouselState, NavOutcome, PendingPolicy};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CarouselError {
    #[error("carousel has no slides")]
    Empty,
    #[error("carousel is already initialized")]
    AlreadyInitialized,
    #[error("slide at position {position} has index {found}")]
    NonDenseIndex { position: usize, found: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselConfig {
    /// Time between accepting a slide change and committing it, matched to the panel animation.
    pub settle_delay: Duration,
    pub pending: PendingPolicy,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
            pending: PendingPolicy::default(),
        }
    }
}

/// Presents one slide at a time and hands media playback from slide to slide.
///
/// The host feeds it frame time through [`SlideCarousel::update`]; the settle delay
/// and media readiness are both resolved there, so nothing here ever blocks.
pub struct SlideCarousel<M, O = TracingObserver> {
    slides: Vec<Slide<M>>,
    state: CarouselState,
    config: CarouselConfig,
    observer: O,

    settle_timer: f32,
    pending: Option<usize>,
    // Active slide whose media has not reported ready yet
    awaiting: Option<usize>,
}

impl<M: MediaPlayer> SlideCarousel<M, TracingObserver> {
    pub fn new(config: CarouselConfig) -> Self {
        Self::with_observer(config, TracingObserver)
    }
}

impl<M: MediaPlayer, O: CarouselObserver> SlideCarousel<M, O> {
    pub fn with_observer(config: CarouselConfig, observer: O) -> Self {
        Self {
            slides: Vec::new(),
            state: CarouselState::Idle,
            config,
            observer,
            settle_timer: 0.0,
            pending: None,
            awaiting: None,
        }
    }

    /// Take ownership of the slides and start the first one.
    ///
    /// An empty list leaves the carousel idle; every later request is a no-op.
    pub fn init(&mut self, slides: Vec<Slide<M>>) -> Result<(), CarouselError> {
        if self.state != CarouselState::Idle {
            return Err(CarouselError::AlreadyInitialized);
        }
        if slides.is_empty() {
            debug!("carousel initialized without slides, staying idle");
            return Err(CarouselError::Empty);
        }
        if let Some((position, slide)) = slides.iter().enumerate().find(|(i, s)| s.index() != *i) {
            return Err(CarouselError::NonDenseIndex { position, found: slide.index() });
        }

        self.slides = slides;
        // Every slide starts buffering now so later visits rarely wait
        for slide in self.slides.iter_mut() {
            slide.media.pause();
            slide.media.load();
            slide.panel = Default::default();
            slide.indicator = Default::default();
        }

        self.slides[0].enter();
        self.state = CarouselState::Settled(0);
        self.awaiting = Some(0);
        debug!(slides = self.slides.len(), "carousel initialized");

        self.poll_awaiting();
        Ok(())
    }

    pub fn state(&self) -> CarouselState {
        self.state
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.active_index()
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning()
    }

    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[Slide<M>] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide<M>> {
        self.slides.get(index)
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Seconds left before the current transition settles.
    pub fn settle_remaining(&self) -> Option<f32> {
        self.state
            .is_transitioning()
            .then(|| (self.config.settle_delay.as_secs_f32() - self.settle_timer).max(0.0))
    }

    // --- Navigation ---

    /// Request `target` as the active slide. Out-of-range targets wrap around.
    pub fn go_to(&mut self, target: isize) -> NavOutcome {
        if self.slides.is_empty() {
            return NavOutcome::Ignored;
        }
        let index = target.rem_euclid(self.slides.len() as isize) as usize;

        match self.state {
            CarouselState::Idle => NavOutcome::Ignored,
            CarouselState::Transitioning { .. } => match self.config.pending {
                PendingPolicy::Queue => {
                    debug!(slide = index, "transition in flight, queueing request");
                    self.pending = Some(index);
                    NavOutcome::Queued(index)
                }
                PendingPolicy::Drop => {
                    debug!(slide = index, "transition in flight, dropping request");
                    NavOutcome::Dropped(index)
                }
            },
            CarouselState::Settled(active) if active == index => NavOutcome::Unchanged,
            CarouselState::Settled(active) => {
                self.begin_transition(active, index);
                NavOutcome::Started { from: active, to: index }
            }
        }
    }

    pub fn next(&mut self) -> NavOutcome {
        match self.active_index() {
            Some(active) => self.go_to(active as isize + 1),
            None => NavOutcome::Ignored,
        }
    }

    pub fn prev(&mut self) -> NavOutcome {
        match self.active_index() {
            Some(active) => self.go_to(active as isize - 1),
            None => NavOutcome::Ignored,
        }
    }

    /// Dispatch a command from the trigger surface.
    pub fn apply(&mut self, command: CarouselCommand) {
        match command {
            CarouselCommand::Prev => {
                self.prev();
            }
            CarouselCommand::Next => {
                self.next();
            }
            CarouselCommand::GoTo(index) => {
                self.go_to(index);
            }
            CarouselCommand::TogglePlayPause => {
                if let CarouselState::Settled(active) = self.state {
                    self.toggle_play_pause(active);
                }
            }
            CarouselCommand::Restart => {
                if let CarouselState::Settled(active) = self.state {
                    self.restart(active);
                }
            }
        }
    }

    /// Advance media clocks, the settle timer and pending readiness by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for slide in self.slides.iter_mut() {
            slide.media.advance(dt);
        }

        if let CarouselState::Transitioning { from, to } = self.state {
            self.settle_timer += dt;
            if self.settle_timer >= self.config.settle_delay.as_secs_f32() {
                self.settle(from, to);
            }
        }

        self.poll_awaiting();
    }

    // --- Per-slide controls ---

    /// Flip the active slide between playing and paused. Other slides are not controllable.
    pub fn toggle_play_pause(&mut self, index: usize) -> bool {
        if !self.is_controllable(index) {
            return false;
        }
        let slide = &mut self.slides[index];
        if slide.media.is_paused() {
            self.play_slide(index);
        } else {
            slide.media.pause();
            slide.indicator.playback = PlaybackIndicator::Paused;
        }
        true
    }

    /// Seek the active slide to the start and play it. Media that is still buffering
    /// starts as soon as it reports ready.
    pub fn restart(&mut self, index: usize) -> bool {
        if !self.is_controllable(index) {
            return false;
        }
        self.awaiting = None;
        let slide = &mut self.slides[index];
        slide.media.seek(0.0);
        match slide.media.play() {
            Err(PlaybackError::NotReady) => self.await_buffering(index),
            result => {
                slide.indicator.spinner = false;
                slide.indicator.playback = PlaybackIndicator::Playing;
                if let Err(error) = result {
                    self.observer.playback_failed(index, &error);
                }
            }
        }
        true
    }

    fn is_controllable(&self, index: usize) -> bool {
        let controllable = self.state == CarouselState::Settled(index);
        if !controllable {
            debug!(slide = index, state = ?self.state, "ignoring control for inactive slide");
        }
        controllable
    }

    // --- Transitions ---

    fn begin_transition(&mut self, from: usize, to: usize) {
        debug!(from, to, "starting slide transition");
        if self.awaiting == Some(from) {
            self.awaiting = None;
        }
        self.slides[from].leave();

        let target = &mut self.slides[to];
        target.enter();
        if target.media.readiness() == Readiness::Unloaded {
            target.media.load();
        }

        self.state = CarouselState::Transitioning { from, to };
        self.settle_timer = 0.0;

        if self.config.settle_delay.is_zero() {
            self.settle(from, to);
        }
    }

    fn settle(&mut self, from: usize, to: usize) {
        self.slides[from].panel.leaving = false;
        self.state = CarouselState::Settled(to);
        self.settle_timer = 0.0;
        self.awaiting = Some(to);
        self.poll_awaiting();
        self.observer.settled(to);

        if let Some(next) = self.pending.take() {
            if next != to {
                self.begin_transition(to, next);
            }
        }
    }

    // Start the awaited slide once its media has buffered enough
    fn poll_awaiting(&mut self) {
        let Some(index) = self.awaiting else {
            return;
        };
        if self.state != CarouselState::Settled(index) {
            return;
        }

        match self.slides[index].media.readiness() {
            Readiness::Ready => {
                self.awaiting = None;
                self.play_slide(index);
            }
            Readiness::Failed(error) => {
                self.awaiting = None;
                self.observer.load_failed(index, &error);
                let slide = &mut self.slides[index];
                slide.indicator.spinner = false;
                slide.indicator.playback = PlaybackIndicator::Paused;
            }
            Readiness::Unloaded => self.slides[index].media.load(),
            Readiness::Buffering => {}
        }
    }

    fn play_slide(&mut self, index: usize) {
        let result = self.slides[index].media.play();
        let slide = &mut self.slides[index];
        match result {
            Ok(()) => {
                slide.indicator.spinner = false;
                slide.indicator.playback = PlaybackIndicator::Playing;
            }
            Err(PlaybackError::NotReady) => self.await_buffering(index),
            Err(error) => {
                slide.indicator.spinner = false;
                slide.indicator.playback = PlaybackIndicator::Paused;
                self.observer.playback_failed(index, &error);
            }
        }
    }

    // Media still buffering: keep the spinner up and let poll_awaiting start it
    fn await_buffering(&mut self, index: usize) {
        debug!(slide = index, "media still buffering, play deferred");
        let slide = &mut self.slides[index];
        slide.indicator.spinner = true;
        slide.indicator.playback = PlaybackIndicator::Paused;
        self.awaiting = Some(index);
    }
}

impl<M, O> std::fmt::Debug for SlideCarousel<M, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideCarousel")
            .field("slides", &self.slides.len())
            .field("state", &self.state)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
