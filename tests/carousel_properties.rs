//! Property tests for the carousel state machine.
//!
//! Arbitrary sequences of navigation, per-slide controls and frame updates must keep:
//!
//! 1. Exactly one slide designated active, matching the carousel state
//! 2. At most one slide playing, and only once the carousel has settled on it
//! 3. Play/pause indicators in step with the media, and the spinner only over a
//!    buffering active slide, even when controls arrive mid-buffer
//! 4. Out-of-range targets wrapped onto a real slide
//! 5. A settled carousel with no pending request once enough time has passed

use std::time::Duration;

use proptest::prelude::*;
use showreel::media::{MediaPlayer, PlaybackError, Readiness};
use showreel::slide::PlaybackIndicator;
use showreel::{CarouselCommand, CarouselConfig, CarouselState, PendingPolicy, Slide, SlideCarousel};

const BUFFER_TIME: f32 = 0.5;

/// Buffers for `BUFFER_TIME` of update time after `load`, and refuses to play until then.
#[derive(Debug, Default)]
struct FakeMedia {
    loaded: bool,
    buffer_left: f32,
    playing: bool,
    position: f32,
}

impl MediaPlayer for FakeMedia {
    fn load(&mut self) {
        if !self.loaded {
            self.loaded = true;
            self.buffer_left = BUFFER_TIME;
        }
    }

    fn readiness(&self) -> Readiness {
        if !self.loaded {
            Readiness::Unloaded
        } else if self.buffer_left > 0.0 {
            Readiness::Buffering
        } else {
            Readiness::Ready
        }
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.readiness() != Readiness::Ready {
            return Err(PlaybackError::NotReady);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f32) {
        self.position = seconds;
    }

    fn is_paused(&self) -> bool {
        !self.playing
    }

    fn position(&self) -> f32 {
        self.position
    }

    fn advance(&mut self, dt: f32) {
        if self.loaded && self.buffer_left > 0.0 {
            self.buffer_left = (self.buffer_left - dt).max(0.0);
        }
        if self.playing {
            self.position += dt;
        }
    }
}

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Command(CarouselCommand),
    Update(f32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Command(CarouselCommand::Next)),
        Just(Op::Command(CarouselCommand::Prev)),
        (-12isize..12).prop_map(|i| Op::Command(CarouselCommand::GoTo(i))),
        Just(Op::Command(CarouselCommand::TogglePlayPause)),
        Just(Op::Command(CarouselCommand::Restart)),
        (0.0f32..0.3).prop_map(Op::Update),
    ]
}

fn policy_strategy() -> impl Strategy<Value = PendingPolicy> {
    prop_oneof![Just(PendingPolicy::Queue), Just(PendingPolicy::Drop)]
}

fn carousel(len: usize, settle_ms: u64, pending: PendingPolicy) -> SlideCarousel<FakeMedia> {
    let config = CarouselConfig { settle_delay: Duration::from_millis(settle_ms), pending };
    let mut carousel = SlideCarousel::new(config);
    let slides = (0..len).map(|i| Slide::new(i, FakeMedia::default())).collect();
    carousel.init(slides).unwrap();
    carousel
}

fn apply(carousel: &mut SlideCarousel<FakeMedia>, op: &Op) {
    match op {
        Op::Command(command) => carousel.apply(*command),
        Op::Update(dt) => carousel.update(*dt),
    }
}

fn check_invariants(carousel: &SlideCarousel<FakeMedia>) {
    let active: Vec<usize> = carousel.slides().iter().filter(|s| s.panel().active).map(|s| s.index()).collect();
    assert_eq!(active.len(), 1, "exactly one active slide, got {active:?}");
    assert_eq!(Some(active[0]), carousel.active_index());

    let playing: Vec<usize> = carousel.slides().iter().filter(|s| !s.media().is_paused()).map(|s| s.index()).collect();
    assert!(playing.len() <= 1, "more than one slide playing: {playing:?}");
    match carousel.state() {
        CarouselState::Settled(index) => assert!(playing.iter().all(|&p| p == index)),
        CarouselState::Transitioning { .. } => assert!(playing.is_empty(), "playing during transition: {playing:?}"),
        CarouselState::Idle => unreachable!("initialized carousel went idle"),
    }

    for slide in carousel.slides() {
        let shown = slide.indicator().playback == PlaybackIndicator::Playing;
        assert_eq!(shown, !slide.media().is_paused(), "indicator out of step on slide {}", slide.index());

        let spinner = slide.indicator().spinner;
        if spinner {
            assert!(slide.panel().active, "spinner on inactive slide {}", slide.index());
            assert!(slide.media().is_paused(), "spinner over playing slide {}", slide.index());
        }
        if carousel.state() == CarouselState::Settled(slide.index()) && slide.media().readiness() == Readiness::Ready {
            assert!(!spinner, "spinner left on ready slide {}", slide.index());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 1-3. Structural invariants hold after every step
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_for_any_sequence(
        len in 1usize..6,
        settle_ms in prop_oneof![Just(0u64), 100u64..600],
        pending in policy_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..60),
    ) {
        let mut carousel = carousel(len, settle_ms, pending);
        check_invariants(&carousel);
        for op in &ops {
            apply(&mut carousel, op);
            check_invariants(&carousel);
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // 4. Wraparound
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn go_to_wraps_any_target(len in 1usize..8, target in -30isize..30) {
        let mut carousel = carousel(len, 0, PendingPolicy::Queue);
        carousel.go_to(target);
        prop_assert_eq!(carousel.state(), CarouselState::Settled(target.rem_euclid(len as isize) as usize));
    }

    #[test]
    fn next_cycles_back_to_start(len in 1usize..8) {
        let mut carousel = carousel(len, 0, PendingPolicy::Queue);
        for _ in 0..len {
            carousel.next();
        }
        prop_assert_eq!(carousel.state(), CarouselState::Settled(0));
        carousel.prev();
        prop_assert_eq!(carousel.state(), CarouselState::Settled(len - 1));
    }

    // ═══════════════════════════════════════════════════════════════════
    // 5. Time always brings the carousel to rest
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn carousel_settles_after_enough_time(
        len in 1usize..6,
        pending in policy_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let mut carousel = carousel(len, 400, pending);
        for op in &ops {
            apply(&mut carousel, op);
        }
        // One update settles the current transition, a second settles a queued one
        for _ in 0..3 {
            carousel.update(1.0);
        }
        prop_assert!(matches!(carousel.state(), CarouselState::Settled(_)));
        prop_assert_eq!(carousel.pending(), None);
        let active = carousel.slide(carousel.active_index().unwrap()).unwrap();
        prop_assert!(!active.indicator().spinner);
    }

    #[test]
    fn restart_during_buffering_still_plays(len in 1usize..5, early in 0.0f32..0.4) {
        let mut carousel = carousel(len, 400, PendingPolicy::Queue);
        carousel.update(early);
        carousel.apply(CarouselCommand::Restart);
        for _ in 0..60 {
            carousel.update(1.0 / 60.0);
        }
        let first = carousel.slide(0).unwrap();
        prop_assert!(!first.media().is_paused());
        prop_assert_eq!(first.indicator().playback, PlaybackIndicator::Playing);
    }
}

#[test]
fn queued_request_wins_over_earlier_ones() {
    let mut carousel = carousel(5, 400, PendingPolicy::Queue);
    carousel.go_to(1);
    carousel.go_to(3);
    carousel.go_to(4);
    assert_eq!(carousel.pending(), Some(4));

    carousel.update(0.5);
    assert_eq!(carousel.state(), CarouselState::Transitioning { from: 1, to: 4 });
    carousel.update(0.5);
    assert_eq!(carousel.state(), CarouselState::Settled(4));
}

#[test]
fn dropped_requests_leave_the_first_transition_alone() {
    let mut carousel = carousel(5, 400, PendingPolicy::Drop);
    carousel.go_to(1);
    carousel.go_to(3);
    assert_eq!(carousel.pending(), None);

    carousel.update(0.5);
    assert_eq!(carousel.state(), CarouselState::Settled(1));
}
