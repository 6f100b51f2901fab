/// Where the carousel is in its slide lifecycle.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CarouselState {
    Idle,                                      // No slides, every request is a no-op
    Settled(usize),                            // Slide is active and nothing is moving
    Transitioning { from: usize, to: usize },  // `from` animates out, `to` waits for the settle delay
}

impl CarouselState {
    /// Slide carrying the active designation. During a transition that is the target.
    pub fn active_index(&self) -> Option<usize> {
        match *self {
            CarouselState::Idle => None,
            CarouselState::Settled(index) => Some(index),
            CarouselState::Transitioning { to, .. } => Some(to),
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self, CarouselState::Transitioning { .. })
    }
}

/// What happens to a `go_to` that arrives while a transition is in flight.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingPolicy {
    /// Remember the latest request and start it once the current transition settles.
    #[default]
    Queue,
    /// Ignore the request.
    Drop,
}

/// Result of a navigation request.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NavOutcome {
    Ignored,                // Carousel is idle
    Unchanged,              // Target is already active
    Started { from: usize, to: usize },
    Queued(usize),
    Dropped(usize),
}
