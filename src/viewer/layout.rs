use crate::constants::*;
use crate::input::CarouselCommand;

const NAV_RADIUS: f32 = 40.0;
const NAV_MARGIN: f32 = 80.0;
const DOT_RADIUS: f32 = 10.0;
const DOT_SPACING: f32 = 36.0;
const DOT_HIT_RADIUS: f32 = 16.0;
const CONTROL_RADIUS: f32 = 28.0;

/// Positions of the on-screen controls in render-texture coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ControlLayout {
    pub width: f32,
    pub height: f32,
    pub slide_count: usize,
}

fn within(x: f32, y: f32, (cx, cy): (f32, f32), radius: f32) -> bool {
    let (dx, dy) = (x - cx, y - cy);
    dx * dx + dy * dy <= radius * radius
}

impl ControlLayout {
    pub fn new(slide_count: usize) -> Self {
        Self { width: RENDER_WIDTH as f32, height: RENDER_HEIGHT as f32, slide_count }
    }

    pub fn nav_radius(&self) -> f32 {
        NAV_RADIUS
    }

    pub fn dot_radius(&self) -> f32 {
        DOT_RADIUS
    }

    pub fn control_radius(&self) -> f32 {
        CONTROL_RADIUS
    }

    pub fn prev_button(&self) -> (f32, f32) {
        (NAV_MARGIN, self.height * 0.5)
    }

    pub fn next_button(&self) -> (f32, f32) {
        (self.width - NAV_MARGIN, self.height * 0.5)
    }

    pub fn play_pause_button(&self) -> (f32, f32) {
        (NAV_MARGIN, self.height - NAV_MARGIN)
    }

    pub fn restart_button(&self) -> (f32, f32) {
        (NAV_MARGIN * 2.0, self.height - NAV_MARGIN)
    }

    pub fn dot(&self, index: usize) -> (f32, f32) {
        let row = DOT_SPACING * self.slide_count.saturating_sub(1) as f32;
        let x = self.width * 0.5 - row * 0.5 + DOT_SPACING * index as f32;
        (x, self.height - 60.0)
    }

    /// Map a click to the command of the control under it.
    pub fn hit(&self, x: f32, y: f32) -> Option<CarouselCommand> {
        if within(x, y, self.prev_button(), NAV_RADIUS) {
            return Some(CarouselCommand::Prev);
        }
        if within(x, y, self.next_button(), NAV_RADIUS) {
            return Some(CarouselCommand::Next);
        }
        if within(x, y, self.play_pause_button(), CONTROL_RADIUS) {
            return Some(CarouselCommand::TogglePlayPause);
        }
        if within(x, y, self.restart_button(), CONTROL_RADIUS) {
            return Some(CarouselCommand::Restart);
        }
        (0..self.slide_count)
            .find(|&i| within(x, y, self.dot(i), DOT_HIT_RADIUS))
            .map(|i| CarouselCommand::GoTo(i as isize))
    }

    /// Convert a window position to render-texture coordinates.
    pub fn to_render(&self, x: f32, y: f32, screen_width: f32, screen_height: f32) -> (f32, f32) {
        if screen_width <= 0.0 || screen_height <= 0.0 {
            return (x, y);
        }
        (x * self.width / screen_width, y * self.height / screen_height)
    }
}
