//! raylib window that presents a directory of images as a carousel of Ken Burns clips.

mod layout;
mod recorder;
mod texture_loader;

pub use layout::ControlLayout;

use std::path::Path;

use anyhow::{Context, Result, bail};
use raylib::prelude::*;
use tracing::{info, warn};

use crate::carousel::SlideCarousel;
use crate::config::CarouselSettings;
use crate::constants::*;
use crate::input::{Key, SwipeTracker, command_for_key};
use crate::media::{KenBurnsClip, LoadError, MediaPlayer, PanDirection, Readiness};
use crate::slide::{PlaybackIndicator, Slide};

use recorder::FrameRecorder;
use texture_loader::{load_sorted_image_paths, load_texture_with_exif_rotation};

const ACCENT: Color = Color::new(255, 125, 0, 255);

type Carousel = SlideCarousel<KenBurnsClip>;

fn faded(color: Color, alpha: f32) -> Color {
    Color::new(color.r, color.g, color.b, (alpha.clamp(0.0, 1.0) * color.a as f32) as u8)
}

fn key_pressed(rl: &RaylibHandle) -> Option<Key> {
    if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
        Some(Key::ArrowLeft)
    } else if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
        Some(Key::ArrowRight)
    } else if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
        Some(Key::Space)
    } else if rl.is_key_pressed(KeyboardKey::KEY_R) {
        Some(Key::R)
    } else {
        None
    }
}

/// Open the viewer on `dir` and run until the window closes.
pub fn run(dir: &Path, settings: &CarouselSettings, record: Option<&Path>) -> Result<()> {
    let image_paths = load_sorted_image_paths(dir)?;

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Showreel")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Build Slides ---
    let mut textures: Vec<Option<Texture2D>> = Vec::with_capacity(image_paths.len());
    let mut slides = Vec::with_capacity(image_paths.len());
    for (index, path) in image_paths.iter().enumerate() {
        let label = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let clip = match load_texture_with_exif_rotation(&mut rl, &thread, path) {
            Ok(texture) => {
                textures.push(Some(texture));
                KenBurnsClip::with_direction(settings.clip_seconds, PanDirection::random())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "slide image unavailable");
                textures.push(None);
                KenBurnsClip::unavailable(LoadError::Decode(e.to_string()))
            }
        };
        slides.push(Slide::new(index, clip).with_label(label));
    }
    if textures.iter().all(Option::is_none) {
        bail!("none of the images in {} could be loaded", dir.display());
    }

    let mut carousel: Carousel = SlideCarousel::new(settings.carousel_config());
    carousel.init(slides)?;
    info!(slides = carousel.len(), "viewer ready");

    let layout = ControlLayout::new(carousel.len());
    let mut swipe = SwipeTracker::new(settings.swipe_threshold);
    let mut recorder = record
        .map(|path| FrameRecorder::spawn(RENDER_WIDTH, RENDER_HEIGHT, FPS, path))
        .transpose()?;
    let mut framebuffer = rl
        .load_render_texture(&thread, RENDER_WIDTH as u32, RENDER_HEIGHT as u32)
        .map_err(|e| anyhow::anyhow!("failed to create render texture: {e}"))?;
    let mut clock = 0.0_f32;

    // --- Main Loop ---
    while !rl.window_should_close() {
        // Fixed steps while recording so the video plays back at real speed
        let dt = if recorder.is_some() { FRAME_TIME } else { rl.get_frame_time() };
        clock += dt;

        // --- Input ---
        if let Some(key) = key_pressed(&rl) {
            carousel.apply(command_for_key(key));
        }

        let screen = (rl.get_screen_width() as f32, rl.get_screen_height() as f32);
        let mouse = rl.get_mouse_position();
        let (mx, my) = layout.to_render(mouse.x, mouse.y, screen.0, screen.1);
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            swipe.begin(mx);
        }
        if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            // A release that was not a swipe is a click on whatever control is under it
            match swipe.end(mx) {
                Some(command) => carousel.apply(command),
                None => {
                    if let Some(command) = layout.hit(mx, my) {
                        carousel.apply(command);
                    }
                }
            }
        }

        // --- Update ---
        carousel.update(dt);

        // --- Render into the fixed size framebuffer ---
        rl.draw_texture_mode(&thread, &mut framebuffer, |mut tmd| {
            let mut d = tmd.begin_drawing(&thread);
            d.clear_background(Color::BLACK);
            draw_slides(&mut d, &carousel, &textures);
            draw_controls(&mut d, &carousel, &layout, clock);
        });

        let mut d2 = rl.begin_drawing(&thread);
        let sw = d2.get_screen_width() as f32;
        let sh = d2.get_screen_height() as f32;
        d2.draw_texture_pro(
            &framebuffer,
            Rectangle::new(0.0, 0.0, framebuffer.width() as f32, -(framebuffer.height() as f32)),
            Rectangle::new(0.0, 0.0, sw, sh),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
        drop(d2);

        if let Some(recorder) = recorder.as_mut() {
            let image = framebuffer
                .load_image()
                .map_err(|e| anyhow::anyhow!("failed to read back frame: {e}"))?;
            recorder.write(&image).context("recording stopped")?;
        }
    }

    Ok(())
}

fn draw_slides(d: &mut RaylibDrawHandle, carousel: &Carousel, textures: &[Option<Texture2D>]) {
    let delay = carousel.config().settle_delay.as_secs_f32();
    let progress = match carousel.settle_remaining() {
        Some(remaining) if delay > 0.0 => 1.0 - remaining / delay,
        _ => 1.0,
    };

    for slide in carousel.slides() {
        let panel = slide.panel();
        let alpha = if panel.leaving {
            1.0 - progress
        } else if panel.active {
            progress
        } else {
            continue;
        };

        match &textures[slide.index()] {
            Some(texture) => draw_clip(d, texture, slide.media(), alpha),
            None => {
                d.draw_text(
                    &format!("{} could not be loaded", slide.label()),
                    60,
                    RENDER_HEIGHT / 2,
                    40,
                    faded(Color::RED, alpha),
                );
            }
        }
        if panel.active {
            d.draw_text(slide.label(), 40, 40, 30, faded(Color::WHITE, alpha));
        }
    }
}

fn draw_clip(d: &mut RaylibDrawHandle, texture: &Texture2D, clip: &KenBurnsClip, alpha: f32) {
    let frame = clip.frame();
    let tex_width = texture.width() as f32;
    let tex_height = texture.height() as f32;
    let visible_width = tex_width * frame.zoom;
    let visible_height = tex_height * frame.zoom;

    // Pan starts from the edge the clip moves away from
    let origin = match frame.direction {
        PanDirection::LeftToRight => Vector2::new(0.0, (tex_height - visible_height) * 0.5),
        PanDirection::RightToLeft => Vector2::new(tex_width - visible_width, (tex_height - visible_height) * 0.5),
        PanDirection::TopToBottom => Vector2::new((tex_width - visible_width) * 0.5, 0.0),
        PanDirection::BottomToTop => Vector2::new((tex_width - visible_width) * 0.5, tex_height - visible_height),
    };
    let source = Rectangle::new(
        origin.x + frame.pan_x * tex_width,
        origin.y + frame.pan_y * tex_height,
        visible_width,
        visible_height,
    );

    let scale = (RENDER_WIDTH as f32 / visible_width).min(RENDER_HEIGHT as f32 / visible_height);
    let (width, height) = (visible_width * scale, visible_height * scale);
    let dest = Rectangle::new(
        (RENDER_WIDTH as f32 - width) * 0.5,
        (RENDER_HEIGHT as f32 - height) * 0.5,
        width,
        height,
    );

    d.draw_texture_pro(texture, source, dest, Vector2::new(0.0, 0.0), 0.0, faded(Color::WHITE, alpha));
}

fn draw_controls(d: &mut RaylibDrawHandle, carousel: &Carousel, layout: &ControlLayout, clock: f32) {
    let grey = Color::new(255, 255, 255, 90);

    // Prev / next
    let r = layout.nav_radius();
    let (px, py) = layout.prev_button();
    d.draw_circle(px as i32, py as i32, r, grey);
    d.draw_triangle(
        Vector2::new(px - r * 0.4, py),
        Vector2::new(px + r * 0.3, py + r * 0.5),
        Vector2::new(px + r * 0.3, py - r * 0.5),
        Color::WHITE,
    );
    let (nx, ny) = layout.next_button();
    d.draw_circle(nx as i32, ny as i32, r, grey);
    d.draw_triangle(
        Vector2::new(nx + r * 0.4, ny),
        Vector2::new(nx - r * 0.3, ny - r * 0.5),
        Vector2::new(nx - r * 0.3, ny + r * 0.5),
        Color::WHITE,
    );

    // Indicator dots
    for slide in carousel.slides() {
        let (x, y) = layout.dot(slide.index());
        let color = if slide.panel().active { ACCENT } else { grey };
        d.draw_circle(x as i32, y as i32, layout.dot_radius(), color);
    }

    let Some(active) = carousel.active_index().and_then(|i| carousel.slide(i)) else {
        return;
    };
    let indicator = active.indicator();

    // Play / pause shows the action a click will take
    let c = layout.control_radius();
    let (bx, by) = layout.play_pause_button();
    d.draw_circle(bx as i32, by as i32, c, grey);
    match indicator.playback {
        PlaybackIndicator::Playing => {
            d.draw_rectangle((bx - c * 0.35) as i32, (by - c * 0.4) as i32, (c * 0.25) as i32, (c * 0.8) as i32, Color::WHITE);
            d.draw_rectangle((bx + c * 0.1) as i32, (by - c * 0.4) as i32, (c * 0.25) as i32, (c * 0.8) as i32, Color::WHITE);
        }
        PlaybackIndicator::Paused => {
            d.draw_triangle(
                Vector2::new(bx - c * 0.3, by - c * 0.45),
                Vector2::new(bx - c * 0.3, by + c * 0.45),
                Vector2::new(bx + c * 0.45, by),
                Color::WHITE,
            );
        }
    }

    let (rx, ry) = layout.restart_button();
    d.draw_circle(rx as i32, ry as i32, c, grey);
    d.draw_ring(Vector2::new(rx, ry), c * 0.35, c * 0.5, 45.0, 360.0, 24, Color::WHITE);

    if indicator.spinner {
        let start = (clock * 360.0) % 360.0;
        d.draw_ring(
            Vector2::new(RENDER_WIDTH as f32 * 0.5, RENDER_HEIGHT as f32 * 0.5),
            36.0,
            46.0,
            start,
            start + 270.0,
            32,
            ACCENT,
        );
    }
    if let Readiness::Failed(error) = active.media().readiness() {
        d.draw_text(&error.to_string(), 60, RENDER_HEIGHT - 160, 28, Color::RED);
    }
}
