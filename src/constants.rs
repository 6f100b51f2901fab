pub const RENDER_WIDTH: i32 = 1920;           // Width of the viewer render texture
pub const RENDER_HEIGHT: i32 = 1080;          // Height of the viewer render texture
pub const FPS: u32 = 60;                      // Frames per second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32; // Time per frame when recording (seconds)

pub const SETTLE_DELAY_MS: u64 = 400;         // Wait between starting a slide change and committing it
pub const SWIPE_THRESHOLD: f32 = 50.0;        // Horizontal drag (logical px) that counts as a swipe
pub const CLIP_DURATION: f32 = 8.0;           // Length of one Ken Burns clip (seconds)
pub const CLIP_BUFFER_TIME: f32 = 0.25;       // Simulated buffering before a clip is playable (seconds)

pub const KEN_BURNS_ZOOM: f32 = 0.9;          // Source rect scale at the end of a clip
pub const KEN_BURNS_PAN: f32 = 0.10;          // Pan distance over a clip (fraction of texture)

pub const TESTIMONIAL_COOLDOWN_DAYS: i64 = 7; // One testimonial per browser per week
pub const SYSTEM_TOKEN: &str = "system";      // Token carried by curated testimonials

pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
