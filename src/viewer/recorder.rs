use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::{Context, Result};
use raylib::prelude::*;
use tracing::{info, warn};

/// Pipes rendered carousel frames into an `ffmpeg` child process.
pub struct FrameRecorder {
    process: Child,
    stdin: Option<ChildStdin>,
}

impl FrameRecorder {
    pub fn spawn(width: i32, height: i32, fps: u32, output: &Path) -> Result<Self> {
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::piped())
            .args(["-loglevel", "error"])
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pixel_format", "rgba"])
            .args(["-video_size", &format!("{}x{}", width, height)])
            .args(["-framerate", &format!("{}", fps)])
            .args(["-i", "-"])
            .args(["-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p"])
            .arg(output)
            .spawn()
            .context("failed to start ffmpeg")?;
        let stdin = process.stdin.take().context("failed to open ffmpeg stdin")?;
        info!(output = %output.display(), "recording carousel");
        Ok(Self { process, stdin: Some(stdin) })
    }

    pub fn write(&mut self, image: &Image) -> Result<()> {
        let stdin = self.stdin.as_mut().context("ffmpeg stdin already closed")?;
        let width = image.width() as usize;
        let height = image.height() as usize;
        let row_len = width * 4; // RGBA

        // raylib render textures are bottom-up, ffmpeg expects top-down rows
        let pixels = unsafe { std::slice::from_raw_parts(image.data() as *const u8, row_len * height) };
        for y in (0..height).rev() {
            stdin
                .write_all(&pixels[y * row_len..(y + 1) * row_len])
                .context("failed to write frame to ffmpeg")?;
        }
        Ok(())
    }
}

impl Drop for FrameRecorder {
    fn drop(&mut self) {
        // Closing stdin lets ffmpeg finish the file
        self.stdin = None;
        if let Err(e) = self.process.wait() {
            warn!(error = %e, "ffmpeg did not exit cleanly");
        }
    }
}
