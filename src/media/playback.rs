use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::process::{MediaTools, drain, join_drain, kill_quietly};
use crate::render::surface::RasterImage;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{Receiver, RecvTimeoutError, sync_channel};
use std::thread::JoinHandle;
use std::time::Duration;

const FRAME_QUEUE: usize = 8;

/// A looping background video decoded to canvas-sized frames by a long-lived `ffmpeg` child.
///
/// Frames arrive already scaled to cover the canvas and center-cropped. When the decoder
/// falls behind, [`VideoPlayback::next_frame`] hands back the last good frame.
pub struct VideoPlayback {
    child: Option<Child>,
    frames: Option<Receiver<Vec<u8>>>,
    reader: Option<JoinHandle<()>>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    canvas: Canvas,
    last: RasterImage,
    stalls: u64,
}

impl std::fmt::Debug for VideoPlayback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoPlayback")
            .field("canvas", &self.canvas)
            .field("running", &self.child.is_some())
            .field("stalls", &self.stalls)
            .finish()
    }
}

impl VideoPlayback {
    /// Start looping playback and wait up to `ready_timeout` for the first frame.
    #[tracing::instrument(skip(tools, path), fields(path = %path.display()))]
    pub fn open(
        tools: &MediaTools,
        path: &Path,
        canvas: Canvas,
        fps: Fps,
        ready_timeout: Duration,
    ) -> ReelResult<Self> {
        let (w, h) = (canvas.width, canvas.height);
        let vf = format!(
            "fps={}/{},scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}",
            fps.num, fps.den
        );
        let mut cmd = Command::new(&tools.ffmpeg);
        cmd.args(["-hide_banner", "-loglevel", "error", "-stream_loop", "-1", "-i"])
            .arg(path)
            .args(["-an", "-vf", &vf, "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            ReelError::media(format!(
                "failed to spawn ffmpeg '{}' for background playback: {e}",
                tools.ffmpeg.display()
            ))
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ReelError::media("ffmpeg stdout not available"))?;
        let stderr = child.stderr.take().map(drain);

        let frame_len = canvas.rgba_len();
        let (tx, rx) = sync_channel::<Vec<u8>>(FRAME_QUEUE);
        let reader = std::thread::spawn(move || {
            let mut stdout = stdout;
            loop {
                let mut buf = vec![0u8; frame_len];
                if stdout.read_exact(&mut buf).is_err() {
                    break;
                }
                if tx.send(buf).is_err() {
                    break;
                }
            }
        });

        let mut playback = Self {
            child: Some(child),
            frames: Some(rx),
            reader: Some(reader),
            stderr,
            canvas,
            last: RasterImage::from_straight_bytes(&vec![0u8; frame_len], w, h)?,
            stalls: 0,
        };

        let first = match playback.recv(ready_timeout) {
            Ok(bytes) => bytes,
            Err(RecvTimeoutError::Timeout) => {
                playback.stop();
                return Err(ReelError::timeout("background video load", ready_timeout));
            }
            Err(RecvTimeoutError::Disconnected) => {
                let stderr = playback.stop();
                return Err(ReelError::media(format!(
                    "background video '{}' produced no frames: {}",
                    path.display(),
                    stderr.trim()
                )));
            }
        };
        playback.last = RasterImage::from_straight_bytes(&first, w, h)?;
        tracing::debug!(width = w, height = h, "background playback ready");
        Ok(playback)
    }

    fn recv(&self, wait: Duration) -> Result<Vec<u8>, RecvTimeoutError> {
        match &self.frames {
            Some(rx) => rx.recv_timeout(wait),
            None => Err(RecvTimeoutError::Disconnected),
        }
    }

    /// Most recently decoded frame.
    pub fn current(&self) -> &RasterImage {
        &self.last
    }

    /// Number of times a frame had to be reused because the decoder stalled.
    pub fn stalls(&self) -> u64 {
        self.stalls
    }

    /// Advance to the next decoded frame, reusing the last one if none arrives within `wait`.
    pub fn next_frame(&mut self, wait: Duration) -> ReelResult<&RasterImage> {
        match self.recv(wait) {
            Ok(bytes) => {
                self.last =
                    RasterImage::from_straight_bytes(&bytes, self.canvas.width, self.canvas.height)?;
            }
            Err(err) => {
                self.stalls += 1;
                if self.stalls == 1 || self.stalls.is_multiple_of(30) {
                    tracing::warn!(
                        stalls = self.stalls,
                        disconnected = matches!(err, RecvTimeoutError::Disconnected),
                        "background video stalled, reusing last frame"
                    );
                }
            }
        }
        Ok(&self.last)
    }

    /// Stop the decoder and return whatever it wrote to stderr.
    pub fn stop(&mut self) -> String {
        // Dropping the receiver unblocks a reader parked on a full queue.
        self.frames = None;
        if let Some(mut child) = self.child.take() {
            kill_quietly(&mut child);
        }
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        join_drain(self.stderr.take(), "ffmpeg stderr")
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    }
}

impl Drop for VideoPlayback {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/playback.rs"]
mod tests;
