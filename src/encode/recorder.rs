use crate::encode::blob::MediaBlob;
use crate::encode::sink::{CaptureStream, FrameSink};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::process::{MediaTools, drain, join_drain, kill_quietly};
use crate::render::surface::{FrameRGBA, flatten_premul_over_bg_to_opaque_rgba8};
use std::io::Write as _;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

pub const WEBM_VP8: &str = "video/webm;codecs=vp8";
pub const WEBM_VP8_OPUS: &str = "video/webm;codecs=vp8,opus";

const OPUS_BITRATE: &str = "128k";

/// Video bitrate tier for an export of `total_secs`.
pub fn bitrate_for_duration(total_secs: f64) -> u32 {
    if total_secs <= 30.0 {
        8_000_000
    } else if total_secs <= 90.0 {
        5_000_000
    } else {
        2_500_000
    }
}

type Drain = Option<JoinHandle<std::io::Result<Vec<u8>>>>;

/// Live WebM recorder: raw frames go to `ffmpeg` stdin, container chunks come back on stdout.
///
/// Frames are flattened over black before encoding since the container carries no alpha.
pub struct ContainerRecorder {
    tools: MediaTools,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_drain: Drain,
    stderr_drain: Drain,
    scratch: Vec<u8>,
    stream: Option<CaptureStream>,
    last_idx: Option<FrameIndex>,
}

impl std::fmt::Debug for ContainerRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerRecorder")
            .field("ffmpeg", &self.tools.ffmpeg)
            .field("recording", &self.child.is_some())
            .field("last_idx", &self.last_idx)
            .finish()
    }
}

impl ContainerRecorder {
    pub fn new(tools: MediaTools) -> Self {
        Self {
            tools,
            child: None,
            stdin: None,
            stdout_drain: None,
            stderr_drain: None,
            scratch: Vec::new(),
            stream: None,
            last_idx: None,
        }
    }

    fn command(&self, stream: &CaptureStream) -> Command {
        let video = &stream.video;
        let mut cmd = Command::new(&self.tools.ffmpeg);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        cmd.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", video.canvas.width, video.canvas.height),
            "-framerate",
            &format!("{}/{}", video.fps.num, video.fps.den),
            "-i",
            "pipe:0",
        ]);

        if let Some(audio) = stream.audio.as_ref() {
            cmd.args([
                "-f",
                "f32le",
                "-ar",
                &audio.sample_rate.to_string(),
                "-ac",
                &audio.channels.to_string(),
                "-i",
            ])
            .arg(audio.path());
        }

        cmd.args([
            "-c:v",
            "libvpx",
            "-b:v",
            &video.bitrate.to_string(),
            "-deadline",
            "realtime",
            "-cpu-used",
            "8",
            "-pix_fmt",
            "yuv420p",
        ]);
        if stream.audio.is_some() {
            cmd.args(["-c:a", "libopus", "-b:a", OPUS_BITRATE, "-shortest"]);
        } else {
            cmd.arg("-an");
        }
        cmd.args(["-f", "webm", "pipe:1"]);
        cmd
    }

    fn stderr_text(&mut self) -> String {
        join_drain(self.stderr_drain.take(), "ffmpeg stderr")
            .map(|b| String::from_utf8_lossy(&b).trim().to_owned())
            .unwrap_or_default()
    }
}

impl FrameSink for ContainerRecorder {
    #[tracing::instrument(skip_all, fields(bitrate = stream.video.bitrate, audio = stream.audio.is_some()))]
    fn begin(&mut self, stream: CaptureStream) -> ReelResult<()> {
        if self.child.is_some() {
            return Err(ReelError::encode("recorder already started"));
        }
        stream.validate()?;

        let mut child = self.command(&stream).spawn().map_err(|e| {
            ReelError::encode(format!(
                "failed to spawn ffmpeg '{}' (is it installed?): {e}",
                self.tools.ffmpeg.display()
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        self.stdout_drain = child.stdout.take().map(drain);
        self.stderr_drain = child.stderr.take().map(drain);

        self.scratch = vec![0u8; stream.video.canvas.rgba_len()];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stream = Some(stream);
        self.last_idx = None;
        tracing::debug!("recorder started");
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let canvas = self
            .stream
            .as_ref()
            .map(|s| s.video.canvas)
            .ok_or_else(|| ReelError::encode("recorder not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(ReelError::encode(format!(
                "frame index {} pushed after {}",
                idx.0, last.0
            )));
        }
        if frame.width != canvas.width || frame.height != canvas.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, canvas.width, canvas.height
            )));
        }

        if frame.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, [0, 0, 0])?;
        } else {
            let flat = frame.flatten_over([0, 0, 0])?;
            self.scratch.copy_from_slice(&flat);
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::encode("recorder is already finalized"));
        };
        if let Err(e) = stdin.write_all(&self.scratch) {
            let stderr = self.stderr_text();
            return Err(ReelError::encode(format!(
                "failed to write frame to ffmpeg: {e}: {stderr}"
            )));
        }
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> ReelResult<MediaBlob> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::encode("recorder not started"))?;
        let status = child
            .wait()
            .map_err(|e| ReelError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        let bytes = join_drain(self.stdout_drain.take(), "ffmpeg stdout")?;
        let stderr = self.stderr_text();
        let has_audio = self.stream.take().is_some_and(|s| s.audio.is_some());

        if !status.success() {
            return Err(ReelError::encode(format!(
                "ffmpeg exited with status {status}: {stderr}"
            )));
        }
        if bytes.is_empty() {
            return Err(ReelError::encode("recorder produced no data"));
        }
        tracing::debug!(bytes = bytes.len(), "recorder finished");
        Ok(MediaBlob::new(
            bytes,
            if has_audio { WEBM_VP8_OPUS } else { WEBM_VP8 },
        ))
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            kill_quietly(&mut child);
            tracing::debug!("recorder aborted");
        }
        let _ = join_drain(self.stdout_drain.take(), "ffmpeg stdout");
        let _ = join_drain(self.stderr_drain.take(), "ffmpeg stderr");
        self.stream = None;
    }
}

impl Drop for ContainerRecorder {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/recorder.rs"]
mod tests;
