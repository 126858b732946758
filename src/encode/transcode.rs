use crate::encode::blob::MediaBlob;
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::process::{MediaTools, run_with_timeout};
use anyhow::Context;
use std::process::Command;
use std::time::Duration;

pub const MP4_MIME: &str = "video/mp4";

const REQUIRED_ENCODERS: [&str; 2] = ["libx264", "aac"];

/// Converts a recorded container into a more widely playable one.
pub trait Transcode {
    /// Prepare the converter. Repeated calls after the first are cheap.
    fn load(&mut self) -> ReelResult<()>;
    fn convert(&mut self, input: &MediaBlob) -> ReelResult<MediaBlob>;
}

/// Lifecycle of [`FfmpegTranscoder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranscoderState {
    Unloaded,
    Ready,
    /// Loading failed; the reason is kept and loading is not retried.
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranscodeTimeouts {
    pub load: Duration,
    pub convert: Duration,
}

impl Default for TranscodeTimeouts {
    fn default() -> Self {
        Self {
            load: Duration::from_secs(60),
            convert: Duration::from_secs(120),
        }
    }
}

/// WebM to MP4 (H.264 + AAC, faststart) through the `ffmpeg` binary.
///
/// Owned by the caller and loaded lazily on first use, so one instance can serve a whole batch.
#[derive(Debug)]
pub struct FfmpegTranscoder {
    tools: MediaTools,
    timeouts: TranscodeTimeouts,
    state: TranscoderState,
}

impl FfmpegTranscoder {
    pub fn new(tools: MediaTools, timeouts: TranscodeTimeouts) -> Self {
        Self {
            tools,
            timeouts,
            state: TranscoderState::Unloaded,
        }
    }

    pub fn state(&self) -> &TranscoderState {
        &self.state
    }

    fn probe_encoders(&self) -> ReelResult<()> {
        let mut cmd = Command::new(&self.tools.ffmpeg);
        cmd.args(["-hide_banner", "-encoders"]);
        let out = run_with_timeout(cmd, "transcoder load", self.timeouts.load)?;
        if !out.status.success() {
            return Err(ReelError::media(format!(
                "ffmpeg -encoders failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        let listing = String::from_utf8_lossy(&out.stdout);
        for enc in REQUIRED_ENCODERS {
            let found = listing
                .lines()
                .any(|line| line.split_whitespace().nth(1) == Some(enc));
            if !found {
                return Err(ReelError::media(format!("ffmpeg has no '{enc}' encoder")));
            }
        }
        Ok(())
    }
}

impl Transcode for FfmpegTranscoder {
    fn load(&mut self) -> ReelResult<()> {
        match &self.state {
            TranscoderState::Ready => Ok(()),
            TranscoderState::Failed(reason) => Err(ReelError::media(format!(
                "transcoder unavailable: {reason}"
            ))),
            TranscoderState::Unloaded => match self.probe_encoders() {
                Ok(()) => {
                    tracing::debug!("transcoder ready");
                    self.state = TranscoderState::Ready;
                    Ok(())
                }
                Err(err) => {
                    self.state = TranscoderState::Failed(err.to_string());
                    Err(err)
                }
            },
        }
    }

    #[tracing::instrument(skip_all, fields(input_bytes = input.len()))]
    fn convert(&mut self, input: &MediaBlob) -> ReelResult<MediaBlob> {
        self.load()?;

        let ext = input.extension();
        let mut src = tempfile::Builder::new()
            .prefix("slidereel-in-")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .context("create transcode input file")?;
        std::io::Write::write_all(&mut src, &input.bytes).context("write transcode input")?;
        let dst = tempfile::Builder::new()
            .prefix("slidereel-out-")
            .suffix(".mp4")
            .tempfile()
            .context("create transcode output file")?;

        let mut cmd = Command::new(&self.tools.ffmpeg);
        cmd.args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(src.path())
            .args([
                "-c:v",
                "libx264",
                "-preset",
                "veryfast",
                "-pix_fmt",
                "yuv420p",
                "-c:a",
                "aac",
                "-movflags",
                "+faststart",
                "-f",
                "mp4",
            ])
            .arg(dst.path());
        let out = run_with_timeout(cmd, "transcode", self.timeouts.convert)?;
        if !out.status.success() {
            return Err(ReelError::media(format!(
                "ffmpeg transcode failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let bytes = std::fs::read(dst.path()).context("read transcode output")?;
        if bytes.is_empty() {
            return Err(ReelError::media("transcode produced an empty file"));
        }
        Ok(MediaBlob::new(bytes, MP4_MIME))
    }
}

/// Result of [`transcode_or_fallback`].
#[derive(Debug)]
pub struct TranscodeOutcome {
    pub blob: MediaBlob,
    /// Why the original container was kept, if it was.
    pub fallback_reason: Option<String>,
}

/// Convert `input`, or hand it back untouched with the failure reason.
pub fn transcode_or_fallback(transcoder: &mut dyn Transcode, input: MediaBlob) -> TranscodeOutcome {
    match transcoder.convert(&input) {
        Ok(blob) => TranscodeOutcome {
            blob,
            fallback_reason: None,
        },
        Err(err) => {
            tracing::warn!(
                error = %err,
                mime = %input.mime,
                "transcode failed, keeping recorded container"
            );
            TranscodeOutcome {
                blob: input,
                fallback_reason: Some(err.to_string()),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/transcode.rs"]
mod tests;
