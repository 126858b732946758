use crate::audio::mix::AudioTrack;
use crate::encode::blob::MediaBlob;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::surface::FrameRGBA;

/// Video half of a capture stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoTrackConfig {
    pub canvas: Canvas,
    pub fps: Fps,
    /// Target video bitrate in bits per second.
    pub bitrate: u32,
}

/// Everything a sink needs to know before the first frame: video geometry plus an optional
/// music track.
#[derive(Clone, Debug)]
pub struct CaptureStream {
    pub video: VideoTrackConfig,
    pub audio: Option<AudioTrack>,
}

impl CaptureStream {
    pub fn validate(&self) -> ReelResult<()> {
        let Canvas { width, height } = self.video.canvas;
        if width == 0 || height == 0 {
            return Err(ReelError::validation("capture width/height must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "capture width/height must be even (required for yuv420p output)",
            ));
        }
        if self.video.fps.num == 0 || self.video.fps.den == 0 {
            return Err(ReelError::validation("capture fps must be non-zero"));
        }
        if let Some(audio) = &self.audio
            && (audio.sample_rate == 0 || audio.channels == 0)
        {
            return Err(ReelError::validation(
                "audio sample_rate/channels must be non-zero when audio is enabled",
            ));
        }
        Ok(())
    }
}

/// Consumer of composed frames.
///
/// `push_frame` is called in strictly increasing [`FrameIndex`] order between one `begin` and
/// one `end`. `abort` may be called at any point and must release every external resource.
pub trait FrameSink: Send {
    fn begin(&mut self, stream: CaptureStream) -> ReelResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()>;
    fn end(&mut self) -> ReelResult<MediaBlob>;
    fn abort(&mut self);
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    stream: Option<CaptureStream>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    aborted: bool,
    indices_only: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that records frame indices and dimensions but drops pixels.
    pub fn indices_only() -> Self {
        Self {
            indices_only: true,
            ..Self::default()
        }
    }

    pub fn stream(&self) -> Option<&CaptureStream> {
        self.stream.as_ref()
    }

    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, stream: CaptureStream) -> ReelResult<()> {
        stream.validate()?;
        self.stream = Some(stream);
        self.frames.clear();
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        if self.stream.is_none() {
            return Err(ReelError::encode("in-memory sink not started"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(ReelError::encode(format!(
                "frame index {} pushed after {}",
                idx.0, last.0
            )));
        }
        let stored = if self.indices_only {
            FrameRGBA {
                width: frame.width,
                height: frame.height,
                data: Vec::new(),
                premultiplied: frame.premultiplied,
            }
        } else {
            frame.clone()
        };
        self.frames.push((idx, stored));
        Ok(())
    }

    fn end(&mut self) -> ReelResult<MediaBlob> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| ReelError::encode("in-memory sink not started"))?;
        let mime = if stream.audio.is_some() {
            "video/x-raw;audio=1"
        } else {
            "video/x-raw"
        };
        Ok(MediaBlob::new(
            (self.frames.len() as u64).to_le_bytes().to_vec(),
            mime,
        ))
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
