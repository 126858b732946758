use crate::foundation::error::{ReelError, ReelResult};
use crate::media::decode::{AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
use crate::media::process::MediaTools;
use anyhow::Context;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Gain applied to background music under the slides.
pub const MUSIC_GAIN: f32 = 0.8;

/// Raw interleaved `f32le` PCM on disk, ready to be muxed by the recorder.
///
/// The backing temp file is deleted when the last clone is dropped.
#[derive(Clone, Debug)]
pub struct AudioTrack {
    file: Arc<tempfile::NamedTempFile>,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_sec: f64,
}

impl AudioTrack {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Linear decode -> gain -> fit -> clamp chain for a single music source.
#[derive(Clone, Copy, Debug)]
pub struct AudioMixGraph {
    pub gain: f32,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioMixGraph {
    fn default() -> Self {
        Self {
            gain: MUSIC_GAIN,
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
        }
    }
}

impl AudioMixGraph {
    /// Interleaved sample count covering `duration_sec`.
    pub fn sample_len(&self, duration_sec: f64) -> usize {
        let frames = (duration_sec.max(0.0) * f64::from(self.sample_rate)).round() as usize;
        frames * usize::from(self.channels)
    }

    /// Apply gain, truncate or pad with silence to `duration_sec`, then clamp to `[-1, 1]`.
    pub fn process(&self, pcm: &AudioPcm, duration_sec: f64) -> ReelResult<Vec<f32>> {
        if pcm.sample_rate != self.sample_rate || pcm.channels != self.channels {
            return Err(ReelError::media(format!(
                "audio is {} Hz x{}, mix graph expects {} Hz x{}",
                pcm.sample_rate, pcm.channels, self.sample_rate, self.channels
            )));
        }
        let len = self.sample_len(duration_sec);
        let mut out: Vec<f32> = pcm
            .interleaved_f32
            .iter()
            .take(len)
            .map(|s| (s * self.gain).clamp(-1.0, 1.0))
            .collect();
        out.resize(len, 0.0);
        Ok(out)
    }

    /// Write processed samples to a temp `f32le` file.
    pub fn write_track(&self, samples: &[f32]) -> ReelResult<AudioTrack> {
        let mut file = tempfile::Builder::new()
            .prefix("slidereel-audio-")
            .suffix(".f32le")
            .tempfile()
            .context("create temp audio file")?;

        let mut bytes = Vec::<u8>::with_capacity(samples.len() * 4);
        for &sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        file.write_all(&bytes).context("write temp audio file")?;
        file.flush().context("flush temp audio file")?;

        let frames = samples.len() / usize::from(self.channels.max(1));
        Ok(AudioTrack {
            file: Arc::new(file),
            sample_rate: self.sample_rate,
            channels: self.channels,
            duration_sec: frames as f64 / f64::from(self.sample_rate),
        })
    }

    /// Full chain from a media file to an [`AudioTrack`].
    pub fn build(
        &self,
        tools: &MediaTools,
        source: &Path,
        duration_sec: f64,
        timeout: Duration,
    ) -> ReelResult<AudioTrack> {
        let pcm = decode_audio_f32_stereo(
            tools,
            source,
            self.sample_rate,
            Some(duration_sec),
            timeout,
        )?;
        let samples = self.process(&pcm, duration_sec)?;
        self.write_track(&samples)
    }
}

/// Build the music track, or `None` with a warning when any step fails.
pub fn prepare_audio_track(
    tools: &MediaTools,
    source: &Path,
    duration_sec: f64,
    timeout: Duration,
) -> Option<AudioTrack> {
    match AudioMixGraph::default().build(tools, source, duration_sec, timeout) {
        Ok(track) => {
            tracing::debug!(path = %source.display(), duration_sec, "audio track ready");
            Some(track)
        }
        Err(err) => {
            tracing::warn!(
                path = %source.display(),
                error = %err,
                "background audio unavailable, exporting without audio"
            );
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
