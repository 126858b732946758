//! Export configuration loaded from JSON. Every field has a default.

use crate::encode::transcode::TranscodeTimeouts;
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::process::MediaTools;
use crate::render::surface::StillFormat;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How the capture loop spaces frames in wall-clock time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    /// One frame per `1/fps` seconds against an absolute schedule.
    #[default]
    Realtime,
    /// As fast as the compositor and recorder allow.
    Unpaced,
}

/// Font sources for text layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Individual font files.
    pub files: Vec<PathBuf>,
    /// Directories scanned, including subdirectories, for `.ttf`, `.otf`, `.ttc`.
    pub dirs: Vec<PathBuf>,
    /// Fall back to installed system fonts for families not found above.
    pub system_fonts: bool,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            dirs: Vec::new(),
            system_fonts: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    pub enabled: bool,
    pub load_timeout_secs: u64,
    pub convert_timeout_secs: u64,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        let t = TranscodeTimeouts::default();
        Self {
            enabled: true,
            load_timeout_secs: t.load.as_secs(),
            convert_timeout_secs: t.convert.as_secs(),
        }
    }
}

impl TranscodeConfig {
    pub fn timeouts(&self) -> TranscodeTimeouts {
        TranscodeTimeouts {
            load: Duration::from_secs(self.load_timeout_secs),
            convert: Duration::from_secs(self.convert_timeout_secs),
        }
    }
}

/// Log output settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g. "info", "slidereel=debug,warn"). `RUST_LOG` wins when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub tools: MediaTools,
    pub fonts: FontsConfig,
    pub pacing: Pacing,
    /// Bound on waiting for the background video's first frame.
    pub media_load_timeout_secs: u64,
    /// Bound on decoding background audio.
    pub audio_timeout_secs: u64,
    /// How long a running export waits for the next background frame before reusing the last.
    pub frame_wait_ms: u64,
    /// Pause after the last frame before the recorder is stopped (realtime pacing only).
    pub flush_delay_ms: u64,
    pub transcode: TranscodeConfig,
    pub still_format: StillFormat,
    pub jpeg_quality: u8,
    /// Pause between batch jobs.
    pub batch_delay_ms: u64,
    pub logging: LoggingConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            tools: MediaTools::default(),
            fonts: FontsConfig::default(),
            pacing: Pacing::default(),
            media_load_timeout_secs: 15,
            audio_timeout_secs: 30,
            frame_wait_ms: 100,
            flush_delay_ms: 150,
            transcode: TranscodeConfig::default(),
            still_format: StillFormat::default(),
            jpeg_quality: 92,
            batch_delay_ms: 2_000,
            logging: LoggingConfig::default(),
        }
    }
}

impl ExportConfig {
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| ReelError::validation(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ReelError::validation("jpeg_quality must be in 1..=100"));
        }
        if self.media_load_timeout_secs == 0 || self.audio_timeout_secs == 0 {
            return Err(ReelError::validation("media timeouts must be non-zero"));
        }
        if self.transcode.enabled
            && (self.transcode.load_timeout_secs == 0 || self.transcode.convert_timeout_secs == 0)
        {
            return Err(ReelError::validation("transcode timeouts must be non-zero"));
        }
        Ok(())
    }

    pub fn media_load_timeout(&self) -> Duration {
        Duration::from_secs(self.media_load_timeout_secs)
    }

    pub fn audio_timeout(&self) -> Duration {
        Duration::from_secs(self.audio_timeout_secs)
    }

    pub fn frame_wait(&self) -> Duration {
        Duration::from_millis(self.frame_wait_ms)
    }

    pub fn flush_delay(&self) -> Duration {
        Duration::from_millis(self.flush_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
