use crate::foundation::core::DEFAULT_OVERLAY_PERCENT;
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::asset::{Asset, resolve_media_path};
use crate::model::slide::Slide;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Highest overlay darkness accepted from a project, in percent.
pub const MAX_OVERLAY_PERCENT: f32 = 70.0;

/// Ordered slides plus the shared background, overlay and audio bed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub slides: Vec<Slide>,
    /// Background darkness, `0..=70` percent.
    #[serde(default)]
    pub overlay_percent: Option<f32>,
    /// Path of the audio bed.
    #[serde(default)]
    pub background_audio: Option<String>,
    /// Project-wide background.
    #[serde(default)]
    pub background: Option<Asset>,
    /// Assets that per-slide `backgroundAssetId` resolves against.
    #[serde(default)]
    pub assets: Vec<Asset>,
    /// Directory relative media paths resolve against.
    #[serde(skip, default = "default_root")]
    pub root: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Project {
    /// Project with the given slides and no media.
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            id: String::new(),
            name: None,
            slides,
            overlay_percent: None,
            background_audio: None,
            background: None,
            assets: Vec::new(),
            root: default_root(),
        }
    }

    /// Load and validate a project document; media paths resolve next to it.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read project '{}'", path.display()))?;
        let mut project = Self::from_json_str(&text)?;
        project.root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(default_root);
        Ok(project)
    }

    /// Parse and validate a project document.
    ///
    /// Slides are ordered by their `position` field.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let mut project: Self = serde_json::from_str(s)
            .map_err(|e| ReelError::validation(format!("project JSON: {e}")))?;
        project.slides.sort_by_key(|slide| slide.position);
        project.validate()?;
        Ok(project)
    }

    /// Check project invariants, including every slide.
    pub fn validate(&self) -> ReelResult<()> {
        if self.slides.is_empty() {
            return Err(ReelError::validation("project must contain at least one slide"));
        }
        if let Some(p) = self.overlay_percent
            && !(p.is_finite() && (0.0..=100.0).contains(&p))
        {
            return Err(ReelError::validation(format!(
                "overlayPercent must be within 0..=100 (got {p})"
            )));
        }
        for slide in &self.slides {
            slide.validate()?;
            if let Some(v) = slide.style.overlay_opacity
                && !(v.is_finite() && (0.0..=100.0).contains(&v))
            {
                return Err(ReelError::validation(format!(
                    "slide '{}' overlayOpacity must be within 0..=100",
                    slide.id
                )));
            }
        }
        Ok(())
    }

    /// Sum of all slide durations in seconds.
    pub fn total_duration_secs(&self) -> f64 {
        self.slides.iter().map(|s| s.duration_sec).sum()
    }

    /// Project overlay darkness in percent, clamped to the supported range.
    pub fn overlay_percent(&self) -> f32 {
        self.overlay_percent
            .unwrap_or(DEFAULT_OVERLAY_PERCENT)
            .clamp(0.0, MAX_OVERLAY_PERCENT)
    }

    /// Overlay darkness for one slide as a `0..=1` opacity.
    pub fn overlay_opacity_for(&self, slide: &Slide) -> f32 {
        overlay_alpha(slide, Some(self.overlay_percent()))
    }

    /// Background for one slide: its own asset when it resolves, else the project background.
    pub fn background_for(&self, slide: &Slide) -> Option<&Asset> {
        if let Some(id) = &slide.background_asset_id {
            if let Some(asset) = self.assets.iter().find(|a| &a.id == id) {
                return Some(asset);
            }
            tracing::warn!(slide = %slide.id, asset = %id, "unknown background asset id");
        }
        self.background.as_ref()
    }

    /// Filesystem path of a media reference.
    pub fn media_path(&self, source: &str) -> ReelResult<PathBuf> {
        resolve_media_path(&self.root, source)
    }
}

/// Overlay opacity: slide override, else project percent, else the default.
pub fn overlay_alpha(slide: &Slide, project_percent: Option<f32>) -> f32 {
    let percent = slide
        .style
        .overlay_opacity
        .or(project_percent)
        .unwrap_or(DEFAULT_OVERLAY_PERCENT);
    (percent / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/model/project.rs"]
mod tests;
