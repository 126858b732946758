use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::style::SlideStyle;
use serde::{Deserialize, Deserializer, Serialize};

/// Entry transition applied during the first half second of a slide.
///
/// Unknown names deserialize to [`TransitionKind::None`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    /// No transform.
    #[default]
    None,
    /// Opacity ramps from 0 to 1.
    Fade,
    /// Bright flash settling into the slide.
    Flash,
    /// Brightness/contrast bloom with opacity ramp.
    Glow,
    /// Slide enters from the right edge moving left.
    SlideLeft,
    /// Slide enters from the left edge moving right.
    SlideRight,
    /// Strong overexposure followed by a slow opacity ramp.
    Sunlight,
}

impl TransitionKind {
    /// Kind for a kebab-case name; anything unrecognized is [`TransitionKind::None`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "fade" => Self::Fade,
            "flash" => Self::Flash,
            "glow" => Self::Glow,
            "slide-left" => Self::SlideLeft,
            "slide-right" => Self::SlideRight,
            "sunlight" => Self::Sunlight,
            _ => Self::None,
        }
    }
}

impl<'de> Deserialize<'de> for TransitionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// Box in percent of the canvas (`0..=100` on each axis).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockPosition {
    /// Left edge, percent of canvas width.
    pub x: f64,
    /// Top edge, percent of canvas height.
    pub y: f64,
    /// Width, percent of canvas width.
    pub width: f64,
    /// Height, percent of canvas height.
    pub height: f64,
}

impl BlockPosition {
    /// Resolve into canvas pixels.
    pub fn to_rect(self, canvas: Canvas) -> Rect {
        let cw = f64::from(canvas.width);
        let ch = f64::from(canvas.height);
        let x0 = self.x / 100.0 * cw;
        let y0 = self.y / 100.0 * ch;
        Rect::new(
            x0,
            y0,
            x0 + self.width / 100.0 * cw,
            y0 + self.height / 100.0 * ch,
        )
    }

    fn validate(&self) -> ReelResult<()> {
        let all_finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite || self.width <= 0.0 || self.height <= 0.0 {
            return Err(ReelError::validation(
                "block position must be finite with width/height > 0",
            ));
        }
        Ok(())
    }
}

/// Independently timed and positioned text fragment within a slide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    /// Title text, may contain `[#RRGGBB]…[]` color markers.
    pub title: String,
    /// Optional body text.
    #[serde(default)]
    pub body: Option<String>,
    /// Explicit box; `None` joins the centered group.
    #[serde(default)]
    pub position: Option<BlockPosition>,
    /// Seconds after slide start before the block appears.
    #[serde(default)]
    pub delay: f64,
    /// Seconds the block stays visible; `0` keeps it until the slide ends.
    #[serde(default)]
    pub duration: f64,
}

impl TextBlock {
    /// Untimed block without a custom position.
    pub fn new(title: impl Into<String>, body: Option<String>) -> Self {
        Self {
            title: title.into(),
            body,
            position: None,
            delay: 0.0,
            duration: 0.0,
        }
    }

    /// Visibility at `t` seconds into the slide.
    pub fn is_visible_at(&self, t: f64) -> bool {
        t >= self.delay && (self.duration == 0.0 || t < self.delay + self.duration)
    }
}

/// One timed unit of output combining text and a background.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Slide identity.
    #[serde(default)]
    pub id: String,
    /// Owning project reference.
    #[serde(default)]
    pub project_id: String,
    /// Position index inside the project.
    #[serde(default)]
    pub position: u32,
    /// Title text.
    #[serde(default)]
    pub title: String,
    /// Optional body text.
    #[serde(default)]
    pub body: Option<String>,
    /// Independently positioned blocks; replaces `title`/`body` when present.
    #[serde(default)]
    pub text_blocks: Option<Vec<TextBlock>>,
    /// Slide length in seconds.
    pub duration_sec: f64,
    /// Per-slide background asset id.
    #[serde(default)]
    pub background_asset_id: Option<String>,
    /// Style values.
    #[serde(default)]
    pub style: SlideStyle,
    /// Entry transition.
    #[serde(default)]
    pub transition: Option<TransitionKind>,
}

impl Slide {
    /// Minimal slide with default style.
    pub fn new(title: impl Into<String>, duration_sec: f64) -> Self {
        Self {
            id: String::new(),
            project_id: String::new(),
            position: 0,
            title: title.into(),
            body: None,
            text_blocks: None,
            duration_sec,
            background_asset_id: None,
            style: SlideStyle::default(),
            transition: None,
        }
    }

    /// Effective transition kind.
    pub fn transition_kind(&self) -> TransitionKind {
        self.transition.unwrap_or_default()
    }

    /// Blocks to lay out, including the implicit title/body block.
    ///
    /// The implicit block takes the text style position override, if any.
    pub fn blocks(&self) -> Vec<TextBlock> {
        match &self.text_blocks {
            Some(blocks) => blocks.clone(),
            None => {
                let mut block = TextBlock::new(self.title.clone(), self.body.clone());
                block.position = self.style.text.position;
                vec![block]
            }
        }
    }

    /// Check slide invariants.
    pub fn validate(&self) -> ReelResult<()> {
        if !self.duration_sec.is_finite() || self.duration_sec <= 0.0 {
            return Err(ReelError::validation(format!(
                "slide '{}' duration must be > 0 (got {})",
                self.id, self.duration_sec
            )));
        }
        for block in self.text_blocks.iter().flatten() {
            if !block.delay.is_finite() || block.delay < 0.0 {
                return Err(ReelError::validation(format!(
                    "slide '{}' has a text block with negative delay",
                    self.id
                )));
            }
            if !block.duration.is_finite() || block.duration < 0.0 {
                return Err(ReelError::validation(format!(
                    "slide '{}' has a text block with negative duration",
                    self.id
                )));
            }
            if let Some(p) = &block.position {
                p.validate()?;
            }
        }
        if let Some(p) = &self.style.text.position {
            p.validate()?;
        }
        self.style.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/slide.rs"]
mod tests;
