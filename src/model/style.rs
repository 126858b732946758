use crate::foundation::color::Color;
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::slide::BlockPosition;
use serde::{Deserialize, Serialize};

/// Horizontal text alignment inside the anchor box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush left.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Flush right.
    Right,
}

/// Case transform applied to glyphs at draw time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    /// Leave text unchanged.
    #[default]
    None,
    /// Upper-case every character.
    Uppercase,
    /// Lower-case every character.
    Lowercase,
    /// Upper-case the first letter of every word.
    Capitalize,
}

impl TextTransform {
    /// Apply the transform to one segment of text.
    ///
    /// `at_word_start` says whether the segment begins a word (used by `Capitalize`).
    pub fn apply(self, text: &str, at_word_start: bool) -> String {
        match self {
            Self::None => text.to_owned(),
            Self::Uppercase => text.to_uppercase(),
            Self::Lowercase => text.to_lowercase(),
            Self::Capitalize => {
                let mut out = String::with_capacity(text.len());
                let mut word_start = at_word_start;
                for ch in text.chars() {
                    if ch.is_whitespace() {
                        word_start = true;
                        out.push(ch);
                    } else if word_start {
                        out.extend(ch.to_uppercase());
                        word_start = false;
                    } else {
                        out.push(ch);
                    }
                }
                out
            }
        }
    }
}

/// Outline drawn around glyphs when no plate is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Outline width in pixels.
    pub width: f64,
    /// Outline color.
    pub color: Color,
}

/// Halo drawn around glyphs when no plate is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlowStyle {
    /// Glow spread in pixels.
    pub size: f64,
    /// Glow color.
    pub color: Color,
}

/// Typography for title and body text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub body_font_family: Option<String>,
    pub body_font_size: Option<f32>,
    pub body_font_weight: Option<u16>,
    /// Title line-height multiplier.
    pub line_height: f32,
    /// Extra spacing between characters, in em.
    pub letter_spacing: f32,
    pub color: Color,
    pub body_color: Option<Color>,
    pub align: TextAlign,
    pub text_transform: TextTransform,
    pub stroke: Option<StrokeStyle>,
    pub glow: Option<GlowStyle>,
    /// Shadow strength, `0..=10`.
    pub shadow_intensity: Option<f32>,
    /// Shadow spread in pixels.
    pub shadow_radius: Option<f32>,
    /// Absolute position override for the implicit title/body block.
    pub position: Option<BlockPosition>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_owned(),
            font_size: 64.0,
            font_weight: 700,
            body_font_family: None,
            body_font_size: None,
            body_font_weight: None,
            line_height: 1.2,
            letter_spacing: 0.0,
            color: Color::WHITE,
            body_color: None,
            align: TextAlign::Center,
            text_transform: TextTransform::None,
            stroke: None,
            glow: None,
            shadow_intensity: None,
            shadow_radius: None,
            position: None,
        }
    }
}

/// Rounded translucent rectangle behind a text block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlateStyle {
    pub enabled: bool,
    pub padding: f64,
    pub border_radius: f64,
    /// Fill opacity, `0..=1`.
    pub opacity: f32,
    pub background_color: Color,
    /// Backdrop blur radius in pixels; `None` or `0` disables it.
    pub blur_size: Option<f64>,
}

impl Default for PlateStyle {
    fn default() -> Self {
        Self {
            enabled: false,
            padding: 32.0,
            border_radius: 24.0,
            opacity: 0.6,
            background_color: Color::BLACK,
            blur_size: None,
        }
    }
}

/// Top/bottom margins kept free of centered text, percent of canvas height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeArea {
    pub top: f64,
    pub bottom: f64,
}

impl Default for SafeArea {
    fn default() -> Self {
        Self {
            top: 10.0,
            bottom: 15.0,
        }
    }
}

/// Per-slide style values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlideStyle {
    pub text: TextStyle,
    pub plate: PlateStyle,
    /// Overlay darkness override in percent.
    pub overlay_opacity: Option<f32>,
    pub safe_area: SafeArea,
}

impl SlideStyle {
    pub(crate) fn validate(&self) -> ReelResult<()> {
        let t = &self.text;
        if !(t.font_size.is_finite() && t.font_size > 0.0) {
            return Err(ReelError::validation("text fontSize must be > 0"));
        }
        if matches!(t.body_font_size, Some(s) if !(s.is_finite() && s > 0.0)) {
            return Err(ReelError::validation("text bodyFontSize must be > 0"));
        }
        if !(t.line_height.is_finite() && t.line_height > 0.0) {
            return Err(ReelError::validation("text lineHeight must be > 0"));
        }
        if !t.letter_spacing.is_finite() {
            return Err(ReelError::validation("text letterSpacing must be finite"));
        }
        if !(self.plate.padding.is_finite() && self.plate.padding >= 0.0) {
            return Err(ReelError::validation("plate padding must be >= 0"));
        }
        if !(self.plate.border_radius.is_finite() && self.plate.border_radius >= 0.0) {
            return Err(ReelError::validation("plate borderRadius must be >= 0"));
        }
        let sa = &self.safe_area;
        if !(sa.top >= 0.0 && sa.bottom >= 0.0 && sa.top + sa.bottom < 100.0) {
            return Err(ReelError::validation(
                "safe area margins must be >= 0 and leave room for content",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/style.rs"]
mod tests;
