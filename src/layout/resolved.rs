use crate::foundation::color::Color;
use crate::layout::measure::FontSpec;
use crate::model::style::{GlowStyle, SafeArea, SlideStyle, StrokeStyle, TextAlign, TextTransform};

/// Body text always uses this line-height multiplier.
pub const BODY_LINE_HEIGHT: f32 = 1.2;
/// Body size relative to the title when not set.
pub const BODY_SIZE_RATIO: f32 = 0.6;
/// Shadow strength used for plate-less text when not set.
pub const DEFAULT_SHADOW_INTENSITY: f32 = 5.0;
/// Shadow spread used for plate-less text when not set.
pub const DEFAULT_SHADOW_RADIUS: f32 = 6.0;

/// Plate values after defaults and opacity are applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedPlate {
    pub padding: f64,
    pub radius: f64,
    /// Fill color with plate opacity folded into alpha.
    pub fill: Color,
    /// Backdrop blur radius, `0` when disabled.
    pub blur: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowParams {
    /// `0..=10`.
    pub intensity: f32,
    pub radius: f32,
}

/// Style with every fallback applied, computed once per slide.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub title_font: FontSpec,
    pub body_font: FontSpec,
    pub title_line_height: f32,
    pub body_line_height: f32,
    pub letter_spacing: f32,
    pub title_color: Color,
    pub body_color: Color,
    pub align: TextAlign,
    pub transform: TextTransform,
    pub plate: Option<ResolvedPlate>,
    pub stroke: Option<StrokeStyle>,
    pub glow: Option<GlowStyle>,
    pub shadow: Option<ShadowParams>,
    pub safe_area: SafeArea,
}

impl ResolvedStyle {
    pub fn resolve(style: &SlideStyle) -> Self {
        let t = &style.text;
        let title_font = FontSpec::new(t.font_family.clone(), t.font_size, t.font_weight);
        let body_font = FontSpec::new(
            t.body_font_family
                .clone()
                .unwrap_or_else(|| t.font_family.clone()),
            t.body_font_size
                .unwrap_or(t.font_size * BODY_SIZE_RATIO),
            t.body_font_weight
                .unwrap_or_else(|| t.font_weight.saturating_sub(200).max(100)),
        );

        let plate = style.plate.enabled.then(|| ResolvedPlate {
            padding: style.plate.padding.max(0.0),
            radius: style.plate.border_radius.max(0.0),
            fill: style.plate.background_color.with_opacity(style.plate.opacity),
            blur: style.plate.blur_size.unwrap_or(0.0).max(0.0),
        });

        // Stroke, glow and shadow only decorate text without a plate.
        let (stroke, glow, shadow) = if plate.is_some() {
            (None, None, None)
        } else {
            let shadow = ShadowParams {
                intensity: t
                    .shadow_intensity
                    .unwrap_or(DEFAULT_SHADOW_INTENSITY)
                    .clamp(0.0, 10.0),
                radius: t.shadow_radius.unwrap_or(DEFAULT_SHADOW_RADIUS).max(0.0),
            };
            (
                t.stroke.filter(|s| s.width > 0.0),
                t.glow.filter(|g| g.size > 0.0),
                (shadow.intensity > 0.0).then_some(shadow),
            )
        };

        Self {
            title_font,
            body_font,
            title_line_height: t.line_height,
            body_line_height: BODY_LINE_HEIGHT,
            letter_spacing: t.letter_spacing,
            title_color: t.color,
            body_color: t.body_color.unwrap_or(t.color),
            align: t.align,
            transform: t.text_transform,
            plate,
            stroke,
            glow,
            shadow,
            safe_area: style.safe_area,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolved.rs"]
mod tests;
