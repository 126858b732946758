/// Font request used for measurement and shaping.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub family: String,
    /// Size in pixels.
    pub size: f32,
    /// CSS-style weight, `100..=900`.
    pub weight: u16,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32, weight: u16) -> Self {
        Self {
            family: family.into(),
            size,
            weight,
        }
    }
}

/// Base glyph width of a string, without letter spacing.
pub trait TextMeasure {
    fn base_width(&mut self, text: &str, font: &FontSpec) -> f64;
}

/// Deterministic metric: every character advances by `em_ratio × size`.
///
/// Used when no font face is registered and in tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    pub em_ratio: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { em_ratio: 0.55 }
    }
}

impl TextMeasure for FixedAdvance {
    fn base_width(&mut self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * self.em_ratio * f64::from(font.size)
    }
}

/// Width including letter spacing between consecutive characters.
///
/// `letter_spacing` is in em.
pub fn measure_width(
    measure: &mut dyn TextMeasure,
    text: &str,
    font: &FontSpec,
    letter_spacing: f32,
) -> f64 {
    let chars = text.chars().count();
    if chars == 0 {
        return 0.0;
    }
    let spacing = (chars - 1) as f64 * f64::from(letter_spacing) * f64::from(font.size);
    measure.base_width(text, font) + spacing
}

#[cfg(test)]
#[path = "../../tests/unit/layout/measure.rs"]
mod tests;
