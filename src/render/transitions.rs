use crate::foundation::core::TRANSITION_SECS;
use crate::model::slide::TransitionKind;

/// Visual adjustment applied to a composed slide while its entry transition runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionEffect {
    /// `0..=1`.
    pub opacity: f32,
    pub brightness: f32,
    pub contrast: f32,
    /// Horizontal shift in pixels, positive moves right.
    pub offset_x: f64,
}

impl TransitionEffect {
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        brightness: 1.0,
        contrast: 1.0,
        offset_x: 0.0,
    };

    pub fn has_color_filter(&self) -> bool {
        self.brightness != 1.0 || self.contrast != 1.0
    }
}

/// Transition progress after `slide_elapsed` seconds: `min(elapsed / 0.5, 1)`.
pub fn transition_progress(slide_elapsed: f64) -> f64 {
    (slide_elapsed / TRANSITION_SECS).clamp(0.0, 1.0)
}

/// Effect of `kind` at progress `p` on a canvas `width` pixels wide.
///
/// Every kind is the identity once `p >= 1`.
pub fn transition_effect(kind: TransitionKind, p: f64, width: f64) -> TransitionEffect {
    if p.is_nan() || p >= 1.0 {
        return TransitionEffect::IDENTITY;
    }
    let p = p.max(0.0);
    let pf = p as f32;
    let mut fx = TransitionEffect::IDENTITY;
    match kind {
        TransitionKind::None => {}
        TransitionKind::Fade => fx.opacity = pf,
        TransitionKind::Flash => {
            if p < 0.3 {
                let t = pf / 0.3;
                fx.brightness = 4.0 - 3.0 * t;
                fx.opacity = t;
            }
        }
        TransitionKind::Glow => {
            fx.brightness = 1.0 + (1.0 - pf);
            fx.contrast = 1.0 + (0.2 - 0.2 * pf);
            fx.opacity = pf;
        }
        TransitionKind::SlideLeft => fx.offset_x = width * (1.0 - p),
        TransitionKind::SlideRight => fx.offset_x = -width * (1.0 - p),
        TransitionKind::Sunlight => {
            if p < 0.2 {
                let t = pf / 0.2;
                fx.brightness = 6.0 - 5.0 * t;
                fx.opacity = t;
            } else {
                fx.opacity = 0.2 + 1.25 * (pf - 0.2);
            }
        }
    }
    fx.opacity = fx.opacity.clamp(0.0, 1.0);
    fx
}

#[cfg(test)]
#[path = "../../tests/unit/render/transitions.rs"]
mod tests;
