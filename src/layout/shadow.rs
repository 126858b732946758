use crate::foundation::core::Vec2;
use std::f64::consts::TAU;

/// Number of offset copies used to approximate a soft shadow.
pub const SHADOW_COPIES: usize = 8;

const SHADOW_DECAY: f32 = 0.7;
const SHADOW_BASE_ALPHA: f32 = 0.12;
const RING_STEPS: usize = 8;

/// One translucent, offset copy of the glyphs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetCopy {
    pub offset: Vec2,
    /// `0..=1`, multiplied with the decoration color alpha.
    pub opacity: f32,
}

/// Drop shadow as `count` copies falling down and right.
///
/// Copy `i` sits at `radius × (i + 1) / count` with opacity decaying geometrically.
/// `intensity` (`0..=10`) scales every copy's opacity.
pub fn shadow_copies(intensity: f32, radius: f32, count: usize) -> Vec<OffsetCopy> {
    let strength = (intensity / 10.0).clamp(0.0, 1.0);
    if strength == 0.0 || count == 0 {
        return Vec::new();
    }
    let dir = Vec2::new(0.5, 1.0).normalize();
    let radius = f64::from(radius.max(1.0));
    (0..count)
        .map(|i| {
            let step = (i + 1) as f64 / count as f64;
            OffsetCopy {
                offset: dir * (radius * step),
                opacity: (strength * SHADOW_BASE_ALPHA * 2.0 * SHADOW_DECAY.powi(i as i32))
                    .min(1.0),
            }
        })
        .collect()
}

/// Copies arranged in rings around the glyphs; used for glow.
///
/// Inner ring at half `size`, outer ring at `size`, the outer one fainter.
pub fn glow_copies(size: f64) -> Vec<OffsetCopy> {
    if size <= 0.0 {
        return Vec::new();
    }
    let mut out = ring(size * 0.5, 0.35);
    out.extend(ring(size, 0.15));
    out
}

/// Copies arranged in one tight ring; used as a glyph outline.
pub fn stroke_copies(width: f64) -> Vec<OffsetCopy> {
    if width <= 0.0 {
        return Vec::new();
    }
    ring(width, 1.0)
}

fn ring(radius: f64, opacity: f32) -> Vec<OffsetCopy> {
    (0..RING_STEPS)
        .map(|k| {
            let angle = TAU * k as f64 / RING_STEPS as f64;
            OffsetCopy {
                offset: Vec2::new(angle.cos() * radius, angle.sin() * radius),
                opacity,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/shadow.rs"]
mod tests;
