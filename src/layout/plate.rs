use crate::foundation::core::{BezPath, Rect};
use kurbo::{RoundedRect, Shape};

const PATH_TOLERANCE: f64 = 0.1;

/// Plate bounds around stacked content.
///
/// `width = content width + 2 × padding`, `height = content height + 2 × padding`.
pub fn plate_rect(content: Rect, padding: f64) -> Rect {
    content.inflate(padding, padding)
}

/// Corner radius limited to half the shorter side.
pub fn clamp_radius(rect: Rect, radius: f64) -> f64 {
    let limit = rect.width().abs().min(rect.height().abs()) / 2.0;
    radius.clamp(0.0, limit)
}

/// Fill path for a plate; radius `0` yields a plain rectangle.
pub fn plate_path(rect: Rect, radius: f64) -> BezPath {
    let r = clamp_radius(rect, radius);
    if r <= 0.0 {
        return rect.to_path(PATH_TOLERANCE);
    }
    RoundedRect::from_rect(rect, r).to_path(PATH_TOLERANCE)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/plate.rs"]
mod tests;
