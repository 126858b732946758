use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::ReelResult;
use crate::render::surface::RasterImage;

/// Stops of the fallback gradient, top-left to bottom-right.
pub const GRADIENT_STOPS: [Color; 3] = [
    Color::rgb(0x1a, 0x1a, 0x2e),
    Color::rgb(0x16, 0x21, 0x3e),
    Color::rgb(0x0f, 0x34, 0x60),
];

/// Scale-to-cover transform placing an image centered over the canvas.
pub fn cover_transform(image_w: u32, image_h: u32, canvas: Canvas) -> Affine {
    let iw = f64::from(image_w.max(1));
    let ih = f64::from(image_h.max(1));
    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let scale = (cw / iw).max(ch / ih);
    let tx = (cw - iw * scale) / 2.0;
    let ty = (ch - ih * scale) / 2.0;
    Affine::translate((tx, ty)) * Affine::scale(scale)
}

/// Three-stop diagonal gradient at canvas size.
pub fn diagonal_gradient(canvas: Canvas) -> ReelResult<RasterImage> {
    let w = canvas.width.max(1);
    let h = canvas.height.max(1);
    let mut bytes = vec![0u8; canvas.rgba_len()];
    let wx = (w - 1).max(1) as f32;
    let hy = (h - 1).max(1) as f32;
    for y in 0..h {
        for x in 0..w {
            let t = ((x as f32) / wx + (y as f32) / hy) / 2.0;
            let c = sample_stops(t);
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&[c.r, c.g, c.b, 255]);
        }
    }
    RasterImage::from_premul_bytes(&bytes, w, h)
}

fn sample_stops(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let (a, b, local) = if t < 0.5 {
        (GRADIENT_STOPS[0], GRADIENT_STOPS[1], t * 2.0)
    } else {
        (GRADIENT_STOPS[1], GRADIENT_STOPS[2], (t - 0.5) * 2.0)
    };
    let lerp = |x: u8, y: u8| -> u8 {
        let xf = f32::from(x);
        (xf + (f32::from(y) - xf) * local).round().clamp(0.0, 255.0) as u8
    };
    Color::rgb(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
