use crate::foundation::core::Rect;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{mul_div255_u8, opacity_u8};

/// Row-major 4×5 matrix applied to straight RGBA in `[0, 1]`.
pub type ColorMatrix = [f32; 20];

/// Brightness multiplies RGB, then contrast pivots around mid-grey.
pub fn brightness_contrast_matrix(brightness: f32, contrast: f32) -> ColorMatrix {
    let s = brightness * contrast;
    let o = 0.5 - 0.5 * contrast;
    [
        s, 0.0, 0.0, 0.0, o, //
        0.0, s, 0.0, 0.0, o, //
        0.0, 0.0, s, 0.0, o, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

pub fn color_matrix_rgba8_premul_in_place(buf: &mut [u8], m: ColorMatrix) {
    for px in buf.chunks_exact_mut(4) {
        let pa = f32::from(px[3]) / 255.0;
        if pa <= 0.0 {
            continue;
        }

        // premul -> straight
        let r = f32::from(px[0]) / 255.0 / pa;
        let g = f32::from(px[1]) / 255.0 / pa;
        let b = f32::from(px[2]) / 255.0 / pa;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        px[0] = (out_r * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[1] = (out_g * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[2] = (out_b * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        px[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Source-over of `src` onto `dst`, scaled by `opacity` and shifted right by `dx` pixels.
///
/// Source pixels shifted outside the frame are dropped.
pub fn premul_over_shifted(
    dst: &mut [u8],
    src: &[u8],
    width: u32,
    height: u32,
    dx: i64,
    opacity: f32,
) -> ReelResult<()> {
    let expected = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if dst.len() != expected || src.len() != expected {
        return Err(ReelError::render(
            "premul_over_shifted expects canvas-sized rgba8 buffers",
        ));
    }
    let op = opacity_u8(opacity);
    if op == 0 {
        return Ok(());
    }

    let w = i64::from(width);
    if dx.abs() >= w {
        return Ok(());
    }
    let row_len = width as usize * 4;
    for y in 0..height as usize {
        let row = y * row_len;
        for x in 0..w {
            let sx = x - dx;
            if sx < 0 || sx >= w {
                continue;
            }
            let di = row + x as usize * 4;
            let si = row + sx as usize * 4;
            over_px(&mut dst[di..di + 4], &src[si..si + 4], op);
        }
    }
    Ok(())
}

/// Source-over of equally sized buffers.
pub fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> ReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        over_px(d, s, 255);
    }
    Ok(())
}

fn over_px(d: &mut [u8], s: &[u8], op: u16) {
    let sa = mul_div255_u8(u16::from(s[3]), op);
    if sa == 0 {
        return;
    }
    let inv = 255u16 - u16::from(sa);
    d[3] = sa.saturating_add(mul_div255_u8(u16::from(d[3]), inv));
    for c in 0..3 {
        let sc = mul_div255_u8(u16::from(s[c]), op);
        let dc = mul_div255_u8(u16::from(d[c]), inv);
        d[c] = sc.saturating_add(dc);
    }
}

pub fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ReelResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ReelError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(ReelError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

/// Separable gaussian blur of premultiplied RGBA8.
pub fn blur_rgba8_premul_q16(
    src: &[u8],
    dst: &mut [u8],
    tmp: &mut [u8],
    width: u32,
    height: u32,
    kernel_q16: &[u32],
) {
    if kernel_q16.len() == 1 {
        dst.copy_from_slice(src);
        return;
    }
    horizontal_blur_q16(src, tmp, width, height, kernel_q16);
    vertical_blur_q16(tmp, dst, width, height, kernel_q16);
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

/// Blur the pixels of `buf` that fall inside a rounded rectangle.
///
/// Only the region around `rect` is processed; pixels outside the rounded shape keep their value.
pub fn blur_rounded_region(
    buf: &mut [u8],
    width: u32,
    height: u32,
    rect: Rect,
    corner_radius: f64,
    blur_radius: f64,
) -> ReelResult<()> {
    let radius = blur_radius.round().max(0.0) as u32;
    if radius == 0 {
        return Ok(());
    }
    let kernel = gaussian_kernel_q16(radius, (blur_radius / 2.0).max(0.5) as f32)?;

    let pad = f64::from(radius);
    let x0 = (rect.x0 - pad).floor().clamp(0.0, f64::from(width)) as u32;
    let y0 = (rect.y0 - pad).floor().clamp(0.0, f64::from(height)) as u32;
    let x1 = (rect.x1 + pad).ceil().clamp(0.0, f64::from(width)) as u32;
    let y1 = (rect.y1 + pad).ceil().clamp(0.0, f64::from(height)) as u32;
    if x1 <= x0 || y1 <= y0 {
        return Ok(());
    }
    let rw = x1 - x0;
    let rh = y1 - y0;

    let stride = width as usize * 4;
    let region_len = rw as usize * rh as usize * 4;
    let mut src = Vec::with_capacity(region_len);
    for y in y0..y1 {
        let start = y as usize * stride + x0 as usize * 4;
        src.extend_from_slice(&buf[start..start + rw as usize * 4]);
    }
    let mut dst = vec![0u8; region_len];
    let mut tmp = vec![0u8; region_len];
    blur_rgba8_premul_q16(&src, &mut dst, &mut tmp, rw, rh, &kernel);

    let r = crate::layout::plate::clamp_radius(rect, corner_radius);
    for y in y0..y1 {
        for x in x0..x1 {
            if !rounded_rect_contains(rect, r, f64::from(x) + 0.5, f64::from(y) + 0.5) {
                continue;
            }
            let bi = y as usize * stride + x as usize * 4;
            let ri = ((y - y0) as usize * rw as usize + (x - x0) as usize) * 4;
            buf[bi..bi + 4].copy_from_slice(&dst[ri..ri + 4]);
        }
    }
    Ok(())
}

fn rounded_rect_contains(rect: Rect, r: f64, x: f64, y: f64) -> bool {
    if x < rect.x0 || x > rect.x1 || y < rect.y0 || y > rect.y1 {
        return false;
    }
    let cx = x.clamp(rect.x0 + r, rect.x1 - r);
    let cy = y.clamp(rect.y0 + r, rect.y1 - r);
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= r * r
}

#[cfg(test)]
#[path = "../../tests/unit/render/filters.rs"]
mod tests;
