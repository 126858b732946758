use crate::foundation::core::{Affine, BezPath, Canvas};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;
use anyhow::Context;
use std::io::Cursor;
use std::sync::Arc;

/// A rendered frame in RGBA8 format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Encoding used for still images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StillFormat {
    #[default]
    Png,
    Jpeg,
}

impl StillFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl FrameRGBA {
    /// Opaque straight-alpha RGBA8 with premultiplied content flattened over `bg`.
    pub fn flatten_over(&self, bg: [u8; 3]) -> ReelResult<Vec<u8>> {
        let mut out = vec![0u8; self.data.len()];
        if self.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(&mut out, &self.data, bg)?;
        } else {
            let mut premul = self.data.clone();
            crate::foundation::math::premultiply_rgba8_in_place(&mut premul);
            flatten_premul_over_bg_to_opaque_rgba8(&mut out, &premul, bg)?;
        }
        Ok(out)
    }

    /// Encode as a still image, flattened over black.
    pub fn encode(&self, format: StillFormat, jpeg_quality: u8) -> ReelResult<Vec<u8>> {
        let rgba = self.flatten_over([0, 0, 0])?;
        let img = image::RgbaImage::from_raw(self.width, self.height, rgba)
            .ok_or_else(|| ReelError::render("frame buffer does not match its dimensions"))?;
        let mut buf = Vec::new();
        match format {
            StillFormat::Png => {
                image::DynamicImage::ImageRgba8(img)
                    .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                    .context("encode png")?;
            }
            StillFormat::Jpeg => {
                let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
                let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut buf,
                    jpeg_quality.clamp(1, 100),
                );
                enc.encode_image(&rgb).context("encode jpeg")?;
            }
        }
        Ok(buf)
    }
}

/// Drawing target: a vello render context plus the pixmaps the compositor works on.
pub struct Surface {
    canvas: Canvas,
    pub(crate) ctx: vello_cpu::RenderContext,
    /// Background, overlay and blurred plate backdrops.
    pub(crate) scene: vello_cpu::Pixmap,
    /// Plates, decorations and glyphs.
    pub(crate) text: vello_cpu::Pixmap,
    /// Final frame after the transition.
    pub(crate) output: Vec<u8>,
}

impl Surface {
    pub fn new(canvas: Canvas) -> ReelResult<Self> {
        let (w, h) = canvas_u16(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            scene: vello_cpu::Pixmap::new(w, h),
            text: vello_cpu::Pixmap::new(w, h),
            output: vec![0u8; canvas.rgba_len()],
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Reset every layer to transparent.
    pub fn clear(&mut self) {
        self.ctx.reset();
        self.scene.data_as_u8_slice_mut().fill(0);
        self.text.data_as_u8_slice_mut().fill(0);
        self.output.fill(0);
    }

    /// Premultiplied output bytes of the last composed frame.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Copy the last composed frame out.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.output.clone(),
            premultiplied: true,
        }
    }
}

fn canvas_u16(canvas: Canvas) -> ReelResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ReelError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ReelError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ReelError::render("surface width/height must be non-zero"));
    }
    Ok((w, h))
}

/// Image paint backed by premultiplied RGBA8 pixels.
#[derive(Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub(crate) paint: vello_cpu::Image,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl RasterImage {
    pub fn from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> ReelResult<Self> {
        let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
        Ok(Self {
            width,
            height,
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
        })
    }

    pub fn from_straight_bytes(bytes: &[u8], width: u32, height: u32) -> ReelResult<Self> {
        let mut tmp = bytes.to_vec();
        crate::foundation::math::premultiply_rgba8_in_place(&mut tmp);
        Self::from_premul_bytes(&tmp, width, height)
    }
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn rect_to_cpu(r: crate::foundation::core::Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Flatten premultiplied RGBA8 over an opaque background color.
pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg: [u8; 3],
) -> ReelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::render(
            "flatten expects equal-length rgba8 buffers",
        ));
    }

    let [bg_r, bg_g, bg_b] = bg.map(u16::from);
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - a;
        d[0] = (u16::from(s[0]) + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (u16::from(s[1]) + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (u16::from(s[2]) + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
