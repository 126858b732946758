use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::process::{MediaTools, run_with_timeout};
use crate::model::asset::MediaKind;
use crate::render::surface::RasterImage;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Audio sample rate used across decode, mix and encode.
pub const MIX_SAMPLE_RATE: u32 = 48_000;
/// Channel count used across decode, mix and encode.
pub const MIX_CHANNELS: u16 = 2;

const MAX_SVG_DIM: u32 = 16_384;

/// Basic metadata about a source video file.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Container duration in seconds, when reported.
    pub duration_sec: Option<f64>,
    pub has_audio: bool,
}

/// Decoded interleaved floating-point PCM.
#[derive(Clone, Debug)]
pub struct AudioPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

/// Probe source video metadata through `ffprobe`.
pub fn probe_video(tools: &MediaTools, path: &Path, timeout: Duration) -> ReelResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let mut cmd = Command::new(&tools.ffprobe);
    cmd.args([
        "-v",
        "error",
        "-print_format",
        "json",
        "-show_streams",
        "-show_format",
    ])
    .arg(path);
    let out = run_with_timeout(cmd, "ffprobe", timeout)?;
    if !out.status.success() {
        return Err(ReelError::media(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ReelError::media(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ReelError::media(format!("no video stream in '{}'", path.display())))?;
    let (Some(width), Some(height)) = (video.width, video.height) else {
        return Err(ReelError::media("missing video dimensions from ffprobe"));
    };

    Ok(VideoSourceInfo {
        source_path: path.to_path_buf(),
        width,
        height,
        duration_sec: parsed
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.parse().ok()),
        has_audio: parsed
            .streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some("audio")),
    })
}

/// Decode one RGBA frame at `at_sec`.
pub fn decode_video_frame(
    tools: &MediaTools,
    info: &VideoSourceInfo,
    at_sec: f64,
    timeout: Duration,
) -> ReelResult<RasterImage> {
    let mut cmd = Command::new(&tools.ffmpeg);
    cmd.args(["-v", "error", "-ss", &format!("{:.6}", at_sec.max(0.0))])
        .arg("-i")
        .arg(&info.source_path)
        .args(["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"]);
    let out = run_with_timeout(cmd, "video frame decode", timeout)?;
    if !out.status.success() {
        return Err(ReelError::media(format!(
            "ffmpeg frame decode failed for '{}': {}",
            info.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected = info.width as usize * info.height as usize * 4;
    if expected == 0 || out.stdout.len() < expected {
        return Err(ReelError::media(format!(
            "ffmpeg returned no video frame for '{}' (got {} bytes, expected {expected})",
            info.source_path.display(),
            out.stdout.len()
        )));
    }
    RasterImage::from_straight_bytes(&out.stdout[..expected], info.width, info.height)
}

/// Decode audio from a media file to interleaved stereo `f32` PCM.
///
/// With `max_secs`, decoding stops after that many seconds of output.
pub fn decode_audio_f32_stereo(
    tools: &MediaTools,
    path: &Path,
    sample_rate: u32,
    max_secs: Option<f64>,
    timeout: Duration,
) -> ReelResult<AudioPcm> {
    let mut cmd = Command::new(&tools.ffmpeg);
    cmd.args(["-v", "error", "-i"]).arg(path).args([
        "-vn",
        "-f",
        "f32le",
        "-acodec",
        "pcm_f32le",
        "-ac",
        &MIX_CHANNELS.to_string(),
        "-ar",
        &sample_rate.to_string(),
    ]);
    if let Some(secs) = max_secs.filter(|s| s.is_finite() && *s > 0.0) {
        cmd.args(["-t", &format!("{secs:.3}")]);
    }
    cmd.arg("pipe:1");
    let out = run_with_timeout(cmd, "audio decode", timeout)?;
    if !out.status.success() {
        return Err(ReelError::media(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    if !out.stdout.len().is_multiple_of(4) {
        return Err(ReelError::media(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: MIX_CHANNELS,
        interleaved_f32: out
            .stdout
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    })
}

/// Decode a raster image from bytes.
pub fn decode_image(bytes: &[u8]) -> ReelResult<RasterImage> {
    let rgba = image::load_from_memory(bytes)
        .context("decode image from memory")?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    RasterImage::from_straight_bytes(rgba.as_raw(), width, height)
}

/// Parse and rasterize an SVG large enough to cover `canvas` without upscaling.
pub fn rasterize_svg(bytes: &[u8], canvas: Canvas) -> ReelResult<RasterImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    let size = tree.size();
    if !(size.width() > 0.0 && size.height() > 0.0) {
        return Err(ReelError::media("svg has invalid width/height"));
    }

    let scale = (canvas.width as f32 / size.width()).max(canvas.height as f32 / size.height());
    let w = ((size.width() * scale).ceil() as u32).clamp(1, MAX_SVG_DIM);
    let h = ((size.height() * scale).ceil() as u32).clamp(1, MAX_SVG_DIM);
    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| ReelError::render("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        w as f32 / size.width(),
        h as f32 / size.height(),
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());
    // tiny-skia pixmaps are premultiplied RGBA8.
    RasterImage::from_premul_bytes(pixmap.data(), w, h)
}

/// Load a still background: image decode, SVG raster, or the first frame of a video.
pub fn load_still(
    tools: &MediaTools,
    path: &Path,
    kind: MediaKind,
    canvas: Canvas,
    timeout: Duration,
) -> ReelResult<RasterImage> {
    match kind {
        MediaKind::Video => {
            let info = probe_video(tools, path, timeout)?;
            decode_video_frame(tools, &info, 0.0, timeout)
        }
        MediaKind::Image => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read background '{}'", path.display()))?;
            let is_svg = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
            if is_svg {
                rasterize_svg(&bytes, canvas)
            } else {
                decode_image(&bytes)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/decode.rs"]
mod tests;
