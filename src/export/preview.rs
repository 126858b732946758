use crate::config::ExportConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::decode::{decode_video_frame, load_still, probe_video};
use crate::model::asset::{Asset, MediaKind};
use crate::model::project::Project;
use crate::render::compositor::{Compositor, FrameRequest};
use crate::render::surface::{FrameRGBA, RasterImage, Surface};
use crate::render::transitions::transition_progress;

fn preview_background(
    project: &Project,
    asset: &Asset,
    at_sec: f64,
    config: &ExportConfig,
    canvas: Canvas,
) -> ReelResult<RasterImage> {
    let path = project.media_path(&asset.url)?;
    let timeout = config.media_load_timeout();
    match asset.kind {
        MediaKind::Video => {
            let info = probe_video(&config.tools, &path, timeout)?;
            // Backgrounds loop, so wrap into the clip.
            let at = match info.duration_sec.or(asset.duration) {
                Some(d) if d > 0.0 => at_sec.rem_euclid(d),
                _ => 0.0,
            };
            decode_video_frame(&config.tools, &info, at, timeout)
        }
        MediaKind::Image => load_still(&config.tools, &path, asset.kind, canvas, timeout),
    }
}

/// Compose a single frame of slide `slide_index`, `at_sec` seconds into that slide.
///
/// A background that cannot be loaded is replaced by the gradient with a warning.
pub fn render_preview_frame(
    project: &Project,
    slide_index: usize,
    at_sec: f64,
    config: &ExportConfig,
    compositor: &mut Compositor,
    canvas: Canvas,
) -> ReelResult<FrameRGBA> {
    let slide = project.slides.get(slide_index).ok_or_else(|| {
        ReelError::validation(format!(
            "slide index {slide_index} out of range (project has {})",
            project.slides.len()
        ))
    })?;
    slide.validate()?;
    let at_sec = if at_sec.is_finite() {
        at_sec.clamp(0.0, slide.duration_sec)
    } else {
        0.0
    };

    let background = project.background_for(slide).and_then(|asset| {
        match preview_background(project, asset, at_sec, config, canvas) {
            Ok(img) => Some(img),
            Err(err) => {
                tracing::warn!(
                    asset = %asset.url,
                    error = %err,
                    "preview background unavailable, using gradient"
                );
                None
            }
        }
    });

    let mut surface = Surface::new(canvas)?;
    let req = FrameRequest {
        slide,
        background: background.as_ref(),
        transition_progress: transition_progress(at_sec),
        overlay_opacity: Some(project.overlay_percent()),
        clock: Some(at_sec),
    };
    compositor.render(&mut surface, &req)?;
    Ok(surface.to_frame())
}

#[cfg(test)]
#[path = "../../tests/unit/export/preview.rs"]
mod tests;
