use crate::config::ExportConfig;
use crate::encode::blob::MediaBlob;
use crate::export::progress::{Progress, ProgressObserver};
use crate::foundation::core::Canvas;
use crate::foundation::error::ReelResult;
use crate::media::decode::load_still;
use crate::model::project::Project;
use crate::model::slide::Slide;
use crate::render::compositor::{Compositor, FrameRequest};
use crate::render::surface::{RasterImage, StillFormat, Surface};
use anyhow::Context;
use std::io::{Cursor, Write};

pub const ZIP_MIME: &str = "application/zip";

/// Archive entry name for the 0-based slide `index`.
pub fn still_entry_name(index: usize, format: StillFormat) -> String {
    format!("slide_{:03}.{}", index + 1, format.extension())
}

/// Still background for one slide. Load failures fall back to the gradient.
fn still_background(
    project: &Project,
    slide: &Slide,
    config: &ExportConfig,
    canvas: Canvas,
) -> Option<RasterImage> {
    let asset = project.background_for(slide)?;
    let loaded = project.media_path(&asset.url).and_then(|path| {
        load_still(
            &config.tools,
            &path,
            asset.kind,
            canvas,
            config.media_load_timeout(),
        )
    });
    match loaded {
        Ok(img) => Some(img),
        Err(err) => {
            tracing::warn!(
                slide = %slide.id,
                asset = %asset.url,
                error = %err,
                "still background unavailable, using gradient"
            );
            None
        }
    }
}

/// Render one settled still per slide and pack them into a ZIP archive.
#[tracing::instrument(skip_all, fields(slides = project.slides.len(), format = ?config.still_format))]
pub fn export_stills(
    project: &Project,
    config: &ExportConfig,
    compositor: &mut Compositor,
    canvas: Canvas,
    observer: &mut dyn ProgressObserver,
) -> ReelResult<MediaBlob> {
    project.validate()?;
    let mut progress = Progress::new(observer);
    let mut surface = Surface::new(canvas)?;
    let overlay = Some(project.overlay_percent());
    let count = project.slides.len();

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for (i, slide) in project.slides.iter().enumerate() {
        progress.report(
            (i as f32 / count as f32) * 100.0,
            &format!("Rendering slide {}/{}", i + 1, count),
        );
        let background = still_background(project, slide, config, canvas);
        let req = FrameRequest {
            overlay_opacity: overlay,
            ..FrameRequest::still(slide, background.as_ref())
        };
        compositor.render(&mut surface, &req)?;
        let bytes = surface
            .to_frame()
            .encode(config.still_format, config.jpeg_quality)?;

        let name = still_entry_name(i, config.still_format);
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("start archive entry '{name}'"))?;
        zip.write_all(&bytes)
            .with_context(|| format!("write archive entry '{name}'"))?;
    }

    let bytes = zip.finish().context("finish archive")?.into_inner();
    progress.report(100.0, "Done");
    tracing::info!(bytes = bytes.len(), "stills exported");
    Ok(MediaBlob::new(bytes, ZIP_MIME))
}

#[cfg(test)]
#[path = "../../tests/unit/export/stills.rs"]
mod tests;
