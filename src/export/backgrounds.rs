use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::decode::load_still;
use crate::media::playback::VideoPlayback;
use crate::media::process::MediaTools;
use crate::model::asset::{Asset, MediaKind};
use crate::model::project::Project;
use crate::render::surface::RasterImage;
use std::path::PathBuf;
use std::time::Duration;

pub(crate) enum BackgroundSource {
    Still(RasterImage),
    Video(VideoPlayback),
}

/// Every background a project's slides use during a video export, opened up front.
///
/// Slides sharing an asset share one source, so a looping video keeps playing across them.
pub(crate) struct BackgroundSet {
    sources: Vec<BackgroundSource>,
    /// Source index per slide; `None` means the gradient fallback.
    per_slide: Vec<Option<usize>>,
}

impl BackgroundSet {
    /// Open every distinct background. Any failure is fatal for the export.
    pub(crate) fn open(
        project: &Project,
        tools: &MediaTools,
        canvas: Canvas,
        fps: Fps,
        timeout: Duration,
    ) -> ReelResult<Self> {
        let mut keys: Vec<(PathBuf, MediaKind)> = Vec::new();
        let mut sources = Vec::new();
        let mut per_slide = Vec::with_capacity(project.slides.len());

        for slide in &project.slides {
            let Some(asset) = project.background_for(slide) else {
                per_slide.push(None);
                continue;
            };
            let path = project.media_path(&asset.url)?;
            let key = (path, asset.kind);
            if let Some(i) = keys.iter().position(|k| *k == key) {
                per_slide.push(Some(i));
                continue;
            }
            let source = open_source(tools, &key.0, asset, canvas, fps, timeout)?;
            keys.push(key);
            sources.push(source);
            per_slide.push(Some(sources.len() - 1));
        }

        tracing::debug!(sources = sources.len(), "backgrounds ready");
        Ok(Self { sources, per_slide })
    }

    /// Background for the frame about to be composed on slide `index`.
    ///
    /// Video sources advance by one frame per call.
    pub(crate) fn frame_for(
        &mut self,
        index: usize,
        wait: Duration,
    ) -> ReelResult<Option<&RasterImage>> {
        let Some(Some(source)) = self.per_slide.get(index).copied() else {
            return Ok(None);
        };
        match &mut self.sources[source] {
            BackgroundSource::Still(img) => Ok(Some(img)),
            BackgroundSource::Video(playback) => playback.next_frame(wait).map(Some),
        }
    }

    /// Stop all video playback.
    pub(crate) fn stop(&mut self) {
        for source in &mut self.sources {
            if let BackgroundSource::Video(playback) = source {
                playback.stop();
            }
        }
    }
}

fn open_source(
    tools: &MediaTools,
    path: &std::path::Path,
    asset: &Asset,
    canvas: Canvas,
    fps: Fps,
    timeout: Duration,
) -> ReelResult<BackgroundSource> {
    let opened = match asset.kind {
        MediaKind::Video => {
            VideoPlayback::open(tools, path, canvas, fps, timeout).map(BackgroundSource::Video)
        }
        MediaKind::Image => {
            load_still(tools, path, asset.kind, canvas, timeout).map(BackgroundSource::Still)
        }
    };
    opened.map_err(|err| {
        ReelError::media(format!(
            "background '{}' is unusable: {err}",
            path.display()
        ))
    })
}
