use crate::audio::mix::prepare_audio_track;
use crate::config::{ExportConfig, Pacing};
use crate::encode::blob::MediaBlob;
use crate::encode::recorder::{ContainerRecorder, bitrate_for_duration};
use crate::encode::sink::{CaptureStream, FrameSink, VideoTrackConfig};
use crate::encode::transcode::{FfmpegTranscoder, Transcode, transcode_or_fallback};
use crate::export::backgrounds::BackgroundSet;
use crate::export::progress::{Progress, ProgressObserver};
use crate::export::timeline::Timeline;
use crate::foundation::core::{Canvas, EXPORT_CANVAS, EXPORT_FPS, Fps, FrameIndex};
use crate::foundation::error::ReelResult;
use crate::model::project::Project;
use crate::render::compositor::{Compositor, FrameRequest};
use crate::render::fonts::FontBook;
use crate::render::surface::Surface;
use std::time::{Duration, Instant};

/// Frames between progress reports.
pub const PROGRESS_EVERY_FRAMES: u64 = 15;

const RENDER_PROGRESS_BASE: f32 = 10.0;
const RENDER_PROGRESS_SPAN: f32 = 85.0;

/// Lifecycle of one video export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Loading,
    Recording,
    Finalizing,
    Done,
    Failed,
}

/// Decides when each frame may be produced.
pub trait FramePacer {
    /// Called once right before frame 0.
    fn start(&mut self);
    /// Block until `frame` is due.
    fn wait_for(&mut self, frame: FrameIndex, fps: Fps);
    /// Pause between the last frame and stopping the recorder.
    fn flush_delay(&self, configured: Duration) -> Duration;
}

/// Absolute wall-clock schedule: frame `f` is due at `start + f / fps`.
///
/// A late frame does not shift later deadlines; the loop yields once and carries on.
#[derive(Debug, Default)]
pub struct RealtimePacer {
    start: Option<Instant>,
    late_frames: u64,
}

impl RealtimePacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn late_frames(&self) -> u64 {
        self.late_frames
    }
}

impl FramePacer for RealtimePacer {
    fn start(&mut self) {
        self.start = Some(Instant::now());
        self.late_frames = 0;
    }

    fn wait_for(&mut self, frame: FrameIndex, fps: Fps) {
        let start = *self.start.get_or_insert_with(Instant::now);
        let due = start + Duration::from_secs_f64(fps.frames_to_secs(frame.0));
        let now = Instant::now();
        if now < due {
            std::thread::sleep(due - now);
        } else {
            if frame.0 > 0 {
                self.late_frames += 1;
            }
            std::thread::yield_now();
        }
    }

    fn flush_delay(&self, configured: Duration) -> Duration {
        configured
    }
}

/// Produces frames as fast as possible. A video background that cannot keep up
/// repeats its last frame, so output can differ from a realtime run.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnpacedPacer;

impl FramePacer for UnpacedPacer {
    fn start(&mut self) {}

    fn wait_for(&mut self, _frame: FrameIndex, _fps: Fps) {}

    fn flush_delay(&self, _configured: Duration) -> Duration {
        Duration::ZERO
    }
}

/// How the final blob came to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportStatus {
    Complete,
    /// The recorded container was kept because conversion failed.
    CompleteViaFallback { reason: String },
}

/// A finished video export.
#[derive(Debug)]
pub struct VideoExport {
    pub blob: MediaBlob,
    pub status: ExportStatus,
    pub frames: u64,
}

/// Aborts the sink unless the export reached the recorder's `end`.
struct SinkGuard<'a> {
    sink: &'a mut dyn FrameSink,
    armed: bool,
}

impl Drop for SinkGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!("aborting sink after failed export");
            self.sink.abort();
        }
    }
}

/// Owns everything that outlives a single export: fonts, the lazily loaded transcoder and
/// the pacer.
pub struct VideoExporter {
    config: ExportConfig,
    canvas: Canvas,
    fps: Fps,
    compositor: Compositor,
    transcoder: Option<Box<dyn Transcode>>,
    pacer: Box<dyn FramePacer>,
    state: ExportState,
}

impl std::fmt::Debug for VideoExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoExporter")
            .field("canvas", &self.canvas)
            .field("fps", &self.fps)
            .field("transcode", &self.transcoder.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl VideoExporter {
    pub fn new(config: ExportConfig) -> ReelResult<Self> {
        let fonts = FontBook::from_config(&config.fonts)?;
        let transcoder: Option<Box<dyn Transcode>> = config.transcode.enabled.then(|| {
            Box::new(FfmpegTranscoder::new(
                config.tools.clone(),
                config.transcode.timeouts(),
            )) as Box<dyn Transcode>
        });
        let pacer: Box<dyn FramePacer> = match config.pacing {
            Pacing::Realtime => Box::new(RealtimePacer::new()),
            Pacing::Unpaced => Box::new(UnpacedPacer),
        };
        Ok(Self {
            config,
            canvas: EXPORT_CANVAS,
            fps: EXPORT_FPS,
            compositor: Compositor::new(fonts),
            transcoder,
            pacer,
            state: ExportState::Idle,
        })
    }

    /// Render at a different size. Exports are 1080x1920 unless overridden.
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_pacer(mut self, pacer: impl FramePacer + 'static) -> Self {
        self.pacer = Box::new(pacer);
        self
    }

    pub fn with_transcoder(mut self, transcoder: Option<Box<dyn Transcode>>) -> Self {
        self.transcoder = transcoder;
        self
    }

    pub fn with_compositor(mut self, compositor: Compositor) -> Self {
        self.compositor = compositor;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    fn enter(&mut self, state: ExportState) {
        tracing::debug!(from = ?self.state, to = ?state, "export state");
        self.state = state;
    }

    /// Render `project` into `sink`, then convert the result when a transcoder is set.
    #[tracing::instrument(skip_all, fields(slides = project.slides.len()))]
    pub fn export(
        &mut self,
        project: &Project,
        sink: &mut dyn FrameSink,
        observer: &mut dyn ProgressObserver,
    ) -> ReelResult<VideoExport> {
        let mut progress = Progress::new(observer);
        match self.run(project, sink, &mut progress) {
            Ok(export) => {
                self.enter(ExportState::Done);
                progress.report(100.0, "Done");
                tracing::info!(
                    frames = export.frames,
                    bytes = export.blob.len(),
                    mime = %export.blob.mime,
                    "export finished"
                );
                Ok(export)
            }
            Err(err) => {
                self.enter(ExportState::Failed);
                tracing::error!(error = %err, "export failed");
                Err(err)
            }
        }
    }

    fn run(
        &mut self,
        project: &Project,
        sink: &mut dyn FrameSink,
        progress: &mut Progress<'_>,
    ) -> ReelResult<VideoExport> {
        project.validate()?;
        let timeline = Timeline::new(&project.slides, self.fps);
        let total_frames = timeline.total_frames();
        let total_secs = timeline.total_secs();
        let slide_count = timeline.slide_count();

        self.enter(ExportState::Loading);
        progress.report(0.0, "Loading background");
        let mut surface = Surface::new(self.canvas)?;
        let mut backgrounds = BackgroundSet::open(
            project,
            &self.config.tools,
            self.canvas,
            self.fps,
            self.config.media_load_timeout(),
        )?;

        progress.report(5.0, "Preparing audio");
        let audio = project.background_audio.as_deref().and_then(|source| {
            match project.media_path(source) {
                Ok(path) => prepare_audio_track(
                    &self.config.tools,
                    &path,
                    total_secs,
                    self.config.audio_timeout(),
                ),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "background audio path rejected, exporting without audio"
                    );
                    None
                }
            }
        });

        let stream = CaptureStream {
            video: VideoTrackConfig {
                canvas: self.canvas,
                fps: self.fps,
                bitrate: bitrate_for_duration(total_secs),
            },
            audio,
        };
        sink.begin(stream)?;
        let mut guard = SinkGuard { sink, armed: true };

        self.enter(ExportState::Recording);
        let overlay = Some(project.overlay_percent());
        let frame_wait = self.config.frame_wait();
        self.pacer.start();
        for f in 0..total_frames {
            let idx = FrameIndex(f);
            self.pacer.wait_for(idx, self.fps);
            let Some(active) = timeline.locate(idx) else {
                break;
            };
            let slide = &project.slides[active.index];
            let background = backgrounds.frame_for(active.index, frame_wait)?;
            let req = FrameRequest {
                slide,
                background,
                transition_progress: active.transition_progress,
                overlay_opacity: overlay,
                clock: Some(active.slide_elapsed),
            };
            self.compositor.render(&mut surface, &req)?;
            guard.sink.push_frame(idx, &surface.to_frame())?;

            if f % PROGRESS_EVERY_FRAMES == 0 {
                let elapsed = timeline.frame_time(idx);
                let pct = (elapsed / total_secs) as f32 * RENDER_PROGRESS_SPAN
                    + RENDER_PROGRESS_BASE;
                progress.report(
                    pct,
                    &format!("Rendering slide {}/{}", active.index + 1, slide_count),
                );
            }
        }

        self.enter(ExportState::Finalizing);
        progress.report(RENDER_PROGRESS_BASE + RENDER_PROGRESS_SPAN, "Finalizing");
        backgrounds.stop();
        let flush = self.pacer.flush_delay(self.config.flush_delay());
        if !flush.is_zero() {
            std::thread::sleep(flush);
        }
        guard.armed = false;
        let recorded = guard.sink.end()?;

        let (blob, status) = match self.transcoder.as_deref_mut() {
            Some(transcoder) => {
                progress.report(97.0, "Converting to MP4");
                let outcome = transcode_or_fallback(transcoder, recorded);
                let status = match outcome.fallback_reason {
                    None => ExportStatus::Complete,
                    Some(reason) => ExportStatus::CompleteViaFallback { reason },
                };
                (outcome.blob, status)
            }
            None => (recorded, ExportStatus::Complete),
        };

        Ok(VideoExport {
            blob,
            status,
            frames: total_frames,
        })
    }
}

/// One-shot export through the WebM recorder with settings from `config`.
pub fn export_video(
    project: &Project,
    config: &ExportConfig,
    observer: &mut dyn ProgressObserver,
) -> ReelResult<VideoExport> {
    let mut exporter = VideoExporter::new(config.clone())?;
    let mut recorder = ContainerRecorder::new(config.tools.clone());
    exporter.export(project, &mut recorder, observer)
}

#[cfg(test)]
#[path = "../../tests/unit/export/capture.rs"]
mod tests;
