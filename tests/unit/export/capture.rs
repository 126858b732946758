use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::error::ReelError;
use crate::model::asset::{Asset, MediaKind};
use crate::model::slide::Slide;
use crate::render::surface::FrameRGBA;

fn test_config() -> ExportConfig {
    let mut cfg = ExportConfig::default();
    cfg.fonts.system_fonts = false;
    cfg.pacing = Pacing::Unpaced;
    cfg.transcode.enabled = false;
    cfg
}

fn small() -> Canvas {
    Canvas {
        width: 36,
        height: 64,
    }
}

fn exporter() -> VideoExporter {
    VideoExporter::new(test_config())
        .unwrap()
        .with_canvas(small())
        .with_pacer(UnpacedPacer)
}

fn project(durations: &[f64]) -> Project {
    Project::new(
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| Slide::new(format!("Slide {i}"), d))
            .collect(),
    )
}

struct TimesOut;

impl Transcode for TimesOut {
    fn load(&mut self) -> ReelResult<()> {
        Ok(())
    }

    fn convert(&mut self, _input: &MediaBlob) -> ReelResult<MediaBlob> {
        Err(crate::foundation::error::ReelError::timeout(
            "transcode",
            Duration::from_secs(120),
        ))
    }
}

/// Fails on one frame and records whether it was aborted.
#[derive(Default)]
struct FailingSink {
    fail_at: u64,
    aborted: bool,
    ended: bool,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _stream: CaptureStream) -> ReelResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, _frame: &FrameRGBA) -> ReelResult<()> {
        if idx.0 == self.fail_at {
            return Err(ReelError::encode("disk full"));
        }
        Ok(())
    }

    fn end(&mut self) -> ReelResult<MediaBlob> {
        self.ended = true;
        Ok(MediaBlob::new(Vec::new(), "video/webm"))
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

#[test]
fn renders_every_frame_in_order() {
    let mut exp = exporter();
    let mut sink = InMemorySink::indices_only();
    let mut seen: Vec<(f32, String)> = Vec::new();
    let mut obs = |p: f32, m: &str| seen.push((p, m.to_owned()));

    let out = exp.export(&project(&[2.0, 3.0, 2.0]), &mut sink, &mut obs).unwrap();
    assert_eq!(out.frames, 210);
    assert_eq!(out.status, ExportStatus::Complete);
    assert_eq!(exp.state(), ExportState::Done);

    let frames = sink.frames();
    assert_eq!(frames.len(), 210);
    assert!(frames.iter().enumerate().all(|(i, (idx, _))| idx.0 == i as u64));

    let stream = sink.stream().unwrap();
    assert_eq!(stream.video.canvas, small());
    assert_eq!(stream.video.bitrate, 8_000_000);
    assert!(stream.audio.is_none());

    assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(seen.last().unwrap().0, 100.0);
    assert!(seen.iter().any(|(_, m)| m == "Rendering slide 3/3"));
    let render_reports = seen
        .iter()
        .filter(|(_, m)| m.starts_with("Rendering"))
        .count();
    assert_eq!(render_reports, 14);
    assert!(
        seen.iter()
            .filter(|(_, m)| m.starts_with("Rendering"))
            .all(|(p, _)| (10.0..=95.0).contains(p))
    );
}

#[test]
fn transcode_timeout_keeps_native_container() {
    let mut exp = exporter().with_transcoder(Some(Box::new(TimesOut)));
    let mut sink = InMemorySink::indices_only();
    let mut last = 0.0f32;
    let mut obs = |p: f32, _: &str| last = p;
    let out = exp.export(&project(&[0.5]), &mut sink, &mut obs).unwrap();

    assert_eq!(out.blob.mime, "video/x-raw");
    assert!(matches!(out.status, ExportStatus::CompleteViaFallback { .. }));
    assert_eq!(out.frames, 15);
    assert_eq!(last, 100.0);
}

#[test]
fn missing_background_fails_before_any_frame() {
    let dir = tempfile::tempdir().unwrap();
    let mut p = project(&[1.0]);
    p.root = dir.path().to_path_buf();
    p.background = Some(Asset::new("bg", "missing.png", MediaKind::Image));

    let mut exp = exporter();
    let mut sink = InMemorySink::new();
    let err = exp
        .export(&p, &mut sink, &mut crate::export::progress::NullProgress)
        .unwrap_err();
    assert!(matches!(err, ReelError::Media(_)));
    assert!(sink.stream().is_none());
    assert!(sink.frames().is_empty());
    assert_eq!(exp.state(), ExportState::Failed);
}

#[test]
fn still_image_background_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([250, 0, 0, 255]));
    img.save(dir.path().join("red.png")).unwrap();
    let mut p = project(&[0.2]);
    p.root = dir.path().to_path_buf();
    p.overlay_percent = Some(0.0);
    p.background = Some(Asset::new("bg", "red.png", MediaKind::Image));

    let mut exp = exporter();
    let mut sink = InMemorySink::new();
    exp.export(&p, &mut sink, &mut crate::export::progress::NullProgress)
        .unwrap();
    let (_, last) = sink.frames().last().unwrap();
    // A corner pixel away from the text: pure background.
    let px = &last.data[..4];
    assert!(px[0] >= 245 && px[1] <= 5 && px[2] <= 5, "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn sink_is_aborted_on_failure() {
    let mut exp = exporter();
    let mut sink = FailingSink {
        fail_at: 5,
        ..FailingSink::default()
    };
    let err = exp
        .export(
            &project(&[1.0]),
            &mut sink,
            &mut crate::export::progress::NullProgress,
        )
        .unwrap_err();
    assert!(matches!(err, ReelError::Encode(_)));
    assert!(sink.aborted);
    assert!(!sink.ended);
}

#[test]
fn unreadable_audio_degrades_to_silent_export() {
    let mut p = project(&[0.2]);
    p.background_audio = Some("does-not-exist.mp3".to_owned());
    let mut exp = exporter();
    let mut sink = InMemorySink::indices_only();
    let out = exp
        .export(&p, &mut sink, &mut crate::export::progress::NullProgress)
        .unwrap();
    assert_eq!(out.status, ExportStatus::Complete);
    assert!(sink.stream().unwrap().audio.is_none());
}

#[test]
fn realtime_pacer_follows_absolute_schedule() {
    let mut pacer = RealtimePacer::new();
    let fps = Fps::new(100, 1).unwrap();
    let t0 = Instant::now();
    pacer.start();
    for f in 0..5 {
        pacer.wait_for(FrameIndex(f), fps);
    }
    assert!(t0.elapsed() >= Duration::from_millis(40));
    assert_eq!(pacer.flush_delay(Duration::from_millis(150)), Duration::from_millis(150));
    assert_eq!(UnpacedPacer.flush_delay(Duration::from_millis(150)), Duration::ZERO);
}
