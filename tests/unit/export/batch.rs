use super::*;
use crate::config::{ExportConfig, Pacing};
use crate::encode::sink::InMemorySink;
use crate::export::capture::{ExportStatus, UnpacedPacer};
use crate::foundation::core::Canvas;
use crate::model::slide::Slide;

fn exporter() -> VideoExporter {
    let mut cfg = ExportConfig::default();
    cfg.fonts.system_fonts = false;
    cfg.pacing = Pacing::Unpaced;
    cfg.transcode.enabled = false;
    cfg.batch_delay_ms = 1;
    VideoExporter::new(cfg)
        .unwrap()
        .with_canvas(Canvas {
            width: 16,
            height: 28,
        })
        .with_pacer(UnpacedPacer)
}

fn job(name: &str, durations: &[f64]) -> BatchJob {
    BatchJob {
        name: name.to_owned(),
        project: Project::new(durations.iter().map(|&d| Slide::new(name, d)).collect()),
    }
}

fn sink_factory() -> impl FnMut() -> Box<dyn FrameSink> {
    || {
        Box::new(InMemorySink::indices_only())
    }
}

#[test]
fn failing_job_does_not_abort_batch() {
    let jobs = vec![
        job("en", &[0.2]),
        // No slides: fails validation.
        job("de", &[]),
        job("fr", &[0.1, 0.1]),
    ];
    let mut exp = exporter();
    let mut make = sink_factory();
    let mut percents = Vec::new();
    let mut obs = |p: f32, _: &str| percents.push(p);
    let items = export_batch(&jobs, &mut exp, &mut make, &mut obs);

    assert_eq!(items.len(), 3);
    assert!(items[0].is_ok());
    assert!(!items[1].is_ok());
    assert!(items[2].is_ok());
    assert_eq!(items[2].outcome.as_ref().unwrap().frames, 6);
    assert_eq!(
        items[0].outcome.as_ref().unwrap().status,
        ExportStatus::Complete
    );

    let placeholder = items[1].blob();
    assert_eq!(placeholder.mime, "text/plain");
    assert_eq!(placeholder.extension(), "txt");
    let text = String::from_utf8(placeholder.bytes).unwrap();
    assert!(text.contains("'de'"));
    assert!(text.contains("at least one slide"));

    assert!(percents.iter().all(|p| (0.0..=100.0).contains(p)));
    assert!((percents.last().copied().unwrap() - 100.0).abs() < 1e-3);
}

#[test]
fn empty_batch_is_empty() {
    let mut exp = exporter();
    let mut make = sink_factory();
    let items = export_batch(&[], &mut exp, &mut make, &mut crate::export::progress::NullProgress);
    assert!(items.is_empty());
}
