use crate::encode::blob::MediaBlob;
use crate::encode::sink::FrameSink;
use crate::export::capture::{VideoExport, VideoExporter};
use crate::export::progress::ProgressObserver;
use crate::model::project::Project;

/// One project to export, e.g. one language variant.
#[derive(Clone, Debug)]
pub struct BatchJob {
    pub name: String,
    pub project: Project,
}

/// Result of one batch job. Failed jobs carry a text placeholder instead of video.
#[derive(Debug)]
pub struct BatchItem {
    pub name: String,
    pub outcome: Result<VideoExport, String>,
}

impl BatchItem {
    /// The exported video, or a `text/plain` diagnostic for a failed job.
    pub fn blob(&self) -> MediaBlob {
        match &self.outcome {
            Ok(export) => export.blob.clone(),
            Err(reason) => failure_placeholder(&self.name, reason),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub(crate) fn failure_placeholder(name: &str, reason: &str) -> MediaBlob {
    MediaBlob::new(
        format!("export of '{name}' failed\n\n{reason}\n").into_bytes(),
        "text/plain",
    )
}

/// Export `jobs` one after another with the configured pause between them.
///
/// `make_sink` is called once per job. A failing job is recorded and the batch continues.
#[tracing::instrument(skip_all, fields(jobs = jobs.len()))]
pub fn export_batch(
    jobs: &[BatchJob],
    exporter: &mut VideoExporter,
    make_sink: &mut dyn FnMut() -> Box<dyn FrameSink>,
    observer: &mut dyn ProgressObserver,
) -> Vec<BatchItem> {
    let delay = exporter.config().batch_delay();
    let mut items = Vec::with_capacity(jobs.len());

    for (i, job) in jobs.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let _span = tracing::info_span!("batch_job", name = %job.name, index = i).entered();

        let mut sink = make_sink();
        let mut job_observer = |percent: f32, message: &str| {
            let overall = (i as f32 + percent / 100.0) / jobs.len() as f32 * 100.0;
            observer.on_progress(overall, &format!("[{}] {message}", job.name));
        };
        let outcome = exporter
            .export(&job.project, sink.as_mut(), &mut job_observer)
            .map_err(|err| {
                tracing::warn!(error = %err, "batch job failed, continuing");
                err.to_string()
            });
        items.push(BatchItem {
            name: job.name.clone(),
            outcome,
        });
    }

    let failed = items.iter().filter(|it| !it.is_ok()).count();
    tracing::info!(total = items.len(), failed, "batch finished");
    items
}

#[cfg(test)]
#[path = "../../tests/unit/export/batch.rs"]
mod tests;
