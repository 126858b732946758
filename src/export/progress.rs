/// Synchronous export progress callback.
///
/// Called on the export thread; implementations must return quickly.
pub trait ProgressObserver {
    /// `percent` is in `0..=100` and never decreases within one export.
    fn on_progress(&mut self, percent: f32, message: &str);
}

impl<F> ProgressObserver for F
where
    F: FnMut(f32, &str),
{
    fn on_progress(&mut self, percent: f32, message: &str) {
        self(percent, message)
    }
}

/// Discards progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn on_progress(&mut self, _percent: f32, _message: &str) {}
}

/// Forwards progress to `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, percent: f32, message: &str) {
        tracing::info!(percent = format_args!("{percent:.0}"), "{message}");
    }
}

/// Clamps and de-duplicates reports so observers only see monotonic values.
pub(crate) struct Progress<'a> {
    observer: &'a mut dyn ProgressObserver,
    last: f32,
}

impl<'a> Progress<'a> {
    pub(crate) fn new(observer: &'a mut dyn ProgressObserver) -> Self {
        Self {
            observer,
            last: 0.0,
        }
    }

    pub(crate) fn report(&mut self, percent: f32, message: &str) {
        let p = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            self.last
        };
        self.last = self.last.max(p);
        self.observer.on_progress(self.last, message);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/progress.rs"]
mod tests;
