use crate::foundation::core::{Fps, FrameIndex};
use crate::model::slide::Slide;
use crate::render::transitions::transition_progress;

/// Where a frame falls on the slide timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveSlide {
    /// 0-based slide index.
    pub index: usize,
    /// Seconds since this slide started.
    pub slide_elapsed: f64,
    /// Entry transition progress in `[0, 1]`.
    pub transition_progress: f64,
}

/// Cumulative slide start times at a fixed frame rate.
#[derive(Clone, Debug)]
pub struct Timeline {
    fps: Fps,
    /// `starts[i]` is the start of slide `i`; the last entry is the total duration.
    starts: Vec<f64>,
}

impl Timeline {
    pub fn new(slides: &[Slide], fps: Fps) -> Self {
        let mut starts = Vec::with_capacity(slides.len() + 1);
        let mut acc = 0.0;
        starts.push(acc);
        for slide in slides {
            acc += slide.duration_sec;
            starts.push(acc);
        }
        Self { fps, starts }
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn slide_count(&self) -> usize {
        self.starts.len() - 1
    }

    pub fn total_secs(&self) -> f64 {
        self.starts.last().copied().unwrap_or(0.0)
    }

    pub fn total_frames(&self) -> u64 {
        self.fps.secs_to_frames_round(self.total_secs())
    }

    /// Timeline position of `frame`, computed as `frame / fps` so slide boundaries land exactly.
    pub fn frame_time(&self, frame: FrameIndex) -> f64 {
        frame.0 as f64 / self.fps.as_f64()
    }

    /// Linear scan for the slide active at `frame`; times past the end stay on the last slide.
    pub fn locate(&self, frame: FrameIndex) -> Option<ActiveSlide> {
        let count = self.slide_count();
        if count == 0 {
            return None;
        }
        let elapsed = self.frame_time(frame);
        let index = (0..count)
            .find(|&i| elapsed < self.starts[i + 1])
            .unwrap_or(count - 1);
        let slide_elapsed = (elapsed - self.starts[index]).max(0.0);
        Some(ActiveSlide {
            index,
            slide_elapsed,
            transition_progress: transition_progress(slide_elapsed),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/timeline.rs"]
mod tests;
