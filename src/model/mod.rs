//! Slide, style, asset and project data consumed read-only by the pipeline.

pub(crate) mod asset;
pub(crate) mod project;
pub(crate) mod slide;
pub(crate) mod style;
