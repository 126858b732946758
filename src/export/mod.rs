//! Video, still-archive, preview and batch exports.

pub(crate) mod backgrounds;
pub(crate) mod batch;
pub(crate) mod capture;
pub(crate) mod preview;
pub(crate) mod progress;
pub(crate) mod stills;
pub(crate) mod timeline;
