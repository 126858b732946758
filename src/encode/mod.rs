//! Frame sinks, the WebM container recorder and the MP4 transcode fallback.

pub(crate) mod blob;
pub(crate) mod recorder;
pub(crate) mod sink;
pub(crate) mod transcode;
