//! `ffmpeg`/`ffprobe` backed media access: probing, decoding and looping playback.

pub(crate) mod decode;
pub(crate) mod playback;
pub(crate) mod process;
